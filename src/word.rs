// ============================================
// src/word.rs
// 単語データと出題モード
// ============================================

use serde::{Deserialize, Serialize};

/// 正規化済みの単語 (見出し語, 意味, ヒント, 品詞)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub headword: String,
    pub meaning: String,
    pub hint: String,
    pub part_of_speech: String,
}

impl WordEntry {
    pub fn new(
        headword: impl Into<String>,
        meaning: impl Into<String>,
        hint: impl Into<String>,
        part_of_speech: impl Into<String>,
    ) -> Self {
        Self {
            headword: headword.into(),
            meaning: meaning.into(),
            hint: hint.into(),
            part_of_speech: part_of_speech.into(),
        }
    }

    /// モードに応じた「答え」側の文字列
    pub fn answer(&self, mode: Mode) -> &str {
        match mode {
            Mode::MeaningAsAnswer => &self.meaning,
            Mode::HeadwordAsAnswer => &self.headword,
        }
    }

    /// モードに応じた「問題文」側の文字列
    pub fn prompt(&self, mode: Mode) -> &str {
        match mode {
            Mode::MeaningAsAnswer => &self.headword,
            Mode::HeadwordAsAnswer => &self.meaning,
        }
    }
}

/// 出題モード (0: 意味を答える, 1: 単語を答える)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Mode {
    #[default]
    MeaningAsAnswer,
    HeadwordAsAnswer,
}

impl TryFrom<u8> for Mode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::MeaningAsAnswer),
            1 => Ok(Mode::HeadwordAsAnswer),
            other => Err(format!("mode は 0 か 1 です (指定値: {other})")),
        }
    }
}

impl From<Mode> for u8 {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::MeaningAsAnswer => 0,
            Mode::HeadwordAsAnswer => 1,
        }
    }
}

/// 文字数 (バイト数ではなく char 単位)
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}
