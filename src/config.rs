// ============================================
// src/config.rs
// クイズの設定
// ============================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::catalog::{Catalog, WordSource, normalize};
use crate::error::ConfigError;
use crate::word::Mode;

pub const DEFAULT_SELECTION_COUNT: usize = 4;
pub const DEFAULT_QUESTION_COUNT: usize = 10;
const MIN_SELECTION_COUNT: usize = 2;
const MIN_QUESTION_COUNT: usize = 1;

/// 画面に出す文言の初期値
const DEFAULT_TEXTS: &[(&str, &str)] = &[
    ("title", "Word Wiz !"),
    ("question", "問題"),
    ("hint", "ヒント"),
    ("noHint", "ヒントはありません"),
    ("correct", "正解!"),
    ("incorrect", "不正解…"),
    ("answer", "正解は"),
    ("score", "スコア"),
    ("highScore", "ハイスコア"),
    ("finished", "おつかれさまでした"),
    ("noData", "単語データがありません"),
    ("weakWords", "苦手な単語"),
    ("keysQuestion", "[1-9] 回答  [h] ヒント  [Esc] 終了"),
    ("keysAnswered", "[Enter] 次へ  [Esc] 終了"),
    ("keysFinished", "[r] もう一度  [Esc] 終了"),
];

/// 外から渡される設定 (JSONの設定ファイルからも読める)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizOptions {
    pub words: Option<WordSource>,
    /// `words` が無いときに使う単語リスト
    pub fallback_words: Option<WordSource>,
    pub mode: Mode,
    pub selection_count: usize,
    pub question_count: usize,
    pub avoid_similar_distractors: bool,
    pub texts: BTreeMap<String, String>,
}

impl Default for QuizOptions {
    fn default() -> Self {
        Self {
            words: None,
            fallback_words: None,
            mode: Mode::default(),
            selection_count: DEFAULT_SELECTION_COUNT,
            question_count: DEFAULT_QUESTION_COUNT,
            avoid_similar_distractors: true,
            texts: BTreeMap::new(),
        }
    }
}

impl QuizOptions {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// 検証済みの設定
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    pub catalog: Catalog,
    pub mode: Mode,
    pub selection_count: usize,
    pub question_count: usize,
    pub avoid_similar_distractors: bool,
    pub texts: BTreeMap<String, String>,
}

impl QuizConfig {
    /// 文言を引く (未定義ならキーそのもの)
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.texts.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// MARK:設定を検証して確定する。
/// 範囲外の数値は最小値に丸める (エラーにはしない)
pub fn configure(options: QuizOptions) -> QuizConfig {
    let catalog = match (options.words, options.fallback_words) {
        (Some(words), _) => normalize(words),
        (None, Some(fallback)) => normalize(fallback),
        (None, None) => Catalog::default(),
    };

    let selection_count = if options.selection_count < MIN_SELECTION_COUNT {
        warn!(
            "selectionCount {} は小さすぎるので {MIN_SELECTION_COUNT} にします",
            options.selection_count
        );
        MIN_SELECTION_COUNT
    } else {
        options.selection_count
    };

    let question_count = if options.question_count < MIN_QUESTION_COUNT {
        warn!(
            "questionCount {} は小さすぎるので {MIN_QUESTION_COUNT} にします",
            options.question_count
        );
        MIN_QUESTION_COUNT
    } else {
        options.question_count
    };

    let mut texts: BTreeMap<String, String> = DEFAULT_TEXTS
        .iter()
        .map(|&(key, text)| (key.to_string(), text.to_string()))
        .collect();
    texts.extend(options.texts);

    QuizConfig {
        catalog,
        mode: options.mode,
        selection_count,
        question_count,
        avoid_similar_distractors: options.avoid_similar_distractors,
        texts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::WordItem;

    #[test]
    fn counts_are_clamped() {
        let config = configure(QuizOptions {
            selection_count: 1,
            question_count: 0,
            ..QuizOptions::default()
        });
        assert_eq!(config.selection_count, 2);
        assert_eq!(config.question_count, 1);
    }

    #[test]
    fn texts_override_defaults() {
        let mut texts = BTreeMap::new();
        texts.insert("title".to_string(), "My Quiz".to_string());
        let config = configure(QuizOptions {
            texts,
            ..QuizOptions::default()
        });
        assert_eq!(config.text("title"), "My Quiz");
        assert_eq!(config.text("noData"), "単語データがありません");
        assert_eq!(config.text("unknownKey"), "unknownKey");
    }

    #[test]
    fn fallback_words_are_used_only_without_words() {
        let fallback = WordSource::Items(vec![WordItem::Bare("fallback".to_string())]);
        let config = configure(QuizOptions {
            fallback_words: Some(fallback.clone()),
            ..QuizOptions::default()
        });
        assert_eq!(config.catalog[0].headword, "fallback");

        let config = configure(QuizOptions {
            words: Some(WordSource::Items(vec![WordItem::Bare("main".to_string())])),
            fallback_words: Some(fallback),
            ..QuizOptions::default()
        });
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.catalog[0].headword, "main");
    }

    #[test]
    fn options_deserialize_from_json() {
        let options: QuizOptions = serde_json::from_str(
            r#"{
                "words": [["cat", "猫", "", "名詞"], ["dog", "犬", "", "名詞"]],
                "mode": 1,
                "selectionCount": 3,
                "avoidSimilarDistractors": false,
                "texts": {"title": "テスト"}
            }"#,
        )
        .unwrap();
        assert_eq!(options.mode, Mode::HeadwordAsAnswer);
        assert_eq!(options.question_count, DEFAULT_QUESTION_COUNT);

        let config = configure(options);
        assert_eq!(config.catalog.len(), 2);
        assert_eq!(config.selection_count, 3);
        assert!(!config.avoid_similar_distractors);
        assert_eq!(config.text("title"), "テスト");
    }
}
