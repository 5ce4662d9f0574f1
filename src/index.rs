// ============================================
// src/index.rs
// 誤答候補を素早く引くための索引 (品詞別・答えの文字数別)
// ============================================

use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::catalog::Catalog;
use crate::word::{Mode, text_len};

/// 単語リストに対する2つの索引。
/// 単語リストかモードが変わったら作り直すこと (古い索引は間違った候補を返す)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateIndex {
    mode: Mode,
    by_part_of_speech: HashMap<String, BTreeSet<usize>>,
    by_answer_length: HashMap<usize, BTreeSet<usize>>,
}

impl CandidateIndex {
    /// MARK:索引を作る (O(n))。品詞が空の単語は品詞索引に入れない
    pub fn build(catalog: &Catalog, mode: Mode) -> Self {
        let mut by_part_of_speech: HashMap<String, BTreeSet<usize>> = HashMap::new();
        let mut by_answer_length: HashMap<usize, BTreeSet<usize>> = HashMap::new();

        for (i, word) in catalog.iter().enumerate() {
            if !word.part_of_speech.is_empty() {
                by_part_of_speech
                    .entry(word.part_of_speech.clone())
                    .or_default()
                    .insert(i);
            }
            by_answer_length
                .entry(text_len(word.answer(mode)))
                .or_default()
                .insert(i);
        }

        debug!(
            "索引を作成しました: {} 語, 品詞 {} 種, 文字数 {} 種",
            catalog.len(),
            by_part_of_speech.len(),
            by_answer_length.len()
        );

        Self {
            mode,
            by_part_of_speech,
            by_answer_length,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_built_for(&self, mode: Mode) -> bool {
        self.mode == mode
    }

    /// 指定した品詞の単語番号
    pub fn with_part_of_speech(&self, part_of_speech: &str) -> Option<&BTreeSet<usize>> {
        self.by_part_of_speech.get(part_of_speech)
    }

    /// 答えの文字数がちょうど `len` の単語番号
    pub fn with_answer_length(&self, len: usize) -> Option<&BTreeSet<usize>> {
        self.by_answer_length.get(&len)
    }

    pub fn part_of_speech_count(&self) -> usize {
        self.by_part_of_speech.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_part_of_speech.is_empty() && self.by_answer_length.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::WordEntry;

    fn sample() -> Catalog {
        Catalog::new(vec![
            WordEntry::new("cat", "猫", "", "名詞"),
            WordEntry::new("dog", "犬", "", "名詞"),
            WordEntry::new("run", "走る", "", "動詞"),
        ])
    }

    #[test]
    fn groups_by_part_of_speech() {
        let index = CandidateIndex::build(&sample(), Mode::MeaningAsAnswer);
        assert_eq!(
            index.with_part_of_speech("名詞"),
            Some(&BTreeSet::from([0, 1]))
        );
        assert_eq!(index.with_part_of_speech("動詞"), Some(&BTreeSet::from([2])));
        assert_eq!(index.with_part_of_speech("形容詞"), None);
    }

    #[test]
    fn answer_length_follows_mode() {
        let catalog = sample();
        let meanings = CandidateIndex::build(&catalog, Mode::MeaningAsAnswer);
        assert_eq!(meanings.with_answer_length(1), Some(&BTreeSet::from([0, 1])));
        assert_eq!(meanings.with_answer_length(2), Some(&BTreeSet::from([2])));

        let headwords = CandidateIndex::build(&catalog, Mode::HeadwordAsAnswer);
        assert_eq!(
            headwords.with_answer_length(3),
            Some(&BTreeSet::from([0, 1, 2]))
        );
        assert!(headwords.is_built_for(Mode::HeadwordAsAnswer));
        assert!(!headwords.is_built_for(Mode::MeaningAsAnswer));
    }

    #[test]
    fn empty_catalog_gives_empty_index() {
        let index = CandidateIndex::build(&Catalog::default(), Mode::MeaningAsAnswer);
        assert!(index.is_empty());
    }

    #[test]
    fn empty_part_of_speech_is_not_indexed() {
        let catalog = Catalog::new(vec![
            WordEntry::new("a", "あ", "", ""),
            WordEntry::new("b", "い", "", ""),
        ]);
        let index = CandidateIndex::build(&catalog, Mode::MeaningAsAnswer);
        assert_eq!(index.part_of_speech_count(), 0);
        assert_eq!(index.with_part_of_speech(""), None);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let catalog = sample();
        assert_eq!(
            CandidateIndex::build(&catalog, Mode::HeadwordAsAnswer),
            CandidateIndex::build(&catalog, Mode::HeadwordAsAnswer)
        );
    }
}
