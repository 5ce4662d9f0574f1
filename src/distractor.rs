// ============================================
// src/distractor.rs
// 誤答候補 (ダミーの選択肢) の選び出し
// ============================================

use std::cmp;
use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::Catalog;
use crate::index::CandidateIndex;
use crate::word::text_len;

/// 候補の上限。大きな単語リストでも1問あたりの処理量を抑える
pub const MAX_CANDIDATES: usize = 200;

/// 答えの文字数がこの差以内なら候補にする
pub const LENGTH_TOLERANCE: usize = 2;

/// 類似判定に使う共通部分文字列の最小長
pub const MIN_SIMILAR_RUN: usize = 3;

/// MARK:誤答候補の単語番号をランダムな順で返す (正解の単語は含まない)。
/// 候補が1つもなくても失敗はしない。足りない分は呼び出し側で補うこと
pub fn select_distractors<R: Rng + ?Sized>(
    catalog: &Catalog,
    index: &CandidateIndex,
    target: usize,
    avoid_similar: bool,
    rng: &mut R,
) -> Vec<usize> {
    let Some(target_word) = catalog.get(target) else {
        return Vec::new();
    };
    let mode = index.mode();
    let target_answer = target_word.answer(mode);
    let target_len = text_len(target_answer);

    // 1. 同じ品詞
    let mut pool: BTreeSet<usize> = BTreeSet::new();
    if let Some(same_pos) = index.with_part_of_speech(&target_word.part_of_speech) {
        pool.extend(same_pos.iter().copied());
    }

    // 2. 答えの文字数が近いもの
    let min_len = target_len.saturating_sub(LENGTH_TOLERANCE);
    for len in min_len..=target_len + LENGTH_TOLERANCE {
        if let Some(same_len) = index.with_answer_length(len) {
            pool.extend(same_len.iter().copied());
        }
    }
    pool.remove(&target);

    // 3. どちらも無ければ全単語から
    let mut candidates: Vec<usize> = if pool.is_empty() {
        (0..catalog.len()).filter(|&i| i != target).collect()
    } else {
        pool.into_iter().collect()
    };

    // 4. 上限を超えたら無作為に間引く
    if candidates.len() > MAX_CANDIDATES {
        candidates.shuffle(rng);
        candidates.truncate(MAX_CANDIDATES);
    }

    // 5. 正解に似すぎた候補を除く
    if avoid_similar {
        candidates.retain(|&i| !is_too_similar(target_answer, catalog[i].answer(mode)));
    }

    // 6. 順番をシャッフル
    candidates.shuffle(rng);
    candidates
}

/// 候補の答えが正解に似すぎているか (大文字小文字は区別しない)
pub fn is_too_similar(target: &str, candidate: &str) -> bool {
    let target = lowercase_chars(target);
    let threshold = cmp::max(MIN_SIMILAR_RUN, target.len() / 2);
    common_run(&target, &lowercase_chars(candidate)) >= threshold
}

/// 最長共通部分文字列の長さ (char 単位、大文字小文字は区別しない)
pub fn longest_common_substring(a: &str, b: &str) -> usize {
    common_run(&lowercase_chars(a), &lowercase_chars(b))
}

// 小文字化で1文字が複数文字になることがあるので、長さは変換後で数える
fn lowercase_chars(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

fn common_run(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // 直前の行だけを持つDP
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    let mut best = 0;
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            best = cmp::max(best, curr[j + 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::{Mode, WordEntry};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn lcs_is_case_insensitive() {
        assert_eq!(longest_common_substring("insist", "insisting"), 6);
        assert_eq!(longest_common_substring("Apple", "PINEAPPLE"), 5);
        assert_eq!(longest_common_substring("abc", "xyz"), 0);
        assert_eq!(longest_common_substring("", "abc"), 0);
        assert_eq!(longest_common_substring("図書館", "水族館"), 1);
    }

    #[test]
    fn similar_answers_are_detected() {
        assert!(is_too_similar("insist", "insisting"));
        assert!(is_too_similar("house", "mouse"));
        assert!(!is_too_similar("insist", "borrow"));
        // 3文字未満の共通部分では除外しない
        assert!(!is_too_similar("cat", "car"));
    }

    #[test]
    fn threshold_counts_lowercased_chars() {
        // "İ" は小文字にすると2文字 (i + U+0307) になる
        assert_eq!(longest_common_substring("İİİİİİ", "i\u{307}i\u{307}"), 4);
        assert!(!is_too_similar("İİİİİİ", "i\u{307}i\u{307}"));
        assert!(is_too_similar("İİİİİİ", "i\u{307}i\u{307}i\u{307}"));
    }

    #[test]
    fn prefers_same_part_of_speech_and_length() {
        let catalog = Catalog::new(vec![
            WordEntry::new("cat", "猫", "", "名詞"),
            WordEntry::new("dog", "犬", "", "名詞"),
            WordEntry::new("extraordinarily", "並外れて", "", "副詞"),
        ]);
        let index = CandidateIndex::build(&catalog, Mode::HeadwordAsAnswer);
        let picked = select_distractors(&catalog, &index, 0, false, &mut rng());
        assert_eq!(picked, vec![1]);
    }

    #[test]
    fn falls_back_to_whole_catalog() {
        let catalog = Catalog::new(vec![
            WordEntry::new("a", "", "", ""),
            WordEntry::new("abcdefghij", "", "", ""),
            WordEntry::new("klmnopqrstuvw", "", "", ""),
        ]);
        let index = CandidateIndex::build(&catalog, Mode::HeadwordAsAnswer);
        let mut picked = select_distractors(&catalog, &index, 0, false, &mut rng());
        picked.sort();
        assert_eq!(picked, vec![1, 2]);
    }

    #[test]
    fn filters_similar_candidates() {
        let catalog = Catalog::new(vec![
            WordEntry::new("insist", "主張する", "", "動詞"),
            WordEntry::new("insisting", "主張している", "", "動詞"),
            WordEntry::new("borrow", "借りる", "", "動詞"),
        ]);
        let index = CandidateIndex::build(&catalog, Mode::HeadwordAsAnswer);

        let filtered = select_distractors(&catalog, &index, 0, true, &mut rng());
        assert_eq!(filtered, vec![2]);

        let mut unfiltered = select_distractors(&catalog, &index, 0, false, &mut rng());
        unfiltered.sort();
        assert_eq!(unfiltered, vec![1, 2]);
    }

    #[test]
    fn caps_large_pools() {
        let catalog: Catalog = (0..1000)
            .map(|i| WordEntry::new(format!("w{i:04}"), "", "", "名詞"))
            .collect();
        let index = CandidateIndex::build(&catalog, Mode::HeadwordAsAnswer);
        let picked = select_distractors(&catalog, &index, 5, false, &mut rng());
        assert_eq!(picked.len(), MAX_CANDIDATES);
        assert!(!picked.contains(&5));
        let unique: BTreeSet<usize> = picked.iter().copied().collect();
        assert_eq!(unique.len(), MAX_CANDIDATES);
    }

    #[test]
    fn single_word_has_no_candidates() {
        let catalog = Catalog::new(vec![WordEntry::new("solo", "ひとり", "", "名詞")]);
        let index = CandidateIndex::build(&catalog, Mode::MeaningAsAnswer);
        assert!(select_distractors(&catalog, &index, 0, true, &mut rng()).is_empty());
    }
}
