// ============================================
// src/generator.rs
// 出題 (単語選び + 選択肢づくり)
// ============================================

use std::collections::HashSet;

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::catalog::Catalog;
use crate::distractor::{is_too_similar, select_distractors};
use crate::error::QuizError;
use crate::index::CandidateIndex;
use crate::word::WordEntry;

/// 出題済みの単語番号 (出題順)。全単語を出し終えたら空に戻る
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedWords {
    order: Vec<usize>,
    seen: HashSet<usize>,
}

impl UsedWords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.seen.contains(&index)
    }

    pub fn push(&mut self, index: usize) {
        if self.seen.insert(index) {
            self.order.push(index);
        }
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.seen.clear();
    }
}

/// 1問ぶんのデータ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub word_index: usize,
    pub word: WordEntry,
    /// 問題文 (モードに応じて見出し語か意味)
    pub prompt: String,
    pub hint: String,
    pub choices: Vec<String>,
    pub correct_index: usize,
}

impl Question {
    pub fn correct_answer(&self) -> &str {
        &self.choices[self.correct_index]
    }
}

/// MARK:次の問題を作る。
/// 単語リストが空なら呼ばないこと (`EmptyCatalog` を返す)
pub fn next_question<R: Rng + ?Sized>(
    catalog: &Catalog,
    index: &CandidateIndex,
    used: &mut UsedWords,
    selection_count: usize,
    avoid_similar: bool,
    rng: &mut R,
) -> Result<Question, QuizError> {
    if catalog.is_empty() {
        return Err(QuizError::EmptyCatalog);
    }

    let mut unused: Vec<usize> = (0..catalog.len()).filter(|&i| !used.contains(i)).collect();
    // 1周したらリセット
    if unused.is_empty() {
        debug!("全 {} 語を出題したので最初から", catalog.len());
        used.clear();
        unused = (0..catalog.len()).collect();
    }

    let target = unused[rng.random_range(0..unused.len())];
    used.push(target);

    let mode = index.mode();
    let word = &catalog[target];
    let correct = word.answer(mode).to_string();
    let wanted = selection_count.saturating_sub(1);

    let mut answers: Vec<String> = Vec::with_capacity(selection_count);
    if wanted > 0 && catalog.len() > 1 {
        for i in select_distractors(catalog, index, target, avoid_similar, rng) {
            if answers.len() >= wanted {
                break;
            }
            push_answer(&mut answers, &correct, catalog[i].answer(mode));
        }
    }

    // 足りなければ全単語から補う (まず似ていないもの、それでも足りなければ何でも)
    if answers.len() < wanted {
        let mut rest: Vec<usize> = (0..catalog.len()).filter(|&i| i != target).collect();
        rest.shuffle(rng);
        let passes: &[bool] = if avoid_similar { &[true, false] } else { &[false] };
        for &skip_similar in passes {
            for &i in &rest {
                if answers.len() >= wanted {
                    break;
                }
                let answer = catalog[i].answer(mode);
                if skip_similar && is_too_similar(&correct, answer) {
                    continue;
                }
                push_answer(&mut answers, &correct, answer);
            }
        }
        debug!("選択肢を全単語から補いました ({} / {wanted})", answers.len());
    }

    let mut choices = Vec::with_capacity(answers.len() + 1);
    choices.push(correct.clone());
    choices.extend(answers);
    choices.shuffle(rng);
    let correct_index = choices.iter().position(|c| *c == correct).unwrap_or(0);

    Ok(Question {
        word_index: target,
        word: word.clone(),
        prompt: word.prompt(mode).to_string(),
        hint: word.hint.clone(),
        choices,
        correct_index,
    })
}

/// 空でなく、正解とも既出の選択肢とも違う答えだけを加える
fn push_answer(answers: &mut Vec<String>, correct: &str, answer: &str) {
    if answer.is_empty() || answer == correct || answers.iter().any(|a| a == answer) {
        return;
    }
    answers.push(answer.to_string());
}
