// ============================================
// src/session.rs
// 回答の記録と集計
// ============================================

use serde::{Deserialize, Serialize};

/// 1問ごとの回答記録 (作成後は変更しない)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub question: String,
    pub correct_answer: String,
    pub hint: String,
    pub answer: String,
    pub correct: bool,
    pub hint_used: bool,
}

impl ResultRecord {
    /// 統計で使う単語のキー (正解が空なら問題文)
    pub fn word_key(&self) -> &str {
        if self.correct_answer.is_empty() {
            &self.question
        } else {
            &self.correct_answer
        }
    }
}

/// 正答数と問題数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub correct_count: u32,
    pub total: u32,
}

impl Summary {
    /// 正答率 (%)
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.correct_count as f64 / self.total as f64 * 100.0
        }
    }
}

/// 今回のセッションの回答ログ (追記のみ)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    results: Vec<ResultRecord>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// MARK:回答を記録する
    pub fn record_answer(
        &mut self,
        question: &str,
        correct_answer: &str,
        hint: &str,
        chosen: &str,
        hint_used: bool,
    ) -> &ResultRecord {
        self.results.push(ResultRecord {
            question: question.to_string(),
            correct_answer: correct_answer.to_string(),
            hint: hint.to_string(),
            answer: chosen.to_string(),
            correct: chosen == correct_answer,
            hint_used,
        });
        &self.results[self.results.len() - 1]
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.results)
    }

    pub fn clear(&mut self) {
        self.results.clear();
    }
}

/// 正答数を数える
pub fn summarize(results: &[ResultRecord]) -> Summary {
    Summary {
        correct_count: results.iter().filter(|r| r.correct).count() as u32,
        total: results.len() as u32,
    }
}
