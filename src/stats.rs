// ============================================
// src/stats.rs
// 成績データの構造と読み書きロジック
// ============================================

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::session::{ResultRecord, summarize};
use crate::store::KeyValueStore;

/// ストア上のキー
pub const STATS_KEY: &str = "wordwiz.stats";

/// 1回ごとのセッションの記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub timestamp: DateTime<Utc>,
    pub score: u32,
    pub question_count: u32,
}

/// 単語ごとの成績
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordStats {
    pub attempts: u32,
    pub correct: u32,
    pub hint_used: u32,
}

impl WordStats {
    /// 正答率 (0.0〜1.0)
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.correct as f64 / self.attempts as f64
        }
    }
}

/// プレイヤーの成績データ
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionStats {
    /// 過去のセッション記録
    pub sessions: Vec<SessionRecord>,
    pub per_word: BTreeMap<String, WordStats>,
    pub high_score: u32,
}

impl SessionStats {
    /// 回答ログを加算する (減らすことはない)
    pub fn add_session(&mut self, results: &[ResultRecord], question_count: u32, now: DateTime<Utc>) {
        for record in results {
            let entry = self.per_word.entry(record.word_key().to_string()).or_default();
            entry.attempts += 1;
            if record.correct {
                entry.correct += 1;
            }
            if record.hint_used && !record.hint.is_empty() {
                entry.hint_used += 1;
            }
        }

        let score = summarize(results).correct_count;
        self.sessions.push(SessionRecord {
            timestamp: now,
            score,
            question_count,
        });
        if score > self.high_score {
            self.high_score = score;
        }
    }

    pub fn accuracy_for(&self, word: &str) -> Option<f64> {
        self.per_word.get(word).map(WordStats::accuracy)
    }

    /// 正答率の低い単語から順に最大 `limit` 件
    pub fn weakest_words(&self, limit: usize) -> Vec<(&str, WordStats)> {
        let mut words: Vec<(&str, WordStats)> = self
            .per_word
            .iter()
            .filter(|(_, stats)| stats.attempts > 0)
            .map(|(word, stats)| (word.as_str(), *stats))
            .collect();
        words.sort_by(|a, b| {
            a.1.accuracy()
                .total_cmp(&b.1.accuracy())
                .then(b.1.attempts.cmp(&a.1.attempts))
        });
        words.truncate(limit);
        words
    }
}

/// MARK:ストアから読み込む。無い・壊れている場合は空として扱う
pub fn load(store: &dyn KeyValueStore) -> SessionStats {
    match store.get(STATS_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!("成績データが壊れているため初期化します: {e}");
            SessionStats::default()
        }),
        Ok(None) => SessionStats::default(),
        Err(e) => {
            warn!("成績データを読めませんでした: {e}");
            SessionStats::default()
        }
    }
}

/// MARK:セッションの結果を成績に加えて保存する。
/// 保存に失敗してもエラーにはせず、更新後の成績を返す
pub fn persist(
    results: &[ResultRecord],
    question_count: u32,
    store: &mut dyn KeyValueStore,
) -> SessionStats {
    persist_at(results, question_count, store, Utc::now())
}

pub fn persist_at(
    results: &[ResultRecord],
    question_count: u32,
    store: &mut dyn KeyValueStore,
    now: DateTime<Utc>,
) -> SessionStats {
    let mut stats = load(store);
    stats.add_session(results, question_count, now);

    match serde_json::to_string(&stats) {
        Ok(json) => match store.set(STATS_KEY, &json) {
            Ok(()) => info!("成績を保存しました (ハイスコア: {})", stats.high_score),
            Err(e) => warn!("成績を保存できませんでした: {e}"),
        },
        Err(e) => warn!("成績をシリアライズできませんでした: {e}"),
    }
    stats
}

/// 成績を消す
pub fn reset(store: &mut dyn KeyValueStore) {
    if let Err(e) = store.remove(STATS_KEY) {
        warn!("成績を消去できませんでした: {e}");
    }
}
