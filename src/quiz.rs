// ============================================
// src/quiz.rs
// クイズ1回ぶんの状態と進行
// ============================================

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{QuizConfig, QuizOptions, configure};
use crate::error::QuizError;
use crate::generator::{Question, UsedWords, next_question};
use crate::index::CandidateIndex;
use crate::session::{ResultRecord, SessionLog, Summary};
use crate::sink::{ResultsSink, submit_results};
use crate::stats::{self, SessionStats};
use crate::store::KeyValueStore;

/// 画面に出すべき状態
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Question(Question),
    Finished(Summary),
    /// 単語リストが空
    NoData,
}

/// 回答1回の結果
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub record: ResultRecord,
    pub correct_index: usize,
    /// 規定の問題数に達したか
    pub finished: bool,
    /// 終了時に保存した成績 (ストアがある場合のみ)
    pub stats: Option<SessionStats>,
}

/// クイズのセッション。状態はすべてここに持ち、複数同時に作れる
pub struct Quiz<R = StdRng> {
    config: QuizConfig,
    index: CandidateIndex,
    used: UsedWords,
    current: Option<Question>,
    hint_used: bool,
    log: SessionLog,
    rng: R,
    store: Option<Box<dyn KeyValueStore>>,
    sink: Option<Box<dyn ResultsSink>>,
}

impl Quiz<StdRng> {
    pub fn new(config: QuizConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }
}

impl<R: Rng> Quiz<R> {
    pub fn with_rng(config: QuizConfig, rng: R) -> Self {
        let index = CandidateIndex::build(&config.catalog, config.mode);
        Self {
            config,
            index,
            used: UsedWords::new(),
            current: None,
            hint_used: false,
            log: SessionLog::new(),
            rng,
            store: None,
            sink: None,
        }
    }

    pub fn with_store(mut self, store: Box<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_sink(mut self, sink: Box<dyn ResultsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        self.config.text(key)
    }

    /// 設定を差し替える。単語リストかモードが変わったら索引を作り直す。
    /// セッションは最初から
    pub fn reconfigure(&mut self, options: QuizOptions) {
        let config = configure(options);
        let stale = config.catalog != self.config.catalog || !self.index.is_built_for(config.mode);
        self.config = config;
        if stale {
            debug!("索引を作り直します");
            self.index = CandidateIndex::build(&self.config.catalog, self.config.mode);
        }
        self.restart();
        info!("設定を更新しました ({} 語)", self.config.catalog.len());
    }

    pub fn has_data(&self) -> bool {
        !self.config.catalog.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.log.len() >= self.config.question_count
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// 何問目か (1始まり)
    pub fn question_number(&self) -> usize {
        self.log.len() + 1
    }

    pub fn results(&self) -> &[ResultRecord] {
        self.log.results()
    }

    pub fn session_summary(&self) -> Summary {
        self.log.summary()
    }

    pub fn hint_used(&self) -> bool {
        self.hint_used
    }

    /// MARK:次の問題を出す。
    /// 回答前に呼ばれた場合は同じ問題を返す
    pub fn generate_next_question(&mut self) -> Step {
        if !self.has_data() {
            return Step::NoData;
        }
        if self.is_finished() {
            return Step::Finished(self.session_summary());
        }
        if let Some(question) = &self.current {
            return Step::Question(question.clone());
        }

        match next_question(
            &self.config.catalog,
            &self.index,
            &mut self.used,
            self.config.selection_count,
            self.config.avoid_similar_distractors,
            &mut self.rng,
        ) {
            Ok(question) => {
                debug!("出題: {} ({} 択)", question.prompt, question.choices.len());
                self.current = Some(question.clone());
                self.hint_used = false;
                Step::Question(question)
            }
            Err(_) => Step::NoData,
        }
    }

    /// ヒントを見る。ヒントが無ければ `None`
    pub fn use_hint(&mut self) -> Option<&str> {
        let question = self.current.as_ref()?;
        if question.hint.is_empty() {
            return None;
        }
        self.hint_used = true;
        Some(&question.hint)
    }

    /// MARK:回答を記録する
    pub fn record_answer(&mut self, choice_index: usize) -> Result<AnswerOutcome, QuizError> {
        let len = self
            .current
            .as_ref()
            .map(|q| q.choices.len())
            .ok_or(QuizError::NoActiveQuestion)?;
        if choice_index >= len {
            return Err(QuizError::ChoiceOutOfRange {
                index: choice_index,
                len,
            });
        }
        let Some(question) = self.current.take() else {
            return Err(QuizError::NoActiveQuestion);
        };

        let record = self
            .log
            .record_answer(
                &question.prompt,
                question.correct_answer(),
                &question.hint,
                &question.choices[choice_index],
                self.hint_used,
            )
            .clone();
        self.hint_used = false;

        let finished = self.is_finished();
        let stats = if finished { self.finish() } else { None };

        Ok(AnswerOutcome {
            record,
            correct_index: question.correct_index,
            finished,
            stats,
        })
    }

    /// 終了処理: 送信と保存 (どちらも失敗してもクイズは止めない)
    fn finish(&mut self) -> Option<SessionStats> {
        let summary = self.session_summary();
        info!("セッション終了: {} / {}", summary.correct_count, summary.total);

        if let Some(sink) = &self.sink {
            submit_results(sink.as_ref(), self.log.results());
        }
        let question_count = self.config.question_count as u32;
        self.store
            .as_mut()
            .map(|store| stats::persist(self.log.results(), question_count, store.as_mut()))
    }

    /// 保存されている成績 (ストアが無ければ `None`)
    pub fn stats(&self) -> Option<SessionStats> {
        self.store.as_deref().map(|store| stats::load(store))
    }

    /// 成績を消す
    pub fn reset_stats(&mut self) {
        if let Some(store) = self.store.as_mut() {
            stats::reset(store.as_mut());
        }
    }

    /// 最初からやり直す (出題済みの単語もリセット)
    pub fn restart(&mut self) {
        self.log.clear();
        self.used.clear();
        self.current = None;
        self.hint_used = false;
    }
}
