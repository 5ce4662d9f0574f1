// ============================================
// src/lib.rs
// 単語クイズの本体 (出題エンジン + 成績管理)
// ============================================

pub mod builtin_words;
pub mod catalog;
pub mod config;
pub mod distractor;
pub mod error;
pub mod generator;
pub mod index;
pub mod quiz;
pub mod session;
pub mod sink;
pub mod stats;
pub mod store;
pub mod word;

pub use catalog::{Catalog, WordSource, normalize};
pub use config::{QuizConfig, QuizOptions, configure};
pub use generator::{Question, UsedWords, next_question};
pub use index::CandidateIndex;
pub use quiz::{AnswerOutcome, Quiz, Step};
pub use session::{ResultRecord, Summary};
pub use word::{Mode, WordEntry};
