// ============================================
// src/error.rs
// エラー型の定義
// ============================================

use thiserror::Error;

/// 単語リストの読み込みエラー
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("単語リストを読み込めませんでした: {0}")]
    Io(#[from] std::io::Error),
    #[error("単語リストのJSONが不正です: {0}")]
    Json(#[from] serde_json::Error),
    #[error("単語リストが利用できません: {0}")]
    Unavailable(String),
}

/// キーバリューストアのエラー
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ストアの入出力に失敗しました: {0}")]
    Io(#[from] std::io::Error),
    #[error("ストアのエンコードに失敗しました: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("ストアのデコードに失敗しました: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("ストアのJSONが不正です: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ストアが利用できません")]
    Unavailable,
}

/// 結果送信先のエラー
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("結果の書き出しに失敗しました: {0}")]
    Io(#[from] std::io::Error),
    #[error("結果のシリアライズに失敗しました: {0}")]
    Json(#[from] serde_json::Error),
}

/// クイズ進行のエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("単語リストが空です")]
    EmptyCatalog,
    #[error("回答できる問題がありません")]
    NoActiveQuestion,
    #[error("選択肢 {index} は範囲外です (選択肢の数: {len})")]
    ChoiceOutOfRange { index: usize, len: usize },
}

/// 設定ファイルのエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("設定ファイルを読み込めませんでした: {0}")]
    Io(#[from] std::io::Error),
    #[error("設定ファイルのJSONが不正です: {0}")]
    Json(#[from] serde_json::Error),
}
