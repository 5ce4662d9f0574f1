// ============================================
// src/sink.rs
// 回答結果の送信先
// ============================================

use std::fs;
use std::path::PathBuf;

use log::{info, warn};

use crate::error::SinkError;
use crate::session::ResultRecord;

/// セッションの回答結果を受け取る外部の送信先
pub trait ResultsSink {
    fn submit(&self, results: &[ResultRecord]) -> Result<(), SinkError>;
}

/// 回答結果をJSONファイルに書き出す
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultsSink for JsonFileSink {
    fn submit(&self, results: &[ResultRecord]) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(results)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// 送信する。失敗はログに残すだけでクイズは止めない
pub fn submit_results(sink: &dyn ResultsSink, results: &[ResultRecord]) {
    match sink.submit(results) {
        Ok(()) => info!("回答結果を送信しました ({} 件)", results.len()),
        Err(e) => warn!("回答結果を送信できませんでした: {e}"),
    }
}
