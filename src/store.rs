// ============================================
// src/store.rs
// キーバリューストア (セーブデータの置き場所)
// ============================================

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use bincode::config::standard;
use directories::ProjectDirs;
use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::error::StoreError;

const STORE_FILE_BIN: &str = "store.bin";
const STORE_FILE_JSON: &str = "store.json"; // デバッグ用 + 読み込みの予備

/// 文字列を保存するだけのストア。失敗しうるので呼び出し側はベストエフォートで扱う
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// メモリ上のストア (テスト用・保存しない場合用)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// ファイルに保存するストア (バイナリ + JSON)
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    // MARK:保存先ディレクトリを取得する関数
    pub fn data_dir() -> Option<PathBuf> {
        ProjectDirs::from("jp", "Fukumoto0141", "WORD_WIZ")
            .map(|proj_dirs| proj_dirs.data_dir().to_path_buf())
    }

    /// OS標準のデータディレクトリにあるストアを開く
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = Self::data_dir().ok_or(StoreError::Unavailable)?;
        Self::open(dir)
    }

    /// `dir` にあるストアを開く。壊れていたら空として扱う
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let entries = Self::load_entries(&dir);
        debug!("ストアを開きました: {} ({} 件)", dir.display(), entries.len());
        Ok(Self { dir, entries })
    }

    /// MARK:ファイルから読み込む (バイナリ優先、JSONフォールバック)
    fn load_entries(dir: &Path) -> BTreeMap<String, String> {
        // 1. バイナリファイルから読み込みを試行
        let bin_path = dir.join(STORE_FILE_BIN);
        if bin_path.exists() {
            match Self::read_bin(&bin_path) {
                Ok(entries) => return entries,
                Err(e) => warn!("{} を読めませんでした: {e}", bin_path.display()),
            }
        }

        // 2. バイナリ失敗時、JSONファイルから読み込みを試行
        let json_path = dir.join(STORE_FILE_JSON);
        if json_path.exists() {
            match File::open(&json_path)
                .map_err(StoreError::from)
                .and_then(|file| {
                    Ok(serde_json::from_reader::<_, BTreeMap<String, String>>(
                        BufReader::new(file),
                    )?)
                })
            {
                Ok(entries) => return entries,
                Err(e) => warn!("{} を読めませんでした: {e}", json_path.display()),
            }
        }

        // どちらも失敗した場合は空
        BTreeMap::new()
    }

    fn read_bin(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
        let mut buffer = Vec::new();
        File::open(path)?.read_to_end(&mut buffer)?;
        let (entries, _) = bincode::decode_from_slice(&buffer, standard())?;
        Ok(entries)
    }

    /// MARK:データをファイルに保存する (バイナリ + JSON)
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        // --- 1. バイナリ形式で保存 (本番用) ---
        let encoded = bincode::encode_to_vec(entries, standard())?;
        write_atomic(&self.dir, &self.dir.join(STORE_FILE_BIN), &encoded)?;

        // --- 2. JSON形式で保存 (デバッグ用) ---
        let json = serde_json::to_string_pretty(entries)?;
        write_atomic(&self.dir, &self.dir.join(STORE_FILE_JSON), json.as_bytes())?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    // 保存に成功してからメモリ上のデータを差し替える
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)?;
        self.entries = entries;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut entries = self.entries.clone();
        entries.remove(key);
        self.flush(&entries)?;
        self.entries = entries;
        Ok(())
    }
}

/// 一時ファイルに書いてから置き換える
fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut temp_file = NamedTempFile::new_in(dir)?;
    temp_file.write_all(bytes)?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
