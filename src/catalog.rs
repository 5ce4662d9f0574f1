// ============================================
// src/catalog.rs
// 単語リストの正規化と読み込み
// ============================================

use std::fs;
use std::ops::Index;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::builtin_words::BUILTIN_WORDS;
use crate::error::CatalogError;
use crate::word::WordEntry;

/// 出題に使う単語リスト (重複はそのまま残す)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<WordEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<WordEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &WordEntry> {
        self.entries.iter()
    }
}

impl Index<usize> for Catalog {
    type Output = WordEntry;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl FromIterator<WordEntry> for Catalog {
    fn from_iter<T: IntoIterator<Item = WordEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// 見出し語以外のフィールド (どれも省略可)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFields {
    pub meaning: String,
    pub hint: String,
    pub part_of_speech: String,
}

/// 配列入力の1要素。受け付ける形ごとに1つのバリアント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordItem {
    /// `["cat", "猫", "ヒント", "名詞"]` (1〜4要素)
    Tuple(Vec<String>),
    /// `{"word": "cat", "meaning": "猫", ...}`
    Flat { word: String, fields: WordFields },
    /// `{"cat": {"meaning": "猫", ...}}`
    Keyed { word: String, fields: WordFields },
    /// `"cat"`
    Bare(String),
}

/// 単語リストの入力形式
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum WordSource {
    Items(Vec<WordItem>),
    /// 単語 → フィールドの対応表 (順序は入力のまま)
    Map(Vec<(String, WordFields)>),
}

impl WordSource {
    /// 生のJSONを入力形式に振り分ける。
    /// 配列の要素は1つずつ判定し、認識できない要素は黙って読み飛ばす
    pub fn from_json(value: Value) -> Result<Self, CatalogError> {
        match value {
            Value::Array(items) => Ok(WordSource::Items(
                items.iter().filter_map(classify_item).collect(),
            )),
            Value::Object(map) => Ok(WordSource::Map(
                map.into_iter()
                    .filter_map(|(word, value)| match value {
                        Value::Object(fields) => Some((word, fields_from_object(&fields))),
                        Value::String(meaning) => Some((
                            word,
                            WordFields {
                                meaning,
                                ..WordFields::default()
                            },
                        )),
                        other => {
                            debug!("単語 {word:?} の値を読み飛ばしました: {other}");
                            None
                        }
                    })
                    .collect(),
            )),
            other => Err(CatalogError::Unavailable(format!(
                "配列か辞書が必要です (実際: {})",
                json_kind(&other)
            ))),
        }
    }

    /// タブ区切りテキスト (見出し語\t意味\tヒント\t品詞)。空行と `#` 行は無視
    pub fn from_tsv(text: &str) -> Self {
        let items = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
            .map(|line| WordItem::Tuple(line.split('\t').take(4).map(str::to_string).collect()))
            .collect();
        WordSource::Items(items)
    }
}

impl TryFrom<Value> for WordSource {
    type Error = CatalogError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        WordSource::from_json(value)
    }
}

/// 配列の1要素を判定する
fn classify_item(value: &Value) -> Option<WordItem> {
    match value {
        Value::Array(fields) if !fields.is_empty() => Some(WordItem::Tuple(
            fields.iter().take(4).map(scalar_to_string).collect(),
        )),
        Value::String(word) => Some(WordItem::Bare(word.clone())),
        // {"word": {...}} は "word" という単語の Keyed 形式
        Value::Object(map) if map.get("word").is_some_and(|word| !word.is_object()) => {
            Some(WordItem::Flat {
                word: map.get("word").map(scalar_to_string).unwrap_or_default(),
                fields: fields_from_object(map),
            })
        }
        Value::Object(map) if map.len() == 1 => match map.iter().next() {
            Some((word, Value::Object(fields))) => Some(WordItem::Keyed {
                word: word.clone(),
                fields: fields_from_object(fields),
            }),
            _ => {
                debug!("認識できない要素を読み飛ばしました: {value}");
                None
            }
        },
        _ => {
            debug!("認識できない要素を読み飛ばしました: {value}");
            None
        }
    }
}

fn fields_from_object(map: &Map<String, Value>) -> WordFields {
    let field = |keys: &[&str]| {
        keys.iter()
            .find_map(|key| map.get(*key))
            .map(scalar_to_string)
            .unwrap_or_default()
    };
    WordFields {
        meaning: field(&["meaning"]),
        hint: field(&["hint"]),
        part_of_speech: field(&["partOfSpeech", "part_of_speech"]),
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn entry_from_item(item: WordItem) -> Option<WordEntry> {
    match item {
        WordItem::Tuple(fields) if fields.is_empty() => None,
        WordItem::Tuple(fields) => {
            let mut fields = fields.into_iter();
            let mut next = || fields.next().unwrap_or_default();
            Some(WordEntry::new(next(), next(), next(), next()))
        }
        WordItem::Flat { word, fields } | WordItem::Keyed { word, fields } => {
            Some(entry_from_fields(word, fields))
        }
        WordItem::Bare(word) => Some(WordEntry::new(word, "", "", "")),
    }
}

fn entry_from_fields(word: String, fields: WordFields) -> WordEntry {
    WordEntry {
        headword: word,
        meaning: fields.meaning,
        hint: fields.hint,
        part_of_speech: fields.part_of_speech,
    }
}

/// MARK:入力形式を統一された単語リストに変換する (順序は入力のまま)
pub fn normalize(source: WordSource) -> Catalog {
    match source {
        WordSource::Items(items) => items.into_iter().filter_map(entry_from_item).collect(),
        WordSource::Map(pairs) => pairs
            .into_iter()
            .map(|(word, fields)| entry_from_fields(word, fields))
            .collect(),
    }
}

// --------------------------------------------------
// 単語リストの供給元
// --------------------------------------------------

/// 単語リストの供給元。使えない場合は `Err` を返す
pub trait WordProvider {
    fn provide(&self) -> Result<WordSource, CatalogError>;
}

/// ファイルから読み込む (.json はJSON、それ以外はタブ区切り)
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WordProvider for FileProvider {
    fn provide(&self) -> Result<WordSource, CatalogError> {
        let text = fs::read_to_string(&self.path)?;
        let is_json = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            WordSource::from_json(serde_json::from_str(&text)?)
        } else {
            Ok(WordSource::from_tsv(&text))
        }
    }
}

/// 組み込みの単語リスト
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProvider;

impl WordProvider for BuiltinProvider {
    fn provide(&self) -> Result<WordSource, CatalogError> {
        Ok(WordSource::Items(
            BUILTIN_WORDS
                .iter()
                .map(|&(word, meaning, hint, pos)| {
                    WordItem::Tuple(vec![
                        word.to_string(),
                        meaning.to_string(),
                        hint.to_string(),
                        pos.to_string(),
                    ])
                })
                .collect(),
        ))
    }
}

/// MARK:単語リストの入力を取得する (失敗したら予備の供給元を使う)。
/// どちらも使えなければ `None`
pub fn load_source(
    primary: &dyn WordProvider,
    fallback: Option<&dyn WordProvider>,
) -> Option<WordSource> {
    match primary.provide() {
        Ok(source) => return Some(source),
        Err(e) => warn!("単語リストの読み込みに失敗しました: {e}"),
    }

    let fallback = fallback?;
    match fallback.provide() {
        Ok(source) => {
            info!("予備の単語リストを使います");
            Some(source)
        }
        Err(e) => {
            warn!("予備の単語リストも読み込めませんでした: {e}");
            None
        }
    }
}

/// 単語リストを読み込んで正規化する。
/// 何も読めなければ空のリストを返し、呼び出し側で「データなし」を表示する
pub fn load_catalog(primary: &dyn WordProvider, fallback: Option<&dyn WordProvider>) -> Catalog {
    let catalog = load_source(primary, fallback)
        .map(normalize)
        .unwrap_or_default();
    info!("単語リストを読み込みました ({} 語)", catalog.len());
    catalog
}
