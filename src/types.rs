//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::path::PathBuf;

/// 参照コードが見つからなかった場合の既定値
pub const UNKNOWN_REFERENCE: &str = "Unknown_Reference";

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// 数値（f64）。日付はシリアル値として保持する
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    #[default]
    Empty,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// 値が空かどうかを判定
    ///
    /// 空セルと空文字列を空として扱います。数値の0は空ではありません。
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// 文字列セルの場合のみ、その内容を返す
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 値を文字列として取得（書式適用前）
    pub fn as_raw_string(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::String(s) => s.clone(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Error(e) => e.clone(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

// 空セルは出力テーブル上の空欄と同じく "" としてシリアライズする
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::String(s) | CellValue::Error(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}

/// シートの1行分のセル
///
/// 列はシートの使用範囲の先頭列からのオフセットで参照します。
/// 行の長さを超えるオフセットは空セルとして扱われます。
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// シート上の物理行番号（0始まり）
    pub row: u32,
    /// セル値（使用範囲の先頭列から順に）
    pub cells: Vec<CellValue>,
}

impl SourceRow {
    pub fn new(row: u32, cells: Vec<CellValue>) -> Self {
        Self { row, cells }
    }

    /// 指定オフセットのセルを取得
    pub fn slot(&self, offset: usize) -> &CellValue {
        self.cells.get(offset).unwrap_or(&EMPTY_CELL)
    }

    /// すべてのセルが空かどうか
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }
}

/// デコード済みのシート
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedSheet {
    /// シート名
    pub name: String,
    /// データ行（ヘッダー行と空行を除く、シート上の順序）
    pub rows: Vec<SourceRow>,
}

impl DecodedSheet {
    pub fn new(name: impl Into<String>, rows: Vec<SourceRow>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// 修理費用の明細1件
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    /// 作業内容
    pub description: String,
    /// 金額（数値または空欄）
    pub amount: CellValue,
}

impl LineItem {
    pub fn new(description: impl Into<String>, amount: impl Into<CellValue>) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
        }
    }
}

/// コンテナ番号 → 明細リストの対応表
///
/// 挿入順を保持します。同じキーへの再挿入は値だけを置き換え、位置は変わりません。
pub type ContainerGroups = IndexMap<String, Vec<LineItem>>;

/// 1つのソースワークブックからの抽出結果
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionResult {
    /// 参照コード（見つからなければ `Unknown_Reference`）
    pub reference: String,
    /// フィルタ済みのコンテナグループ
    pub groups: ContainerGroups,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// グループを出力しなかった理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// コンテナ番号の形式が不正
    InvalidContainerNumber,
    /// 明細が0件
    EmptyGroup,
    /// 書き込みに失敗した
    WriteFailed(String),
}

/// 出力されなかったグループ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedGroup {
    pub container: String,
    pub reason: SkipReason,
}

/// 保存処理の結果
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveReport {
    /// 出力先ディレクトリ（作成できなかった場合や出力対象がない場合はNone）
    pub output_dir: Option<PathBuf>,
    /// 実際に書き込んだファイル（処理順）
    pub written: Vec<PathBuf>,
    /// スキップしたグループ
    pub skipped: Vec<SkippedGroup>,
}
