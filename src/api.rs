//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use serde::{Deserialize, Serialize};

/// シート選択方式
///
/// 抽出対象のシートを選択する方法を指定します。
/// 選択されたシートは常にワークブック内の順序で処理されます。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SheetSelector {
    /// すべてのシートを処理（デフォルト）
    #[default]
    All,

    /// インデックス指定（0始まり）
    ///
    /// 例: `SheetSelector::Index(0)` は最初のシートを選択
    Index(usize),

    /// シート名指定
    ///
    /// 例: `SheetSelector::Name("Sheet1".to_string())`
    Name(String),

    /// 複数のインデックス指定
    ///
    /// 例: `SheetSelector::Indices(vec![0, 2])`
    Indices(Vec<usize>),

    /// 複数のシート名指定
    Names(Vec<String>),
}

/// 出力フォーマット
///
/// コンテナごとの出力テーブルを書き出す形式を指定します。
/// どの形式でも列順は固定です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum OutputFormat {
    /// XLSX形式（デフォルト）
    ///
    /// シート名 `Repair Charges Details` の1シートに、ヘッダー行とデータ行を出力します。
    #[default]
    Xlsx,

    /// CSV形式
    ///
    /// # 出力例
    ///
    /// ```csv
    /// Description,Man Hrs,Labour Cost,Material Cost,Total,TAX,CGST,SGST,IGST,Currency
    /// Paint repair,,,150,150,,,,,
    /// ```
    Csv,

    /// JSON形式
    ///
    /// 行オブジェクトの配列として出力します。キーの順序は列順と一致します。
    Json,
}

impl OutputFormat {
    /// 出力ファイルの拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        }
    }
}
