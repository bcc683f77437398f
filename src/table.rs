//! Table Builder Module
//!
//! コンテナ1件分の明細を、固定10列の出力テーブルに変換するモジュール。

use crate::types::{CellValue, LineItem};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// 出力シート名
pub const SHEET_NAME: &str = "Repair Charges Details";

/// Description列の最大表示幅
const MAX_DESCRIPTION_WIDTH: usize = 100;

/// Description列の余白
const DESCRIPTION_PADDING: usize = 2;

/// 出力テーブルの1行
///
/// フィールドの順序が列順です。下流のアップロード処理が列順に依存するため、変更しないこと。
/// 値を持つのは Description / Material Cost / Total のみで、他の列は空欄です。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Man Hrs")]
    pub man_hours: CellValue,
    #[serde(rename = "Labour Cost")]
    pub labour_cost: CellValue,
    #[serde(rename = "Material Cost")]
    pub material_cost: CellValue,
    #[serde(rename = "Total")]
    pub total: CellValue,
    #[serde(rename = "TAX")]
    pub tax: CellValue,
    #[serde(rename = "CGST")]
    pub cgst: CellValue,
    #[serde(rename = "SGST")]
    pub sgst: CellValue,
    #[serde(rename = "IGST")]
    pub igst: CellValue,
    #[serde(rename = "Currency")]
    pub currency: CellValue,
}

impl OutputRow {
    /// 明細1件から行を作る（Total は Material Cost と同じ値）
    pub fn from_line_item(item: &LineItem) -> Self {
        Self {
            description: item.description.clone(),
            man_hours: CellValue::Empty,
            labour_cost: CellValue::Empty,
            material_cost: item.amount.clone(),
            total: item.amount.clone(),
            tax: CellValue::Empty,
            cgst: CellValue::Empty,
            sgst: CellValue::Empty,
            igst: CellValue::Empty,
            currency: CellValue::Empty,
        }
    }

    /// 列順に並べたセル値
    pub fn values(&self) -> [CellValue; 10] {
        [
            CellValue::String(self.description.clone()),
            self.man_hours.clone(),
            self.labour_cost.clone(),
            self.material_cost.clone(),
            self.total.clone(),
            self.tax.clone(),
            self.cgst.clone(),
            self.sgst.clone(),
            self.igst.clone(),
            self.currency.clone(),
        ]
    }
}

/// コンテナ1件分の出力テーブル
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTable {
    pub rows: Vec<OutputRow>,
    /// Description列の推奨表示幅（文字数）
    pub description_width: usize,
}

impl OutputTable {
    /// 列見出し（固定順）
    pub const COLUMNS: [&'static str; 10] = [
        "Description",
        "Man Hrs",
        "Labour Cost",
        "Material Cost",
        "Total",
        "TAX",
        "CGST",
        "SGST",
        "IGST",
        "Currency",
    ];

    /// 各列の表示幅
    ///
    /// Description列は内容に合わせた幅、Material Costは15、その他は10です。
    pub fn column_widths(&self) -> [usize; 10] {
        let mut widths = [10; 10];
        widths[0] = self.description_width;
        widths[3] = 15;
        widths
    }
}

/// 明細リストから出力テーブルを作る
///
/// 明細1件につき1行を出力します。
pub fn build_table(items: &[LineItem]) -> OutputTable {
    let rows: Vec<OutputRow> = items.iter().map(OutputRow::from_line_item).collect();
    let description_width = description_width(&rows);
    OutputTable {
        rows,
        description_width,
    }
}

/// 見出しと最長の作業内容のうち長い方に余白を加えた幅（上限100）
fn description_width(rows: &[OutputRow]) -> usize {
    let longest = rows
        .iter()
        .map(|row| row.description.width())
        .fold(OutputTable::COLUMNS[0].width(), usize::max);
    (longest + DESCRIPTION_PADDING).min(MAX_DESCRIPTION_WIDTH)
}
