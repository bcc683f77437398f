//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use crate::api::OutputFormat;
use crate::error::ChargeSplitError;
use crate::table::OutputTable;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub use formatters::*;

/// 出力テーブルのライター（Strategy Pattern）
///
/// 各出力フォーマット（XLSX, CSV, JSON）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub enum TableWriter {
    Xlsx,
    Csv,
    Json,
}

impl TableWriter {
    /// 出力フォーマットからライターを生成
    pub fn from_format(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Xlsx => TableWriter::Xlsx,
            OutputFormat::Csv => TableWriter::Csv,
            OutputFormat::Json => TableWriter::Json,
        }
    }

    /// テーブルを指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `table` - 出力するテーブル
    /// * `writer` - 出力先のライター
    pub fn render<W: Write>(
        &self,
        table: &OutputTable,
        writer: &mut W,
    ) -> Result<(), ChargeSplitError> {
        match self {
            TableWriter::Xlsx => XlsxFormatter.render(table, writer),
            TableWriter::Csv => CsvFormatter.render(table, writer),
            TableWriter::Json => JsonFormatter.render(table, writer),
        }
    }

    /// テーブルをファイルに書き出す
    ///
    /// 既存のファイルは上書きされます。
    pub fn write_file(&self, table: &OutputTable, path: &Path) -> Result<(), ChargeSplitError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.render(table, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
