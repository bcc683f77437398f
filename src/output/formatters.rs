//! Output Formatters Implementation
//!
//! 各出力フォーマットの実装を提供するモジュール。

use crate::error::ChargeSplitError;
use crate::table::{OutputTable, SHEET_NAME};
use crate::types::CellValue;
use rust_xlsxwriter::Workbook;
use std::io::Write;

/// XLSX形式のフォーマッター
pub struct XlsxFormatter;

impl XlsxFormatter {
    pub fn render<W: Write>(
        &self,
        table: &OutputTable,
        writer: &mut W,
    ) -> Result<(), ChargeSplitError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in OutputTable::COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let xl_row = row_idx as u32 + 1;
            for (col, value) in row.values().iter().enumerate() {
                let col = col as u16;
                // 空欄はセル自体を書き込まない
                match value {
                    CellValue::Number(n) => {
                        worksheet.write_number(xl_row, col, *n)?;
                    }
                    CellValue::String(s) | CellValue::Error(s) => {
                        if !s.is_empty() {
                            worksheet.write_string(xl_row, col, s.as_str())?;
                        }
                    }
                    CellValue::Bool(b) => {
                        worksheet.write_boolean(xl_row, col, *b)?;
                    }
                    CellValue::Empty => {}
                }
            }
        }

        for (col, width) in table.column_widths().iter().enumerate() {
            worksheet.set_column_width(col as u16, *width as f64)?;
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        Ok(())
    }
}

/// CSV形式のフォーマッター
pub struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(
        &self,
        table: &OutputTable,
        writer: &mut W,
    ) -> Result<(), ChargeSplitError> {
        writeln!(writer, "{}", OutputTable::COLUMNS.join(","))?;

        for row in &table.rows {
            let line: Vec<String> = row
                .values()
                .iter()
                .map(|value| escape_csv(&value.as_raw_string()))
                .collect();
            writeln!(writer, "{}", line.join(","))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// JSON形式のフォーマッター
///
/// 行オブジェクトの配列を出力します。
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(
        &self,
        table: &OutputTable,
        writer: &mut W,
    ) -> Result<(), ChargeSplitError> {
        serde_json::to_writer_pretty(&mut *writer, &table.rows)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
