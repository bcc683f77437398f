//! Workbook Reader
//!
//! calamineのラッパーとして、ワークブックを開いてシートをデコードします。
//! XLSX以外にも、calamineが対応する形式（XLS, XLSB, ODS）を受け付けます。

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use crate::api::SheetSelector;
use crate::error::ChargeSplitError;
use crate::security::SecurityConfig;
use crate::types::{CellValue, DecodedSheet, SourceRow};

/// ワークブックリーダー
pub(crate) struct WorkbookReader<RS: Read + Seek> {
    workbook: Sheets<RS>,
}

impl WorkbookReader<BufReader<File>> {
    /// パスを指定してワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookReader)` - 読み込みに成功した場合
    /// * `Err(ChargeSplitError::Io)` - ファイルが存在しない、または読めない場合
    /// * `Err(ChargeSplitError::SecurityViolation)` - ファイルサイズが上限を超える場合
    /// * `Err(ChargeSplitError::Parse)` - ワークブックとして解析できない場合
    pub fn open_path<P: AsRef<Path>>(
        path: P,
        security: &SecurityConfig,
    ) -> Result<Self, ChargeSplitError> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        security.check_input_size(size)?;

        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }
}

impl WorkbookReader<Cursor<Vec<u8>>> {
    /// リーダーからワークブックを読み込む（アップロードされたバイト列など）
    ///
    /// 入力全体をメモリに読み込んでから解析します。
    pub fn from_reader<R: Read>(
        mut reader: R,
        security: &SecurityConfig,
    ) -> Result<Self, ChargeSplitError> {
        // 上限+1バイトまで読めば超過を判定できる
        let mut buffer = Vec::new();
        let limit = security.max_input_file_size.saturating_add(1);
        let bytes_read = reader.by_ref().take(limit).read_to_end(&mut buffer)?;
        security.check_input_size(bytes_read as u64)?;

        let workbook = open_workbook_auto_from_rs(Cursor::new(buffer))?;
        Ok(Self { workbook })
    }
}

impl<RS: Read + Seek> WorkbookReader<RS> {
    /// すべてのシート名を取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    /// シート選択方式に基づいてシートを選択
    ///
    /// 選択結果は指定の順序によらずワークブック内の順序に並べ、重複を除いて返します。
    /// 後のシートのグループが前のシートを上書きするため、この順序が結果を決めます。
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<String>)` - 選択されたシート名のリスト
    /// * `Err(ChargeSplitError::Config)` - シートが見つからない、またはインデックスが範囲外の場合
    pub fn select_sheets(&self, selector: &SheetSelector) -> Result<Vec<String>, ChargeSplitError> {
        let all_sheet_names = self.sheet_names();

        let by_index = |index: usize| {
            all_sheet_names.get(index).cloned().ok_or_else(|| {
                ChargeSplitError::Config(format!(
                    "Sheet index {} is out of range (total: {})",
                    index,
                    all_sheet_names.len()
                ))
            })
        };
        let by_name = |name: &String| {
            if all_sheet_names.contains(name) {
                Ok(name.clone())
            } else {
                Err(ChargeSplitError::Config(format!("Sheet '{}' not found", name)))
            }
        };

        let selected: Vec<String> = match selector {
            SheetSelector::All => all_sheet_names.clone(),
            SheetSelector::Index(index) => vec![by_index(*index)?],
            SheetSelector::Name(name) => vec![by_name(name)?],
            SheetSelector::Indices(indices) => {
                indices.iter().map(|i| by_index(*i)).collect::<Result<_, _>>()?
            }
            SheetSelector::Names(names) => names.iter().map(by_name).collect::<Result<_, _>>()?,
        };

        Ok(in_workbook_order(&all_sheet_names, &selected))
    }

    /// シートを行単位にデコードする
    ///
    /// 使用範囲の先頭から `header_rows` 行を読み飛ばし、すべてのセルが空の行は除外します。
    /// 列は使用範囲の先頭列からのオフセットになります。
    pub fn decode_sheet(
        &mut self,
        sheet_name: &str,
        header_rows: usize,
    ) -> Result<DecodedSheet, ChargeSplitError> {
        let range = self.workbook.worksheet_range(sheet_name)?;
        let first_row = range.start().map(|(row, _)| row).unwrap_or(0);

        let rows = range
            .rows()
            .enumerate()
            .skip(header_rows)
            .map(|(idx, cells)| {
                let cells = cells.iter().map(convert_cell).collect();
                SourceRow::new(first_row + idx as u32, cells)
            })
            .filter(|row| !row.is_blank())
            .collect();

        Ok(DecodedSheet::new(sheet_name, rows))
    }

    /// 選択されたすべてのシートをワークブック内の順序でデコードする
    pub fn decode_sheets(
        &mut self,
        selector: &SheetSelector,
        header_rows: usize,
    ) -> Result<Vec<DecodedSheet>, ChargeSplitError> {
        let names = self.select_sheets(selector)?;
        names
            .iter()
            .map(|name| self.decode_sheet(name, header_rows))
            .collect()
    }
}

/// 選択されたシート名をワークブック内の順序に並べ、重複を除く
fn in_workbook_order(all_sheet_names: &[String], selected: &[String]) -> Vec<String> {
    all_sheet_names
        .iter()
        .filter(|name| selected.contains(name))
        .cloned()
        .collect()
}

/// calamineのセル値を変換する
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        #[allow(unreachable_patterns)]
        _ => CellValue::Empty,
    }
}


// 実ファイルを使ったデコードのテストは統合テスト（tests/）で実装します。
