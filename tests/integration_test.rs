//! Integration Tests for chargesplit
//!
//! rust_xlsxwriterで生成したワークブックを入力に、抽出から出力ファイルの書き込みまでを検証します。
//!
//! フィクスチャのレイアウト（使用範囲はA1から）:
//! - 1行目: タイトル行（ヘッダーとして読み飛ばされる）
//! - E列: 参照コード (`REF: ...`) とコンテナ行のアンカー
//! - F列: コンテナ番号
//! - J列: 作業内容
//! - K列: 金額

use calamine::{open_workbook_auto, Data, Reader};
use chargesplit::{
    ChargeSplitError, OutputFormat, SheetSelector, SplitterBuilder, SHEET_NAME, UNKNOWN_REFERENCE,
};
use rust_xlsxwriter::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

// Helper module for generating test fixtures
mod fixtures {
    use super::*;

    /// ソースシートの1行分
    pub enum Line<'a> {
        Reference(&'a str),
        Container(&'a str),
        Charge(&'a str, f64),
    }

    /// 1シート分の行をフィクスチャのレイアウトで書き込む
    pub fn write_sheet(worksheet: &mut Worksheet, lines: &[Line]) -> Result<(), XlsxError> {
        worksheet.write_string(0, 0, "Repair Estimate")?;

        for (idx, line) in lines.iter().enumerate() {
            let row = idx as u32 + 1;
            match line {
                Line::Reference(text) => {
                    worksheet.write_string(row, 4, *text)?;
                }
                Line::Container(id) => {
                    worksheet.write_string(row, 4, "Container")?;
                    worksheet.write_string(row, 5, *id)?;
                }
                Line::Charge(description, amount) => {
                    worksheet.write_string(row, 9, *description)?;
                    worksheet.write_number(row, 10, *amount)?;
                }
            }
        }

        Ok(())
    }

    /// シート名と行の組からワークブックを生成する
    pub fn generate_workbook(sheets: &[(&str, Vec<Line>)]) -> Result<Vec<u8>, XlsxError> {
        let mut workbook = Workbook::new();
        for (name, lines) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*name)?;
            write_sheet(worksheet, lines)?;
        }
        workbook.save_to_buffer()
    }

    /// 2コンテナ・合計行・プレースホルダーのみのコンテナを含む見積書
    pub fn generate_estimate() -> Result<Vec<u8>, XlsxError> {
        generate_workbook(&[(
            "Estimate",
            vec![
                Line::Reference("REF: EST-2024/001"),
                Line::Charge("Survey fee", 10.0),
                Line::Container("MSCU1234567"),
                Line::Charge("Paint repair", 150.0),
                Line::Charge("Floor patch", 80.5),
                Line::Charge("Total", 230.5),
                Line::Container("TGHU7654321"),
                Line::Charge("Door seal", 30.0),
                Line::Container("CAIU1111111"),
                Line::Charge("Checked & Found.", 0.0),
            ],
        )])
    }

    pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, bytes).unwrap();
        path
    }
}

use fixtures::Line;

/// 出力XLSXを (作業内容, Material Cost, Total) の一覧として読み戻す
fn read_output(path: &Path) -> Vec<(String, Data, Data)> {
    let mut workbook = open_workbook_auto(path).unwrap();
    assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

    let range = workbook.worksheet_range(SHEET_NAME).unwrap();
    let mut rows = range.rows();

    let header: Vec<String> = rows.next().unwrap().iter().map(|c| c.to_string()).collect();
    assert_eq!(
        header,
        vec![
            "Description",
            "Man Hrs",
            "Labour Cost",
            "Material Cost",
            "Total",
            "TAX",
            "CGST",
            "SGST",
            "IGST",
            "Currency"
        ]
    );

    rows.map(|row| (row[0].to_string(), row[3].clone(), row[4].clone()))
        .collect()
}

#[test]
fn test_end_to_end_single_sheet() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let path = fixtures::write_fixture(
        input.path(),
        "estimate.xlsx",
        &fixtures::generate_estimate().unwrap(),
    );

    let splitter = SplitterBuilder::new()
        .with_output_root(output.path())
        .build()
        .unwrap();

    let result = splitter.process_file(&path).unwrap();
    assert_eq!(result.reference, "EST-2024/001");
    assert_eq!(
        result.groups.keys().collect::<Vec<_>>(),
        vec!["MSCU1234567", "TGHU7654321"]
    );

    let report = splitter.save(&result);
    let dir = output.path().join("EST-2024-001");
    assert_eq!(report.output_dir.as_deref(), Some(dir.as_path()));
    assert_eq!(
        report.written,
        vec![
            dir.join("RepairChargesUpload-MSCU1234567.xlsx"),
            dir.join("RepairChargesUpload-TGHU7654321.xlsx"),
        ]
    );
    assert!(report.skipped.is_empty());

    let rows = read_output(&report.written[0]);
    assert_eq!(
        rows,
        vec![
            ("Paint repair".to_string(), Data::Float(150.0), Data::Float(150.0)),
            ("Floor patch".to_string(), Data::Float(80.5), Data::Float(80.5)),
        ]
    );

    let rows = read_output(&report.written[1]);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "Door seal");

    // プレースホルダーのみのコンテナは出力されない
    assert!(!dir.join("RepairChargesUpload-CAIU1111111.xlsx").exists());
}

#[test]
fn test_keep_total_rows() {
    let splitter = SplitterBuilder::new()
        .exclude_total_rows(false)
        .build()
        .unwrap();
    let result = splitter
        .process_reader(Cursor::new(fixtures::generate_estimate().unwrap()))
        .unwrap();

    let descriptions: Vec<&str> = result.groups["MSCU1234567"]
        .iter()
        .map(|item| item.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["Paint repair", "Floor patch", "Total"]);
}

#[test]
fn test_multi_sheet_merge() {
    let bytes = fixtures::generate_workbook(&[
        (
            "Sheet1",
            vec![
                Line::Container("MSCU1234567"),
                Line::Charge("Old charge", 1.0),
                Line::Container("TGHU7654321"),
                Line::Charge("Door seal", 30.0),
            ],
        ),
        (
            "Sheet2",
            vec![
                Line::Reference("REF: SECOND"),
                Line::Container("MSCU1234567"),
                Line::Charge("New charge", 2.0),
            ],
        ),
        (
            "Sheet3",
            vec![Line::Reference("REF: THIRD")],
        ),
    ])
    .unwrap();

    let splitter = SplitterBuilder::new().build().unwrap();
    let result = splitter.process_reader(Cursor::new(bytes)).unwrap();

    // 参照コードは最初に見つかったもの
    assert_eq!(result.reference, "SECOND");
    // 後のシートのグループが上書きし、キーの位置は最初の出現のまま
    assert_eq!(
        result.groups.keys().collect::<Vec<_>>(),
        vec!["MSCU1234567", "TGHU7654321"]
    );
    assert_eq!(result.groups["MSCU1234567"].len(), 1);
    assert_eq!(result.groups["MSCU1234567"][0].description, "New charge");
}

#[test]
fn test_sheet_selector() {
    let bytes = fixtures::generate_workbook(&[
        (
            "Summary",
            vec![
                Line::Container("MSCU1234567"),
                Line::Charge("Paint repair", 150.0),
            ],
        ),
        (
            "Detail",
            vec![
                Line::Container("TGHU7654321"),
                Line::Charge("Door seal", 30.0),
            ],
        ),
    ])
    .unwrap();

    let splitter = SplitterBuilder::new()
        .with_sheet_selector(SheetSelector::Name("Detail".to_string()))
        .build()
        .unwrap();
    let result = splitter.process_reader(Cursor::new(bytes.clone())).unwrap();
    assert_eq!(result.groups.keys().collect::<Vec<_>>(), vec!["TGHU7654321"]);

    let splitter = SplitterBuilder::new()
        .with_sheet_selector(SheetSelector::Index(5))
        .build()
        .unwrap();
    let result = splitter.process_reader(Cursor::new(bytes));
    assert!(matches!(result, Err(ChargeSplitError::Config(_))));
}

#[test]
fn test_sheet_indices_follow_workbook_order() {
    let bytes = fixtures::generate_workbook(&[
        (
            "First",
            vec![
                Line::Container("MSCU1234567"),
                Line::Charge("from first", 1.0),
            ],
        ),
        (
            "Second",
            vec![
                Line::Container("MSCU1234567"),
                Line::Charge("from second", 2.0),
            ],
        ),
    ])
    .unwrap();

    // 指定順が逆でも、後のシートが上書きする
    let splitter = SplitterBuilder::new()
        .with_sheet_selector(SheetSelector::Indices(vec![1, 0]))
        .build()
        .unwrap();
    let result = splitter.process_reader(Cursor::new(bytes.clone())).unwrap();
    assert_eq!(result.groups["MSCU1234567"][0].description, "from second");

    let splitter = SplitterBuilder::new()
        .with_sheet_selector(SheetSelector::Names(vec![
            "Second".to_string(),
            "First".to_string(),
            "Second".to_string(),
        ]))
        .build()
        .unwrap();
    let result = splitter.process_reader(Cursor::new(bytes)).unwrap();
    assert_eq!(result.groups["MSCU1234567"].len(), 1);
    assert_eq!(result.groups["MSCU1234567"][0].description, "from second");
}

#[test]
fn test_end_to_end_two_sheets() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let bytes = fixtures::generate_workbook(&[
        (
            "Sheet1",
            vec![
                Line::Reference("REF: JOB 42/A"),
                Line::Container("MSCU1234567"),
                Line::Charge("Paint repair", 150.0),
                Line::Charge("Floor patch", 80.5),
            ],
        ),
        (
            "Sheet2",
            vec![
                Line::Container("TGHU7654321"),
                Line::Charge("Door seal", 30.0),
            ],
        ),
    ])
    .unwrap();
    let path = fixtures::write_fixture(input.path(), "two_sheets.xlsx", &bytes);

    let splitter = SplitterBuilder::new()
        .with_output_root(output.path())
        .build()
        .unwrap();
    let result = splitter.process_file(&path).unwrap();
    let report = splitter.save(&result);

    let dir = output.path().join("JOB_42-A");
    assert_eq!(report.output_dir.as_deref(), Some(dir.as_path()));
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 2);

    let rows = read_output(&dir.join("RepairChargesUpload-MSCU1234567.xlsx"));
    assert_eq!(
        rows,
        vec![
            ("Paint repair".to_string(), Data::Float(150.0), Data::Float(150.0)),
            ("Floor patch".to_string(), Data::Float(80.5), Data::Float(80.5)),
        ]
    );

    let rows = read_output(&dir.join("RepairChargesUpload-TGHU7654321.xlsx"));
    assert_eq!(
        rows,
        vec![("Door seal".to_string(), Data::Float(30.0), Data::Float(30.0))]
    );
}

#[test]
fn test_missing_reference_uses_unknown_folder() {
    let output = TempDir::new().unwrap();
    let bytes = fixtures::generate_workbook(&[(
        "Sheet1",
        vec![
            Line::Container("MSCU1234567"),
            Line::Charge("Paint repair", 150.0),
        ],
    )])
    .unwrap();

    let splitter = SplitterBuilder::new()
        .with_output_root(output.path())
        .build()
        .unwrap();
    let result = splitter.process_reader(Cursor::new(bytes)).unwrap();
    assert_eq!(result.reference, UNKNOWN_REFERENCE);

    let report = splitter.save(&result);
    assert_eq!(report.written.len(), 1);
    assert!(output
        .path()
        .join(UNKNOWN_REFERENCE)
        .join("RepairChargesUpload-MSCU1234567.xlsx")
        .exists());
}

#[test]
fn test_no_containers_writes_nothing() {
    let output = TempDir::new().unwrap();
    let bytes = fixtures::generate_workbook(&[(
        "Sheet1",
        vec![
            Line::Reference("REF: EMPTY"),
            Line::Charge("Loose charge", 5.0),
        ],
    )])
    .unwrap();

    let splitter = SplitterBuilder::new()
        .with_output_root(output.path())
        .build()
        .unwrap();
    let result = splitter.process_reader(Cursor::new(bytes)).unwrap();
    assert!(result.is_empty());

    let report = splitter.save(&result);
    assert!(report.written.is_empty());
    assert!(report.output_dir.is_none());
    assert!(!output.path().join("EMPTY").exists());
}

#[test]
fn test_csv_and_json_output() {
    let output = TempDir::new().unwrap();
    let bytes = fixtures::generate_estimate().unwrap();

    let csv = SplitterBuilder::new()
        .with_output_root(output.path().join("csv"))
        .with_output_format(OutputFormat::Csv)
        .build()
        .unwrap();
    let report = csv.save(&csv.process_reader(Cursor::new(bytes.clone())).unwrap());
    let text = fs::read_to_string(&report.written[0]).unwrap();
    assert!(report.written[0].ends_with("EST-2024-001/RepairChargesUpload-MSCU1234567.csv"));
    assert_eq!(text.lines().nth(1), Some("Paint repair,,,150,150,,,,,"));

    let json = SplitterBuilder::new()
        .with_output_root(output.path().join("json"))
        .with_output_format(OutputFormat::Json)
        .build()
        .unwrap();
    let report = json.save(&json.process_reader(Cursor::new(bytes)).unwrap());
    let value: serde_json::Value =
        serde_json::from_slice(&fs::read(&report.written[1]).unwrap()).unwrap();
    assert_eq!(value[0]["Description"], "Door seal");
    assert_eq!(value[0]["Material Cost"], 30.0);
}

#[test]
fn test_batch_isolates_failures() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    let good = fixtures::write_fixture(
        input.path(),
        "good.xlsx",
        &fixtures::generate_estimate().unwrap(),
    );
    let corrupt = fixtures::write_fixture(input.path(), "corrupt.xlsx", b"not a workbook");
    let missing = input.path().join("missing.xlsx");

    let splitter = SplitterBuilder::new()
        .with_output_root(output.path())
        .build()
        .unwrap();
    let summary = splitter.process_batch(&[corrupt.clone(), good, missing.clone()]);

    assert_eq!(summary.files_processed, 1);
    assert_eq!(summary.written.len(), 2);
    assert_eq!(summary.output_dirs, vec![output.path().join("EST-2024-001")]);

    let failed: Vec<_> = summary.failures.iter().map(|(path, _)| path.clone()).collect();
    assert_eq!(failed, vec![corrupt, missing]);
}

#[test]
fn test_batch_same_reference_shares_folder() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let bytes = fixtures::generate_estimate().unwrap();
    let first = fixtures::write_fixture(input.path(), "a.xlsx", &bytes);
    let second = fixtures::write_fixture(input.path(), "b.xlsx", &bytes);

    let splitter = SplitterBuilder::new()
        .with_output_root(output.path())
        .build()
        .unwrap();
    let summary = splitter.process_batch(&[first, second]);

    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.written.len(), 4);
    assert_eq!(summary.output_dirs.len(), 1);
    assert_eq!(fs::read_dir(&summary.output_dirs[0]).unwrap().count(), 2);
}

#[test]
fn test_zip_output_folder() {
    let output = TempDir::new().unwrap();
    let splitter = SplitterBuilder::new()
        .with_output_root(output.path())
        .build()
        .unwrap();
    let report = splitter.save(
        &splitter
            .process_reader(Cursor::new(fixtures::generate_estimate().unwrap()))
            .unwrap(),
    );

    let dir = report.output_dir.unwrap();
    let bytes = chargesplit::zip_directory(&dir).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();

    assert_eq!(archive.len(), 2);
    assert_eq!(
        archive.by_index(0).unwrap().name(),
        "RepairChargesUpload-MSCU1234567.xlsx"
    );
}

#[test]
fn test_clear_output_root_before_run() {
    let output = TempDir::new().unwrap();
    fs::create_dir_all(output.path().join("stale")).unwrap();
    fs::write(output.path().join("stale").join("old.xlsx"), "x").unwrap();

    assert_eq!(chargesplit::clear_output_root(output.path()).unwrap(), 1);

    let splitter = SplitterBuilder::new()
        .with_output_root(output.path())
        .build()
        .unwrap();
    let report = splitter.save(
        &splitter
            .process_reader(Cursor::new(fixtures::generate_estimate().unwrap()))
            .unwrap(),
    );

    assert_eq!(report.written.len(), 2);
    assert!(!output.path().join("stale").exists());
}
