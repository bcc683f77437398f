//! Builder Module
//!
//! Fluent Builder APIを提供し、`Splitter`インスタンスを段階的に構築する。
//! `Splitter`はソースワークブックの読み込みから、コンテナごとの出力ファイルの
//! 書き込みまでをまとめるファサードです。

use crate::api::{OutputFormat, SheetSelector};
use crate::config::{ColumnMapping, SplitterConfig};
use crate::error::ChargeSplitError;
use crate::extract::extract_workbook;
use crate::output::TableWriter;
use crate::parser::WorkbookReader;
use crate::security::{validate_path_segment, SecurityConfig};
use crate::table::build_table;
use crate::types::{ExtractionResult, SaveReport, SkipReason, SkippedGroup, UNKNOWN_REFERENCE};
use crate::validate::{is_valid_container_number, sanitize_name};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 出力ファイル名の接頭辞
const OUTPUT_FILE_PREFIX: &str = "RepairChargesUpload-";

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use chargesplit::{OutputFormat, SplitterBuilder};
///
/// # fn main() -> Result<(), chargesplit::ChargeSplitError> {
/// let splitter = SplitterBuilder::new()
///     .with_output_root("output")
///     .with_output_format(OutputFormat::Xlsx)
///     .exclude_total_rows(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SplitterBuilder {
    config: SplitterConfig,
}

impl SplitterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 出力ルート: `output`
    /// - 出力フォーマット: XLSX
    /// - シート選択: すべてのシート
    /// - 列マッピング: 参照/アンカー=4, コンテナ番号=5, 作業内容=9, 金額=10
    /// - `Total` 行: 除外
    /// - 作業内容が空の行: 除外
    /// - ヘッダー行: 1行
    pub fn new() -> Self {
        Self {
            config: SplitterConfig::default(),
        }
    }

    /// 読み込み済みの設定からビルダーを生成する
    pub fn from_config(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// 出力ルートディレクトリを指定する
    ///
    /// 出力は `<root>/<参照コード>/` に書き込まれます。
    pub fn with_output_root<P: Into<PathBuf>>(mut self, root: P) -> Self {
        self.config.output_root = root.into();
        self
    }

    /// 出力フォーマットを指定する
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 処理対象のシートを選択する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use chargesplit::{SheetSelector, SplitterBuilder};
    ///
    /// let builder = SplitterBuilder::new()
    ///     .with_sheet_selector(SheetSelector::Name("Estimate".to_string()));
    /// ```
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheets = selector;
        self
    }

    /// 列マッピングを指定する
    pub fn with_column_mapping(mut self, columns: ColumnMapping) -> Self {
        self.config.extraction.columns = columns;
        self
    }

    /// 作業内容が `Total` の行を明細から除外するか
    pub fn exclude_total_rows(mut self, exclude: bool) -> Self {
        self.config.extraction.exclude_total_rows = exclude;
        self
    }

    /// 作業内容が空の行を明細から除外するか
    pub fn require_description(mut self, require: bool) -> Self {
        self.config.extraction.require_description = require;
        self
    }

    /// 使用範囲の先頭から読み飛ばすヘッダー行数を指定する
    pub fn with_header_rows(mut self, rows: usize) -> Self {
        self.config.extraction.header_rows = rows;
        self
    }

    /// 設定を検証し、`Splitter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `ChargeSplitError::Config(String)`: 設定の検証に失敗した場合
    ///   * 出力ルートが空
    ///   * コンテナ番号・作業内容・金額の列が重複している
    pub fn build(self) -> Result<Splitter, ChargeSplitError> {
        if self.config.output_root.as_os_str().is_empty() {
            return Err(ChargeSplitError::Config(
                "Output root must not be empty".to_string(),
            ));
        }

        self.config.extraction.columns.validate()?;

        Ok(Splitter::new(self.config))
    }
}

/// バッチ処理の集計結果
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// 読み込みに成功したソースファイル数
    pub files_processed: usize,
    /// 読み込みに失敗したソースファイルとエラーメッセージ
    pub failures: Vec<(PathBuf, String)>,
    /// 書き込んだ出力ファイル（処理順）
    pub written: Vec<PathBuf>,
    /// 出力しなかったグループ数
    pub skipped: usize,
    /// 出力先ディレクトリ（重複なし、処理順）
    pub output_dirs: Vec<PathBuf>,
    /// 経過時間
    pub elapsed: Duration,
}

/// 分割処理のファサード
///
/// ソースワークブックからコンテナごとの明細を抽出し、
/// コンテナごとに1ファイルを出力します。
///
/// # 使用例
///
/// ```rust,no_run
/// use chargesplit::SplitterBuilder;
///
/// # fn main() -> Result<(), chargesplit::ChargeSplitError> {
/// let splitter = SplitterBuilder::new().with_output_root("output").build()?;
/// let result = splitter.process_file("estimate.xlsx")?;
/// let report = splitter.save(&result);
/// for path in &report.written {
///     println!("{}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Splitter {
    config: SplitterConfig,
    security: SecurityConfig,
}

impl Splitter {
    pub(crate) fn new(config: SplitterConfig) -> Self {
        Self {
            config,
            security: SecurityConfig::default(),
        }
    }

    /// 現在の設定
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// ソースワークブックを読み込み、参照コードとコンテナグループを抽出する
    ///
    /// # 処理フロー
    ///
    /// 1. ワークブックを開き、選択されたシートをデコード
    /// 2. シートごとに参照コードとコンテナグループを抽出
    /// 3. 参照コードは最初に見つかったもの、グループは後のシートで上書きしてマージ
    /// 4. 出力対象外のグループを除外
    ///
    /// # 戻り値
    ///
    /// * `Ok(ExtractionResult)` - 抽出結果（グループが0件の場合も含む）
    /// * `Err(ChargeSplitError)` - ソースを読めなかった場合
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<ExtractionResult, ChargeSplitError> {
        let path = path.as_ref();
        log::info!("Processing file: {}", path.display());

        let mut reader = WorkbookReader::open_path(path, &self.security)?;
        let sheets =
            reader.decode_sheets(&self.config.sheets, self.config.extraction.header_rows)?;
        Ok(extract_workbook(&sheets, &self.config.extraction))
    }

    /// リーダー（アップロードされたバイト列など）から抽出する
    ///
    /// `process_file` と同じ処理を、メモリ上のワークブックに対して行います。
    pub fn process_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<ExtractionResult, ChargeSplitError> {
        let mut reader = WorkbookReader::from_reader(reader, &self.security)?;
        let sheets =
            reader.decode_sheets(&self.config.sheets, self.config.extraction.header_rows)?;
        Ok(extract_workbook(&sheets, &self.config.extraction))
    }

    /// 抽出結果をコンテナごとのファイルとして保存する
    ///
    /// このメソッドは失敗しません。問題のあるグループは警告ログを出してスキップし、
    /// 書き込めたファイルだけを返します。
    ///
    /// 出力先は `<output_root>/<sanitize_name(参照コード)>/RepairChargesUpload-<コンテナ番号>.<拡張子>`
    /// です。別のソースが同じ参照コードに解決された場合は同じフォルダに書き込まれ、
    /// 同じコンテナ番号のファイルは後から書いたもので上書きされます。
    pub fn save(&self, result: &ExtractionResult) -> SaveReport {
        let mut report = SaveReport::default();

        if result.groups.is_empty() {
            log::warn!("No valid container data found.");
            return report;
        }

        let dir = self.config.output_root.join(self.output_folder_name(&result.reference));
        if let Err(e) = std::fs::create_dir_all(&dir) {
            log::warn!("Failed to create output directory {}: {}", dir.display(), e);
            report.skipped = result
                .groups
                .keys()
                .map(|id| SkippedGroup {
                    container: id.clone(),
                    reason: SkipReason::WriteFailed(e.to_string()),
                })
                .collect();
            return report;
        }

        let writer = TableWriter::from_format(self.config.output_format);
        let extension = self.config.output_format.extension();

        for (container, items) in &result.groups {
            if !is_valid_container_number(container) {
                log::warn!("Skipping invalid container number: {}", container);
                report.skipped.push(SkippedGroup {
                    container: container.clone(),
                    reason: SkipReason::InvalidContainerNumber,
                });
                continue;
            }

            if items.is_empty() {
                log::warn!("Skipping empty container data for: {}", container);
                report.skipped.push(SkippedGroup {
                    container: container.clone(),
                    reason: SkipReason::EmptyGroup,
                });
                continue;
            }

            let table = build_table(items);
            let path = dir.join(format!("{}{}.{}", OUTPUT_FILE_PREFIX, container, extension));
            match writer.write_file(&table, &path) {
                Ok(()) => {
                    log::info!("File written: {}", path.display());
                    report.written.push(path);
                }
                Err(e) => {
                    log::warn!("Skipping {}: failed to write {}: {}", container, path.display(), e);
                    report.skipped.push(SkippedGroup {
                        container: container.clone(),
                        reason: SkipReason::WriteFailed(e.to_string()),
                    });
                }
            }
        }

        report.output_dir = Some(dir);
        report
    }

    /// 1ファイルを抽出して保存する
    pub fn run<P: AsRef<Path>>(&self, path: P) -> Result<SaveReport, ChargeSplitError> {
        let result = self.process_file(path)?;
        Ok(self.save(&result))
    }

    /// 複数のソースファイルを1件ずつ順に処理する
    ///
    /// 読み込みに失敗したファイルはエラーログを出して記録し、残りのファイルの処理を続けます。
    pub fn process_batch<P: AsRef<Path>>(&self, paths: &[P]) -> BatchSummary {
        let started = Instant::now();
        let mut summary = BatchSummary::default();

        for path in paths {
            let path = path.as_ref();
            match self.run(path) {
                Ok(report) => {
                    summary.files_processed += 1;
                    summary.skipped += report.skipped.len();
                    summary.written.extend(report.written);
                    if let Some(dir) = report.output_dir {
                        if !summary.output_dirs.contains(&dir) {
                            summary.output_dirs.push(dir);
                        }
                    }
                }
                Err(e) if e.is_read_error() => {
                    log::error!("Failed to read {}: {}", path.display(), e);
                    summary.failures.push((path.to_path_buf(), e.to_string()));
                }
                Err(e) => {
                    log::warn!("Failed to process {}: {}", path.display(), e);
                    summary.failures.push((path.to_path_buf(), e.to_string()));
                }
            }
        }

        summary.elapsed = started.elapsed();
        summary
    }

    /// 参照コードから出力フォルダ名を決める
    ///
    /// ファイル名化した結果が1要素のパスとして安全でなければ `Unknown_Reference` を使います。
    fn output_folder_name(&self, reference: &str) -> String {
        let name = sanitize_name(reference);
        match validate_path_segment(&name) {
            Ok(()) => name,
            Err(msg) => {
                log::warn!("Unsafe reference folder name ({}), using {}", msg, UNKNOWN_REFERENCE);
                UNKNOWN_REFERENCE.to_string()
            }
        }
    }
}
