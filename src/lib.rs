//! chargesplit - Split container repair charge exports per container
//!
//! 修理費用エクスポート（半構造化されたスプレッドシート）から、コンテナごとの明細を抽出し、
//! コンテナ番号ごとに1ファイルの正規化されたテーブルとして出力するクレートです。
//! 出力は、シートから読み取った参照コードの名前のフォルダにまとめられます。
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chargesplit::SplitterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let splitter = SplitterBuilder::new().with_output_root("output").build()?;
//!
//!     // 参照コードとコンテナごとの明細を抽出
//!     let result = splitter.process_file("estimate.xlsx")?;
//!     println!("Reference: {}", result.reference);
//!
//!     // output/<参照コード>/RepairChargesUpload-<コンテナ番号>.xlsx に保存
//!     let report = splitter.save(&result);
//!     println!("{} file(s) written", report.written.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! アップロードされたバイト列から処理する場合は `Cursor` を使用します:
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use chargesplit::SplitterBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let splitter = SplitterBuilder::new().build()?;
//! let uploaded: Vec<u8> = vec![]; // アップロードされたファイルのバイト列
//! let result = splitter.process_reader(Cursor::new(uploaded))?;
//! # Ok(())
//! # }
//! ```
//!
//! # レイアウトの変更
//!
//! ソースシートには実質的なヘッダー行がなく、列は使用範囲の先頭列からのオフセットで
//! 参照します。別のレイアウトには `ColumnMapping` で対応します。
//!
//! ```rust,no_run
//! use chargesplit::{ColumnMapping, SplitterBuilder};
//!
//! # fn main() -> Result<(), chargesplit::ChargeSplitError> {
//! let splitter = SplitterBuilder::new()
//!     .with_column_mapping(ColumnMapping {
//!         reference: 0,
//!         anchor: 0,
//!         candidate: 1,
//!         description: 2,
//!         amount: 3,
//!     })
//!     .exclude_total_rows(false)
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod api;
mod archive;
mod builder;
mod config;
mod error;
mod extract;
mod filter;
mod output;
mod parser;
mod security;
mod table;
mod types;
mod validate;

// 公開API
pub use api::{OutputFormat, SheetSelector};
pub use archive::{clear_output_root, write_zip, zip_directory};
pub use builder::{BatchSummary, Splitter, SplitterBuilder};
pub use config::{ColumnMapping, ExtractionConfig, SplitterConfig};
pub use error::ChargeSplitError;
pub use extract::{extract_container_groups, extract_reference, extract_workbook, REFERENCE_PREFIX};
pub use filter::{filter_groups, has_actionable_items, PLACEHOLDER_DESCRIPTION};
pub use output::TableWriter;
pub use table::{build_table, OutputRow, OutputTable, SHEET_NAME};
pub use types::{
    CellValue, ContainerGroups, DecodedSheet, ExtractionResult, LineItem, SaveReport,
    SkipReason, SkippedGroup, SourceRow, UNKNOWN_REFERENCE,
};
pub use validate::{is_valid_container_cell, is_valid_container_number, sanitize_name};
