//! Parser Module
//!
//! calamineを使用したソースワークブックの読み込み。
//! 各シートを行単位のセル列（`SourceRow`）にデコードします。

mod workbook;

pub(crate) use workbook::WorkbookReader;
