//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// chargesplitクレート全体で使用するエラー型
///
/// ソースファイルの読み込み、出力ファイルの書き込み、設定の検証で発生する
/// エラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `Io` / `Parse` / `SecurityViolation`: ソースワークブックを読めなかった（ファイル単位で致命的）
/// - `Write` / `Json`: 出力テーブルのシリアライズに失敗した
/// - `Zip`: 出力フォルダのZIP化に失敗した
/// - `Config`: 設定の検証に失敗した
///
/// 無効なコンテナ番号や空のグループはエラーではなく、警告ログを出してスキップします。
///
/// # 使用例
///
/// ```rust,no_run
/// use chargesplit::{ChargeSplitError, SplitterBuilder};
///
/// fn split(path: &str) -> Result<usize, ChargeSplitError> {
///     let splitter = SplitterBuilder::new().build()?;
///     let result = splitter.process_file(path)?;  // 読み込みエラーはここで伝播する
///     Ok(splitter.save(&result).written.len())
/// }
/// ```
#[derive(Error, Debug)]
pub enum ChargeSplitError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ソースワークブックの解析中に発生したエラー（calamine由来）
    #[error("Failed to read workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// XLSX出力の書き込みエラー（rust_xlsxwriter由来）
    #[error("Failed to write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// JSON出力のシリアライズエラー
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIPアーカイブの作成エラー
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `SplitterBuilder::build()`時、または設定ファイルの読み込み時に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use chargesplit::{ChargeSplitError, ColumnMapping, SplitterBuilder};
    ///
    /// let columns = ColumnMapping { description: 5, ..ColumnMapping::default() };
    /// let result = SplitterBuilder::new().with_column_mapping(columns).build();
    ///
    /// match result {
    ///     Err(ChargeSplitError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// セキュリティ制限に違反したエラー
    ///
    /// 入力ファイルサイズの上限超過などで発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}

impl From<zip::result::ZipError> for ChargeSplitError {
    fn from(error: zip::result::ZipError) -> Self {
        ChargeSplitError::Zip(error.to_string())
    }
}

impl ChargeSplitError {
    /// ソースファイルを読めなかったことを表すエラーかどうか
    ///
    /// バッチ処理ではこの種類の失敗をエラー、それ以外を警告としてログに出します。
    pub fn is_read_error(&self) -> bool {
        matches!(
            self,
            ChargeSplitError::Io(_)
                | ChargeSplitError::Parse(_)
                | ChargeSplitError::SecurityViolation(_)
        )
    }
}
