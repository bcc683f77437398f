//! Configuration Module
//!
//! 列マッピングと抽出設定、およびTOML設定ファイルの読み込みを提供するモジュール。

use crate::api::{OutputFormat, SheetSelector};
use crate::error::ChargeSplitError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 列スロット名 → 列オフセットの対応表
///
/// オフセットはシートの使用範囲の先頭列から数えます（0始まり）。
/// デフォルト値は、修理費用エクスポートの標準レイアウトに合わせています。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    /// 参照コード（`REF: ...`）が書かれる列
    pub reference: usize,
    /// コンテナ行であることを示すアンカー列
    pub anchor: usize,
    /// コンテナ番号の候補が書かれる列
    pub candidate: usize,
    /// 作業内容の列
    pub description: usize,
    /// 金額の列
    pub amount: usize,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            reference: 4,
            anchor: 4,
            candidate: 5,
            description: 9,
            amount: 10,
        }
    }
}

impl ColumnMapping {
    /// マッピングの整合性を検証する
    ///
    /// コンテナ番号・作業内容・金額の各列は互いに異なる必要があります。
    pub fn validate(&self) -> Result<(), ChargeSplitError> {
        let distinct = [
            ("candidate", self.candidate),
            ("description", self.description),
            ("amount", self.amount),
        ];
        for (i, (name_a, col_a)) in distinct.iter().enumerate() {
            for (name_b, col_b) in &distinct[i + 1..] {
                if col_a == col_b {
                    return Err(ChargeSplitError::Config(format!(
                        "Column '{}' and column '{}' share offset {}",
                        name_a, name_b, col_a
                    )));
                }
            }
        }
        Ok(())
    }
}

/// 行スキャンの設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// 作業内容が `Total` の行を明細から除外するか
    pub exclude_total_rows: bool,
    /// 作業内容が空の行を明細から除外するか
    ///
    /// `false` の場合、金額だけが入った行も明細として扱います。
    pub require_description: bool,
    /// 使用範囲の先頭から読み飛ばすヘッダー行数
    pub header_rows: usize,
    /// 列マッピング
    pub columns: ColumnMapping,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            exclude_total_rows: true,
            require_description: true,
            header_rows: 1,
            columns: ColumnMapping::default(),
        }
    }
}

/// 分割処理全体の設定
///
/// TOMLファイルから読み込めます。すべての項目にデフォルト値があります。
///
/// ```toml
/// output_root = "output"
/// output_format = "xlsx"
///
/// [extraction]
/// exclude_total_rows = true
/// header_rows = 1
///
/// [extraction.columns]
/// description = 9
/// amount = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// 出力ルートディレクトリ
    pub output_root: PathBuf,
    /// 出力フォーマット
    pub output_format: OutputFormat,
    /// 処理対象シート
    pub sheets: SheetSelector,
    /// 行スキャンの設定
    pub extraction: ExtractionConfig,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("output"),
            output_format: OutputFormat::Xlsx,
            sheets: SheetSelector::All,
            extraction: ExtractionConfig::default(),
        }
    }
}

impl SplitterConfig {
    /// TOML文字列から設定を読み込む
    pub fn from_toml_str(content: &str) -> Result<Self, ChargeSplitError> {
        toml::from_str(content)
            .map_err(|e| ChargeSplitError::Config(format!("Failed to parse config: {}", e)))
    }

    /// TOMLファイルから設定を読み込む
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ChargeSplitError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ChargeSplitError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// 設定をTOML文字列に変換する
    pub fn to_toml_string(&self) -> Result<String, ChargeSplitError> {
        toml::to_string_pretty(self)
            .map_err(|e| ChargeSplitError::Config(format!("Failed to serialize config: {}", e)))
    }
}
