//! Security Module
//!
//! 入力ファイルサイズの制限と、出力パスの検証を提供するモジュール。

use crate::error::ChargeSplitError;

/// セキュリティ設定
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 256MB (268_435_456 bytes)
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_input_file_size: 268_435_456, // 256MB
        }
    }
}

impl SecurityConfig {
    /// 入力ファイルサイズが上限以下か検証する
    pub fn check_input_size(&self, size: u64) -> Result<(), ChargeSplitError> {
        if size > self.max_input_file_size {
            return Err(ChargeSplitError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                size, self.max_input_file_size
            )));
        }
        Ok(())
    }
}

/// 出力パスの1要素（フォルダ名・ファイル名）の検証
///
/// パストラバーサルを防ぐため、出力ルートの外を指し得る名前を拒否します。
///
/// # 戻り値
///
/// * `Ok(())` - 名前が安全な場合
/// * `Err(String)` - 空、`.`、`..`、またはパス区切りを含む場合
pub(crate) fn validate_path_segment(segment: &str) -> Result<(), String> {
    if segment.is_empty() {
        return Err("Empty path segment is not allowed".to_string());
    }

    if segment == "." || segment == ".." {
        return Err(format!("Path traversal detected: {}", segment));
    }

    if segment.contains('/') || segment.contains('\\') {
        return Err(format!("Path separator in segment is not allowed: {}", segment));
    }

    Ok(())
}
