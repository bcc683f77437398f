//! Validation Module
//!
//! コンテナ番号（ISO 6346形式）の検証と、参照コードのファイル名化を提供するモジュール。

use crate::types::{CellValue, UNKNOWN_REFERENCE};
use regex::Regex;
use std::sync::LazyLock;

static CONTAINER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{4}[0-9]{7}$").expect("Hardcode regex pattern"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Hardcode regex pattern"));

/// 参照コードのマーカー（ファイル名化の際に取り除く）
const REFERENCE_MARKER: &str = "REF:";

/// コンテナ番号の形式（英大文字4文字 + 数字7桁）に一致するか判定する
///
/// 前後の空白を含む文字列や、小文字を含む文字列は一致しません。
///
/// # 使用例
///
/// ```rust
/// use chargesplit::is_valid_container_number;
///
/// assert!(is_valid_container_number("ABCD1234567"));
/// assert!(!is_valid_container_number("abcd1234567"));
/// assert!(!is_valid_container_number("ABC12345678"));
/// assert!(!is_valid_container_number(""));
/// ```
pub fn is_valid_container_number(value: &str) -> bool {
    CONTAINER_NUMBER.is_match(value)
}

/// セル値がコンテナ番号として有効か判定する
///
/// 文字列以外のセル（数値、空セルなど）は常に無効です。
pub fn is_valid_container_cell(cell: &CellValue) -> bool {
    cell.as_text().is_some_and(is_valid_container_number)
}

/// 参照コードをフォルダ名・ファイル名として安全な文字列に変換する
///
/// 処理順:
///
/// 1. 前後の空白を除去し、先頭の `REF:` マーカーを取り除く
/// 2. `/` を `-` に置換する
/// 3. `<>:"\|?*` と制御文字（0x00–0x1F）を削除する
/// 4. 前後の空白を除去し、連続する空白を `_` 1文字にまとめる
///
/// 結果が空になった場合は `Unknown_Reference` を返します。
/// 同じ入力には常に同じ結果を返し、結果を再度変換しても変化しません。
///
/// ```rust
/// use chargesplit::sanitize_name;
///
/// assert_eq!(sanitize_name(r#"REF: A/B "C""#), "A-B_C");
/// ```
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    let unmarked = trimmed
        .strip_prefix(REFERENCE_MARKER)
        .unwrap_or(trimmed)
        .trim_start();

    let stripped: String = unmarked
        .chars()
        .map(|c| if c == '/' { '-' } else { c })
        .filter(|c| !is_illegal_name_char(*c))
        .collect();

    let collapsed = WHITESPACE_RUN.replace_all(stripped.trim(), "_");
    if collapsed.is_empty() {
        UNKNOWN_REFERENCE.to_string()
    } else {
        collapsed.into_owned()
    }
}

fn is_illegal_name_char(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '\\' | '|' | '?' | '*') || ('\u{00}'..='\u{1F}').contains(&c)
}
