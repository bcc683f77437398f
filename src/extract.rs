//! Row Extractor Module
//!
//! デコード済みシートから参照コードとコンテナごとの明細を抽出するモジュール。
//!
//! 明細の抽出は行を順に畳み込むステートマシンです。
//!
//! - `current = None`: コンテナ未確定。明細行は捨てられる
//! - `current = Some(id)`: 明細行は `id` のグループに追加される
//!
//! アンカー列が空でなく、候補列が有効なコンテナ番号である行で `current` が切り替わります。
//! シートの終端まで `None` に戻ることはありません。

use crate::config::{ColumnMapping, ExtractionConfig};
use crate::filter::filter_groups;
use crate::types::{
    ContainerGroups, DecodedSheet, ExtractionResult, LineItem, SourceRow, UNKNOWN_REFERENCE,
};
use crate::validate::is_valid_container_cell;

/// 参照コードのマーカー
pub const REFERENCE_PREFIX: &str = "REF: ";

/// 合計行の作業内容
const TOTAL_ROW_DESCRIPTION: &str = "Total";

/// シートから参照コードを抽出する
///
/// 参照列の値（前後の空白を除去したもの）が `REF: ` で始まる最初の行を探し、
/// マーカーを除いた残りを返します。見つからなければ `Unknown_Reference` です。
pub fn extract_reference(sheet: &DecodedSheet, columns: &ColumnMapping) -> String {
    sheet
        .rows
        .iter()
        .find_map(|row| {
            row.slot(columns.reference)
                .as_text()
                .and_then(|text| text.trim().strip_prefix(REFERENCE_PREFIX))
                .map(|rest| rest.trim().to_string())
        })
        .unwrap_or_else(|| UNKNOWN_REFERENCE.to_string())
}

/// 行スキャンの状態
#[derive(Debug, Default)]
struct ScanState {
    current: Option<String>,
    groups: ContainerGroups,
}

impl ScanState {
    fn step(mut self, row: &SourceRow, config: &ExtractionConfig) -> Self {
        let columns = &config.columns;

        let candidate = row.slot(columns.candidate);
        if !row.slot(columns.anchor).is_blank() && is_valid_container_cell(candidate) {
            if let Some(id) = candidate.as_text() {
                // 同じシート内で同じ番号が再登場した場合は、空のグループからやり直す
                self.groups.insert(id.to_string(), Vec::new());
                self.current = Some(id.to_string());
            }
        }

        if let Some(current) = &self.current {
            if let Some(item) = line_item(row, config) {
                if let Some(items) = self.groups.get_mut(current) {
                    items.push(item);
                }
            }
        }

        self
    }
}

/// 行を明細に変換する（明細行でなければNone）
fn line_item(row: &SourceRow, config: &ExtractionConfig) -> Option<LineItem> {
    let description = row.slot(config.columns.description);
    let amount = row.slot(config.columns.amount);

    if description.is_blank() && (config.require_description || amount.is_blank()) {
        return None;
    }

    let description = description.as_raw_string();
    if config.exclude_total_rows && description == TOTAL_ROW_DESCRIPTION {
        return None;
    }

    Some(LineItem {
        description,
        amount: amount.clone(),
    })
}

/// シートをコンテナごとの明細に分割する
///
/// 最初のコンテナ行より前の行は、どのグループにも属さず捨てられます。
/// コンテナ行自体が明細を持つ場合、その明細はそのコンテナに属します。
pub fn extract_container_groups(sheet: &DecodedSheet, config: &ExtractionConfig) -> ContainerGroups {
    sheet
        .rows
        .iter()
        .fold(ScanState::default(), |state, row| state.step(row, config))
        .groups
}

/// ワークブック全体（複数シート）の抽出結果をまとめる
///
/// - 参照コード: `Unknown_Reference` 以外で最初に見つかったもの
/// - コンテナグループ: 後のシートが同じ番号のグループを上書きする
///
/// 最後にグループフィルタを適用します。
pub fn extract_workbook(sheets: &[DecodedSheet], config: &ExtractionConfig) -> ExtractionResult {
    let mut reference: Option<String> = None;
    let mut groups = ContainerGroups::new();

    for sheet in sheets {
        let sheet_reference = extract_reference(sheet, &config.columns);
        if reference.is_none() && sheet_reference != UNKNOWN_REFERENCE {
            reference = Some(sheet_reference);
        }

        let sheet_groups = extract_container_groups(sheet, config);
        log::debug!(
            "Sheet '{}': {} container group(s)",
            sheet.name,
            sheet_groups.len()
        );
        for (id, items) in sheet_groups {
            if groups.contains_key(&id) {
                log::debug!("Container {} in sheet '{}' replaces an earlier group", id, sheet.name);
            }
            groups.insert(id, items);
        }
    }

    ExtractionResult {
        reference: reference.unwrap_or_else(|| UNKNOWN_REFERENCE.to_string()),
        groups: filter_groups(groups),
    }
}
