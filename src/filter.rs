//! Group Filter Module
//!
//! 出力する意味のないコンテナグループを取り除く。

use crate::types::{ContainerGroups, LineItem};
use crate::validate::is_valid_container_number;

/// 「点検済み・異常なし」を表すプレースホルダーの作業内容
pub const PLACEHOLDER_DESCRIPTION: &str = "Checked & Found.";

/// グループが出力に値する明細を持つか
///
/// 明細が0件、またはすべての明細がプレースホルダーの場合はfalseです。
pub fn has_actionable_items(items: &[LineItem]) -> bool {
    !items.is_empty()
        && !items
            .iter()
            .all(|item| item.description == PLACEHOLDER_DESCRIPTION)
}

/// 出力対象外のグループを取り除く
///
/// 残るグループの内容と順序は変更しません。
pub fn filter_groups(groups: ContainerGroups) -> ContainerGroups {
    groups
        .into_iter()
        .filter(|(id, items)| is_valid_container_number(id) && has_actionable_items(items))
        .collect()
}
