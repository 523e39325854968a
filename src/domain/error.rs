use crate::domain::model::{
    InventoryItemId, MenuItemId, OrderStatus, StockShortfall,
};

/// ドメイン層のエラー型
/// ビジネスルール違反を表現する
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// 許可されていないステータス遷移（例: 完了済みの注文を再度完了しようとした）
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },
    /// 在庫不足（不足したすべての品目と不足量を保持する）
    InsufficientStock(Vec<StockShortfall>),
    /// 参照されたメニュー項目が存在しない
    MenuItemNotFound(MenuItemId),
    /// 参照された在庫品目が存在しない
    InventoryItemNotFound(InventoryItemId),
    /// 無効な数量（例: 0以下の減算量）
    InvalidQuantity,
    /// 無効な値（例: 空の明細リスト、不正なステータス文字列）
    InvalidValue(String),
    /// リポジトリ操作の失敗（ドメインサービス内でのみ使用）
    RepositoryError(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::InvalidTransition { from, to } => {
                write!(f, "Invalid status transition: {} -> {}", from, to)
            }
            DomainError::InsufficientStock(shortfalls) => {
                write!(f, "Insufficient stock for {} item(s):", shortfalls.len())?;
                for s in shortfalls {
                    write!(
                        f,
                        " [{} requested={} available={}]",
                        s.inventory_item_id, s.requested, s.available
                    )?;
                }
                Ok(())
            }
            DomainError::MenuItemNotFound(id) => write!(f, "Menu item not found: {}", id),
            DomainError::InventoryItemNotFound(id) => {
                write!(f, "Inventory item not found: {}", id)
            }
            DomainError::InvalidQuantity => write!(f, "Invalid quantity"),
            DomainError::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
            DomainError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}
