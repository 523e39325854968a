use crate::application::ApplicationError;
use crate::domain::model::{InventoryItem, InventoryItemId, Quantity, RestaurantId};
use crate::domain::port::InventoryRepository;
use std::sync::Arc;

/// 在庫クエリサービス
/// 読み取り専用の在庫操作を提供する
pub struct InventoryQueryService {
    inventory_repository: Arc<dyn InventoryRepository>,
}

impl InventoryQueryService {
    pub fn new(inventory_repository: Arc<dyn InventoryRepository>) -> Self {
        Self {
            inventory_repository,
        }
    }

    /// 在庫品目IDで在庫品目を取得
    pub async fn get_inventory_item_by_id(
        &self,
        item_id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, ApplicationError> {
        self.inventory_repository
            .find_by_id(item_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定された店舗のすべての在庫品目を取得
    pub async fn get_all_inventory_items(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<InventoryItem>, ApplicationError> {
        self.inventory_repository
            .find_all(restaurant_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定された最大数量以下の在庫品目を取得（低在庫の検出）
    pub async fn get_low_stock_items(
        &self,
        restaurant_id: RestaurantId,
        max_quantity: Quantity,
    ) -> Result<Vec<InventoryItem>, ApplicationError> {
        self.inventory_repository
            .find_by_max_quantity(restaurant_id, max_quantity)
            .await
            .map_err(ApplicationError::from)
    }
}
