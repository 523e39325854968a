use crate::domain::error::DomainError;
use crate::domain::model::{InventoryItemId, Quantity, RestaurantId, StockShortfall, SupplierId};

/// 在庫品目集約
/// 店舗ごとの在庫数量を管理する
/// 不変条件: quantity >= 0（減算時にのみ検査される）
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    id: InventoryItemId,
    restaurant_id: RestaurantId,
    name: String,
    unit: String,
    quantity: Quantity,
    supplier_id: Option<SupplierId>,
}

impl InventoryItem {
    /// 新しい在庫品目を作成
    ///
    /// # Arguments
    /// * `id` - 在庫品目ID
    /// * `restaurant_id` - 店舗ID
    /// * `name` - 品目名
    /// * `unit` - 数量の単位（kg、L、個 など）
    /// * `quantity` - 初期在庫数量
    /// * `supplier_id` - 仕入先ID（任意）
    pub fn new(
        id: InventoryItemId,
        restaurant_id: RestaurantId,
        name: String,
        unit: String,
        quantity: Quantity,
        supplier_id: Option<SupplierId>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "品目名は空にできません".to_string(),
            ));
        }
        Ok(Self {
            id,
            restaurant_id,
            name,
            unit,
            quantity,
            supplier_id,
        })
    }

    /// データベースから取得したデータで在庫品目を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: InventoryItemId,
        restaurant_id: RestaurantId,
        name: String,
        unit: String,
        quantity: Quantity,
        supplier_id: Option<SupplierId>,
    ) -> Self {
        Self {
            id,
            restaurant_id,
            name,
            unit,
            quantity,
            supplier_id,
        }
    }

    /// 在庫品目IDを取得
    pub fn id(&self) -> InventoryItemId {
        self.id
    }

    /// 店舗IDを取得
    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// 品目名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 数量の単位を取得
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// 現在の在庫数量を取得
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// 仕入先IDを取得
    pub fn supplier_id(&self) -> Option<SupplierId> {
        self.supplier_id
    }

    /// 在庫を減算する
    /// 減算量は正である必要があり、現在量を超える減算は拒否される
    ///
    /// # Returns
    /// * `Ok(())` - 減算成功
    /// * `Err(DomainError::InvalidQuantity)` - 減算量が0以下
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足（在庫は変更されない）
    pub fn try_decrement(&mut self, amount: Quantity) -> Result<(), DomainError> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidQuantity);
        }
        if self.quantity < amount {
            return Err(DomainError::InsufficientStock(vec![StockShortfall {
                inventory_item_id: self.id,
                requested: amount,
                available: self.quantity,
            }]));
        }
        self.quantity = self.quantity.checked_sub(amount)?;
        Ok(())
    }

    /// 指定量の在庫があるかチェック
    pub fn has_available_stock(&self, amount: Quantity) -> bool {
        self.quantity >= amount
    }

    /// 入荷による在庫の加算
    pub fn receive(&mut self, amount: Quantity) -> Result<(), DomainError> {
        if !amount.is_positive() {
            return Err(DomainError::InvalidQuantity);
        }
        self.quantity = self.quantity.checked_add(amount)?;
        Ok(())
    }

    /// 在庫数量を直接設定する
    /// 管理画面の更新経路で使われる。減算時のフロアチェックを迂回するため、
    /// 照合エンジンとは整合しない値を書ける点に注意
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    /// 品目名と単位を更新
    pub fn rename(&mut self, name: String, unit: String) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "品目名は空にできません".to_string(),
            ));
        }
        self.name = name;
        self.unit = unit;
        Ok(())
    }
}
