use crate::domain::error::DomainError;
use crate::domain::model::{MenuItemId, Money, RestaurantId};
use uuid::Uuid;

/// メニュー項目集約
/// 店舗ごとの販売メニューを表す
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    id: MenuItemId,
    restaurant_id: RestaurantId,
    name: String,
    price: Money,
    category_id: Option<Uuid>,
    active: bool,
    // 旧システム由来のメニュー単位の在庫カウンター。
    // 在庫品目台帳（レシピ駆動）とは照合されず、どちらが正かは未解決のまま
    // 引き継がれている。台帳側を正とし、この値は読み取り専用で保持する。
    legacy_stock: Option<i64>,
}

impl MenuItem {
    /// 新しいメニュー項目を作成
    ///
    /// # Arguments
    /// * `id` - メニュー項目ID
    /// * `restaurant_id` - 店舗ID
    /// * `name` - 表示名
    /// * `price` - 価格
    /// * `category_id` - カテゴリ参照（任意）
    pub fn new(
        id: MenuItemId,
        restaurant_id: RestaurantId,
        name: String,
        price: Money,
        category_id: Option<Uuid>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "メニュー名は空にできません".to_string(),
            ));
        }
        Ok(Self {
            id,
            restaurant_id,
            name,
            price,
            category_id,
            active: true,
            legacy_stock: None,
        })
    }

    /// データベースから取得したデータでメニュー項目を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: MenuItemId,
        restaurant_id: RestaurantId,
        name: String,
        price: Money,
        category_id: Option<Uuid>,
        active: bool,
        legacy_stock: Option<i64>,
    ) -> Self {
        Self {
            id,
            restaurant_id,
            name,
            price,
            category_id,
            active,
            legacy_stock,
        }
    }

    /// メニュー項目IDを取得
    pub fn id(&self) -> MenuItemId {
        self.id
    }

    /// 店舗IDを取得
    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// 表示名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 価格を取得
    pub fn price(&self) -> Money {
        self.price
    }

    /// カテゴリ参照を取得
    pub fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

    /// 販売中かどうか
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// 旧在庫カウンターを取得（台帳とは照合されない）
    pub fn legacy_stock(&self) -> Option<i64> {
        self.legacy_stock
    }

    /// 販売を停止する
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// 販売を再開する
    pub fn activate(&mut self) {
        self.active = true;
    }

    /// 表示名と価格を更新
    pub fn update(&mut self, name: String, price: Money) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "メニュー名は空にできません".to_string(),
            ));
        }
        self.name = name;
        self.price = price;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_item_creation() {
        let item = MenuItem::new(
            MenuItemId::new(),
            RestaurantId::new(),
            "ピザ".to_string(),
            Money::from_cents(1200).unwrap(),
            None,
        )
        .unwrap();

        assert_eq!(item.name(), "ピザ");
        assert_eq!(item.price().cents(), 1200);
        assert!(item.is_active());
        assert!(item.legacy_stock().is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = MenuItem::new(
            MenuItemId::new(),
            RestaurantId::new(),
            "".to_string(),
            Money::zero(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_deactivate_and_activate() {
        let mut item = MenuItem::new(
            MenuItemId::new(),
            RestaurantId::new(),
            "カルツォーネ".to_string(),
            Money::from_cents(1500).unwrap(),
            None,
        )
        .unwrap();

        item.deactivate();
        assert!(!item.is_active());
        item.activate();
        assert!(item.is_active());
    }

    #[test]
    fn test_reconstruct_preserves_legacy_stock() {
        let item = MenuItem::reconstruct(
            MenuItemId::new(),
            RestaurantId::new(),
            "ピザ".to_string(),
            Money::from_cents(1200).unwrap(),
            None,
            false,
            Some(42),
        );
        assert!(!item.is_active());
        assert_eq!(item.legacy_stock(), Some(42));
    }
}
