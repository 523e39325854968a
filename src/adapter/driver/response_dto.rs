use crate::domain::model::{InventoryItem, MenuItem, Order, OrderLine, RecipeLine, SaleLine, Transaction};
use serde::Serialize;

/// 注文用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderResponse {
    pub order_id: String,
    pub restaurant_id: String,
    pub customer_id: String,
    pub table_number: Option<u32>,
    pub status: String,
    pub lines: Vec<OrderLineResponse>,
}

/// 注文明細用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderLineResponse {
    pub menu_item_id: String,
    pub quantity: u32,
}

/// 会計用のレスポンスDTO
#[derive(Serialize)]
pub struct TransactionResponse {
    pub transaction_id: String,
    pub restaurant_id: String,
    pub customer_id: String,
    pub lines: Vec<SaleLineResponse>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_type: String,
}

/// 会計明細用のレスポンスDTO
#[derive(Serialize)]
pub struct SaleLineResponse {
    pub menu_item_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

/// 在庫品目用のレスポンスDTO
/// quantityは表示用の十進表記（例: "2.500"）
#[derive(Serialize)]
pub struct InventoryItemResponse {
    pub item_id: String,
    pub restaurant_id: String,
    pub name: String,
    pub unit: String,
    pub quantity_millis: i64,
    pub quantity: String,
    pub supplier_id: Option<String>,
}

/// メニュー項目用のレスポンスDTO
#[derive(Serialize)]
pub struct MenuItemResponse {
    pub menu_item_id: String,
    pub restaurant_id: String,
    pub name: String,
    pub price_cents: i64,
    pub category_id: Option<String>,
    pub active: bool,
}

/// レシピ明細用のレスポンスDTO
#[derive(Serialize)]
pub struct RecipeLineResponse {
    pub inventory_item_id: String,
    pub quantity_per_unit_millis: i64,
}

/// レシピ用のレスポンスDTO
#[derive(Serialize)]
pub struct RecipeResponse {
    pub menu_item_id: String,
    pub lines: Vec<RecipeLineResponse>,
}

impl OrderResponse {
    /// ドメインオブジェクトからOrderResponseを作成
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_id: order.id().to_string(),
            restaurant_id: order.restaurant_id().to_string(),
            customer_id: order.customer_id().to_string(),
            table_number: order.table_number(),
            status: order.status().to_string(),
            lines: order.lines().iter().map(OrderLineResponse::from_line).collect(),
        }
    }
}

impl OrderLineResponse {
    pub fn from_line(line: &OrderLine) -> Self {
        Self {
            menu_item_id: line.menu_item_id().to_string(),
            quantity: line.quantity(),
        }
    }
}

impl TransactionResponse {
    /// ドメインオブジェクトからTransactionResponseを作成
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            transaction_id: transaction.id().to_string(),
            restaurant_id: transaction.restaurant_id().to_string(),
            customer_id: transaction.customer_id().to_string(),
            lines: transaction
                .lines()
                .iter()
                .map(SaleLineResponse::from_line)
                .collect(),
            subtotal_cents: transaction.subtotal().cents(),
            discount_cents: transaction.discount().cents(),
            tax_cents: transaction.tax().cents(),
            total_cents: transaction.total().cents(),
            payment_type: transaction.payment_type().to_string(),
        }
    }
}

impl SaleLineResponse {
    pub fn from_line(line: &SaleLine) -> Self {
        Self {
            menu_item_id: line.menu_item_id().to_string(),
            quantity: line.quantity(),
            unit_price_cents: line.unit_price().cents(),
            subtotal_cents: line.subtotal().cents(),
        }
    }
}

impl InventoryItemResponse {
    /// ドメインオブジェクトからInventoryItemResponseを作成
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            item_id: item.id().to_string(),
            restaurant_id: item.restaurant_id().to_string(),
            name: item.name().to_string(),
            unit: item.unit().to_string(),
            quantity_millis: item.quantity().millis(),
            quantity: item.quantity().to_string(),
            supplier_id: item.supplier_id().map(|s| s.to_string()),
        }
    }
}

impl MenuItemResponse {
    /// ドメインオブジェクトからMenuItemResponseを作成
    pub fn from_item(item: &MenuItem) -> Self {
        Self {
            menu_item_id: item.id().to_string(),
            restaurant_id: item.restaurant_id().to_string(),
            name: item.name().to_string(),
            price_cents: item.price().cents(),
            category_id: item.category_id().map(|c| c.to_string()),
            active: item.is_active(),
        }
    }
}

impl RecipeResponse {
    /// レシピ明細のリストからRecipeResponseを作成
    pub fn from_lines(menu_item_id: &crate::domain::model::MenuItemId, lines: &[RecipeLine]) -> Self {
        Self {
            menu_item_id: menu_item_id.to_string(),
            lines: lines
                .iter()
                .map(|line| RecipeLineResponse {
                    inventory_item_id: line.inventory_item_id().to_string(),
                    quantity_per_unit_millis: line.quantity_per_unit().millis(),
                })
                .collect(),
        }
    }
}
