use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 注文明細用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub menu_item_id: Uuid,
    pub quantity: u32,
}

/// 注文作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub restaurant_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub table_number: Option<u32>,
    pub items: Vec<OrderItemRequest>,
}

/// 注文ステータス更新用のリクエストDTO
/// statusには "processing" / "accept" / "reject" / "complete" を指定する
#[derive(Serialize, Deserialize)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

/// 会計作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub restaurant_id: Uuid,
    pub customer_id: Option<Uuid>,
    pub items: Vec<OrderItemRequest>,
    pub discount_cents: Option<i64>,
    pub tax_rate_basis_points: Option<u32>,
    pub payment_type: String,
}

/// 在庫品目作成用のリクエストDTO
/// 数量はミリ単位の固定小数点（2.500 kg = 2500）
#[derive(Serialize, Deserialize)]
pub struct CreateInventoryItemRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub unit: String,
    pub quantity_millis: i64,
    pub supplier_id: Option<Uuid>,
}

/// 在庫品目更新用のリクエストDTO
/// 数量の直接設定を含む（棚卸しによる修正を想定）
#[derive(Serialize, Deserialize)]
pub struct UpdateInventoryItemRequest {
    pub name: String,
    pub unit: String,
    pub quantity_millis: i64,
}

/// 入荷記録用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct ReceiveStockRequest {
    pub amount_millis: i64,
}

/// メニュー項目作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateMenuItemRequest {
    pub restaurant_id: Uuid,
    pub name: String,
    pub price_cents: i64,
    pub category_id: Option<Uuid>,
}

/// レシピ明細用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct RecipeLineRequest {
    pub inventory_item_id: Uuid,
    pub quantity_per_unit_millis: i64,
}

/// レシピ更新用のリクエストDTO
/// 既存のレシピ明細をまとめて置き換える
#[derive(Serialize, Deserialize)]
pub struct UpdateRecipeRequest {
    pub restaurant_id: Uuid,
    pub lines: Vec<RecipeLineRequest>,
}

/// 注文一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct OrdersQueryParams {
    pub restaurant_id: Uuid,
    pub status: Option<String>,
}

/// 会計一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct TransactionsQueryParams {
    pub restaurant_id: Uuid,
}

/// 在庫一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct InventoryQueryParams {
    pub restaurant_id: Uuid,
    pub max_quantity_millis: Option<i64>,
}

/// メニュー一覧取得用のクエリパラメータ
#[derive(Deserialize)]
pub struct MenuQueryParams {
    pub restaurant_id: Uuid,
}
