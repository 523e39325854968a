use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::adapter::driver::request_dto::{
    CreateInventoryItemRequest, CreateMenuItemRequest, CreateOrderRequest,
    CreateTransactionRequest, InventoryQueryParams, MenuQueryParams, OrdersQueryParams,
    ReceiveStockRequest, TransactionsQueryParams, UpdateInventoryItemRequest,
    UpdateOrderStatusRequest, UpdateRecipeRequest,
};
use crate::adapter::driver::response_dto::{
    InventoryItemResponse, MenuItemResponse, OrderResponse, RecipeResponse, TransactionResponse,
};
use crate::application::service::inventory_query_service::InventoryQueryService;
use crate::application::service::order_query_service::OrderQueryService;
use crate::application::service::{
    InventoryApplicationService, MenuApplicationService, OrderApplicationService,
    TransactionApplicationService,
};
use crate::application::ApplicationError;
use crate::domain::model::{
    CustomerId, InventoryItemId, MenuItemId, Money, OrderId, OrderStatus, PaymentType, Quantity,
    RecipeLine, RestaurantId, SupplierId, TransactionId,
};

/// APIエラーレスポンス
#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub order_service: Arc<OrderApplicationService>,
    pub transaction_service: Arc<TransactionApplicationService>,
    pub inventory_service: Arc<InventoryApplicationService>,
    pub menu_service: Arc<MenuApplicationService>,
    pub order_query_service: Arc<OrderQueryService>,
    pub inventory_query_service: Arc<InventoryQueryService>,
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/orders", post(create_order))
        .route("/orders", get(get_orders))
        .route("/orders/:order_id", get(get_order_by_id))
        .route("/orders/:order_id", delete(delete_order))
        .route("/orders/:order_id/status", put(update_order_status))
        .route("/transactions", post(create_transaction))
        .route("/transactions", get(get_transactions))
        .route("/transactions/:transaction_id", get(get_transaction_by_id))
        .route("/inventory", post(create_inventory_item))
        .route("/inventory", get(get_inventory_items))
        .route("/inventory/:item_id", get(get_inventory_item_by_id))
        .route("/inventory/:item_id", put(update_inventory_item))
        .route("/inventory/:item_id/receive", post(receive_stock))
        .route("/menu-items", post(create_menu_item))
        .route("/menu-items", get(get_menu_items))
        .route("/menu-items/:menu_item_id/recipe", put(update_recipe))
        .route("/menu-items/:menu_item_id/recipe", get(get_recipe))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "restaurant-order-management",
        "version": "0.1.0"
    }))
}

/// リクエストのステータス操作文字列を遷移先ステータスに変換する
fn parse_status_action(action: &str) -> Option<OrderStatus> {
    match action {
        "processing" => Some(OrderStatus::Processing),
        "accept" => Some(OrderStatus::Accepted),
        "reject" => Some(OrderStatus::Rejected),
        "complete" => Some(OrderStatus::Completed),
        _ => None,
    }
}

// 注文作成エンドポイント
async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), (StatusCode, Json<ApiError>)> {
    let restaurant_id = RestaurantId::from_uuid(request.restaurant_id);
    let customer_id = request
        .customer_id
        .map(CustomerId::from_uuid)
        .unwrap_or_else(CustomerId::new);
    let items: Vec<(MenuItemId, u32)> = request
        .items
        .iter()
        .map(|item| (MenuItemId::from_uuid(item.menu_item_id), item.quantity))
        .collect();

    match state
        .order_service
        .create_order(restaurant_id, customer_id, request.table_number, &items)
        .await
    {
        Ok(order) => Ok((StatusCode::CREATED, Json(OrderResponse::from_order(&order)))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文ステータス更新エンドポイント
async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(request): Json<UpdateOrderStatusRequest>,
) -> Result<Json<OrderResponse>, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    let target = match parse_status_action(&request.status) {
        Some(status) => status,
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: format!("無効なステータス値: {}", request.status),
                    code: "INVALID_STATUS".to_string(),
                }),
            ))
        }
    };

    match state.order_service.transition_order(order_id, target).await {
        Ok(order) => Ok(Json(OrderResponse::from_order(&order))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文削除エンドポイント
// 完了済み注文を削除しても在庫は戻らない
async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_service.delete_order(order_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(map_application_error(err)),
    }
}

// 注文一覧取得エンドポイント
async fn get_orders(
    State(state): State<AppState>,
    query: Result<Query<OrdersQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<OrderResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;
    let restaurant_id = RestaurantId::from_uuid(params.restaurant_id);

    let orders = if let Some(status_str) = params.status {
        // ステータスでフィルタリング
        let status = match OrderStatus::from_string(&status_str) {
            Ok(status) => status,
            Err(_) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiError {
                        error: format!("無効なステータス値: {}", status_str),
                        code: "INVALID_STATUS".to_string(),
                    }),
                ))
            }
        };

        match state
            .order_query_service
            .get_orders_by_status(restaurant_id, status)
            .await
        {
            Ok(orders) => orders,
            Err(err) => return Err(map_application_error(err)),
        }
    } else {
        match state.order_query_service.get_all_orders(restaurant_id).await {
            Ok(orders) => orders,
            Err(err) => return Err(map_application_error(err)),
        }
    };

    let response: Vec<OrderResponse> = orders.iter().map(OrderResponse::from_order).collect();
    Ok(Json(response))
}

// 注文詳細取得エンドポイント
async fn get_order_by_id(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderResponse>, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_uuid(order_id);

    match state.order_query_service.get_order_by_id(order_id).await {
        Ok(Some(order)) => Ok(Json(OrderResponse::from_order(&order))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された注文が見つかりません".to_string(),
                code: "ORDER_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 会計作成エンドポイント
async fn create_transaction(
    State(state): State<AppState>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<TransactionResponse>), (StatusCode, Json<ApiError>)> {
    let restaurant_id = RestaurantId::from_uuid(request.restaurant_id);
    let customer_id = request
        .customer_id
        .map(CustomerId::from_uuid)
        .unwrap_or_else(CustomerId::new);
    let items: Vec<(MenuItemId, u32)> = request
        .items
        .iter()
        .map(|item| (MenuItemId::from_uuid(item.menu_item_id), item.quantity))
        .collect();

    let payment_type = match PaymentType::from_string(&request.payment_type) {
        Ok(payment_type) => payment_type,
        Err(_) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: format!("無効な支払い方法: {}", request.payment_type),
                    code: "INVALID_PAYMENT_TYPE".to_string(),
                }),
            ))
        }
    };

    let discount = match Money::from_cents(request.discount_cents.unwrap_or(0)) {
        Ok(discount) => discount,
        Err(err) => return Err(map_domain_error(err)),
    };

    match state
        .transaction_service
        .create_transaction(
            restaurant_id,
            customer_id,
            &items,
            discount,
            request.tax_rate_basis_points.unwrap_or(0),
            payment_type,
        )
        .await
    {
        Ok(transaction) => Ok((
            StatusCode::CREATED,
            Json(TransactionResponse::from_transaction(&transaction)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 会計一覧取得エンドポイント
async fn get_transactions(
    State(state): State<AppState>,
    query: Result<Query<TransactionsQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<TransactionResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;
    let restaurant_id = RestaurantId::from_uuid(params.restaurant_id);

    match state
        .transaction_service
        .get_all_transactions(restaurant_id)
        .await
    {
        Ok(transactions) => {
            let response: Vec<TransactionResponse> = transactions
                .iter()
                .map(TransactionResponse::from_transaction)
                .collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// 会計詳細取得エンドポイント
async fn get_transaction_by_id(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, (StatusCode, Json<ApiError>)> {
    let transaction_id = TransactionId::from_uuid(transaction_id);

    match state.transaction_service.get_transaction(transaction_id).await {
        Ok(Some(transaction)) => Ok(Json(TransactionResponse::from_transaction(&transaction))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された会計が見つかりません".to_string(),
                code: "TRANSACTION_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 在庫品目作成エンドポイント
async fn create_inventory_item(
    State(state): State<AppState>,
    Json(request): Json<CreateInventoryItemRequest>,
) -> Result<(StatusCode, Json<InventoryItemResponse>), (StatusCode, Json<ApiError>)> {
    let restaurant_id = RestaurantId::from_uuid(request.restaurant_id);
    let quantity = match Quantity::from_millis(request.quantity_millis) {
        Ok(quantity) => quantity,
        Err(err) => return Err(map_domain_error(err)),
    };
    let supplier_id = request.supplier_id.map(SupplierId::from_uuid);

    match state
        .inventory_service
        .create_inventory_item(restaurant_id, request.name, request.unit, quantity, supplier_id)
        .await
    {
        Ok(item) => Ok((
            StatusCode::CREATED,
            Json(InventoryItemResponse::from_item(&item)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// 在庫品目更新エンドポイント（数量の直接設定を含む）
async fn update_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<UpdateInventoryItemRequest>,
) -> Result<Json<InventoryItemResponse>, (StatusCode, Json<ApiError>)> {
    let item_id = InventoryItemId::from_uuid(item_id);
    let quantity = match Quantity::from_millis(request.quantity_millis) {
        Ok(quantity) => quantity,
        Err(err) => return Err(map_domain_error(err)),
    };

    match state
        .inventory_service
        .update_inventory_item(item_id, request.name, request.unit, quantity)
        .await
    {
        Ok(item) => Ok(Json(InventoryItemResponse::from_item(&item))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 入荷記録エンドポイント
async fn receive_stock(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(request): Json<ReceiveStockRequest>,
) -> Result<Json<InventoryItemResponse>, (StatusCode, Json<ApiError>)> {
    let item_id = InventoryItemId::from_uuid(item_id);
    let amount = match Quantity::from_millis(request.amount_millis) {
        Ok(amount) => amount,
        Err(err) => return Err(map_domain_error(err)),
    };

    match state.inventory_service.receive_stock(item_id, amount).await {
        Ok(item) => Ok(Json(InventoryItemResponse::from_item(&item))),
        Err(err) => Err(map_application_error(err)),
    }
}

// 在庫一覧取得エンドポイント
async fn get_inventory_items(
    State(state): State<AppState>,
    query: Result<Query<InventoryQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<InventoryItemResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;
    let restaurant_id = RestaurantId::from_uuid(params.restaurant_id);

    let items = if let Some(max_quantity_millis) = params.max_quantity_millis {
        let max_quantity = match Quantity::from_millis(max_quantity_millis) {
            Ok(max_quantity) => max_quantity,
            Err(err) => return Err(map_domain_error(err)),
        };
        match state
            .inventory_query_service
            .get_low_stock_items(restaurant_id, max_quantity)
            .await
        {
            Ok(items) => items,
            Err(err) => return Err(map_application_error(err)),
        }
    } else {
        match state
            .inventory_query_service
            .get_all_inventory_items(restaurant_id)
            .await
        {
            Ok(items) => items,
            Err(err) => return Err(map_application_error(err)),
        }
    };

    let response: Vec<InventoryItemResponse> =
        items.iter().map(InventoryItemResponse::from_item).collect();
    Ok(Json(response))
}

// 在庫詳細取得エンドポイント
async fn get_inventory_item_by_id(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<InventoryItemResponse>, (StatusCode, Json<ApiError>)> {
    let item_id = InventoryItemId::from_uuid(item_id);

    match state
        .inventory_query_service
        .get_inventory_item_by_id(item_id)
        .await
    {
        Ok(Some(item)) => Ok(Json(InventoryItemResponse::from_item(&item))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: "指定された在庫品目が見つかりません".to_string(),
                code: "INVENTORY_ITEM_NOT_FOUND".to_string(),
            }),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// メニュー項目作成エンドポイント
async fn create_menu_item(
    State(state): State<AppState>,
    Json(request): Json<CreateMenuItemRequest>,
) -> Result<(StatusCode, Json<MenuItemResponse>), (StatusCode, Json<ApiError>)> {
    let restaurant_id = RestaurantId::from_uuid(request.restaurant_id);
    let price = match Money::from_cents(request.price_cents) {
        Ok(price) => price,
        Err(err) => return Err(map_domain_error(err)),
    };

    match state
        .menu_service
        .create_menu_item(restaurant_id, request.name, price, request.category_id)
        .await
    {
        Ok(item) => Ok((
            StatusCode::CREATED,
            Json(MenuItemResponse::from_item(&item)),
        )),
        Err(err) => Err(map_application_error(err)),
    }
}

// メニュー一覧取得エンドポイント
async fn get_menu_items(
    State(state): State<AppState>,
    query: Result<Query<MenuQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<Vec<MenuItemResponse>>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;
    let restaurant_id = RestaurantId::from_uuid(params.restaurant_id);

    match state.menu_service.get_all_menu_items(restaurant_id).await {
        Ok(items) => {
            let response: Vec<MenuItemResponse> =
                items.iter().map(MenuItemResponse::from_item).collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(err)),
    }
}

// レシピ更新エンドポイント
async fn update_recipe(
    State(state): State<AppState>,
    Path(menu_item_id): Path<Uuid>,
    Json(request): Json<UpdateRecipeRequest>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let restaurant_id = RestaurantId::from_uuid(request.restaurant_id);
    let menu_item_id = MenuItemId::from_uuid(menu_item_id);

    let mut lines = Vec::with_capacity(request.lines.len());
    for line in &request.lines {
        let quantity_per_unit = match Quantity::from_millis(line.quantity_per_unit_millis) {
            Ok(quantity) => quantity,
            Err(err) => return Err(map_domain_error(err)),
        };
        let recipe_line = match RecipeLine::new(
            InventoryItemId::from_uuid(line.inventory_item_id),
            quantity_per_unit,
        ) {
            Ok(recipe_line) => recipe_line,
            Err(err) => return Err(map_domain_error(err)),
        };
        lines.push(recipe_line);
    }

    match state
        .menu_service
        .save_recipe(restaurant_id, menu_item_id, &lines)
        .await
    {
        Ok(()) => Ok(StatusCode::OK),
        Err(err) => Err(map_application_error(err)),
    }
}

// レシピ取得エンドポイント
async fn get_recipe(
    State(state): State<AppState>,
    Path(menu_item_id): Path<Uuid>,
    query: Result<Query<MenuQueryParams>, axum::extract::rejection::QueryRejection>,
) -> Result<Json<RecipeResponse>, (StatusCode, Json<ApiError>)> {
    let Query(params) = query.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効なクエリパラメータです".to_string(),
                code: "INVALID_PARAMETER".to_string(),
            }),
        )
    })?;
    let restaurant_id = RestaurantId::from_uuid(params.restaurant_id);
    let menu_item_id = MenuItemId::from_uuid(menu_item_id);

    match state
        .menu_service
        .get_recipe(restaurant_id, menu_item_id)
        .await
    {
        Ok(lines) => Ok(Json(RecipeResponse::from_lines(&menu_item_id, &lines))),
        Err(err) => Err(map_application_error(err)),
    }
}

// アプリケーションエラーをHTTPエラーにマッピング
fn map_application_error(err: ApplicationError) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::DomainError(domain_err) => map_domain_error(domain_err),
        ApplicationError::RepositoryError(repo_err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: format!("{}", repo_err),
                code: "REPOSITORY_ERROR".to_string(),
            }),
        ),
        ApplicationError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: msg,
                code: "NOT_FOUND".to_string(),
            }),
        ),
    }
}

// ドメインエラーを適切なHTTPステータスコードとエラーコードにマッピング
fn map_domain_error(domain_err: crate::domain::error::DomainError) -> (StatusCode, Json<ApiError>) {
    use crate::domain::error::DomainError;

    match domain_err {
        DomainError::InvalidTransition { from, to } => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: format!("ステータス遷移できません: {} -> {}", from, to),
                code: "INVALID_TRANSITION".to_string(),
            }),
        ),
        DomainError::InsufficientStock(shortfalls) => {
            let details = shortfalls
                .iter()
                .map(|s| {
                    format!(
                        "{}: 要求 {} / 在庫 {}",
                        s.inventory_item_id, s.requested, s.available
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError {
                    error: format!("在庫不足です ({})", details),
                    code: "INSUFFICIENT_STOCK".to_string(),
                }),
            )
        }
        DomainError::MenuItemNotFound(menu_item_id) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("メニュー項目が見つかりません: {}", menu_item_id),
                code: "MENU_ITEM_NOT_FOUND".to_string(),
            }),
        ),
        DomainError::InventoryItemNotFound(item_id) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: format!("在庫品目が見つかりません: {}", item_id),
                code: "INVENTORY_ITEM_NOT_FOUND".to_string(),
            }),
        ),
        DomainError::InvalidQuantity => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "無効な数量です".to_string(),
                code: "INVALID_QUANTITY".to_string(),
            }),
        ),
        DomainError::InvalidValue(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_VALUE".to_string(),
            }),
        ),
        DomainError::RepositoryError(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError {
                error: msg,
                code: "REPOSITORY_ERROR".to_string(),
            }),
        ),
    }
}
