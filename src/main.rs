use restaurant_order_management::adapter::driven::{
    ConsoleLogger, ConsoleNotifier, MySqlInventoryRepository, MySqlMenuItemRepository,
    MySqlOrderRepository, MySqlTransactionRepository,
};
use restaurant_order_management::adapter::driver::rest_api::{create_router, AppStateInner};
use restaurant_order_management::adapter::{DatabaseConfig, DatabaseMigration};
use restaurant_order_management::application::service::inventory_query_service::InventoryQueryService;
use restaurant_order_management::application::service::order_query_service::OrderQueryService;
use restaurant_order_management::application::service::{
    InventoryApplicationService, MenuApplicationService, OrderApplicationService,
    TransactionApplicationService,
};
use restaurant_order_management::domain::service::StockReconciliationService;

use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== 飲食店注文管理システム REST API ===");
    println!();

    // .envファイルから環境変数を読み込む
    dotenvy::dotenv().ok();

    // データベース設定を読み込む
    let config = DatabaseConfig::from_env()?;
    println!(
        "データベース設定を読み込みました: {}:{}",
        config.host, config.port
    );

    // 接続プールを作成
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await?;
    println!("データベース接続プールを作成しました");

    // マイグレーションを実行
    let migration = DatabaseMigration::new(pool.clone());
    migration.run().await?;
    println!("データベースマイグレーションを実行しました");

    // MySQLリポジトリを作成
    let order_repository = Arc::new(MySqlOrderRepository::new(pool.clone()));
    let menu_item_repository = Arc::new(MySqlMenuItemRepository::new(pool.clone()));
    let inventory_repository = Arc::new(MySqlInventoryRepository::new(pool.clone()));
    let transaction_repository = Arc::new(MySqlTransactionRepository::new(pool.clone()));

    // ロガーと通知サービスを作成
    let logger = Arc::new(ConsoleLogger::new());
    let notification_service = Arc::new(ConsoleNotifier::new());

    // 在庫照合ドメインサービスを作成
    let reconciliation_service = Arc::new(StockReconciliationService::new(
        menu_item_repository.clone(),
        inventory_repository.clone(),
    ));

    // アプリケーションサービスを作成
    let order_service = OrderApplicationService::new(
        order_repository.clone(),
        menu_item_repository.clone(),
        reconciliation_service.clone(),
        notification_service.clone(),
        logger.clone(),
    );
    let transaction_service = TransactionApplicationService::new(
        transaction_repository.clone(),
        menu_item_repository.clone(),
        reconciliation_service.clone(),
        logger.clone(),
    );
    let inventory_service =
        InventoryApplicationService::new(inventory_repository.clone(), logger.clone());
    let menu_service = MenuApplicationService::new(
        menu_item_repository.clone(),
        inventory_repository.clone(),
        logger.clone(),
    );

    // クエリサービスを作成
    let order_query_service = OrderQueryService::new(order_repository.clone());
    let inventory_query_service = InventoryQueryService::new(inventory_repository.clone());

    // アプリケーション状態を作成
    let app_state = AppStateInner {
        order_service: Arc::new(order_service),
        transaction_service: Arc::new(transaction_service),
        inventory_service: Arc::new(inventory_service),
        menu_service: Arc::new(menu_service),
        order_query_service: Arc::new(order_query_service),
        inventory_query_service: Arc::new(inventory_query_service),
    };

    // REST APIルーターを作成
    let app = create_router()
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // サーバーを起動
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("REST APIサーバーが起動しました: http://localhost:3000");
    println!("ヘルスチェック: GET http://localhost:3000/health");
    println!("API仕様:");
    println!("  POST   /orders - 注文作成");
    println!("  GET    /orders - 注文一覧取得（?restaurant_id=&status=）");
    println!("  GET    /orders/:id - 注文詳細取得");
    println!("  PUT    /orders/:id/status - 注文ステータス更新");
    println!("  DELETE /orders/:id - 注文削除");
    println!("  POST   /transactions - 会計作成");
    println!("  GET    /transactions - 会計一覧取得");
    println!("  GET    /transactions/:id - 会計詳細取得");
    println!("  POST   /inventory - 在庫品目作成");
    println!("  GET    /inventory - 在庫一覧取得（?max_quantity_millis=で低在庫のみ）");
    println!("  GET    /inventory/:id - 在庫詳細取得");
    println!("  PUT    /inventory/:id - 在庫品目更新");
    println!("  POST   /inventory/:id/receive - 入荷記録");
    println!("  POST   /menu-items - メニュー項目作成");
    println!("  GET    /menu-items - メニュー一覧取得");
    println!("  PUT    /menu-items/:id/recipe - レシピ更新");
    println!("  GET    /menu-items/:id/recipe - レシピ取得");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
