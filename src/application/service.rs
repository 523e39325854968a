pub mod inventory_query_service;
pub mod order_query_service;

use crate::application::ApplicationError;
use crate::domain::model::{
    CustomerId, InventoryItem, InventoryItemId, MenuItem, MenuItemId, Money, Order, OrderId,
    OrderStatus, PaymentType, Quantity, RecipeLine, RestaurantId, SaleLine, SupplierId,
    Transaction, TransactionId,
};
use crate::domain::port::{
    InventoryRepository, Logger, MenuItemRepository, NotificationMessage, NotificationService,
    OrderRepository, TransactionRepository,
};
use crate::domain::service::StockReconciliationService;
use std::collections::HashMap;
use std::sync::Arc;

/// 注文アプリケーションサービス
/// 注文の作成とステータス遷移のユースケースを実装する
pub struct OrderApplicationService {
    order_repository: Arc<dyn OrderRepository>,
    menu_item_repository: Arc<dyn MenuItemRepository>,
    reconciliation_service: Arc<StockReconciliationService>,
    notification_service: Arc<dyn NotificationService>,
    logger: Arc<dyn Logger>,
}

impl OrderApplicationService {
    /// 新しいアプリケーションサービスを作成
    pub fn new(
        order_repository: Arc<dyn OrderRepository>,
        menu_item_repository: Arc<dyn MenuItemRepository>,
        reconciliation_service: Arc<StockReconciliationService>,
        notification_service: Arc<dyn NotificationService>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            order_repository,
            menu_item_repository,
            reconciliation_service,
            notification_service,
            logger,
        }
    }

    /// 新しい注文を作成
    ///
    /// # Arguments
    /// * `restaurant_id` - 店舗ID
    /// * `customer_id` - 顧客ID
    /// * `table_number` - テーブル番号（任意）
    /// * `items` - メニュー項目IDと数量の組のリスト（1件以上）
    ///
    /// # Returns
    /// * `Ok(Order)` - 作成された注文（ステータスはProcessing）
    /// * `Err(ApplicationError)` - 作成失敗
    pub async fn create_order(
        &self,
        restaurant_id: RestaurantId,
        customer_id: CustomerId,
        table_number: Option<u32>,
        items: &[(MenuItemId, u32)],
    ) -> Result<Order, ApplicationError> {
        if items.is_empty() {
            return Err(ApplicationError::DomainError(
                crate::domain::error::DomainError::InvalidValue(
                    "注文明細が空です".to_string(),
                ),
            ));
        }

        // 参照されるメニュー項目がすべて同じ店舗に存在することを確認する
        // 他店舗のメニュー項目は存在しない扱いになる
        for (menu_item_id, _) in items {
            self.menu_item_repository
                .find_by_id(*menu_item_id)
                .await?
                .filter(|item| item.restaurant_id() == restaurant_id)
                .ok_or_else(|| {
                    ApplicationError::NotFound(format!("Menu item not found: {}", menu_item_id))
                })?;
        }

        let order_id = self.order_repository.next_identity();
        let mut order = Order::new(order_id, restaurant_id, customer_id, table_number);
        for (menu_item_id, quantity) in items {
            order.add_item(*menu_item_id, *quantity)?;
        }
        self.order_repository.save(&order).await?;

        self.logger.info(
            "OrderApplicationService",
            &format!("注文を作成しました: {}", order_id),
            Some(order_id.as_uuid()),
            None,
        );
        Ok(order)
    }

    /// 注文のステータスを遷移させる
    ///
    /// Completedへの遷移では、ステータスを保存する前に在庫照合を実行する。
    /// 照合が失敗した場合、保存済みのステータスは変更されない。
    /// それ以外の遷移は単純なステータス書き込みとなる。
    /// 永続化に成功した遷移の後には、通知をfire-and-forgetで送信する。
    ///
    /// # Returns
    /// * `Ok(Order)` - 遷移後の注文
    /// * `Err(ApplicationError::NotFound)` - 注文が見つからない
    /// * `Err(ApplicationError::DomainError)` - 遷移不可または在庫不足
    pub async fn transition_order(
        &self,
        order_id: OrderId,
        target: OrderStatus,
    ) -> Result<Order, ApplicationError> {
        let mut order = self
            .order_repository
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Order not found: {}", order_id)))?;

        // 遷移の妥当性を先に検証し、無効な遷移で在庫を触らないようにする
        if !order.status().can_transition_to(target) {
            return Err(ApplicationError::DomainError(
                crate::domain::error::DomainError::InvalidTransition {
                    from: order.status(),
                    to: target,
                },
            ));
        }

        if target == OrderStatus::Completed {
            let report = self
                .reconciliation_service
                .reconcile(order.restaurant_id(), order.lines())
                .await?;
            let mut context = HashMap::new();
            context.insert(
                "decrement_count".to_string(),
                report.applied().len().to_string(),
            );
            self.logger.info(
                "OrderApplicationService",
                &format!("在庫照合が完了しました: {}", order_id),
                Some(order_id.as_uuid()),
                Some(context),
            );
        }

        order.transition_to(target)?;
        self.order_repository.save(&order).await?;

        self.logger.info(
            "OrderApplicationService",
            &format!("注文ステータスを更新しました: {} -> {}", order_id, target),
            Some(order_id.as_uuid()),
            None,
        );

        self.notify_status_change(&order);
        Ok(order)
    }

    /// 注文を削除する
    /// 完了済み注文を削除しても在庫は戻らない
    pub async fn delete_order(&self, order_id: OrderId) -> Result<(), ApplicationError> {
        self.order_repository
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("Order not found: {}", order_id)))?;
        self.order_repository.delete(order_id).await?;
        self.logger.info(
            "OrderApplicationService",
            &format!("注文を削除しました: {}", order_id),
            Some(order_id.as_uuid()),
            None,
        );
        Ok(())
    }

    /// ステータス変更通知をfire-and-forgetで送信する
    /// 送信失敗は警告ログに留め、業務処理には波及させない
    fn notify_status_change(&self, order: &Order) {
        let notification_service = self.notification_service.clone();
        let logger = self.logger.clone();
        let customer_id = order.customer_id();
        let order_id = order.id();
        let status = order.status();
        tokio::spawn(async move {
            let message = NotificationMessage {
                title: "注文ステータス更新".to_string(),
                body: format!("注文 {} のステータスが {} になりました", order_id, status),
                payload: serde_json::json!({
                    "order_id": order_id.to_string(),
                    "status": status.to_string(),
                }),
            };
            if let Err(e) = notification_service.send(customer_id, message).await {
                logger.warn(
                    "OrderApplicationService",
                    &format!("通知の送信に失敗しました: {}", e),
                    Some(order_id.as_uuid()),
                    None,
                );
            }
        });
    }
}

/// 会計アプリケーションサービス
/// 会計の作成時に在庫照合を実行するユースケースを実装する
pub struct TransactionApplicationService {
    transaction_repository: Arc<dyn TransactionRepository>,
    menu_item_repository: Arc<dyn MenuItemRepository>,
    reconciliation_service: Arc<StockReconciliationService>,
    logger: Arc<dyn Logger>,
}

impl TransactionApplicationService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepository>,
        menu_item_repository: Arc<dyn MenuItemRepository>,
        reconciliation_service: Arc<StockReconciliationService>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            transaction_repository,
            menu_item_repository,
            reconciliation_service,
            logger,
        }
    }

    /// 新しい会計を作成
    ///
    /// すべてのメニュー項目が同じ店舗に存在することを確認し、販売時点の単価を
    /// 取り込んだうえで在庫照合を実行する。照合に成功した場合のみ会計を保存する。
    /// 照合が失敗した場合、会計は作成されず在庫も変化しない。
    ///
    /// # Arguments
    /// * `items` - メニュー項目IDと数量の組のリスト（1件以上）
    /// * `discount` - 割引額（小計以下であること）
    /// * `tax_rate_basis_points` - 税率（ベーシスポイント、例: 10% = 1000）
    #[allow(clippy::too_many_arguments)]
    pub async fn create_transaction(
        &self,
        restaurant_id: RestaurantId,
        customer_id: CustomerId,
        items: &[(MenuItemId, u32)],
        discount: Money,
        tax_rate_basis_points: u32,
        payment_type: PaymentType,
    ) -> Result<Transaction, ApplicationError> {
        let mut sale_lines = Vec::with_capacity(items.len());
        for (menu_item_id, quantity) in items {
            let menu_item = self
                .menu_item_repository
                .find_by_id(*menu_item_id)
                .await?
                .filter(|item| item.restaurant_id() == restaurant_id)
                .ok_or_else(|| {
                    ApplicationError::NotFound(format!("Menu item not found: {}", menu_item_id))
                })?;
            sale_lines.push(SaleLine::new(*menu_item_id, *quantity, menu_item.price())?);
        }

        let order_lines = sale_lines
            .iter()
            .map(|line| line.to_order_line())
            .collect::<Result<Vec<_>, _>>()?;

        self.reconciliation_service
            .reconcile(restaurant_id, &order_lines)
            .await?;

        let transaction_id = self.transaction_repository.next_identity();
        let transaction = Transaction::new(
            transaction_id,
            restaurant_id,
            customer_id,
            sale_lines,
            discount,
            tax_rate_basis_points,
            payment_type,
        )?;
        self.transaction_repository.save(&transaction).await?;

        self.logger.info(
            "TransactionApplicationService",
            &format!("会計を作成しました: {}", transaction_id),
            Some(transaction_id.as_uuid()),
            None,
        );
        Ok(transaction)
    }

    /// 会計IDで会計を取得
    pub async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<Transaction>, ApplicationError> {
        self.transaction_repository
            .find_by_id(transaction_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定された店舗のすべての会計を取得
    pub async fn get_all_transactions(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Transaction>, ApplicationError> {
        self.transaction_repository
            .find_all(restaurant_id)
            .await
            .map_err(ApplicationError::from)
    }
}

/// 在庫アプリケーションサービス
/// 在庫品目の登録・更新・入荷のユースケースを実装する
pub struct InventoryApplicationService {
    inventory_repository: Arc<dyn InventoryRepository>,
    logger: Arc<dyn Logger>,
}

impl InventoryApplicationService {
    pub fn new(inventory_repository: Arc<dyn InventoryRepository>, logger: Arc<dyn Logger>) -> Self {
        Self {
            inventory_repository,
            logger,
        }
    }

    /// 新しい在庫品目を登録
    pub async fn create_inventory_item(
        &self,
        restaurant_id: RestaurantId,
        name: String,
        unit: String,
        quantity: Quantity,
        supplier_id: Option<SupplierId>,
    ) -> Result<InventoryItem, ApplicationError> {
        let item = InventoryItem::new(
            InventoryItemId::new(),
            restaurant_id,
            name,
            unit,
            quantity,
            supplier_id,
        )?;
        self.inventory_repository.save(&item).await?;
        self.logger.info(
            "InventoryApplicationService",
            &format!("在庫品目を登録しました: {}", item.id()),
            Some(item.id().as_uuid()),
            None,
        );
        Ok(item)
    }

    /// 在庫品目を更新（数量の直接設定を含む）
    ///
    /// 数量の直接設定は照合エンジンの下限チェックを通らない管理者向けの
    /// 操作であり、棚卸しによる修正を想定している。
    pub async fn update_inventory_item(
        &self,
        item_id: InventoryItemId,
        name: String,
        unit: String,
        quantity: Quantity,
    ) -> Result<InventoryItem, ApplicationError> {
        let mut item = self
            .inventory_repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Inventory item not found: {}", item_id))
            })?;
        item.rename(name, unit)?;
        item.set_quantity(quantity);
        self.inventory_repository.save(&item).await?;
        Ok(item)
    }

    /// 在庫品目に入荷を記録（数量を加算）
    pub async fn receive_stock(
        &self,
        item_id: InventoryItemId,
        amount: Quantity,
    ) -> Result<InventoryItem, ApplicationError> {
        let mut item = self
            .inventory_repository
            .find_by_id(item_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Inventory item not found: {}", item_id))
            })?;
        item.receive(amount)?;
        self.inventory_repository.save(&item).await?;
        self.logger.info(
            "InventoryApplicationService",
            &format!("入荷を記録しました: {} (+{})", item_id, amount),
            Some(item_id.as_uuid()),
            None,
        );
        Ok(item)
    }
}

/// メニューアプリケーションサービス
/// メニュー項目の登録とレシピ管理のユースケースを実装する
pub struct MenuApplicationService {
    menu_item_repository: Arc<dyn MenuItemRepository>,
    inventory_repository: Arc<dyn InventoryRepository>,
    logger: Arc<dyn Logger>,
}

impl MenuApplicationService {
    pub fn new(
        menu_item_repository: Arc<dyn MenuItemRepository>,
        inventory_repository: Arc<dyn InventoryRepository>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            menu_item_repository,
            inventory_repository,
            logger,
        }
    }

    /// 新しいメニュー項目を登録
    pub async fn create_menu_item(
        &self,
        restaurant_id: RestaurantId,
        name: String,
        price: Money,
        category_id: Option<uuid::Uuid>,
    ) -> Result<MenuItem, ApplicationError> {
        let item = MenuItem::new(MenuItemId::new(), restaurant_id, name, price, category_id)?;
        self.menu_item_repository.save(&item).await?;
        self.logger.info(
            "MenuApplicationService",
            &format!("メニュー項目を登録しました: {}", item.id()),
            Some(item.id().as_uuid()),
            None,
        );
        Ok(item)
    }

    /// メニュー項目のレシピ明細を置き換える
    ///
    /// 参照されるメニュー項目と在庫品目がすべて同じ店舗に存在することを確認する。
    /// 空のレシピを保存すると、そのメニュー項目は在庫を消費しなくなる。
    pub async fn save_recipe(
        &self,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
        lines: &[RecipeLine],
    ) -> Result<(), ApplicationError> {
        self.menu_item_repository
            .find_by_id(menu_item_id)
            .await?
            .filter(|item| item.restaurant_id() == restaurant_id)
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Menu item not found: {}", menu_item_id))
            })?;

        for line in lines {
            self.inventory_repository
                .find_by_id(line.inventory_item_id())
                .await?
                .filter(|item| item.restaurant_id() == restaurant_id)
                .ok_or_else(|| {
                    ApplicationError::NotFound(format!(
                        "Inventory item not found: {}",
                        line.inventory_item_id()
                    ))
                })?;
        }

        self.menu_item_repository
            .save_recipe(menu_item_id, lines)
            .await?;
        self.logger.info(
            "MenuApplicationService",
            &format!("レシピを更新しました: {} ({}件)", menu_item_id, lines.len()),
            Some(menu_item_id.as_uuid()),
            None,
        );
        Ok(())
    }

    /// メニュー項目のレシピ明細を取得
    /// 他店舗のメニュー項目は存在しない扱いになる
    pub async fn get_recipe(
        &self,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
    ) -> Result<Vec<RecipeLine>, ApplicationError> {
        self.menu_item_repository
            .recipe_for(restaurant_id, menu_item_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Menu item not found: {}", menu_item_id))
            })
    }

    /// 指定された店舗のすべてのメニュー項目を取得
    pub async fn get_all_menu_items(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<MenuItem>, ApplicationError> {
        self.menu_item_repository
            .find_all(restaurant_id)
            .await
            .map_err(ApplicationError::from)
    }
}
