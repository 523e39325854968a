// 統合テスト用のインメモリリポジトリとフィクスチャ
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use restaurant_order_management::application::service::inventory_query_service::InventoryQueryService;
use restaurant_order_management::application::service::order_query_service::OrderQueryService;
use restaurant_order_management::application::service::{
    InventoryApplicationService, MenuApplicationService, OrderApplicationService,
    TransactionApplicationService,
};
use restaurant_order_management::domain::model::{
    CustomerId, InventoryItem, InventoryItemId, MenuItem, MenuItemId, Money, Order, OrderId,
    OrderStatus, Quantity, RecipeLine, RestaurantId, StockDecrement, StockShortfall, Transaction,
    TransactionId,
};
use restaurant_order_management::domain::port::{
    DecrementOutcome, InventoryRepository, Logger, MenuItemRepository, NotificationError,
    NotificationMessage, NotificationService, OrderRepository, RepositoryError,
    TransactionRepository,
};
use restaurant_order_management::domain::service::StockReconciliationService;

pub struct InMemoryInventoryRepository {
    items: Mutex<HashMap<InventoryItemId, InventoryItem>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    pub fn stock_of(&self, item_id: InventoryItemId) -> i64 {
        let items = self.items.lock().unwrap();
        items[&item_id].quantity().millis()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn save(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
        let mut items = self.items.lock().unwrap();
        items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        item_id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, RepositoryError> {
        let items = self.items.lock().unwrap();
        Ok(items.get(&item_id).cloned())
    }

    async fn find_all(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        let items = self.items.lock().unwrap();
        let mut result: Vec<InventoryItem> = items
            .values()
            .filter(|item| item.restaurant_id() == restaurant_id)
            .cloned()
            .collect();
        result.sort_by_key(|item| item.id());
        Ok(result)
    }

    async fn find_by_max_quantity(
        &self,
        restaurant_id: RestaurantId,
        max_quantity: Quantity,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        let items = self.items.lock().unwrap();
        let mut result: Vec<InventoryItem> = items
            .values()
            .filter(|item| item.restaurant_id() == restaurant_id && item.quantity() <= max_quantity)
            .cloned()
            .collect();
        result.sort_by_key(|item| item.id());
        Ok(result)
    }

    async fn decrement_stock(
        &self,
        restaurant_id: RestaurantId,
        decrements: &[StockDecrement],
    ) -> Result<DecrementOutcome, RepositoryError> {
        // ロックを握ったままチェックと適用を行うことで原子性を保証する
        let mut items = self.items.lock().unwrap();

        let mut shortfalls = Vec::new();
        for decrement in decrements {
            let item = match items.get(&decrement.inventory_item_id) {
                Some(item) if item.restaurant_id() == restaurant_id => item,
                _ => return Ok(DecrementOutcome::ItemNotFound(decrement.inventory_item_id)),
            };
            if !item.has_available_stock(decrement.amount) {
                shortfalls.push(StockShortfall {
                    inventory_item_id: decrement.inventory_item_id,
                    requested: decrement.amount,
                    available: item.quantity(),
                });
            }
        }
        if !shortfalls.is_empty() {
            return Ok(DecrementOutcome::Insufficient(shortfalls));
        }

        for decrement in decrements {
            let item = items
                .get_mut(&decrement.inventory_item_id)
                .ok_or_else(|| RepositoryError::OperationFailed("item vanished".to_string()))?;
            item.try_decrement(decrement.amount)
                .map_err(|e| RepositoryError::OperationFailed(e.to_string()))?;
        }
        Ok(DecrementOutcome::Applied)
    }
}

pub struct InMemoryMenuItemRepository {
    items: Mutex<HashMap<MenuItemId, MenuItem>>,
    recipes: Mutex<HashMap<MenuItemId, Vec<RecipeLine>>>,
}

impl InMemoryMenuItemRepository {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            recipes: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl MenuItemRepository for InMemoryMenuItemRepository {
    async fn save(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        let mut items = self.items.lock().unwrap();
        items.insert(item.id(), item.clone());
        Ok(())
    }

    async fn find_by_id(&self, item_id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let items = self.items.lock().unwrap();
        Ok(items.get(&item_id).cloned())
    }

    async fn find_all(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<MenuItem>, RepositoryError> {
        let items = self.items.lock().unwrap();
        let mut result: Vec<MenuItem> = items
            .values()
            .filter(|item| item.restaurant_id() == restaurant_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(result)
    }

    async fn recipe_for(
        &self,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
    ) -> Result<Option<Vec<RecipeLine>>, RepositoryError> {
        let items = self.items.lock().unwrap();
        match items.get(&menu_item_id) {
            Some(item) if item.restaurant_id() == restaurant_id => {}
            _ => return Ok(None),
        }
        let recipes = self.recipes.lock().unwrap();
        Ok(Some(recipes.get(&menu_item_id).cloned().unwrap_or_default()))
    }

    async fn save_recipe(
        &self,
        menu_item_id: MenuItemId,
        lines: &[RecipeLine],
    ) -> Result<(), RepositoryError> {
        let mut recipes = self.recipes.lock().unwrap();
        recipes.insert(menu_item_id, lines.to_vec());
        Ok(())
    }
}

pub struct InMemoryOrderRepository {
    orders: Mutex<HashMap<OrderId, Order>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut orders = self.orders.lock().unwrap();
        orders.insert(order.id(), order.clone());
        Ok(())
    }

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.get(&order_id).cloned())
    }

    async fn find_all(&self, restaurant_id: RestaurantId) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .values()
            .filter(|order| order.restaurant_id() == restaurant_id)
            .cloned()
            .collect())
    }

    async fn find_by_status(
        &self,
        restaurant_id: RestaurantId,
        status: OrderStatus,
    ) -> Result<Vec<Order>, RepositoryError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders
            .values()
            .filter(|order| order.restaurant_id() == restaurant_id && order.status() == status)
            .cloned()
            .collect())
    }

    async fn delete(&self, order_id: OrderId) -> Result<(), RepositoryError> {
        let mut orders = self.orders.lock().unwrap();
        orders.remove(&order_id);
        Ok(())
    }

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}

pub struct InMemoryTransactionRepository {
    transactions: Mutex<HashMap<TransactionId, Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self {
            transactions: Mutex::new(HashMap::new()),
        }
    }

    pub fn count(&self) -> usize {
        self.transactions.lock().unwrap().len()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn save(&self, transaction: &Transaction) -> Result<(), RepositoryError> {
        let mut transactions = self.transactions.lock().unwrap();
        transactions.insert(transaction.id(), transaction.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<Transaction>, RepositoryError> {
        let transactions = self.transactions.lock().unwrap();
        Ok(transactions.get(&transaction_id).cloned())
    }

    async fn find_all(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        let transactions = self.transactions.lock().unwrap();
        Ok(transactions
            .values()
            .filter(|tx| tx.restaurant_id() == restaurant_id)
            .cloned()
            .collect())
    }

    fn next_identity(&self) -> TransactionId {
        TransactionId::new()
    }
}

pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn info(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn warn(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn error(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
}

pub struct NullNotifier;

#[async_trait]
impl NotificationService for NullNotifier {
    async fn send(
        &self,
        _customer_id: CustomerId,
        _message: NotificationMessage,
    ) -> Result<(), NotificationError> {
        Ok(())
    }
}

/// インメモリリポジトリで結線したサービス一式
pub struct TestContext {
    pub restaurant_id: RestaurantId,
    pub inventory_repository: Arc<InMemoryInventoryRepository>,
    pub menu_item_repository: Arc<InMemoryMenuItemRepository>,
    pub order_repository: Arc<InMemoryOrderRepository>,
    pub transaction_repository: Arc<InMemoryTransactionRepository>,
    pub order_service: Arc<OrderApplicationService>,
    pub transaction_service: Arc<TransactionApplicationService>,
    pub inventory_service: Arc<InventoryApplicationService>,
    pub menu_service: Arc<MenuApplicationService>,
    pub order_query_service: Arc<OrderQueryService>,
    pub inventory_query_service: Arc<InventoryQueryService>,
}

impl TestContext {
    pub fn new() -> Self {
        let inventory_repository = Arc::new(InMemoryInventoryRepository::new());
        let menu_item_repository = Arc::new(InMemoryMenuItemRepository::new());
        let order_repository = Arc::new(InMemoryOrderRepository::new());
        let transaction_repository = Arc::new(InMemoryTransactionRepository::new());
        let logger = Arc::new(NullLogger);

        let reconciliation_service = Arc::new(StockReconciliationService::new(
            menu_item_repository.clone(),
            inventory_repository.clone(),
        ));
        let order_service = Arc::new(OrderApplicationService::new(
            order_repository.clone(),
            menu_item_repository.clone(),
            reconciliation_service.clone(),
            Arc::new(NullNotifier),
            logger.clone(),
        ));
        let transaction_service = Arc::new(TransactionApplicationService::new(
            transaction_repository.clone(),
            menu_item_repository.clone(),
            reconciliation_service,
            logger.clone(),
        ));
        let inventory_service = Arc::new(InventoryApplicationService::new(
            inventory_repository.clone(),
            logger.clone(),
        ));
        let menu_service = Arc::new(MenuApplicationService::new(
            menu_item_repository.clone(),
            inventory_repository.clone(),
            logger,
        ));
        let order_query_service = Arc::new(OrderQueryService::new(order_repository.clone()));
        let inventory_query_service =
            Arc::new(InventoryQueryService::new(inventory_repository.clone()));

        Self {
            restaurant_id: RestaurantId::new(),
            inventory_repository,
            menu_item_repository,
            order_repository,
            transaction_repository,
            order_service,
            transaction_service,
            inventory_service,
            menu_service,
            order_query_service,
            inventory_query_service,
        }
    }

    pub async fn add_inventory(&self, name: &str, quantity_millis: i64) -> InventoryItemId {
        let item = InventoryItem::new(
            InventoryItemId::new(),
            self.restaurant_id,
            name.to_string(),
            "kg".to_string(),
            Quantity::from_millis(quantity_millis).unwrap(),
            None,
        )
        .unwrap();
        let item_id = item.id();
        self.inventory_repository.save(&item).await.unwrap();
        item_id
    }

    pub async fn add_menu_item(
        &self,
        name: &str,
        price_cents: i64,
        recipe: &[(InventoryItemId, i64)],
    ) -> MenuItemId {
        let item = MenuItem::new(
            MenuItemId::new(),
            self.restaurant_id,
            name.to_string(),
            Money::from_cents(price_cents).unwrap(),
            None,
        )
        .unwrap();
        let menu_item_id = item.id();
        self.menu_item_repository.save(&item).await.unwrap();

        let lines: Vec<RecipeLine> = recipe
            .iter()
            .map(|(item_id, millis)| {
                RecipeLine::new(*item_id, Quantity::from_millis(*millis).unwrap()).unwrap()
            })
            .collect();
        self.menu_item_repository
            .save_recipe(menu_item_id, &lines)
            .await
            .unwrap();
        menu_item_id
    }

    pub async fn place_order(&self, items: &[(MenuItemId, u32)]) -> Order {
        self.order_service
            .create_order(self.restaurant_id, CustomerId::new(), Some(1), items)
            .await
            .unwrap()
    }
}
