use crate::application::ApplicationError;
use crate::domain::model::{Order, OrderId, OrderStatus, RestaurantId};
use crate::domain::port::OrderRepository;
use std::sync::Arc;

/// 注文クエリサービス
/// 読み取り専用の注文操作を提供する
pub struct OrderQueryService {
    order_repository: Arc<dyn OrderRepository>,
}

impl OrderQueryService {
    /// 新しい注文クエリサービスを作成
    ///
    /// # Arguments
    /// * `order_repository` - 注文リポジトリ
    pub fn new(order_repository: Arc<dyn OrderRepository>) -> Self {
        Self { order_repository }
    }

    /// 注文IDで注文を取得
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が見つからなかった
    /// * `Err(ApplicationError)` - 取得失敗
    pub async fn get_order_by_id(&self, id: OrderId) -> Result<Option<Order>, ApplicationError> {
        self.order_repository
            .find_by_id(id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定された店舗のすべての注文を取得
    /// 作成日時の降順で並べて返す
    pub async fn get_all_orders(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, ApplicationError> {
        self.order_repository
            .find_all(restaurant_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 指定された店舗・ステータスの注文を取得
    /// 作成日時の降順で並べて返す
    pub async fn get_orders_by_status(
        &self,
        restaurant_id: RestaurantId,
        status: OrderStatus,
    ) -> Result<Vec<Order>, ApplicationError> {
        self.order_repository
            .find_by_status(restaurant_id, status)
            .await
            .map_err(ApplicationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CustomerId, MenuItemId};
    use crate::domain::port::RepositoryError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    // テスト用のモックリポジトリ
    struct MockOrderRepository {
        orders: Mutex<HashMap<OrderId, Order>>,
    }

    impl MockOrderRepository {
        fn new() -> Self {
            Self {
                orders: Mutex::new(HashMap::new()),
            }
        }

        fn add_order(&self, order: Order) {
            self.orders.lock().unwrap().insert(order.id(), order);
        }
    }

    #[async_trait]
    impl OrderRepository for MockOrderRepository {
        async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
            self.orders.lock().unwrap().insert(order.id(), order.clone());
            Ok(())
        }

        async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
            Ok(self.orders.lock().unwrap().get(&order_id).cloned())
        }

        async fn find_all(
            &self,
            restaurant_id: RestaurantId,
        ) -> Result<Vec<Order>, RepositoryError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .values()
                .filter(|o| o.restaurant_id() == restaurant_id)
                .cloned()
                .collect())
        }

        async fn find_by_status(
            &self,
            restaurant_id: RestaurantId,
            status: OrderStatus,
        ) -> Result<Vec<Order>, RepositoryError> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .values()
                .filter(|o| o.restaurant_id() == restaurant_id && o.status() == status)
                .cloned()
                .collect())
        }

        async fn delete(&self, order_id: OrderId) -> Result<(), RepositoryError> {
            self.orders.lock().unwrap().remove(&order_id);
            Ok(())
        }

        fn next_identity(&self) -> OrderId {
            OrderId::new()
        }
    }

    fn sample_order(restaurant_id: RestaurantId) -> Order {
        let mut order = Order::new(
            OrderId::new(),
            restaurant_id,
            CustomerId::new(),
            Some(4),
        );
        order.add_item(MenuItemId::new(), 1).unwrap();
        order
    }

    #[tokio::test]
    async fn 注文idで注文を取得できる() {
        let repo = Arc::new(MockOrderRepository::new());
        let restaurant_id = RestaurantId::new();
        let order = sample_order(restaurant_id);
        let order_id = order.id();
        repo.add_order(order);

        let service = OrderQueryService::new(repo);
        let found = service.get_order_by_id(order_id).await.unwrap();

        assert!(found.is_some());
        assert_eq!(found.unwrap().id(), order_id);
    }

    #[tokio::test]
    async fn 存在しない注文の取得はnoneを返す() {
        let repo = Arc::new(MockOrderRepository::new());
        let service = OrderQueryService::new(repo);
        let found = service.get_order_by_id(OrderId::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn 店舗の注文のみが一覧に含まれる() {
        let repo = Arc::new(MockOrderRepository::new());
        let restaurant_a = RestaurantId::new();
        let restaurant_b = RestaurantId::new();
        repo.add_order(sample_order(restaurant_a));
        repo.add_order(sample_order(restaurant_a));
        repo.add_order(sample_order(restaurant_b));

        let service = OrderQueryService::new(repo);
        let orders = service.get_all_orders(restaurant_a).await.unwrap();

        assert_eq!(orders.len(), 2);
    }

    #[tokio::test]
    async fn ステータスで注文を絞り込める() {
        let repo = Arc::new(MockOrderRepository::new());
        let restaurant_id = RestaurantId::new();
        let mut accepted = sample_order(restaurant_id);
        accepted.transition_to(OrderStatus::Accepted).unwrap();
        repo.add_order(accepted);
        repo.add_order(sample_order(restaurant_id));

        let service = OrderQueryService::new(repo);
        let orders = service
            .get_orders_by_status(restaurant_id, OrderStatus::Accepted)
            .await
            .unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].status(), OrderStatus::Accepted);
    }
}
