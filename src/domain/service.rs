// ドメインサービス
// 複数の集約にまたがるビジネスロジックを実装する

use crate::domain::error::DomainError;
use crate::domain::model::{
    InventoryItemId, MenuItemId, OrderLine, Quantity, RestaurantId, StockDecrement,
};
use crate::domain::port::{DecrementOutcome, InventoryRepository, MenuItemRepository};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 在庫照合の結果レポート
/// 適用された減算の一覧を保持する（減算ゼロ件での成功もあり得る）
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciliationReport {
    applied: Vec<StockDecrement>,
}

impl ReconciliationReport {
    /// 適用された減算の一覧を取得
    pub fn applied(&self) -> &[StockDecrement] {
        &self.applied
    }

    /// 減算が1件も発生しなかったかどうか
    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

/// 在庫照合サービス
/// 注文明細をレシピ経由で原材料需要に変換し、原子的な一括減算として適用する
pub struct StockReconciliationService {
    menu_item_repository: Arc<dyn MenuItemRepository>,
    inventory_repository: Arc<dyn InventoryRepository>,
}

impl StockReconciliationService {
    pub fn new(
        menu_item_repository: Arc<dyn MenuItemRepository>,
        inventory_repository: Arc<dyn InventoryRepository>,
    ) -> Self {
        Self {
            menu_item_repository,
            inventory_repository,
        }
    }

    /// 注文明細の在庫照合を実行する
    ///
    /// すべての明細の需要を品目ごとに集約したうえで、単一の原子的な減算として
    /// 適用する。同じ原材料を共有する明細の需要は合算されてから判定されるため、
    /// 明細単位の逐次減算では見逃される複合的な不足も検出される。
    /// 在庫が不足した場合は1件も減算せずにエラーを返す。
    ///
    /// # Arguments
    /// * `restaurant_id` - 店舗ID
    /// * `lines` - 注文明細（空であってはならない）
    ///
    /// # Returns
    /// * `Ok(ReconciliationReport)` - 照合成功（レシピ未登録のみなら減算ゼロ件）
    /// * `Err(DomainError::InvalidValue)` - 明細が空
    /// * `Err(DomainError::MenuItemNotFound)` - 存在しないメニュー項目を参照
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足（不足品目をすべて列挙）
    /// * `Err(DomainError::InventoryItemNotFound)` - レシピが存在しない在庫品目を参照
    pub async fn reconcile(
        &self,
        restaurant_id: RestaurantId,
        lines: &[OrderLine],
    ) -> Result<ReconciliationReport, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::InvalidValue(
                "order lines must not be empty".to_string(),
            ));
        }

        let demand = self.aggregate_demand(restaurant_id, lines).await?;

        if demand.is_empty() {
            // どの明細にもレシピが未登録: 減算なしで成功
            return Ok(ReconciliationReport { applied: vec![] });
        }

        let decrements: Vec<StockDecrement> = demand
            .into_iter()
            .map(|(inventory_item_id, amount)| StockDecrement {
                inventory_item_id,
                amount,
            })
            .collect();

        match self
            .inventory_repository
            .decrement_stock(restaurant_id, &decrements)
            .await
            .map_err(|e| DomainError::RepositoryError(format!("在庫の減算に失敗: {}", e)))?
        {
            DecrementOutcome::Applied => Ok(ReconciliationReport {
                applied: decrements,
            }),
            DecrementOutcome::Insufficient(shortfalls) => {
                Err(DomainError::InsufficientStock(shortfalls))
            }
            DecrementOutcome::ItemNotFound(item_id) => {
                Err(DomainError::InventoryItemNotFound(item_id))
            }
        }
    }

    /// 注文明細の原材料需要を品目ごとに集約する
    ///
    /// レシピが未登録のメニュー項目は需要ゼロとしてスキップする。
    /// メニュー項目が指定された店舗に存在しない場合はエラー
    /// （他店舗のメニュー項目も存在しない扱いになる）。
    async fn aggregate_demand(
        &self,
        restaurant_id: RestaurantId,
        lines: &[OrderLine],
    ) -> Result<BTreeMap<InventoryItemId, Quantity>, DomainError> {
        let mut demand: BTreeMap<InventoryItemId, Quantity> = BTreeMap::new();

        for line in lines {
            let recipe = self
                .menu_item_repository
                .recipe_for(restaurant_id, line.menu_item_id())
                .await
                .map_err(|e| DomainError::RepositoryError(format!("レシピの取得に失敗: {}", e)))?
                .ok_or(DomainError::MenuItemNotFound(line.menu_item_id()))?;

            for recipe_line in &recipe {
                let line_demand = recipe_line.demand_for(line.quantity())?;
                let entry = demand
                    .entry(recipe_line.inventory_item_id())
                    .or_insert_with(Quantity::zero);
                *entry = entry.checked_add(line_demand)?;
            }
        }

        Ok(demand)
    }
}

/// 注文明細から品目ごとの需要を集約する純粋関数
/// レシピ取得を伴わない単体テスト用の補助としても使う
pub fn aggregate_recipe_demand(
    resolved: &[(MenuItemId, u32, Vec<crate::domain::model::RecipeLine>)],
) -> Result<BTreeMap<InventoryItemId, Quantity>, DomainError> {
    let mut demand: BTreeMap<InventoryItemId, Quantity> = BTreeMap::new();
    for (_, units, recipe) in resolved {
        for recipe_line in recipe {
            let line_demand = recipe_line.demand_for(*units)?;
            let entry = demand
                .entry(recipe_line.inventory_item_id())
                .or_insert_with(Quantity::zero);
            *entry = entry.checked_add(line_demand)?;
        }
    }
    Ok(demand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        InventoryItem, MenuItem, Money, RecipeLine, StockShortfall,
    };
    use crate::domain::port::RepositoryError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// テスト用のインメモリメニューリポジトリ
    struct MockMenuItemRepository {
        items: Mutex<HashMap<MenuItemId, MenuItem>>,
        recipes: Mutex<HashMap<MenuItemId, Vec<RecipeLine>>>,
    }

    impl MockMenuItemRepository {
        fn new() -> Self {
            Self {
                items: Mutex::new(HashMap::new()),
                recipes: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl MenuItemRepository for MockMenuItemRepository {
        async fn save(&self, item: &MenuItem) -> Result<(), RepositoryError> {
            self.items.lock().unwrap().insert(item.id(), item.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            item_id: MenuItemId,
        ) -> Result<Option<MenuItem>, RepositoryError> {
            Ok(self.items.lock().unwrap().get(&item_id).cloned())
        }

        async fn find_all(
            &self,
            restaurant_id: RestaurantId,
        ) -> Result<Vec<MenuItem>, RepositoryError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .values()
                .filter(|i| i.restaurant_id() == restaurant_id)
                .cloned()
                .collect())
        }

        async fn recipe_for(
            &self,
            restaurant_id: RestaurantId,
            menu_item_id: MenuItemId,
        ) -> Result<Option<Vec<RecipeLine>>, RepositoryError> {
            match self.items.lock().unwrap().get(&menu_item_id) {
                Some(item) if item.restaurant_id() == restaurant_id => {}
                _ => return Ok(None),
            }
            Ok(Some(
                self.recipes
                    .lock()
                    .unwrap()
                    .get(&menu_item_id)
                    .cloned()
                    .unwrap_or_default(),
            ))
        }

        async fn save_recipe(
            &self,
            menu_item_id: MenuItemId,
            lines: &[RecipeLine],
        ) -> Result<(), RepositoryError> {
            self.recipes
                .lock()
                .unwrap()
                .insert(menu_item_id, lines.to_vec());
            Ok(())
        }
    }

    /// テスト用のインメモリ在庫リポジトリ
    /// decrement_stockは単一のロック下で全件チェック・全件適用を行う
    struct MockInventoryRepository {
        items: Mutex<HashMap<InventoryItemId, InventoryItem>>,
    }

    impl MockInventoryRepository {
        fn new() -> Self {
            Self {
                items: Mutex::new(HashMap::new()),
            }
        }

        fn quantity_of(&self, item_id: InventoryItemId) -> Quantity {
            self.items.lock().unwrap().get(&item_id).unwrap().quantity()
        }
    }

    #[async_trait]
    impl InventoryRepository for MockInventoryRepository {
        async fn save(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
            self.items.lock().unwrap().insert(item.id(), item.clone());
            Ok(())
        }

        async fn find_by_id(
            &self,
            item_id: InventoryItemId,
        ) -> Result<Option<InventoryItem>, RepositoryError> {
            Ok(self.items.lock().unwrap().get(&item_id).cloned())
        }

        async fn find_all(
            &self,
            restaurant_id: RestaurantId,
        ) -> Result<Vec<InventoryItem>, RepositoryError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .values()
                .filter(|i| i.restaurant_id() == restaurant_id)
                .cloned()
                .collect())
        }

        async fn find_by_max_quantity(
            &self,
            restaurant_id: RestaurantId,
            max_quantity: Quantity,
        ) -> Result<Vec<InventoryItem>, RepositoryError> {
            Ok(self
                .items
                .lock()
                .unwrap()
                .values()
                .filter(|i| i.restaurant_id() == restaurant_id && i.quantity() <= max_quantity)
                .cloned()
                .collect())
        }

        async fn decrement_stock(
            &self,
            _restaurant_id: RestaurantId,
            decrements: &[StockDecrement],
        ) -> Result<DecrementOutcome, RepositoryError> {
            let mut items = self.items.lock().unwrap();

            let mut shortfalls = vec![];
            for d in decrements {
                match items.get(&d.inventory_item_id) {
                    None => return Ok(DecrementOutcome::ItemNotFound(d.inventory_item_id)),
                    Some(item) => {
                        if item.quantity() < d.amount {
                            shortfalls.push(StockShortfall {
                                inventory_item_id: d.inventory_item_id,
                                requested: d.amount,
                                available: item.quantity(),
                            });
                        }
                    }
                }
            }

            if !shortfalls.is_empty() {
                return Ok(DecrementOutcome::Insufficient(shortfalls));
            }

            for d in decrements {
                let item = items.get_mut(&d.inventory_item_id).unwrap();
                item.try_decrement(d.amount).unwrap();
            }
            Ok(DecrementOutcome::Applied)
        }
    }

    struct Fixture {
        restaurant_id: RestaurantId,
        menu_repo: Arc<MockMenuItemRepository>,
        inventory_repo: Arc<MockInventoryRepository>,
        service: StockReconciliationService,
    }

    impl Fixture {
        fn new() -> Self {
            let menu_repo = Arc::new(MockMenuItemRepository::new());
            let inventory_repo = Arc::new(MockInventoryRepository::new());
            let service = StockReconciliationService::new(
                menu_repo.clone() as Arc<dyn MenuItemRepository>,
                inventory_repo.clone() as Arc<dyn InventoryRepository>,
            );
            Self {
                restaurant_id: RestaurantId::new(),
                menu_repo,
                inventory_repo,
                service,
            }
        }

        async fn add_inventory(&self, name: &str, units: u32) -> InventoryItemId {
            let item = InventoryItem::new(
                InventoryItemId::new(),
                self.restaurant_id,
                name.to_string(),
                "kg".to_string(),
                Quantity::from_units(units),
                None,
            )
            .unwrap();
            let id = item.id();
            self.inventory_repo.save(&item).await.unwrap();
            id
        }

        async fn add_menu_item(&self, name: &str, recipe: Vec<RecipeLine>) -> MenuItemId {
            let item = MenuItem::new(
                MenuItemId::new(),
                self.restaurant_id,
                name.to_string(),
                Money::from_cents(1000).unwrap(),
                None,
            )
            .unwrap();
            let id = item.id();
            self.menu_repo.save(&item).await.unwrap();
            self.menu_repo.save_recipe(id, &recipe).await.unwrap();
            id
        }
    }

    fn recipe_line(item_id: InventoryItemId, millis: i64) -> RecipeLine {
        RecipeLine::new(item_id, Quantity::from_millis(millis).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn 十分な在庫がある場合は全品目が減算される() {
        let f = Fixture::new();
        let cheese = f.add_inventory("チーズ", 10).await;
        let pizza = f
            .add_menu_item("ピザ", vec![recipe_line(cheese, 2_000)])
            .await;

        let lines = vec![OrderLine::new(pizza, 2).unwrap()];
        let report = f.service.reconcile(f.restaurant_id, &lines).await.unwrap();

        assert_eq!(report.applied().len(), 1);
        assert_eq!(
            f.inventory_repo.quantity_of(cheese),
            Quantity::from_units(6)
        );
    }

    #[tokio::test]
    async fn 複数明細の需要は品目ごとに合算してから判定される() {
        // チーズ10.0に対して、ピザ2枚(2.0/枚)とカルツォーネ2枚(3.0/枚)で計10.0を要求
        let f = Fixture::new();
        let cheese = f.add_inventory("チーズ", 10).await;
        let pizza = f
            .add_menu_item("ピザ", vec![recipe_line(cheese, 2_000)])
            .await;
        let calzone = f
            .add_menu_item("カルツォーネ", vec![recipe_line(cheese, 3_000)])
            .await;

        let lines = vec![
            OrderLine::new(pizza, 2).unwrap(),
            OrderLine::new(calzone, 2).unwrap(),
        ];
        f.service.reconcile(f.restaurant_id, &lines).await.unwrap();

        assert_eq!(f.inventory_repo.quantity_of(cheese), Quantity::zero());
    }

    #[tokio::test]
    async fn 合算需要が在庫を超える場合は一切減算されない() {
        // 個別には足りるが、合算すると11.0 > 10.0で不足
        let f = Fixture::new();
        let cheese = f.add_inventory("チーズ", 10).await;
        let pizza = f
            .add_menu_item("ピザ", vec![recipe_line(cheese, 2_000)])
            .await;
        let calzone = f
            .add_menu_item("カルツォーネ", vec![recipe_line(cheese, 3_000)])
            .await;

        let lines = vec![
            OrderLine::new(pizza, 4).unwrap(),
            OrderLine::new(calzone, 1).unwrap(),
        ];
        let result = f.service.reconcile(f.restaurant_id, &lines).await;

        match result {
            Err(DomainError::InsufficientStock(shortfalls)) => {
                assert_eq!(shortfalls.len(), 1);
                assert_eq!(shortfalls[0].inventory_item_id, cheese);
                assert_eq!(shortfalls[0].requested, Quantity::from_millis(11_000).unwrap());
                assert_eq!(shortfalls[0].available, Quantity::from_units(10));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // 在庫は変化しない
        assert_eq!(
            f.inventory_repo.quantity_of(cheese),
            Quantity::from_units(10)
        );
    }

    #[tokio::test]
    async fn 不足品目はすべて列挙される() {
        let f = Fixture::new();
        let cheese = f.add_inventory("チーズ", 1).await;
        let dough = f.add_inventory("生地", 1).await;
        let pizza = f
            .add_menu_item(
                "ピザ",
                vec![recipe_line(cheese, 2_000), recipe_line(dough, 2_000)],
            )
            .await;

        let lines = vec![OrderLine::new(pizza, 1).unwrap()];
        let result = f.service.reconcile(f.restaurant_id, &lines).await;

        match result {
            Err(DomainError::InsufficientStock(shortfalls)) => {
                assert_eq!(shortfalls.len(), 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn レシピ未登録のメニュー項目は減算なしで成功する() {
        let f = Fixture::new();
        let coffee = f.add_menu_item("コーヒー", vec![]).await;

        let lines = vec![OrderLine::new(coffee, 3).unwrap()];
        let report = f.service.reconcile(f.restaurant_id, &lines).await.unwrap();

        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn 存在しないメニュー項目はエラーになる() {
        let f = Fixture::new();
        let missing = MenuItemId::new();

        let lines = vec![OrderLine::new(missing, 1).unwrap()];
        let result = f.service.reconcile(f.restaurant_id, &lines).await;

        assert_eq!(result, Err(DomainError::MenuItemNotFound(missing)));
    }

    #[tokio::test]
    async fn 他店舗のメニュー項目は存在しない扱いになる() {
        let f = Fixture::new();
        let foreign_item = MenuItem::new(
            MenuItemId::new(),
            RestaurantId::new(),
            "ピザ".to_string(),
            Money::from_cents(1000).unwrap(),
            None,
        )
        .unwrap();
        let foreign = foreign_item.id();
        f.menu_repo.save(&foreign_item).await.unwrap();

        let lines = vec![OrderLine::new(foreign, 1).unwrap()];
        let result = f.service.reconcile(f.restaurant_id, &lines).await;

        assert_eq!(result, Err(DomainError::MenuItemNotFound(foreign)));
    }

    #[tokio::test]
    async fn 空の明細はエラーになる() {
        let f = Fixture::new();
        let result = f.service.reconcile(f.restaurant_id, &[]).await;
        assert!(matches!(result, Err(DomainError::InvalidValue(_))));
    }

    #[tokio::test]
    async fn レシピが存在しない在庫品目を参照するとエラーになる() {
        let f = Fixture::new();
        let missing_inventory = InventoryItemId::new();
        let pizza = f
            .add_menu_item("ピザ", vec![recipe_line(missing_inventory, 1_000)])
            .await;

        let lines = vec![OrderLine::new(pizza, 1).unwrap()];
        let result = f.service.reconcile(f.restaurant_id, &lines).await;

        assert_eq!(
            result,
            Err(DomainError::InventoryItemNotFound(missing_inventory))
        );
    }

    #[test]
    fn 純粋関数による需要集約は同一品目を合算する() {
        let item = InventoryItemId::new();
        let menu_a = MenuItemId::new();
        let menu_b = MenuItemId::new();
        let resolved = vec![
            (menu_a, 2, vec![recipe_line(item, 2_000)]),
            (menu_b, 3, vec![recipe_line(item, 1_000)]),
        ];

        let demand = aggregate_recipe_demand(&resolved).unwrap();

        assert_eq!(demand.len(), 1);
        assert_eq!(demand[&item], Quantity::from_millis(7_000).unwrap());
    }
}
