use crate::domain::error::DomainError;
use crate::domain::model::{CustomerId, MenuItemId, OrderId, OrderLine, OrderStatus, RestaurantId};

/// Order集約
/// 注文のライフサイクルを管理し、ステータス遷移ルールを適用する
/// ステータスの変更は遷移メソッド経由のみ許可される
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    restaurant_id: RestaurantId,
    customer_id: CustomerId,
    table_number: Option<u32>,
    lines: Vec<OrderLine>,
    status: OrderStatus,
}

impl Order {
    /// 新しい注文を作成
    /// 初期ステータスはProcessing
    pub fn new(
        id: OrderId,
        restaurant_id: RestaurantId,
        customer_id: CustomerId,
        table_number: Option<u32>,
    ) -> Self {
        Self {
            id,
            restaurant_id,
            customer_id,
            table_number,
            lines: Vec::new(),
            status: OrderStatus::Processing,
        }
    }

    /// データベースから取得したデータで注文を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: OrderId,
        restaurant_id: RestaurantId,
        customer_id: CustomerId,
        table_number: Option<u32>,
        lines: Vec<OrderLine>,
        status: OrderStatus,
    ) -> Self {
        Self {
            id,
            restaurant_id,
            customer_id,
            table_number,
            lines,
            status,
        }
    }

    /// 注文IDを取得
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// 店舗IDを取得
    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// 顧客IDを取得
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// テーブル番号を取得
    pub fn table_number(&self) -> Option<u32> {
        self.table_number
    }

    /// 注文明細のリストを取得
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// 注文ステータスを取得
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// メニュー項目を注文に追加
    /// 同じメニュー項目が既に存在する場合は数量を合算する
    pub fn add_item(&mut self, menu_item_id: MenuItemId, quantity: u32) -> Result<(), DomainError> {
        // 作成直後以外の注文への明細追加は許可しない
        if self.status != OrderStatus::Processing {
            return Err(DomainError::InvalidValue(format!(
                "明細を追加できるのはProcessing状態のみです（現在: {}）",
                self.status
            )));
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|line| line.menu_item_id() == menu_item_id)
        {
            existing.increase_quantity(quantity)?;
        } else {
            let line = OrderLine::new(menu_item_id, quantity)?;
            self.lines.push(line);
        }

        Ok(())
    }

    /// 指定されたステータスへ遷移する
    /// 在庫照合はここでは行わない。Completedへの遷移時の照合は
    /// アプリケーションサービスが遷移の永続化前に実行する
    ///
    /// # Returns
    /// * `Ok(())` - 遷移成功
    /// * `Err(DomainError::InvalidTransition)` - 許可されない遷移
    pub fn transition_to(&mut self, target: OrderStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}
