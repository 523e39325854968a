// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{
    InventoryItem, InventoryItemId, MenuItem, MenuItemId, Order, OrderId, OrderStatus, Quantity,
    RecipeLine, RestaurantId, StockDecrement, StockShortfall, Transaction, TransactionId,
};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// ログレベル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// リポジトリ操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// 一括在庫減算の結果
/// ストレージ層がすべて適用したか、まったく適用しなかったかを表す
#[derive(Debug, Clone, PartialEq)]
pub enum DecrementOutcome {
    /// すべての減算が適用された
    Applied,
    /// 1件以上の在庫不足により、1件も適用されなかった
    /// 不足したすべての品目を保持する
    Insufficient(Vec<StockShortfall>),
    /// 参照された在庫品目が存在せず、1件も適用されなかった
    ItemNotFound(InventoryItemId),
}

/// 在庫リポジトリトレイト
/// 在庫品目集約の永続化と、原子的な一括減算を抽象化する
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// 在庫品目を保存する
    ///
    /// # Arguments
    /// * `item` - 保存する在庫品目
    ///
    /// # Returns
    /// * `Ok(())` - 保存成功
    /// * `Err(RepositoryError)` - 保存失敗
    async fn save(&self, item: &InventoryItem) -> Result<(), RepositoryError>;

    /// 在庫品目IDで在庫品目を検索する
    ///
    /// # Returns
    /// * `Ok(Some(InventoryItem))` - 在庫品目が見つかった
    /// * `Ok(None)` - 在庫品目が見つからなかった
    /// * `Err(RepositoryError)` - 検索失敗
    async fn find_by_id(
        &self,
        item_id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, RepositoryError>;

    /// 指定された店舗のすべての在庫品目を取得する
    /// 在庫品目IDの昇順で並べて返す
    async fn find_all(&self, restaurant_id: RestaurantId)
        -> Result<Vec<InventoryItem>, RepositoryError>;

    /// 指定された店舗で最大在庫数量以下の在庫品目を取得する（低在庫の検出）
    /// 在庫品目IDの昇順で並べて返す
    async fn find_by_max_quantity(
        &self,
        restaurant_id: RestaurantId,
        max_quantity: Quantity,
    ) -> Result<Vec<InventoryItem>, RepositoryError>;

    /// 一括在庫減算を原子的に適用する
    ///
    /// 実装はすべての対象行に対するチェックと書き込みを1つの不可分な単位として
    /// 実行しなければならない。同じ品目への並行減算はストレージ層で直列化され、
    /// どの品目も数量が負になることはなく、部分適用は観測されない。
    /// 複数プロセスが同一ストレージに対して動く場合もこの保証は維持される
    /// （プロセス内ロックでは不十分）。
    ///
    /// # Arguments
    /// * `restaurant_id` - 店舗ID
    /// * `decrements` - 品目ごとに集約済みの減算指示（品目IDは重複しない）
    ///
    /// # Returns
    /// * `Ok(DecrementOutcome::Applied)` - 全件適用
    /// * `Ok(DecrementOutcome::Insufficient)` - 在庫不足により全件不適用
    /// * `Ok(DecrementOutcome::ItemNotFound)` - 品目不在により全件不適用
    /// * `Err(RepositoryError)` - ストレージ障害
    async fn decrement_stock(
        &self,
        restaurant_id: RestaurantId,
        decrements: &[StockDecrement],
    ) -> Result<DecrementOutcome, RepositoryError>;
}

/// メニューリポジトリトレイト
/// メニュー項目集約とレシピ明細の永続化を抽象化する
#[async_trait]
pub trait MenuItemRepository: Send + Sync {
    /// メニュー項目を保存する
    async fn save(&self, item: &MenuItem) -> Result<(), RepositoryError>;

    /// メニュー項目IDでメニュー項目を検索する
    async fn find_by_id(&self, item_id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError>;

    /// 指定された店舗のすべてのメニュー項目を取得する
    /// 表示名の昇順で並べて返す
    async fn find_all(&self, restaurant_id: RestaurantId) -> Result<Vec<MenuItem>, RepositoryError>;

    /// メニュー項目のレシピ明細を取得する（レシピリゾルバー）
    ///
    /// 指定された店舗に属するメニュー項目のみを対象とする。
    /// 他店舗のメニュー項目は存在しないものとして扱う。
    ///
    /// # Returns
    /// * `Ok(None)` - メニュー項目が指定された店舗に存在しない
    /// * `Ok(Some(vec![]))` - メニュー項目は存在するがレシピ明細がない（有効な状態）
    /// * `Ok(Some(lines))` - レシピ明細のリスト
    /// * `Err(RepositoryError)` - 検索失敗
    async fn recipe_for(
        &self,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
    ) -> Result<Option<Vec<RecipeLine>>, RepositoryError>;

    /// メニュー項目のレシピ明細を置き換える
    async fn save_recipe(
        &self,
        menu_item_id: MenuItemId,
        lines: &[RecipeLine],
    ) -> Result<(), RepositoryError>;
}

/// 注文リポジトリトレイト
/// 注文集約の永続化を抽象化する
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 注文を保存する（ヘッダーと明細をまとめて保存）
    async fn save(&self, order: &Order) -> Result<(), RepositoryError>;

    /// 注文IDで注文を検索する
    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// 指定された店舗のすべての注文を取得する
    /// 作成日時の降順で並べて返す
    async fn find_all(&self, restaurant_id: RestaurantId) -> Result<Vec<Order>, RepositoryError>;

    /// 指定された店舗・ステータスの注文を取得する
    /// 作成日時の降順で並べて返す
    async fn find_by_status(
        &self,
        restaurant_id: RestaurantId,
        status: OrderStatus,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// 注文を削除する
    /// 完了済み注文を削除しても在庫は戻らない（補償処理は存在しない）
    async fn delete(&self, order_id: OrderId) -> Result<(), RepositoryError>;

    /// 新しい一意の注文IDを生成する
    fn next_identity(&self) -> OrderId;
}

/// 会計リポジトリトレイト
/// 会計集約の永続化を抽象化する
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// 会計を保存する（ヘッダーと明細をまとめて保存）
    async fn save(&self, transaction: &Transaction) -> Result<(), RepositoryError>;

    /// 会計IDで会計を検索する
    async fn find_by_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<Transaction>, RepositoryError>;

    /// 指定された店舗のすべての会計を取得する
    /// 作成日時の降順で並べて返す
    async fn find_all(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Transaction>, RepositoryError>;

    /// 新しい一意の会計IDを生成する
    fn next_identity(&self) -> TransactionId;
}

/// 通知エラー
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// 通知メッセージ
#[derive(Debug, Clone)]
pub struct NotificationMessage {
    pub title: String,
    pub body: String,
    pub payload: serde_json::Value,
}

/// 通知サービストレイト
/// ステータス変更などの通知送信を抽象化するポート
/// 呼び出し側はfire-and-forgetで扱い、失敗を業務処理に波及させない
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// 顧客宛に通知を送信する
    async fn send(
        &self,
        customer_id: crate::domain::model::CustomerId,
        message: NotificationMessage,
    ) -> Result<(), NotificationError>;
}
