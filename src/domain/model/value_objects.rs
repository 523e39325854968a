use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;

/// 店舗（テナント）の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RestaurantId(Uuid);

impl RestaurantId {
    /// 新しい一意のRestaurantIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから RestaurantId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からRestaurantIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for RestaurantId {
    fn default() -> Self {
        Self::new()
    }
}

/// 注文の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(Uuid);

impl OrderId {
    /// 新しい一意のOrderIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから OrderId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からOrderIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

/// 会計（POSトランザクション）の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl TransactionId {
    /// 新しい一意のTransactionIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから TransactionId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からTransactionIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

/// メニュー項目の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuItemId(Uuid);

impl MenuItemId {
    /// 新しい一意のMenuItemIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから MenuItemId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からMenuItemIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for MenuItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// 在庫品目の一意識別子
/// 複数品目の一括ロック取得時の順序付けに使うため Ord を実装する
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InventoryItemId(Uuid);

impl InventoryItemId {
    /// 新しい一意のInventoryItemIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから InventoryItemId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からInventoryItemIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for InventoryItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for InventoryItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// 顧客の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// 新しい一意のCustomerIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから CustomerId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からCustomerIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

/// 仕入先の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplierId(Uuid);

impl SupplierId {
    /// 新しい一意のSupplierIdを生成
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// UUIDから SupplierId を作成
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// 文字列からSupplierIdを作成
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        let uuid = Uuid::parse_str(s)?;
        Ok(Self(uuid))
    }

    /// 内部のUUIDを取得
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for SupplierId {
    fn default() -> Self {
        Self::new()
    }
}

/// 在庫数量を表す値オブジェクト
/// 小数第3位までの固定小数点（ミリ単位のi64）で保持する
/// 例: 2.500 kg は millis = 2500
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quantity(i64);

impl Quantity {
    /// ミリ単位の整数から数量を作成
    /// 負の値は許可しない
    pub fn from_millis(millis: i64) -> Result<Self, DomainError> {
        if millis < 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self(millis))
    }

    /// 整数個数から数量を作成（1個 = 1.000）
    pub fn from_units(units: u32) -> Self {
        Self(units as i64 * 1000)
    }

    /// ゼロ数量
    pub fn zero() -> Self {
        Self(0)
    }

    /// ミリ単位の内部値を取得
    pub fn millis(&self) -> i64 {
        self.0
    }

    /// ゼロかどうか
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// 正の数量かどうか
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// 数量を加算（オーバーフローはエラー）
    pub fn checked_add(&self, other: Quantity) -> Result<Quantity, DomainError> {
        self.0
            .checked_add(other.0)
            .map(Quantity)
            .ok_or_else(|| DomainError::InvalidValue("数量の加算でオーバーフローしました".to_string()))
    }

    /// 数量を減算
    /// 結果が負になる場合はエラー（在庫フロアの侵害）
    pub fn checked_sub(&self, other: Quantity) -> Result<Quantity, DomainError> {
        let result = self.0 - other.0;
        if result < 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Quantity(result))
    }

    /// 販売個数を掛けて需要量を計算（オーバーフローはエラー）
    pub fn scale(&self, factor: u32) -> Result<Quantity, DomainError> {
        self.0
            .checked_mul(factor as i64)
            .map(Quantity)
            .ok_or_else(|| DomainError::InvalidValue("数量の乗算でオーバーフローしました".to_string()))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

/// 金額を表す値オブジェクト
/// 最小通貨単位（セント相当）のi64で保持する
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// 最小通貨単位の整数から金額を作成
    /// 負の金額は許可しない
    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        if cents < 0 {
            return Err(DomainError::InvalidValue(format!(
                "金額は負にできません: {}",
                cents
            )));
        }
        Ok(Self(cents))
    }

    /// ゼロ金額
    pub fn zero() -> Self {
        Self(0)
    }

    /// 最小通貨単位の内部値を取得
    pub fn cents(&self) -> i64 {
        self.0
    }

    /// 金額を加算
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        self.0
            .checked_add(other.0)
            .map(Money)
            .ok_or_else(|| DomainError::InvalidValue("金額の加算でオーバーフローしました".to_string()))
    }

    /// 金額を減算
    /// 結果が負になる場合はエラー（割引が小計を超えるなど）
    pub fn subtract(&self, other: &Money) -> Result<Money, DomainError> {
        let result = self.0 - other.0;
        if result < 0 {
            return Err(DomainError::InvalidValue(format!(
                "金額の減算結果が負になります: {} - {}",
                self.0, other.0
            )));
        }
        Ok(Money(result))
    }

    /// 金額を乗算
    pub fn multiply(&self, factor: u32) -> Money {
        Money(self.0 * factor as i64)
    }
}

/// 注文明細を表す値オブジェクト
/// 注文時点では価格を持たない（価格は会計時に確定する）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    menu_item_id: MenuItemId,
    quantity: u32,
}

impl OrderLine {
    /// 新しい注文明細を作成
    /// 数量は1以上である必要がある
    pub fn new(menu_item_id: MenuItemId, quantity: u32) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            menu_item_id,
            quantity,
        })
    }

    /// メニュー項目IDを取得
    pub fn menu_item_id(&self) -> MenuItemId {
        self.menu_item_id
    }

    /// 数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// 数量を増加させる（同じメニュー項目を追加する場合）
    /// 加算がオーバーフローする場合はエラーとし、数量は変更しない
    pub fn increase_quantity(&mut self, additional_quantity: u32) -> Result<(), DomainError> {
        if additional_quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        self.quantity = self
            .quantity
            .checked_add(additional_quantity)
            .ok_or(DomainError::InvalidQuantity)?;
        Ok(())
    }
}

/// 会計明細を表す値オブジェクト
/// 販売時点の単価を保持する
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    menu_item_id: MenuItemId,
    quantity: u32,
    unit_price: Money,
}

impl SaleLine {
    /// 新しい会計明細を作成
    /// 数量は1以上である必要がある
    pub fn new(
        menu_item_id: MenuItemId,
        quantity: u32,
        unit_price: Money,
    ) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            menu_item_id,
            quantity,
            unit_price,
        })
    }

    /// メニュー項目IDを取得
    pub fn menu_item_id(&self) -> MenuItemId {
        self.menu_item_id
    }

    /// 数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// 販売時単価を取得
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// 小計を計算（単価 × 数量）
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// 在庫照合用の注文明細に変換
    pub fn to_order_line(&self) -> Result<OrderLine, DomainError> {
        OrderLine::new(self.menu_item_id, self.quantity)
    }
}

/// レシピ明細を表す値オブジェクト
/// メニュー項目1個あたりに消費する在庫品目と数量の組
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecipeLine {
    inventory_item_id: InventoryItemId,
    quantity_per_unit: Quantity,
}

impl RecipeLine {
    /// 新しいレシピ明細を作成
    /// 1個あたり消費量は0.001以上である必要がある
    pub fn new(
        inventory_item_id: InventoryItemId,
        quantity_per_unit: Quantity,
    ) -> Result<Self, DomainError> {
        if !quantity_per_unit.is_positive() {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            inventory_item_id,
            quantity_per_unit,
        })
    }

    /// 在庫品目IDを取得
    pub fn inventory_item_id(&self) -> InventoryItemId {
        self.inventory_item_id
    }

    /// 1個あたり消費量を取得
    pub fn quantity_per_unit(&self) -> Quantity {
        self.quantity_per_unit
    }

    /// 販売個数に対する需要量を計算
    pub fn demand_for(&self, units_sold: u32) -> Result<Quantity, DomainError> {
        self.quantity_per_unit.scale(units_sold)
    }
}

/// 在庫減算の指示
/// 照合エンジンが集約した品目別の需要量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockDecrement {
    pub inventory_item_id: InventoryItemId,
    pub amount: Quantity,
}

/// 在庫不足の詳細
/// どの品目がいくつ足りなかったかを表す
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockShortfall {
    pub inventory_item_id: InventoryItemId,
    pub requested: Quantity,
    pub available: Quantity,
}

/// 注文のステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    /// 処理中（作成直後）
    Processing,
    /// 受付済み
    Accepted,
    /// 却下済み（終端状態）
    Rejected,
    /// 完了（在庫減算済み、終端状態）
    Completed,
}

impl OrderStatus {
    /// 終端状態かどうか
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Rejected)
    }

    /// このステータスから指定されたステータスへ遷移できるか
    /// 許可される遷移:
    /// - Processing → Accepted / Rejected / Completed
    /// - Accepted → Completed / Rejected
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        match self {
            OrderStatus::Processing => matches!(
                target,
                OrderStatus::Accepted | OrderStatus::Rejected | OrderStatus::Completed
            ),
            OrderStatus::Accepted => {
                matches!(target, OrderStatus::Completed | OrderStatus::Rejected)
            }
            OrderStatus::Completed | OrderStatus::Rejected => false,
        }
    }

    /// 文字列からOrderStatusを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "Processing" => Ok(OrderStatus::Processing),
            "Accepted" => Ok(OrderStatus::Accepted),
            "Rejected" => Ok(OrderStatus::Rejected),
            "Completed" => Ok(OrderStatus::Completed),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な注文ステータス: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status_str = match self {
            OrderStatus::Processing => "Processing",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::Completed => "Completed",
        };
        write!(f, "{}", status_str)
    }
}

/// 支払い方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentType {
    /// 現金
    Cash,
    /// カード
    Card,
    /// モバイル決済
    Mobile,
}

impl PaymentType {
    /// 文字列からPaymentTypeを作成
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        match s {
            "Cash" => Ok(PaymentType::Cash),
            "Card" => Ok(PaymentType::Card),
            "Mobile" => Ok(PaymentType::Mobile),
            _ => Err(DomainError::InvalidValue(format!(
                "無効な支払い方法: {}",
                s
            ))),
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentType::Cash => "Cash",
            PaymentType::Card => "Card",
            PaymentType::Mobile => "Mobile",
        };
        write!(f, "{}", s)
    }
}
