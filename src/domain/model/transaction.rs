use crate::domain::error::DomainError;
use crate::domain::model::{CustomerId, Money, PaymentType, RestaurantId, SaleLine, TransactionId};

/// 税率の分母（ベーシスポイント: 1bp = 0.01%）
const BASIS_POINTS: i64 = 10_000;

/// 会計集約
/// POSで記録された1回の販売を表す
/// 小計・割引・税・合計は作成時に明細から計算され、以後変更されない
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TransactionId,
    restaurant_id: RestaurantId,
    customer_id: CustomerId,
    lines: Vec<SaleLine>,
    subtotal: Money,
    discount: Money,
    tax: Money,
    total: Money,
    payment_type: PaymentType,
}

impl Transaction {
    /// 新しい会計を作成
    /// 小計 = Σ(単価 × 数量)、税 = (小計 - 割引) × 税率、
    /// 合計 = 小計 - 割引 + 税
    ///
    /// # Arguments
    /// * `id` - 会計ID
    /// * `restaurant_id` - 店舗ID
    /// * `customer_id` - 顧客ID
    /// * `lines` - 会計明細（1件以上）
    /// * `discount` - 割引額（小計以下であること）
    /// * `tax_rate_basis_points` - 税率（ベーシスポイント、例: 10% = 1000）
    /// * `payment_type` - 支払い方法
    pub fn new(
        id: TransactionId,
        restaurant_id: RestaurantId,
        customer_id: CustomerId,
        lines: Vec<SaleLine>,
        discount: Money,
        tax_rate_basis_points: u32,
        payment_type: PaymentType,
    ) -> Result<Self, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::InvalidValue(
                "会計明細が空です".to_string(),
            ));
        }

        let subtotal = lines
            .iter()
            .map(|line| line.subtotal())
            .try_fold(Money::zero(), |acc, amount| acc.add(&amount))?;

        // 割引が小計を超える会計は作成できない
        let taxable = subtotal.subtract(&discount)?;

        let tax_cents = taxable
            .cents()
            .checked_mul(tax_rate_basis_points as i64)
            .ok_or_else(|| {
                DomainError::InvalidValue("税額の計算でオーバーフローしました".to_string())
            })?
            / BASIS_POINTS;
        let tax = Money::from_cents(tax_cents)?;
        let total = taxable.add(&tax)?;

        Ok(Self {
            id,
            restaurant_id,
            customer_id,
            lines,
            subtotal,
            discount,
            tax,
            total,
            payment_type,
        })
    }

    /// データベースから取得したデータで会計を再構築
    /// 金額は保存時の値をそのまま使う（再計算しない）
    #[allow(clippy::too_many_arguments)]
    pub fn reconstruct(
        id: TransactionId,
        restaurant_id: RestaurantId,
        customer_id: CustomerId,
        lines: Vec<SaleLine>,
        subtotal: Money,
        discount: Money,
        tax: Money,
        total: Money,
        payment_type: PaymentType,
    ) -> Self {
        Self {
            id,
            restaurant_id,
            customer_id,
            lines,
            subtotal,
            discount,
            tax,
            total,
            payment_type,
        }
    }

    /// 会計IDを取得
    pub fn id(&self) -> TransactionId {
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

    /// 会計明細のリストを取得
    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    /// 小計を取得
    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// 割引額を取得
    pub fn discount(&self) -> Money {
        self.discount
    }

    /// 税額を取得
    pub fn tax(&self) -> Money {
        self.tax
    }

    /// 合計金額を取得
    pub fn total(&self) -> Money {
        self.total
    }

    /// 支払い方法を取得
    pub fn payment_type(&self) -> PaymentType {
        self.payment_type
    }
}
