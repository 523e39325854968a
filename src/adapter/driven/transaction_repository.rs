use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    CustomerId, MenuItemId, Money, PaymentType, RestaurantId, SaleLine, Transaction, TransactionId,
};
use crate::domain::port::{RepositoryError, TransactionRepository};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL会計リポジトリ
/// MySQLデータベースを使用して会計を永続化する
pub struct MySqlTransactionRepository {
    pool: Pool<MySql>,
}

impl MySqlTransactionRepository {
    /// 新しいMySQL会計リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    fn money_from_row(row: &sqlx::mysql::MySqlRow, column: &str) -> Result<Money, RepositoryError> {
        Money::from_cents(row.get::<i64, _>(column)).map_err(|e| {
            RepositoryError::FetchFailed(format!("金額の解析に失敗しました ({}): {}", column, e))
        })
    }

    /// データベースの行から会計オブジェクトのリストを構築する
    fn build_transactions_from_rows(
        rows: Vec<sqlx::mysql::MySqlRow>,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        use std::collections::HashMap;

        let mut transaction_ids: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<&sqlx::mysql::MySqlRow>> = HashMap::new();
        for row in &rows {
            let transaction_id: String = row.get("id");
            if !groups.contains_key(&transaction_id) {
                transaction_ids.push(transaction_id.clone());
            }
            groups.entry(transaction_id).or_default().push(row);
        }

        let mut transactions = Vec::new();

        for transaction_id_str in transaction_ids {
            let transaction_rows = &groups[&transaction_id_str];
            let first_row = transaction_rows[0];

            let transaction_id = TransactionId::from_string(&transaction_id_str).map_err(|e| {
                RepositoryError::FetchFailed(format!("会計IDの解析に失敗しました: {}", e))
            })?;
            let restaurant_id =
                RestaurantId::from_string(first_row.get("restaurant_id")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("店舗IDの解析に失敗しました: {}", e))
                })?;
            let customer_id =
                CustomerId::from_string(first_row.get("customer_id")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("顧客IDの解析に失敗しました: {}", e))
                })?;
            let payment_type =
                PaymentType::from_string(first_row.get("payment_type")).map_err(|e| {
                    RepositoryError::FetchFailed(format!(
                        "支払い方法の解析に失敗しました: {}",
                        e
                    ))
                })?;

            let mut lines = Vec::new();
            for row in transaction_rows {
                if let (Some(menu_item_id_str), Some(quantity), Some(unit_price_cents)) = (
                    row.get::<Option<String>, _>("menu_item_id"),
                    row.get::<Option<u32>, _>("quantity"),
                    row.get::<Option<i64>, _>("unit_price_cents"),
                ) {
                    let menu_item_id = MenuItemId::from_string(&menu_item_id_str).map_err(|e| {
                        RepositoryError::FetchFailed(format!(
                            "メニュー項目IDの解析に失敗しました: {}",
                            e
                        ))
                    })?;
                    let unit_price = Money::from_cents(unit_price_cents).map_err(|e| {
                        RepositoryError::FetchFailed(format!("単価の解析に失敗しました: {}", e))
                    })?;
                    let line = SaleLine::new(menu_item_id, quantity, unit_price).map_err(|e| {
                        RepositoryError::FetchFailed(format!(
                            "会計明細の構築に失敗しました: {}",
                            e
                        ))
                    })?;
                    lines.push(line);
                }
            }

            transactions.push(Transaction::reconstruct(
                transaction_id,
                restaurant_id,
                customer_id,
                lines,
                Self::money_from_row(first_row, "subtotal_cents")?,
                Self::money_from_row(first_row, "discount_cents")?,
                Self::money_from_row(first_row, "tax_cents")?,
                Self::money_from_row(first_row, "total_cents")?,
                payment_type,
            ));
        }

        Ok(transactions)
    }
}

#[async_trait]
impl TransactionRepository for MySqlTransactionRepository {
    async fn save(&self, transaction: &Transaction) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 会計データをtransactionsテーブルにINSERT（会計は作成後に変更されない）
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, restaurant_id, customer_id, subtotal_cents, discount_cents, tax_cents, total_cents, payment_type)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id().to_string())
        .bind(transaction.restaurant_id().to_string())
        .bind(transaction.customer_id().to_string())
        .bind(transaction.subtotal().cents())
        .bind(transaction.discount().cents())
        .bind(transaction.tax().cents())
        .bind(transaction.total().cents())
        .bind(transaction.payment_type().to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("会計の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        for line in transaction.lines() {
            sqlx::query(
                r#"
                INSERT INTO transaction_lines (transaction_id, menu_item_id, quantity, unit_price_cents)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(transaction.id().to_string())
            .bind(line.menu_item_id().to_string())
            .bind(line.quantity())
            .bind(line.unit_price().cents())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("会計明細の保存に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;
        }

        tx.commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<Transaction>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                t.id, t.restaurant_id, t.customer_id,
                t.subtotal_cents, t.discount_cents, t.tax_cents, t.total_cents, t.payment_type,
                tl.menu_item_id, tl.quantity, tl.unit_price_cents
            FROM transactions t
            LEFT JOIN transaction_lines tl ON t.id = tl.transaction_id
            WHERE t.id = ?
            "#,
        )
        .bind(transaction_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("会計の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let transactions = Self::build_transactions_from_rows(rows)?;
        Ok(transactions.into_iter().next())
    }

    async fn find_all(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        // 作成日時の降順で並べる
        let rows = sqlx::query(
            r#"
            SELECT
                t.id, t.restaurant_id, t.customer_id,
                t.subtotal_cents, t.discount_cents, t.tax_cents, t.total_cents, t.payment_type,
                tl.menu_item_id, tl.quantity, tl.unit_price_cents
            FROM transactions t
            LEFT JOIN transaction_lines tl ON t.id = tl.transaction_id
            WHERE t.restaurant_id = ?
            ORDER BY t.created_at DESC, t.id ASC
            "#,
        )
        .bind(restaurant_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("会計一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Self::build_transactions_from_rows(rows)
    }

    fn next_identity(&self) -> TransactionId {
        TransactionId::new()
    }
}
