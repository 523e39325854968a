use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    InventoryItem, InventoryItemId, Quantity, RestaurantId, StockDecrement, StockShortfall,
    SupplierId,
};
use crate::domain::port::{DecrementOutcome, InventoryRepository, RepositoryError};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL在庫リポジトリ
/// MySQLデータベースを使用して在庫品目を永続化する
///
/// 一括減算はトランザクション内の行ロック（SELECT ... FOR UPDATE）で実現する。
/// 複数プロセスが同一データベースに接続していても原子性が保たれる。
#[derive(Clone)]
pub struct MySqlInventoryRepository {
    pool: Pool<MySql>,
}

impl MySqlInventoryRepository {
    /// 新しいMySQL在庫リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から在庫品目を再構築する
    fn build_item_from_row(row: &sqlx::mysql::MySqlRow) -> Result<InventoryItem, RepositoryError> {
        let item_id = InventoryItemId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("在庫品目IDの解析に失敗しました: {}", e))
        })?;
        let restaurant_id = RestaurantId::from_string(row.get("restaurant_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("店舗IDの解析に失敗しました: {}", e))
        })?;
        let supplier_id = row
            .get::<Option<String>, _>("supplier_id")
            .map(|s| SupplierId::from_string(&s))
            .transpose()
            .map_err(|e| {
                RepositoryError::FetchFailed(format!("仕入先IDの解析に失敗しました: {}", e))
            })?;
        let quantity = Quantity::from_millis(row.get::<i64, _>("quantity_millis")).map_err(|e| {
            RepositoryError::FetchFailed(format!("在庫数量の解析に失敗しました: {}", e))
        })?;

        Ok(InventoryItem::reconstruct(
            item_id,
            restaurant_id,
            row.get("name"),
            row.get("unit"),
            quantity,
            supplier_id,
        ))
    }
}

#[async_trait]
impl InventoryRepository for MySqlInventoryRepository {
    async fn save(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
        // 在庫品目データをinventory_itemsテーブルにUPSERT
        sqlx::query(
            r#"
            INSERT INTO inventory_items (id, restaurant_id, name, unit, quantity_millis, supplier_id)
            VALUES (?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                unit = VALUES(unit),
                quantity_millis = VALUES(quantity_millis),
                supplier_id = VALUES(supplier_id)
            "#,
        )
        .bind(item.id().to_string())
        .bind(item.restaurant_id().to_string())
        .bind(item.name())
        .bind(item.unit())
        .bind(item.quantity().millis())
        .bind(item.supplier_id().map(|s| s.to_string()))
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫品目の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        item_id: InventoryItemId,
    ) -> Result<Option<InventoryItem>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, restaurant_id, name, unit, quantity_millis, supplier_id FROM inventory_items WHERE id = ?"
        )
        .bind(item_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫品目の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_item_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        // 在庫品目IDの昇順で並べる
        let rows = sqlx::query(
            "SELECT id, restaurant_id, name, unit, quantity_millis, supplier_id FROM inventory_items WHERE restaurant_id = ? ORDER BY id ASC"
        )
        .bind(restaurant_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫品目一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(Self::build_item_from_row(&row)?);
        }
        Ok(items)
    }

    async fn find_by_max_quantity(
        &self,
        restaurant_id: RestaurantId,
        max_quantity: Quantity,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        // 指定された最大在庫数量以下の在庫品目を取得
        // 在庫品目IDの昇順で並べる
        let rows = sqlx::query(
            "SELECT id, restaurant_id, name, unit, quantity_millis, supplier_id FROM inventory_items WHERE restaurant_id = ? AND quantity_millis <= ? ORDER BY id ASC"
        )
        .bind(restaurant_id.to_string())
        .bind(max_quantity.millis())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("在庫フィルタリングの取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(Self::build_item_from_row(&row)?);
        }
        Ok(items)
    }

    async fn decrement_stock(
        &self,
        restaurant_id: RestaurantId,
        decrements: &[StockDecrement],
    ) -> Result<DecrementOutcome, RepositoryError> {
        if decrements.is_empty() {
            return Ok(DecrementOutcome::Applied);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // デッドロック回避のため、品目IDの昇順でロックを取得する
        let mut ordered: Vec<&StockDecrement> = decrements.iter().collect();
        ordered.sort_by_key(|d| d.inventory_item_id);

        // 全対象行をロックし、下限チェックをすべて通過した場合のみ書き込む
        let mut shortfalls: Vec<StockShortfall> = Vec::new();
        for decrement in &ordered {
            let row = sqlx::query(
                "SELECT quantity_millis FROM inventory_items WHERE id = ? AND restaurant_id = ? FOR UPDATE"
            )
            .bind(decrement.inventory_item_id.to_string())
            .bind(restaurant_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("在庫行のロックに失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

            let quantity_millis = match row {
                Some(row) => row.get::<i64, _>("quantity_millis"),
                None => {
                    // ロールバックして1件も適用しない
                    tx.rollback().await.map_err(|e| {
                        RepositoryError::OperationFailed(format!(
                            "トランザクションのロールバックに失敗しました: {}",
                            e
                        ))
                    })?;
                    return Ok(DecrementOutcome::ItemNotFound(decrement.inventory_item_id));
                }
            };

            if quantity_millis < decrement.amount.millis() {
                shortfalls.push(StockShortfall {
                    inventory_item_id: decrement.inventory_item_id,
                    requested: decrement.amount,
                    available: Quantity::from_millis(quantity_millis).map_err(|e| {
                        RepositoryError::FetchFailed(format!(
                            "在庫数量の解析に失敗しました: {}",
                            e
                        ))
                    })?,
                });
            }
        }

        if !shortfalls.is_empty() {
            tx.rollback().await.map_err(|e| {
                RepositoryError::OperationFailed(format!(
                    "トランザクションのロールバックに失敗しました: {}",
                    e
                ))
            })?;
            return Ok(DecrementOutcome::Insufficient(shortfalls));
        }

        for decrement in &ordered {
            sqlx::query(
                "UPDATE inventory_items SET quantity_millis = quantity_millis - ? WHERE id = ? AND restaurant_id = ?"
            )
            .bind(decrement.amount.millis())
            .bind(decrement.inventory_item_id.to_string())
            .bind(restaurant_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("在庫の減算に失敗しました: {}", e)))
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

        Ok(DecrementOutcome::Applied)
    }
}
