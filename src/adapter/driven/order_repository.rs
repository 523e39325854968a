use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    CustomerId, MenuItemId, Order, OrderId, OrderLine, OrderStatus, RestaurantId,
};
use crate::domain::port::{OrderRepository, RepositoryError};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL注文リポジトリ
/// MySQLデータベースを使用して注文を永続化する
pub struct MySqlOrderRepository {
    pool: Pool<MySql>,
}

impl MySqlOrderRepository {
    /// 新しいMySQL注文リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から注文オブジェクトのリストを構築する
    /// JOINされた結果から複数の注文を再構築する
    fn build_orders_from_rows(
        rows: Vec<sqlx::mysql::MySqlRow>,
    ) -> Result<Vec<Order>, RepositoryError> {
        use std::collections::HashMap;

        // 注文IDごとにグループ化（作成日時降順の並びを保つ）
        let mut order_ids: Vec<String> = Vec::new();
        let mut order_groups: HashMap<String, Vec<&sqlx::mysql::MySqlRow>> = HashMap::new();
        for row in &rows {
            let order_id: String = row.get("id");
            if !order_groups.contains_key(&order_id) {
                order_ids.push(order_id.clone());
            }
            order_groups.entry(order_id).or_default().push(row);
        }

        let mut orders = Vec::new();

        for order_id_str in order_ids {
            let order_rows = &order_groups[&order_id_str];

            // 最初の行から注文の基本情報を取得
            let first_row = order_rows[0];

            let order_id = OrderId::from_string(&order_id_str).map_err(|e| {
                RepositoryError::FetchFailed(format!("注文IDの解析に失敗しました: {}", e))
            })?;

            let restaurant_id =
                RestaurantId::from_string(first_row.get("restaurant_id")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("店舗IDの解析に失敗しました: {}", e))
                })?;

            let customer_id =
                CustomerId::from_string(first_row.get("customer_id")).map_err(|e| {
                    RepositoryError::FetchFailed(format!("顧客IDの解析に失敗しました: {}", e))
                })?;

            let status = OrderStatus::from_string(first_row.get("status")).map_err(|e| {
                RepositoryError::FetchFailed(format!(
                    "注文ステータスの解析に失敗しました: {}",
                    e
                ))
            })?;

            let table_number = first_row.get::<Option<u32>, _>("table_number");

            // 注文明細を再構築
            let mut lines = Vec::new();
            for row in order_rows {
                if let (Some(menu_item_id_str), Some(quantity)) = (
                    row.get::<Option<String>, _>("menu_item_id"),
                    row.get::<Option<u32>, _>("quantity"),
                ) {
                    let menu_item_id = MenuItemId::from_string(&menu_item_id_str).map_err(|e| {
                        RepositoryError::FetchFailed(format!(
                            "メニュー項目IDの解析に失敗しました: {}",
                            e
                        ))
                    })?;
                    let line = OrderLine::new(menu_item_id, quantity).map_err(|e| {
                        RepositoryError::FetchFailed(format!(
                            "注文明細の構築に失敗しました: {}",
                            e
                        ))
                    })?;
                    lines.push(line);
                }
            }

            orders.push(Order::reconstruct(
                order_id,
                restaurant_id,
                customer_id,
                table_number,
                lines,
                status,
            ));
        }

        Ok(orders)
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn save(&self, order: &Order) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 注文データをordersテーブルにUPSERT
        sqlx::query(
            r#"
            INSERT INTO orders (id, restaurant_id, customer_id, table_number, status)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                table_number = VALUES(table_number),
                status = VALUES(status)
            "#,
        )
        .bind(order.id().to_string())
        .bind(order.restaurant_id().to_string())
        .bind(order.customer_id().to_string())
        .bind(order.table_number())
        .bind(order.status().to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        // 既存の注文明細を削除
        sqlx::query("DELETE FROM order_lines WHERE order_id = ?")
            .bind(order.id().to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("注文明細の削除に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 注文明細データをorder_linesテーブルにINSERT
        for line in order.lines() {
            sqlx::query(
                r#"
                INSERT INTO order_lines (order_id, menu_item_id, quantity)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(order.id().to_string())
            .bind(line.menu_item_id().to_string())
            .bind(line.quantity())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("注文明細の保存に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;
        }

        // トランザクションをコミット
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

    async fn find_by_id(&self, order_id: OrderId) -> Result<Option<Order>, RepositoryError> {
        // ordersテーブルとorder_linesテーブルをJOINして取得
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, o.restaurant_id, o.customer_id, o.table_number, o.status,
                ol.menu_item_id, ol.quantity
            FROM orders o
            LEFT JOIN order_lines ol ON o.id = ol.order_id
            WHERE o.id = ?
            "#,
        )
        .bind(order_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let orders = Self::build_orders_from_rows(rows)?;
        Ok(orders.into_iter().next())
    }

    async fn find_all(&self, restaurant_id: RestaurantId) -> Result<Vec<Order>, RepositoryError> {
        // 作成日時の降順で並べる
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, o.restaurant_id, o.customer_id, o.table_number, o.status,
                ol.menu_item_id, ol.quantity
            FROM orders o
            LEFT JOIN order_lines ol ON o.id = ol.order_id
            WHERE o.restaurant_id = ?
            ORDER BY o.created_at DESC, o.id ASC
            "#,
        )
        .bind(restaurant_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Self::build_orders_from_rows(rows)
    }

    async fn find_by_status(
        &self,
        restaurant_id: RestaurantId,
        status: OrderStatus,
    ) -> Result<Vec<Order>, RepositoryError> {
        // 作成日時の降順で並べる
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, o.restaurant_id, o.customer_id, o.table_number, o.status,
                ol.menu_item_id, ol.quantity
            FROM orders o
            LEFT JOIN order_lines ol ON o.id = ol.order_id
            WHERE o.restaurant_id = ? AND o.status = ?
            ORDER BY o.created_at DESC, o.id ASC
            "#,
        )
        .bind(restaurant_id.to_string())
        .bind(status.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DatabaseError::QueryError(format!("注文フィルタリングの取得に失敗しました: {}", e))
        })
        .map_err(RepositoryError::from)?;

        Self::build_orders_from_rows(rows)
    }

    async fn delete(&self, order_id: OrderId) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        sqlx::query("DELETE FROM order_lines WHERE order_id = ?")
            .bind(order_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("注文明細の削除に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(order_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("注文の削除に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

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

    fn next_identity(&self) -> OrderId {
        OrderId::new()
    }
}
