use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    InventoryItemId, MenuItem, MenuItemId, Money, Quantity, RecipeLine, RestaurantId,
};
use crate::domain::port::{MenuItemRepository, RepositoryError};
use async_trait::async_trait;
use uuid::Uuid;

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQLメニューリポジトリ
/// MySQLデータベースを使用してメニュー項目とレシピ明細を永続化する
#[derive(Clone)]
pub struct MySqlMenuItemRepository {
    pool: Pool<MySql>,
}

impl MySqlMenuItemRepository {
    /// 新しいMySQLメニューリポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行からメニュー項目を再構築する
    fn build_item_from_row(row: &sqlx::mysql::MySqlRow) -> Result<MenuItem, RepositoryError> {
        let item_id = MenuItemId::from_string(row.get("id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("メニュー項目IDの解析に失敗しました: {}", e))
        })?;
        let restaurant_id = RestaurantId::from_string(row.get("restaurant_id")).map_err(|e| {
            RepositoryError::FetchFailed(format!("店舗IDの解析に失敗しました: {}", e))
        })?;
        let price = Money::from_cents(row.get::<i64, _>("price_cents")).map_err(|e| {
            RepositoryError::FetchFailed(format!("価格の解析に失敗しました: {}", e))
        })?;
        let category_id = row
            .get::<Option<String>, _>("category_id")
            .map(|s| Uuid::parse_str(&s))
            .transpose()
            .map_err(|e| {
                RepositoryError::FetchFailed(format!("カテゴリIDの解析に失敗しました: {}", e))
            })?;

        Ok(MenuItem::reconstruct(
            item_id,
            restaurant_id,
            row.get("name"),
            price,
            category_id,
            row.get::<bool, _>("active"),
            row.get::<Option<i64>, _>("legacy_stock"),
        ))
    }
}

#[async_trait]
impl MenuItemRepository for MySqlMenuItemRepository {
    async fn save(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        // メニュー項目データをmenu_itemsテーブルにUPSERT
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, restaurant_id, name, price_cents, category_id, active, legacy_stock)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                name = VALUES(name),
                price_cents = VALUES(price_cents),
                category_id = VALUES(category_id),
                active = VALUES(active),
                legacy_stock = VALUES(legacy_stock)
            "#,
        )
        .bind(item.id().to_string())
        .bind(item.restaurant_id().to_string())
        .bind(item.name())
        .bind(item.price().cents())
        .bind(item.category_id().map(|c| c.to_string()))
        .bind(item.is_active())
        .bind(item.legacy_stock())
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("メニュー項目の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_by_id(&self, item_id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, restaurant_id, name, price_cents, category_id, active, legacy_stock FROM menu_items WHERE id = ?"
        )
        .bind(item_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("メニュー項目の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(Self::build_item_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<MenuItem>, RepositoryError> {
        // 表示名の昇順で並べる
        let rows = sqlx::query(
            "SELECT id, restaurant_id, name, price_cents, category_id, active, legacy_stock FROM menu_items WHERE restaurant_id = ? ORDER BY name ASC"
        )
        .bind(restaurant_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("メニュー一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut items = Vec::new();
        for row in rows {
            items.push(Self::build_item_from_row(&row)?);
        }
        Ok(items)
    }

    async fn recipe_for(
        &self,
        restaurant_id: RestaurantId,
        menu_item_id: MenuItemId,
    ) -> Result<Option<Vec<RecipeLine>>, RepositoryError> {
        // メニュー項目の存在確認とレシピ取得を区別する
        // 指定店舗に存在しないメニュー項目はNone、レシピ未登録は空のリスト
        let exists = sqlx::query("SELECT id FROM menu_items WHERE id = ? AND restaurant_id = ?")
            .bind(menu_item_id.to_string())
            .bind(restaurant_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("メニュー項目の取得に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(
            "SELECT inventory_item_id, quantity_per_unit_millis FROM recipe_lines WHERE menu_item_id = ? ORDER BY inventory_item_id ASC"
        )
        .bind(menu_item_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("レシピの取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut lines = Vec::new();
        for row in rows {
            let inventory_item_id = InventoryItemId::from_string(row.get("inventory_item_id"))
                .map_err(|e| {
                    RepositoryError::FetchFailed(format!(
                        "在庫品目IDの解析に失敗しました: {}",
                        e
                    ))
                })?;
            let quantity_per_unit =
                Quantity::from_millis(row.get::<i64, _>("quantity_per_unit_millis")).map_err(
                    |e| {
                        RepositoryError::FetchFailed(format!(
                            "レシピ数量の解析に失敗しました: {}",
                            e
                        ))
                    },
                )?;
            let line = RecipeLine::new(inventory_item_id, quantity_per_unit).map_err(|e| {
                RepositoryError::FetchFailed(format!("レシピ明細の構築に失敗しました: {}", e))
            })?;
            lines.push(line);
        }

        Ok(Some(lines))
    }

    async fn save_recipe(
        &self,
        menu_item_id: MenuItemId,
        lines: &[RecipeLine],
    ) -> Result<(), RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        // 既存のレシピ明細を削除してから置き換える
        sqlx::query("DELETE FROM recipe_lines WHERE menu_item_id = ?")
            .bind(menu_item_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("レシピ明細の削除に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO recipe_lines (menu_item_id, inventory_item_id, quantity_per_unit_millis)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(menu_item_id.to_string())
            .bind(line.inventory_item_id().to_string())
            .bind(line.quantity_per_unit().millis())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("レシピ明細の保存に失敗しました: {}", e))
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
}
