use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::{schema::SQLITE_INIT, CredentialStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        user::{NewUser, User, UserId},
        wishlist::{NewWishItem, NewWishList, WishItem, WishList},
    },
};

const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";
const LIST_COLUMNS: &str = "id, owner_id, name, description, status, created_at, updated_at";
const ITEM_COLUMNS: &str =
    "id, list_id, name, description, url, status, priority, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Private in-memory database. One connection that never idles out, so
    /// the data lives as long as the store.
    pub async fn in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn init_schema(&self) -> AppResult<()> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        let result = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::EmailAlreadyExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_list_by_id(&self, id: i64) -> AppResult<Option<WishList>> {
        let list = sqlx::query_as::<_, WishList>(&format!(
            "SELECT {LIST_COLUMNS} FROM wishlists WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(list)
    }

    async fn find_lists_by_owner(&self, owner_id: UserId) -> AppResult<Vec<WishList>> {
        let lists = sqlx::query_as::<_, WishList>(&format!(
            "SELECT {LIST_COLUMNS} FROM wishlists WHERE owner_id = ? ORDER BY id"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lists)
    }

    async fn create_list(&self, list: NewWishList) -> AppResult<WishList> {
        let created = sqlx::query_as::<_, WishList>(&format!(
            "INSERT INTO wishlists (owner_id, name, description, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?) RETURNING {LIST_COLUMNS}"
        ))
        .bind(list.owner_id)
        .bind(&list.name)
        .bind(&list.description)
        .bind(&list.status)
        .bind(list.created_at)
        .bind(list.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_list(&self, list: &WishList) -> AppResult<WishList> {
        // owner_id is immutable
        let updated = sqlx::query_as::<_, WishList>(&format!(
            "UPDATE wishlists SET name = ?, description = ?, status = ?, updated_at = ? \
             WHERE id = ? RETURNING {LIST_COLUMNS}"
        ))
        .bind(&list.name)
        .bind(&list.description)
        .bind(&list.status)
        .bind(list.updated_at)
        .bind(list.id)
        .fetch_optional(&self.pool)
        .await?;
        updated.ok_or(AppError::AccessDenied)
    }

    async fn delete_list(&self, id: i64) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM wishlist_items WHERE list_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM wishlists WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_item(&self, list_id: i64, item_id: i64) -> AppResult<Option<WishItem>> {
        let item = sqlx::query_as::<_, WishItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM wishlist_items WHERE list_id = ? AND id = ?"
        ))
        .bind(list_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    async fn find_items_by_list(&self, list_id: i64) -> AppResult<Vec<WishItem>> {
        let items = sqlx::query_as::<_, WishItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM wishlist_items WHERE list_id = ? ORDER BY id"
        ))
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    async fn create_item(&self, item: NewWishItem) -> AppResult<WishItem> {
        let created = sqlx::query_as::<_, WishItem>(&format!(
            "INSERT INTO wishlist_items \
             (list_id, name, description, url, status, priority, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING {ITEM_COLUMNS}"
        ))
        .bind(item.list_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.url)
        .bind(&item.status)
        .bind(item.priority)
        .bind(item.created_at)
        .bind(item.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn update_item(&self, item: &WishItem) -> AppResult<WishItem> {
        let updated = sqlx::query_as::<_, WishItem>(&format!(
            "UPDATE wishlist_items \
             SET name = ?, description = ?, url = ?, status = ?, priority = ?, updated_at = ? \
             WHERE list_id = ? AND id = ? RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.url)
        .bind(&item.status)
        .bind(item.priority)
        .bind(item.updated_at)
        .bind(item.list_id)
        .bind(item.id)
        .fetch_optional(&self.pool)
        .await?;
        updated.ok_or(AppError::AccessDenied)
    }

    async fn delete_item(&self, list_id: i64, item_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM wishlist_items WHERE list_id = ? AND id = ?")
            .bind(list_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
