use std::{future::Future, sync::Arc, time::Instant};

use async_trait::async_trait;

use super::CredentialStore;
use crate::{
    error::AppResult,
    metrics::Metrics,
    models::{
        user::{NewUser, User, UserId},
        wishlist::{NewWishItem, NewWishList, WishItem, WishList},
    },
};

/// Wraps another store and records each call in `db_query_duration_seconds`.
pub struct MeteredStore {
    inner: Arc<dyn CredentialStore>,
    metrics: Metrics,
}

impl MeteredStore {
    pub fn new(inner: Arc<dyn CredentialStore>, metrics: Metrics) -> Self {
        Self { inner, metrics }
    }

    async fn timed<T>(
        &self,
        operation: &'static str,
        query: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let start = Instant::now();
        let result = query.await;
        self.metrics.observe_query(operation, start.elapsed());
        result
    }
}

#[async_trait]
impl CredentialStore for MeteredStore {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.timed("find_user_by_email", self.inner.find_user_by_email(email))
            .await
    }

    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        self.timed("find_user_by_id", self.inner.find_user_by_id(id))
            .await
    }

    async fn create_user(&self, user: NewUser) -> AppResult<User> {
        self.timed("create_user", self.inner.create_user(user)).await
    }

    async fn find_list_by_id(&self, id: i64) -> AppResult<Option<WishList>> {
        self.timed("find_list_by_id", self.inner.find_list_by_id(id))
            .await
    }

    async fn find_lists_by_owner(&self, owner_id: UserId) -> AppResult<Vec<WishList>> {
        self.timed("find_lists_by_owner", self.inner.find_lists_by_owner(owner_id))
            .await
    }

    async fn create_list(&self, list: NewWishList) -> AppResult<WishList> {
        self.timed("create_list", self.inner.create_list(list)).await
    }

    async fn update_list(&self, list: &WishList) -> AppResult<WishList> {
        self.timed("update_list", self.inner.update_list(list)).await
    }

    async fn delete_list(&self, id: i64) -> AppResult<()> {
        self.timed("delete_list", self.inner.delete_list(id)).await
    }

    async fn find_item(&self, list_id: i64, item_id: i64) -> AppResult<Option<WishItem>> {
        self.timed("find_item", self.inner.find_item(list_id, item_id))
            .await
    }

    async fn find_items_by_list(&self, list_id: i64) -> AppResult<Vec<WishItem>> {
        self.timed("find_items_by_list", self.inner.find_items_by_list(list_id))
            .await
    }

    async fn create_item(&self, item: NewWishItem) -> AppResult<WishItem> {
        self.timed("create_item", self.inner.create_item(item)).await
    }

    async fn update_item(&self, item: &WishItem) -> AppResult<WishItem> {
        self.timed("update_item", self.inner.update_item(item)).await
    }

    async fn delete_item(&self, list_id: i64, item_id: i64) -> AppResult<()> {
        self.timed("delete_item", self.inner.delete_item(list_id, item_id))
            .await
    }

    async fn ping(&self) -> AppResult<()> {
        self.timed("ping", self.inner.ping()).await
    }
}
