use std::sync::Arc;

use chrono::Utc;

use crate::{
    auth::guard::{authorize_item, authorize_list, deny, DenyReason},
    error::AppResult,
    metrics::Metrics,
    models::{
        user::UserId,
        wishlist::{
            NewWishItem, NewWishList, WishItem, WishItemPayload, WishList, WishListPayload,
        },
    },
    store::CredentialStore,
    validation,
};

#[derive(Clone)]
pub struct WishListService {
    store: Arc<dyn CredentialStore>,
    metrics: Metrics,
}

impl WishListService {
    pub fn new(store: Arc<dyn CredentialStore>, metrics: Metrics) -> Self {
        Self { store, metrics }
    }

    /// Fetches a list and checks it belongs to `requester`. Missing and
    /// foreign lists fail the same way.
    async fn owned_list(&self, requester: UserId, list_id: i64) -> AppResult<WishList> {
        let Some(list) = self.store.find_list_by_id(list_id).await? else {
            return Err(deny(DenyReason::NotFound));
        };
        authorize_list(&list, requester).into_result()?;
        Ok(list)
    }

    async fn owned_item(
        &self,
        requester: UserId,
        list_id: i64,
        item_id: i64,
    ) -> AppResult<WishItem> {
        let Some(item) = self.store.find_item(list_id, item_id).await? else {
            return Err(deny(DenyReason::NotFound));
        };
        let parent = self.store.find_list_by_id(item.list_id).await?;
        authorize_item(&item, |_| parent.as_ref(), requester).into_result()?;
        Ok(item)
    }

    /// Enumeration is scoped by owner in the query itself, so rows are not
    /// checked one by one.
    pub async fn list_lists(&self, requester: UserId) -> AppResult<Vec<WishList>> {
        let lists = self.store.find_lists_by_owner(requester).await?;
        self.metrics.wishlist_op("list_lists");
        Ok(lists)
    }

    pub async fn create_list(
        &self,
        requester: UserId,
        payload: WishListPayload,
    ) -> AppResult<WishList> {
        validation::wishlist(&payload)?;
        let list = self
            .store
            .create_list(NewWishList {
                owner_id: requester,
                name: payload.name,
                description: payload.description,
                status: payload.status,
                created_at: Utc::now(),
            })
            .await?;
        self.metrics.wishlist_op("create_list");
        tracing::debug!(list_id = list.id, owner_id = %requester, "created wishlist");
        Ok(list)
    }

    pub async fn get_list(&self, requester: UserId, list_id: i64) -> AppResult<WishList> {
        let mut list = self.owned_list(requester, list_id).await?;
        list.items = Some(self.store.find_items_by_list(list.id).await?);
        self.metrics.wishlist_op("get_list");
        Ok(list)
    }

    pub async fn update_list(
        &self,
        requester: UserId,
        list_id: i64,
        payload: WishListPayload,
    ) -> AppResult<WishList> {
        validation::wishlist(&payload)?;
        let mut list = self.owned_list(requester, list_id).await?;
        list.name = payload.name;
        list.description = payload.description;
        list.status = payload.status;
        list.updated_at = Utc::now();
        let updated = self.store.update_list(&list).await?;
        self.metrics.wishlist_op("update_list");
        Ok(updated)
    }

    pub async fn delete_list(&self, requester: UserId, list_id: i64) -> AppResult<()> {
        let list = self.owned_list(requester, list_id).await?;
        self.store.delete_list(list.id).await?;
        self.metrics.wishlist_op("delete_list");
        tracing::debug!(list_id, owner_id = %requester, "deleted wishlist and its items");
        Ok(())
    }

    pub async fn add_item(
        &self,
        requester: UserId,
        list_id: i64,
        payload: WishItemPayload,
    ) -> AppResult<WishItem> {
        validation::wish_item(&payload)?;
        let list = self.owned_list(requester, list_id).await?;
        let item = self
            .store
            .create_item(NewWishItem {
                list_id: list.id,
                name: payload.name,
                description: payload.description,
                url: payload.url,
                status: payload.status,
                priority: payload.priority,
                created_at: Utc::now(),
            })
            .await?;
        self.metrics.wishlist_op("add_item");
        Ok(item)
    }

    pub async fn get_item(
        &self,
        requester: UserId,
        list_id: i64,
        item_id: i64,
    ) -> AppResult<WishItem> {
        let item = self.owned_item(requester, list_id, item_id).await?;
        self.metrics.wishlist_op("get_item");
        Ok(item)
    }

    pub async fn update_item(
        &self,
        requester: UserId,
        list_id: i64,
        item_id: i64,
        payload: WishItemPayload,
    ) -> AppResult<WishItem> {
        validation::wish_item(&payload)?;
        let mut item = self.owned_item(requester, list_id, item_id).await?;
        item.name = payload.name;
        item.description = payload.description;
        item.url = payload.url;
        item.status = payload.status;
        item.priority = payload.priority;
        item.updated_at = Utc::now();
        let updated = self.store.update_item(&item).await?;
        self.metrics.wishlist_op("update_item");
        Ok(updated)
    }

    pub async fn delete_item(
        &self,
        requester: UserId,
        list_id: i64,
        item_id: i64,
    ) -> AppResult<()> {
        let item = self.owned_item(requester, list_id, item_id).await?;
        self.store.delete_item(item.list_id, item.id).await?;
        self.metrics.wishlist_op("delete_item");
        Ok(())
    }
}
