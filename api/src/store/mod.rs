use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{
        user::{NewUser, User, UserId},
        wishlist::{NewWishItem, NewWishList, WishItem, WishList},
    },
};

pub mod metered;
pub mod schema;
pub mod sqlite;

pub use metered::MeteredStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;
    async fn find_user_by_id(&self, id: UserId) -> AppResult<Option<User>>;
    /// Fails with `EmailAlreadyExists` when the email is taken.
    async fn create_user(&self, user: NewUser) -> AppResult<User>;

    async fn find_list_by_id(&self, id: i64) -> AppResult<Option<WishList>>;
    async fn find_lists_by_owner(&self, owner_id: UserId) -> AppResult<Vec<WishList>>;
    async fn create_list(&self, list: NewWishList) -> AppResult<WishList>;
    /// Fails with `AccessDenied` when the row no longer exists.
    async fn update_list(&self, list: &WishList) -> AppResult<WishList>;
    /// Removes the list and every item in it.
    async fn delete_list(&self, id: i64) -> AppResult<()>;

    async fn find_item(&self, list_id: i64, item_id: i64) -> AppResult<Option<WishItem>>;
    async fn find_items_by_list(&self, list_id: i64) -> AppResult<Vec<WishItem>>;
    async fn create_item(&self, item: NewWishItem) -> AppResult<WishItem>;
    /// Fails with `AccessDenied` when the row no longer exists.
    async fn update_item(&self, item: &WishItem) -> AppResult<WishItem>;
    async fn delete_item(&self, list_id: i64, item_id: i64) -> AppResult<()>;

    async fn ping(&self) -> AppResult<()>;
}
