use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WishList {
    pub id: i64,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// `Some` on a single-list read, possibly empty. Absent when enumerating.
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<WishItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WishItem {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWishList {
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWishItem {
    pub list_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub status: Option<String>,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/wishlists` and `PUT /api/wishlists/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct WishListPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of item create/update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct WishItemPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: i64,
}
