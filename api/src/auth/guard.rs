use crate::{
    error::{AppError, AppResult},
    models::{
        user::UserId,
        wishlist::{WishItem, WishList},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotOwner,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(DenyReason),
}

impl Decision {
    /// Both deny reasons become [`AppError::AccessDenied`]; the reason is
    /// only kept for logs.
    pub fn into_result(self) -> AppResult<()> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied(reason) => Err(deny(reason)),
        }
    }
}

pub fn deny(reason: DenyReason) -> AppError {
    tracing::debug!(?reason, "ownership check denied");
    AppError::AccessDenied
}

pub fn authorize(owner_id: UserId, requester: UserId) -> Decision {
    if owner_id == requester {
        Decision::Allowed
    } else {
        Decision::Denied(DenyReason::NotOwner)
    }
}

pub fn authorize_list(list: &WishList, requester: UserId) -> Decision {
    authorize(list.owner_id, requester)
}

pub fn authorize_item<'a, F>(item: &WishItem, list_lookup: F, requester: UserId) -> Decision
where
    F: FnOnce(i64) -> Option<&'a WishList>,
{
    match list_lookup(item.list_id) {
        Some(list) if list.id == item.list_id => authorize_list(list, requester),
        _ => Decision::Denied(DenyReason::NotFound),
    }
}
