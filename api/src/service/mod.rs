pub mod auth;
pub mod wishlist;

pub use auth::AuthService;
pub use wishlist::WishListService;
