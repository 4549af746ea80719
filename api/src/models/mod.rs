pub mod user;
pub mod wishlist;
