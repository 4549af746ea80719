pub mod extract;
pub mod guard;
pub mod password;
pub mod token;

pub use extract::AuthUser;
pub use token::TokenManager;
