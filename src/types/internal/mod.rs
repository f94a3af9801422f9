pub mod auth;
pub mod role;

pub use auth::{AuthedUser, Claims};
pub use role::Role;
