// Services layer - Business logic and cross-cutting mechanisms
pub mod crypto;
pub mod numbering;
pub mod role_guard;
pub mod token_service;

pub use role_guard::RoleGuard;
pub use token_service::TokenService;
