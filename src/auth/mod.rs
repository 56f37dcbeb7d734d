//! Authentication: registration, login, password reset, and the bearer-token
//! middleware that resolves an [`middleware::Identity`] once per request.

pub mod handlers;
pub mod middleware;
pub mod password;
pub mod validate;

pub use middleware::{BearerToken, Identity, RequireAdmin, RequireResident, RequireStaff};
