//! HTTP route handlers grouped by resource domain.
//!
//! Each submodule exposes typed Rocket handlers annotated with `#[openapi]`
//! so `rocket_okapi` can derive an OpenAPI document automatically.

pub mod health;
pub mod load;
pub mod posts;
pub mod users;

/// Upper bound applied to the `limit` query parameter on list endpoints.
pub(crate) const MAX_PAGE_SIZE: i64 = 100;
