//! Bulk data load endpoint backed by the JSONPlaceholder feed.

use crate::error::ApiError;
use crate::feed;
use crate::import::import_records;
use rocket::serde::json::Json;
use rocket::State;
use rocket_db_pools::sqlx;
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

/// Summary returned once both collections are persisted.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LoadDataResponse {
    /// Human-readable acknowledgement.
    pub message: String,
    /// Number of user rows written.
    pub users_loaded: usize,
    /// Number of post rows written.
    pub posts_loaded: usize,
}

/// Fetch users and posts from the remote feed and persist them.
///
/// The two feed requests run concurrently; a failure of either aborts the
/// load before anything is written. Import failures roll back wholesale, so
/// a duplicate load surfaces the uniqueness violation instead of persisting
/// users without their posts.
#[openapi(tag = "Import")]
#[post("/load-data")]
pub async fn load_data(pool: &State<sqlx::PgPool>) -> Result<Json<LoadDataResponse>, ApiError> {
    let (users, posts) = feed::fetch_all()
        .await
        .map_err(|e| ApiError::Internal(format!("feed fetch failed: {}", e)))?;

    let summary = import_records(pool.inner(), &users, &posts)
        .await
        .map_err(|e| ApiError::Internal(format!("data load failed: {}", e)))?;

    Ok(Json(LoadDataResponse {
        message: "Data loaded successfully".to_string(),
        users_loaded: summary.users_loaded,
        posts_loaded: summary.posts_loaded,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_shape_matches_contract() {
        let response = LoadDataResponse {
            message: "Data loaded successfully".to_string(),
            users_loaded: 1,
            posts_loaded: 1,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "message": "Data loaded successfully",
                "users_loaded": 1,
                "posts_loaded": 1
            })
        );
    }
}
