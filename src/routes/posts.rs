//! Post endpoints: creation with owner lookup and paged reads.

use crate::db::PlaceloadDb;
use crate::error::ApiError;
use crate::models::{Post, PostWithAuthor};
use crate::routes::MAX_PAGE_SIZE;
use rocket::serde::json::Json;
use rocket::State;
use rocket_db_pools::{sqlx, Connection};
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};

/// Payload accepted by the post creation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatePostRequest {
    /// Id of the owning user; must reference an existing row.
    pub user_id: i32,
    /// Title, at most 200 characters.
    pub title: String,
    /// Body text.
    pub body: String,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".to_string()));
        }
        if self.title.len() > 200 {
            return Err(ApiError::BadRequest(
                "title must be at most 200 characters".to_string(),
            ));
        }
        if self.body.trim().is_empty() {
            return Err(ApiError::BadRequest("body must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Create a post after verifying the owning user exists.
#[openapi(tag = "Posts")]
#[post("/posts", data = "<request>")]
pub async fn create_post(
    request: Json<CreatePostRequest>,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<Post>, ApiError> {
    request.validate()?;

    let owner: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE id = $1")
        .bind(request.user_id)
        .fetch_optional(pool.inner())
        .await?;

    if owner.is_none() {
        return Err(ApiError::NotFound(format!(
            "User {} not found",
            request.user_id
        )));
    }

    let post: Post = sqlx::query_as(
        r#"INSERT INTO posts (user_id, title, body)
           VALUES ($1, $2, $3)
           RETURNING id, user_id, title, body, created_at"#,
    )
    .bind(request.user_id)
    .bind(request.title.trim())
    .bind(&request.body)
    .fetch_one(pool.inner())
    .await
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    log::info!("created post {} for user {}", post.id, post.user_id);

    Ok(Json(post))
}

/// List posts with their owning user's fields, paged via `skip`/`limit`.
#[openapi(tag = "Posts")]
#[get("/posts?<skip>&<limit>")]
pub async fn list_posts(
    mut db: Connection<PlaceloadDb>,
    skip: Option<i64>,
    limit: Option<i64>,
) -> Result<Json<Vec<PostWithAuthor>>, ApiError> {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let posts: Vec<PostWithAuthor> = sqlx::query_as(
        r#"SELECT
               p.id, p.user_id, p.title, p.body, p.created_at,
               u.name AS author_name,
               u.username AS author_username,
               u.email AS author_email
           FROM posts p
           JOIN users u ON p.user_id = u.id
           ORDER BY p.id
           LIMIT $1 OFFSET $2"#,
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(posts))
}
