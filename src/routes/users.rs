//! User endpoints: creation and paged reads with nested posts.

use crate::db::PlaceloadDb;
use crate::error::ApiError;
use crate::models::{Post, User, UserWithPosts};
use crate::routes::MAX_PAGE_SIZE;
use regex::Regex;
use rocket::serde::json::Json;
use rocket::State;
use rocket_db_pools::{sqlx, Connection};
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::openapi;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern"));

/// Payload accepted by the user creation endpoint. The id is generated by the
/// table sequence, never supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateUserRequest {
    /// Display name, at most 100 characters.
    pub name: String,
    /// Unique handle, at most 50 characters.
    pub username: String,
    /// Unique address, at most 100 characters.
    pub email: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".to_string()));
        }
        if self.name.len() > 100 {
            return Err(ApiError::BadRequest(
                "name must be at most 100 characters".to_string(),
            ));
        }
        if self.username.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "username must not be empty".to_string(),
            ));
        }
        if self.username.len() > 50 {
            return Err(ApiError::BadRequest(
                "username must be at most 50 characters".to_string(),
            ));
        }
        if self.email.len() > 100 {
            return Err(ApiError::BadRequest(
                "email must be at most 100 characters".to_string(),
            ));
        }
        if !EMAIL_RE.is_match(&self.email) {
            return Err(ApiError::BadRequest(
                "email is not a valid address".to_string(),
            ));
        }
        Ok(())
    }
}

/// Create a user with a sequence-generated id.
#[openapi(tag = "Users")]
#[post("/users", data = "<request>")]
pub async fn create_user(
    request: Json<CreateUserRequest>,
    pool: &State<sqlx::PgPool>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;

    let user: User = sqlx::query_as(
        r#"INSERT INTO users (name, username, email)
           VALUES ($1, $2, $3)
           RETURNING id, name, username, email, created_at"#,
    )
    .bind(request.name.trim())
    .bind(request.username.trim())
    .bind(&request.email)
    .fetch_one(pool.inner())
    .await
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    log::info!("created user {} ({})", user.id, user.username);

    Ok(Json(user))
}

/// List users with their posts, paged via `skip`/`limit`.
#[openapi(tag = "Users")]
#[get("/users?<skip>&<limit>")]
pub async fn list_users(
    mut db: Connection<PlaceloadDb>,
    skip: Option<i64>,
    limit: Option<i64>,
) -> Result<Json<Vec<UserWithPosts>>, ApiError> {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let users: Vec<User> = sqlx::query_as(
        r#"SELECT id, name, username, email, created_at
           FROM users
           ORDER BY id
           LIMIT $1 OFFSET $2"#,
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(&mut **db)
    .await?;

    if users.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let ids: Vec<i32> = users.iter().map(|u| u.id).collect();

    let posts: Vec<Post> = sqlx::query_as(
        r#"SELECT id, user_id, title, body, created_at
           FROM posts
           WHERE user_id = ANY($1)
           ORDER BY id"#,
    )
    .bind(&ids)
    .fetch_all(&mut **db)
    .await?;

    let mut by_owner: HashMap<i32, Vec<Post>> = HashMap::new();
    for post in posts {
        by_owner.entry(post.user_id).or_default().push(post);
    }

    let result = users
        .into_iter()
        .map(|user| {
            let posts = by_owner.remove(&user.id).unwrap_or_default();
            UserWithPosts { user, posts }
        })
        .collect();

    Ok(Json(result))
}

/// Retrieve a single user with their posts.
#[openapi(tag = "Users")]
#[get("/users/<user_id>")]
pub async fn get_user(
    user_id: i32,
    mut db: Connection<PlaceloadDb>,
) -> Result<Json<UserWithPosts>, ApiError> {
    let user: User = sqlx::query_as(
        r#"SELECT id, name, username, email, created_at
           FROM users
           WHERE id = $1"#,
    )
    .bind(user_id)
    .fetch_optional(&mut **db)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("User {} not found", user_id)))?;

    let posts: Vec<Post> = sqlx::query_as(
        r#"SELECT id, user_id, title, body, created_at
           FROM posts
           WHERE user_id = $1
           ORDER BY id"#,
    )
    .bind(user_id)
    .fetch_all(&mut **db)
    .await?;

    Ok(Json(UserWithPosts { user, posts }))
}
