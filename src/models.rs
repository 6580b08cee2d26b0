//! Persistent entity types and the composite shapes returned by the API.

use chrono::{DateTime, Utc};
use rocket_db_pools::sqlx::FromRow;
use rocket_okapi::okapi::schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An author of posts. Ids are supplied by the bulk import (mirroring the
/// source feed) or generated by the table sequence on direct creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A post belonging to exactly one user. Deleting the user cascades here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
pub struct Post {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// A user together with every post they own.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserWithPosts {
    #[serde(flatten)]
    pub user: User,
    pub posts: Vec<Post>,
}

/// A post joined with its owning user's fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, JsonSchema)]
pub struct PostWithAuthor {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
    pub created_at: Option<DateTime<Utc>>,
    pub author_name: String,
    pub author_username: String,
    pub author_email: String,
}
