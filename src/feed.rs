//! Client for the JSONPlaceholder source feed.
//!
//! The feed exposes two collections of flat JSON records. Both are fetched
//! concurrently and either both succeed or the whole fetch fails; there is no
//! partial result and no retry beyond the HTTP client's defaults.

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const USERS_FEED_URL: &str = "https://jsonplaceholder.typicode.com/users";
pub const POSTS_FEED_URL: &str = "https://jsonplaceholder.typicode.com/posts";

/// A user record as it appears in the source feed.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub id: i32,
    pub name: String,
    pub username: String,
    pub email: String,
}

/// A post record as it appears in the source feed. The feed uses camelCase
/// field names (`userId`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub body: String,
}

async fn fetch_collection<T: DeserializeOwned>(url: &str) -> Result<Vec<T>, reqwest::Error> {
    log::debug!("fetching {}", url);

    let records = reqwest::get(url)
        .await?
        .error_for_status()?
        .json::<Vec<T>>()
        .await?;

    Ok(records)
}

pub async fn fetch_users() -> Result<Vec<UserRecord>, reqwest::Error> {
    fetch_collection(USERS_FEED_URL).await
}

pub async fn fetch_posts() -> Result<Vec<PostRecord>, reqwest::Error> {
    fetch_collection(POSTS_FEED_URL).await
}

/// Fetch both collections concurrently, returning once both complete.
pub async fn fetch_all() -> Result<(Vec<UserRecord>, Vec<PostRecord>), reqwest::Error> {
    let (users, posts) = tokio::try_join!(fetch_users(), fetch_posts())?;

    log::info!("feed returned {} users and {} posts", users.len(), posts.len());

    Ok((users, posts))
}
