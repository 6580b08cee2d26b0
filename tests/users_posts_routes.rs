use placeload::models::{Post, PostWithAuthor, User, UserWithPosts};
use placeload::routes::{posts, users};
use placeload::test_support::{TestDatabase, TestRocketBuilder};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use rocket::routes;
use rocket::serde::json::json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

async fn client_for(test_db: &TestDatabase) -> Client {
    TestRocketBuilder::new()
        .with_database(test_db.url())
        .manage_pg_pool(test_db.pool_clone())
        .mount_api_routes(routes![
            users::create_user,
            users::list_users,
            users::get_user,
            posts::create_post,
            posts::list_posts,
        ])
        .async_client()
        .await
}

#[tokio::test]
async fn create_user_then_fetch_round_trip() {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let client = client_for(&test_db).await;

    let response = client
        .post("/api/users")
        .header(ContentType::JSON)
        .body(json!({"name": "Ann", "username": "ann", "email": "ann@x.com"}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let created: User = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(created.id, 1, "first generated id on a clean store");
    assert_eq!(created.username, "ann");

    let response = client.get("/api/users/1").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let fetched: UserWithPosts = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(fetched.user.email, "ann@x.com");
    assert!(fetched.posts.is_empty());

    drop(client);
    test_db.close().await;
}

#[tokio::test]
async fn create_post_requires_existing_user() {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let pool = test_db.pool_clone();
    let client = client_for(&test_db).await;

    let response = client
        .post("/api/posts")
        .header(ContentType::JSON)
        .body(json!({"user_id": 42, "title": "T", "body": "B"}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);

    let body: ErrorBody = response
        .into_json()
        .await
        .expect("error payload should deserialize");
    assert_eq!(body.error, "NotFound");
    assert!(body.message.contains("42"));

    let post_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await
        .expect("count succeeds");
    assert_eq!(post_count, 0, "rejected create must not insert");

    drop(client);
    test_db.close().await;
}

#[tokio::test]
async fn validation_rejects_malformed_payloads() {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let client = client_for(&test_db).await;

    let response = client
        .post("/api/users")
        .header(ContentType::JSON)
        .body(json!({"name": "Ann", "username": "ann", "email": "not-an-address"}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let body: ErrorBody = response
        .into_json()
        .await
        .expect("error payload should deserialize");
    assert_eq!(body.error, "BadRequest");
    assert!(body.message.contains("email"));

    drop(client);
    test_db.close().await;
}

#[tokio::test]
async fn duplicate_username_is_reported_as_client_error() {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let client = client_for(&test_db).await;

    let payload = json!({"name": "Ann", "username": "ann", "email": "ann@x.com"}).to_string();

    let response = client
        .post("/api/users")
        .header(ContentType::JSON)
        .body(payload.clone())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    drop(response);

    // Same username and email again: the unique constraint rejects it.
    let response = client
        .post("/api/users")
        .header(ContentType::JSON)
        .body(payload)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    drop(response);
    drop(client);
    test_db.close().await;
}

#[tokio::test]
async fn post_listing_joins_author_and_pages() {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let client = client_for(&test_db).await;

    for (name, username, email) in [
        ("Ann", "ann", "ann@x.com"),
        ("Bob", "bob", "bob@x.com"),
    ] {
        let response = client
            .post("/api/users")
            .header(ContentType::JSON)
            .body(json!({"name": name, "username": username, "email": email}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }

    for (user_id, title) in [(1, "First"), (1, "Second"), (2, "Third")] {
        let response = client
            .post("/api/posts")
            .header(ContentType::JSON)
            .body(json!({"user_id": user_id, "title": title, "body": "text"}).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        let created: Post = response
            .into_json()
            .await
            .expect("payload should deserialize");
        assert_eq!(created.user_id, user_id);
    }

    let response = client.get("/api/posts").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let listing: Vec<PostWithAuthor> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(listing.len(), 3);
    assert_eq!(listing[0].author_username, "ann");
    assert_eq!(listing[2].author_username, "bob");
    assert_eq!(listing[2].author_email, "bob@x.com");

    // skip/limit paging window.
    let response = client.get("/api/posts?skip=1&limit=1").dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    let window: Vec<PostWithAuthor> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].title, "Second");

    let response = client.get("/api/users?skip=1&limit=1").dispatch().await;
    let window: Vec<UserWithPosts> = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].user.username, "bob");

    drop(client);
    test_db.close().await;
}
