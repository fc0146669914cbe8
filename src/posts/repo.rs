use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::{SortKey, SortOrder};

/// Post row joined with the author's username. Every read path goes through
/// this shape so a raw author id never reaches a consumer.
#[derive(Debug, Clone, FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub contents: Option<String>,
    pub tags: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Filter for the shared listing query. Callers guarantee author and tag are
/// mutually exclusive; the repo just runs whichever it is handed.
#[derive(Debug)]
pub enum PostFilter {
    All,
    Author(Uuid),
    Tag(String),
}

const SELECT_WITH_AUTHOR: &str = "SELECT p.id, p.title, u.username AS author, p.contents, \
     p.tags, p.created_at, p.updated_at \
     FROM posts p JOIN users u ON u.id = p.author_id";

/// Single-key sort with `id ASC` as a fixed secondary key, so rows with equal
/// sort values come back in one deterministic order.
pub(crate) fn order_clause(key: SortKey, order: SortOrder) -> String {
    format!("ORDER BY p.{} {}, p.id ASC", key.column(), order.keyword())
}

pub async fn list(
    db: &PgPool,
    filter: PostFilter,
    key: SortKey,
    order: SortOrder,
) -> sqlx::Result<Vec<PostWithAuthor>> {
    let order_by = order_clause(key, order);
    match filter {
        PostFilter::All => {
            sqlx::query_as::<_, PostWithAuthor>(&format!("{SELECT_WITH_AUTHOR} {order_by}"))
                .fetch_all(db)
                .await
        }
        PostFilter::Author(author_id) => {
            sqlx::query_as::<_, PostWithAuthor>(&format!(
                "{SELECT_WITH_AUTHOR} WHERE p.author_id = $1 {order_by}"
            ))
            .bind(author_id)
            .fetch_all(db)
            .await
        }
        PostFilter::Tag(tag) => {
            sqlx::query_as::<_, PostWithAuthor>(&format!(
                "{SELECT_WITH_AUTHOR} WHERE $1 = ANY(p.tags) {order_by}"
            ))
            .bind(tag)
            .fetch_all(db)
            .await
        }
    }
}

pub async fn get(db: &PgPool, id: Uuid) -> sqlx::Result<Option<PostWithAuthor>> {
    sqlx::query_as::<_, PostWithAuthor>(&format!("{SELECT_WITH_AUTHOR} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn create(
    db: &PgPool,
    author_id: Uuid,
    title: &str,
    contents: Option<&str>,
    tags: &[String],
) -> sqlx::Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO posts (author_id, title, contents, tags)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(title)
    .bind(contents)
    .bind(tags)
    .fetch_one(db)
    .await
}

/// Full replacement of the four mutable fields; `updated_at` is bumped by the
/// store. Returns `None` when no row matched the id.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    author_id: Uuid,
    title: &str,
    contents: Option<&str>,
    tags: &[String],
) -> sqlx::Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE posts
        SET title = $2, author_id = $3, contents = $4, tags = $5, updated_at = now()
        WHERE id = $1
        RETURNING id
        "#,
    )
    .bind(id)
    .bind(title)
    .bind(author_id)
    .bind(contents)
    .bind(tags)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
