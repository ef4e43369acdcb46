//! Comments repository for database operations

use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{error::AppResult, models::comment::CommentDto};

fn comment_from_row(row: &PgRow) -> CommentDto {
    CommentDto {
        id: row.get("id"),
        text: row.get("text"),
        author_name: row.get("author_name"),
        author_id: row.get("author_id"),
        item_id: row.get("item_id"),
        created: row.get("created"),
    }
}

#[derive(Clone)]
pub struct CommentsRepository {
    pool: Pool<Postgres>,
}

impl CommentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a new comment, stamped with the current time
    pub async fn create(&self, item_id: i64, author_id: i64, text: &str) -> AppResult<CommentDto> {
        let row = sqlx::query(
            r#"
            WITH inserted AS (
                INSERT INTO comments (text, item_id, author_id)
                VALUES ($1, $2, $3)
                RETURNING id, text, item_id, author_id, created
            )
            SELECT c.id, c.text, c.item_id, c.author_id, c.created, u.name AS author_name
            FROM inserted c
            JOIN users u ON c.author_id = u.id
            "#,
        )
        .bind(text)
        .bind(item_id)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(comment_from_row(&row))
    }

    /// List the comments on an item, oldest first
    pub async fn find_by_item(&self, item_id: i64) -> AppResult<Vec<CommentDto>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.text, c.item_id, c.author_id, c.created, u.name AS author_name
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.item_id = $1
            ORDER BY c.created
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(comment_from_row).collect())
    }
}
