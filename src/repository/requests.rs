//! Item requests repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::request::ItemRequest,
};

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get request by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<ItemRequest> {
        sqlx::query_as::<_, ItemRequest>(
            "SELECT id, description, requester_id, created FROM requests WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    /// Create a new request, stamped with the current time
    pub async fn create(&self, requester_id: i64, description: &str) -> AppResult<ItemRequest> {
        let created = sqlx::query_as::<_, ItemRequest>(
            r#"
            INSERT INTO requests (description, requester_id)
            VALUES ($1, $2)
            RETURNING id, description, requester_id, created
            "#,
        )
        .bind(description)
        .bind(requester_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// List the requests a user posted, oldest first
    pub async fn find_by_requester(&self, requester_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT id, description, requester_id, created
            FROM requests
            WHERE requester_id = $1
            ORDER BY created
            "#,
        )
        .bind(requester_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    /// Requests that the user's own listed items were posted against,
    /// one entry per fulfilling item
    pub async fn find_fulfilled_by_owner(&self, owner_id: i64) -> AppResult<Vec<ItemRequest>> {
        let requests = sqlx::query_as::<_, ItemRequest>(
            r#"
            SELECT r.id, r.description, r.requester_id, r.created
            FROM items i
            JOIN requests r ON i.request_id = r.id
            WHERE i.owner_id = $1
            ORDER BY i.id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }
}
