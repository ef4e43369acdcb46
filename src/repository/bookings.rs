//! Bookings repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        booking::{Booking, BookingDetails, BookingState, BookingStatus},
        item::ItemDto,
        user::User,
    },
};

/// Join skeleton shared by every query that returns booking details
const DETAILS_SELECT: &str = r#"
    SELECT b.id, b.start_date, b.end_date, b.status,
           i.id AS item_id, i.name AS item_name, i.description AS item_description,
           i.available AS item_available, i.request_id AS item_request_id,
           u.id AS booker_id, u.name AS booker_name, u.email AS booker_email
    FROM bookings b
    JOIN items i ON b.item_id = i.id
    JOIN users u ON b.booker_id = u.id
"#;

fn details_from_row(row: &PgRow) -> BookingDetails {
    BookingDetails {
        id: row.get("id"),
        start: row.get("start_date"),
        end: row.get("end_date"),
        status: row.get("status"),
        item: ItemDto {
            id: row.get("item_id"),
            name: row.get("item_name"),
            description: row.get("item_description"),
            available: row.get("item_available"),
            request_id: row.get("item_request_id"),
        },
        booker: User {
            id: row.get("booker_id"),
            name: row.get("booker_name"),
            email: row.get("booker_email"),
        },
    }
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "SELECT id, start_date, end_date, item_id, booker_id, status FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    /// Get booking with item and booker embedded
    pub async fn get_details(&self, id: i64) -> AppResult<BookingDetails> {
        let query = format!("{} WHERE b.id = $1", DETAILS_SELECT);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))?;
        Ok(details_from_row(&row))
    }

    /// Create a new booking in WAITING status
    pub async fn create(
        &self,
        booker_id: i64,
        item_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO bookings (start_date, end_date, item_id, booker_id, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(item_id)
        .bind(booker_id)
        .bind(BookingStatus::Waiting)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    /// Move a WAITING booking into a terminal status. Returns false when
    /// the row was not in WAITING anymore, which is how a lost
    /// approve/reject race is observed.
    pub async fn update_status_if_waiting(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1 AND status = $3")
            .bind(id)
            .bind(status)
            .bind(BookingStatus::Waiting)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List bookings made by a user, filtered by state
    pub async fn find_for_booker(
        &self,
        user_id: i64,
        state: BookingState,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        self.find_filtered("b.booker_id", user_id, state, now, limit, offset)
            .await
    }

    /// List bookings on items owned by a user, filtered by state
    pub async fn find_for_owner(
        &self,
        user_id: i64,
        state: BookingState,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        self.find_filtered("i.owner_id", user_id, state, now, limit, offset)
            .await
    }

    async fn find_filtered(
        &self,
        subject_column: &str,
        user_id: i64,
        state: BookingState,
        now: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        let rows = match state {
            BookingState::All => {
                let query = format!(
                    "{} WHERE {} = $1 ORDER BY b.start_date DESC LIMIT $2 OFFSET $3",
                    DETAILS_SELECT, subject_column
                );
                sqlx::query(&query)
                    .bind(user_id)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            // CURRENT is returned in full, ascending
            BookingState::Current => {
                let query = format!(
                    "{} WHERE {} = $1 AND b.start_date <= $2 AND b.end_date > $2 \
                     ORDER BY b.start_date ASC",
                    DETAILS_SELECT, subject_column
                );
                sqlx::query(&query)
                    .bind(user_id)
                    .bind(now)
                    .fetch_all(&self.pool)
                    .await?
            }
            BookingState::Past => {
                let query = format!(
                    "{} WHERE {} = $1 AND b.end_date < $2 \
                     ORDER BY b.start_date DESC LIMIT $3 OFFSET $4",
                    DETAILS_SELECT, subject_column
                );
                sqlx::query(&query)
                    .bind(user_id)
                    .bind(now)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            BookingState::Future => {
                let query = format!(
                    "{} WHERE {} = $1 AND b.start_date > $2 \
                     ORDER BY b.start_date DESC LIMIT $3 OFFSET $4",
                    DETAILS_SELECT, subject_column
                );
                sqlx::query(&query)
                    .bind(user_id)
                    .bind(now)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
            BookingState::Waiting | BookingState::Rejected => {
                let status = match state {
                    BookingState::Waiting => BookingStatus::Waiting,
                    _ => BookingStatus::Rejected,
                };
                let query = format!(
                    "{} WHERE {} = $1 AND b.status = $2 \
                     ORDER BY b.start_date DESC LIMIT $3 OFFSET $4",
                    DETAILS_SELECT, subject_column
                );
                sqlx::query(&query)
                    .bind(user_id)
                    .bind(status)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.iter().map(details_from_row).collect())
    }

    /// Latest booking of an item that started before `now`
    pub async fn find_last_for_item(
        &self,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, start_date, end_date, item_id, booker_id, status
            FROM bookings
            WHERE item_id = $1 AND start_date < $2
            ORDER BY start_date DESC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    /// Earliest booking of an item starting after `now`
    pub async fn find_next_for_item(
        &self,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, start_date, end_date, item_id, booker_id, status
            FROM bookings
            WHERE item_id = $1 AND start_date > $2
            ORDER BY start_date ASC
            LIMIT 1
            "#,
        )
        .bind(item_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    /// Whether the user has an APPROVED booking of the item that already
    /// ended. This is the precondition for leaving a comment.
    pub async fn has_finished_approved(
        &self,
        booker_id: i64,
        item_id: i64,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE booker_id = $1 AND item_id = $2 AND status = $3 AND end_date < $4
            )
            "#,
        )
        .bind(booker_id)
        .bind(item_id)
        .bind(BookingStatus::Approved)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
