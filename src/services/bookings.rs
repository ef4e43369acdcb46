//! Booking lifecycle service.
//!
//! Governs creation, approval/rejection and state-filtered retrieval of
//! bookings. Unauthorized access is reported as `NotFound` throughout:
//! callers who are neither booker nor owner cannot observe that a
//! booking exists at all.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::booking::{BookingDetails, BookingState, BookingStatus, CreateBooking},
    repository::Repository,
};

/// Offset of the page window containing `from`, with page length `size`
fn page_offset(from: i64, size: i64) -> i64 {
    (from / size) * size
}

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
}

impl BookingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a booking in WAITING status
    pub async fn create(&self, booking: CreateBooking, booker_id: i64) -> AppResult<BookingDetails> {
        let booker = self.repository.users.get_by_id(booker_id).await?;
        let item = self.repository.items.get_by_id(booking.item_id).await?;

        if !item.available {
            return Err(AppError::BadRequest(
                "Item is not available for booking".to_string(),
            ));
        }

        let (start, end) = match (booking.start, booking.end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(AppError::BadRequest(
                    "Booking period is missing".to_string(),
                ))
            }
        };

        // The owner is told the item does not exist, not that the
        // operation is forbidden
        if item.owner_id == booker.id {
            return Err(AppError::NotFound(
                "Owner cannot book their own item".to_string(),
            ));
        }

        if end <= start {
            return Err(AppError::BadRequest(
                "Booking period is invalid".to_string(),
            ));
        }

        let id = self
            .repository
            .bookings
            .create(booker.id, item.id, start, end)
            .await?;

        tracing::info!("User {} booked item {} (booking {})", booker.id, item.id, id);

        self.repository.bookings.get_details(id).await
    }

    /// Approve or reject a WAITING booking. Only the item owner may
    /// decide, and only once.
    pub async fn decide(
        &self,
        booking_id: i64,
        owner_id: i64,
        approved: bool,
    ) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        let item = self.repository.items.get_by_id(booking.item_id).await?;

        if item.owner_id != owner_id {
            return Err(AppError::NotFound(format!(
                "Booking with id {} not found for user {}",
                booking_id, owner_id
            )));
        }

        if booking.status != BookingStatus::Waiting {
            return Err(AppError::BadRequest(
                "Booking has already been approved or rejected".to_string(),
            ));
        }

        let status = if approved {
            BookingStatus::Approved
        } else {
            BookingStatus::Rejected
        };

        // A concurrent decision may have landed between the read above
        // and this write; the WAITING guard in the update makes the
        // second writer fail rather than overwrite a terminal status.
        let updated = self
            .repository
            .bookings
            .update_status_if_waiting(booking_id, status)
            .await?;
        if !updated {
            return Err(AppError::BadRequest(
                "Booking has already been approved or rejected".to_string(),
            ));
        }

        tracing::info!("Booking {} moved to {}", booking_id, status);

        self.repository.bookings.get_details(booking_id).await
    }

    /// Get a booking, visible only to its booker or the item owner
    pub async fn get_by_id(&self, booking_id: i64, requester_id: i64) -> AppResult<BookingDetails> {
        let booking = self.repository.bookings.get_by_id(booking_id).await?;
        let item = self.repository.items.get_by_id(booking.item_id).await?;

        if requester_id != booking.booker_id && requester_id != item.owner_id {
            return Err(AppError::NotFound(
                "Only the booker or the item owner may view a booking".to_string(),
            ));
        }

        self.repository.bookings.get_details(booking_id).await
    }

    /// List bookings made by a user, filtered by state
    pub async fn get_all_by_user(
        &self,
        user_id: i64,
        state: &str,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        let state = self.check_listing_params(user_id, state, from, size).await?;
        self.repository
            .bookings
            .find_for_booker(user_id, state, Utc::now(), size, page_offset(from, size))
            .await
    }

    /// List bookings on items owned by a user, filtered by state
    pub async fn get_all_by_owner(
        &self,
        user_id: i64,
        state: &str,
        from: i64,
        size: i64,
    ) -> AppResult<Vec<BookingDetails>> {
        let state = self.check_listing_params(user_id, state, from, size).await?;
        self.repository
            .bookings
            .find_for_owner(user_id, state, Utc::now(), size, page_offset(from, size))
            .await
    }

    async fn check_listing_params(
        &self,
        user_id: i64,
        state: &str,
        from: i64,
        size: i64,
    ) -> AppResult<BookingState> {
        if from < 0 || size <= 0 {
            return Err(AppError::BadRequest(
                "Invalid pagination parameters".to_string(),
            ));
        }

        let state: BookingState = state
            .parse()
            .map_err(|_| AppError::BadRequest("Unknown state: UNSUPPORTED_STATUS".to_string()))?;

        self.repository.users.get_by_id(user_id).await?;

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_snaps_to_page_boundary() {
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(5, 10), 0);
        assert_eq!(page_offset(10, 10), 10);
        assert_eq!(page_offset(25, 10), 20);
        assert_eq!(page_offset(7, 3), 6);
    }
}
