//! Item management service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        comment::{CommentDto, CreateComment},
        item::{CreateItem, Item, ItemDetails, UpdateItem},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List a new item for sharing
    pub async fn create(&self, item: CreateItem, owner_id: i64) -> AppResult<Item> {
        let owner = self.repository.users.get_by_id(owner_id).await?;

        if let Some(request_id) = item.request_id {
            self.repository.requests.get_by_id(request_id).await?;
        }

        let created = self.repository.items.create(owner.id, &item).await?;
        tracing::info!("User {} listed item {}", owner.id, created.id);
        Ok(created)
    }

    /// Partially update an item. Only the owner may update; anyone else
    /// is told the item does not exist.
    pub async fn update(&self, item_id: i64, item: UpdateItem, user_id: i64) -> AppResult<Item> {
        let existing = self.repository.items.get_by_id(item_id).await?;

        if existing.owner_id != user_id {
            return Err(AppError::NotFound(
                "Cannot update another user's item".to_string(),
            ));
        }

        self.repository
            .items
            .update(
                item_id,
                item.name.as_deref(),
                item.description.as_deref(),
                item.available,
            )
            .await
    }

    /// Get an item with its comments; the owner additionally sees the
    /// item's last and next booking
    pub async fn get_by_id(&self, item_id: i64, user_id: i64) -> AppResult<ItemDetails> {
        let item = self.repository.items.get_by_id(item_id).await?;
        self.enrich(item, user_id).await
    }

    /// List the caller's items with comments and adjacent bookings
    pub async fn get_all(&self, user_id: i64) -> AppResult<Vec<ItemDetails>> {
        let items = self.repository.items.find_by_owner(user_id).await?;

        let mut details = Vec::with_capacity(items.len());
        for item in items {
            details.push(self.enrich(item, user_id).await?);
        }
        Ok(details)
    }

    /// Search available items by name or description substring.
    /// A blank query matches nothing.
    pub async fn search(&self, text: &str) -> AppResult<Vec<Item>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        self.repository.items.search(text).await
    }

    /// Leave a comment on an item. Permitted only after a finished
    /// approved booking of that item by the author.
    pub async fn create_comment(
        &self,
        user_id: i64,
        item_id: i64,
        comment: CreateComment,
    ) -> AppResult<CommentDto> {
        let author = self.repository.users.get_by_id(user_id).await?;
        let item = self.repository.items.get_by_id(item_id).await?;

        let has_booked = self
            .repository
            .bookings
            .has_finished_approved(author.id, item.id, Utc::now())
            .await?;
        if !has_booked {
            return Err(AppError::BadRequest(
                "User has no finished bookings of this item".to_string(),
            ));
        }

        self.repository
            .comments
            .create(item.id, author.id, &comment.text)
            .await
    }

    async fn enrich(&self, item: Item, user_id: i64) -> AppResult<ItemDetails> {
        let comments = self.repository.comments.find_by_item(item.id).await?;

        let (mut last_booking, mut next_booking) = (None, None);
        if item.owner_id == user_id {
            let now = Utc::now();
            last_booking = self
                .repository
                .bookings
                .find_last_for_item(item.id, now)
                .await?
                .map(Into::into);
            // The next booking is only reported alongside a previous one
            if last_booking.is_some() {
                next_booking = self
                    .repository
                    .bookings
                    .find_next_for_item(item.id, now)
                    .await?
                    .map(Into::into);
            }
        }

        Ok(ItemDetails {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            request_id: item.request_id,
            last_booking,
            next_booking,
            comments,
        })
    }
}
