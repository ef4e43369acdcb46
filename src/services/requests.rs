//! Item request management service

use crate::{
    error::{AppError, AppResult},
    models::request::{CreateItemRequest, ItemRequest, ItemRequestDto},
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Post a new item request
    pub async fn create(
        &self,
        request: CreateItemRequest,
        user_id: i64,
    ) -> AppResult<ItemRequestDto> {
        let requester = self.repository.users.get_by_id(user_id).await?;
        let created = self
            .repository
            .requests
            .create(requester.id, &request.description)
            .await?;
        tracing::info!("User {} posted request {}", requester.id, created.id);
        self.to_dto(created).await
    }

    /// List the caller's own requests, oldest first
    pub async fn get_all_by_user(&self, user_id: i64) -> AppResult<Vec<ItemRequestDto>> {
        self.repository.users.get_by_id(user_id).await?;

        let requests = self.repository.requests.find_by_requester(user_id).await?;
        self.to_dtos(requests).await
    }

    /// List the requests the caller's listed items were posted against.
    /// The page window is validated but the listing is returned in full.
    pub async fn get_all(&self, user_id: i64, from: i64, size: i64) -> AppResult<Vec<ItemRequestDto>> {
        if from < 0 || size <= 0 {
            return Err(AppError::BadRequest(
                "Invalid pagination parameters".to_string(),
            ));
        }

        self.repository.users.get_by_id(user_id).await?;

        let requests = self
            .repository
            .requests
            .find_fulfilled_by_owner(user_id)
            .await?;
        self.to_dtos(requests).await
    }

    /// Get a single request with the items fulfilling it
    pub async fn get_by_id(&self, user_id: i64, request_id: i64) -> AppResult<ItemRequestDto> {
        self.repository.users.get_by_id(user_id).await?;

        let request = self.repository.requests.get_by_id(request_id).await?;
        self.to_dto(request).await
    }

    async fn to_dtos(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<ItemRequestDto>> {
        let mut dtos = Vec::with_capacity(requests.len());
        for request in requests {
            dtos.push(self.to_dto(request).await?);
        }
        Ok(dtos)
    }

    async fn to_dto(&self, request: ItemRequest) -> AppResult<ItemRequestDto> {
        let items = self
            .repository
            .items
            .find_by_request(request.id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(ItemRequestDto {
            id: request.id,
            description: request.description,
            created: request.created,
            items,
        })
    }
}
