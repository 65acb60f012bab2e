use crate::core::api::ApiClient;
use crate::core::forms::PetForm;
use crate::domain::model::{Insights, LikeStatus, Listing, Page, Pet, PetFilters, PetStats};
use crate::domain::ports::PetSource;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use async_trait::async_trait;
use reqwest::Method;
use std::path::Path;

#[derive(Clone)]
pub struct PetsService {
    api: ApiClient,
}

impl PetsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, filters: &PetFilters, page: u32, limit: u32) -> Result<Page<Pet>> {
        let mut query = filters.to_query();
        query.push(("page", page.to_string()));
        query.push(("limit", limit.to_string()));

        let result: Page<Pet> = self.api.get_with_query("/pets", &query).await?;
        tracing::debug!(
            "Fetched {} pets (page {}/{}, total {})",
            result.items.len(),
            result.page,
            result.pages,
            result.total
        );
        Ok(result)
    }

    pub async fn get(&self, id: &str) -> Result<Pet> {
        self.api.get(&format!("/pets/{}", id)).await
    }

    pub async fn create(&self, form: &PetForm) -> Result<Pet> {
        form.validate()?;
        let multipart = form.to_multipart().await?;
        let pet: Pet = self
            .api
            .send_multipart(Method::POST, "/pets", multipart)
            .await?;
        tracing::info!("Created pet {} ({})", pet.name, pet.id);
        Ok(pet)
    }

    pub async fn update(&self, id: &str, form: &PetForm) -> Result<Pet> {
        form.validate()?;
        let multipart = form.to_multipart().await?;
        let pet: Pet = self
            .api
            .send_multipart(Method::PUT, &format!("/pets/{}", id), multipart)
            .await?;
        tracing::info!("Updated pet {}", pet.id);
        Ok(pet)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/pets/{}", id)).await?;
        tracing::info!("Deleted pet {}", id);
        Ok(())
    }

    pub async fn favorites(&self) -> Result<Vec<Pet>> {
        let listing: Listing<Pet> = self.api.get("/pets/favorites").await?;
        Ok(listing.into_vec())
    }

    pub async fn my_pets(&self) -> Result<Vec<Pet>> {
        let listing: Listing<Pet> = self.api.get("/pets/my-pets").await?;
        Ok(listing.into_vec())
    }

    pub async fn upload_image(&self, file: &Path) -> Result<String> {
        self.api.upload_file("/upload/image", "image", file).await
    }

    async fn featured(&self, path: &str, query: &[(&str, String)]) -> Result<Vec<Pet>> {
        let listing: Listing<Pet> = self.api.get_with_query(path, query).await?;
        Ok(listing.into_vec())
    }
}

#[async_trait]
impl PetSource for PetsService {
    async fn list_pets(&self, filters: &PetFilters, page: u32, limit: u32) -> Result<Page<Pet>> {
        self.list(filters, page, limit).await
    }

    async fn trending(&self, limit: u32) -> Result<Vec<Pet>> {
        self.featured("/pets/trending", &[("limit", limit.to_string())])
            .await
    }

    async fn recommended(&self, limit: u32) -> Result<Vec<Pet>> {
        self.featured("/pets/recommended", &[("limit", limit.to_string())])
            .await
    }

    async fn nearby(&self, location: Option<&str>, limit: u32) -> Result<Vec<Pet>> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(location) = location.filter(|l| !l.trim().is_empty()) {
            query.push(("location", location.trim().to_string()));
        }
        self.featured("/pets/nearby", &query).await
    }

    async fn stats(&self) -> Result<PetStats> {
        self.api.get("/pets/stats").await
    }

    async fn insights(&self) -> Result<Insights> {
        self.api.get("/pets/insights").await
    }

    async fn toggle_like(&self, pet_id: &str) -> Result<LikeStatus> {
        self.api
            .post(&format!("/pets/{}/like", pet_id), &serde_json::json!({}))
            .await
    }
}
