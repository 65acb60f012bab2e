use crate::core::api::ApiClient;
use crate::core::forms::{GroupForm, PostForm};
use crate::domain::model::{Group, LikeStatus, Listing, Page, Post, User};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde_json::json;

#[derive(Debug, Clone, Default)]
pub struct GroupQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl GroupQuery {
    fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_string()));
        }
        if let Some(category) = self.category.as_deref().filter(|s| !s.trim().is_empty()) {
            query.push(("category", category.trim().to_string()));
        }
        query.push(("page", self.page.max(1).to_string()));
        if self.limit > 0 {
            query.push(("limit", self.limit.to_string()));
        }
        query
    }
}

#[derive(Clone)]
pub struct GroupsService {
    api: ApiClient,
}

impl GroupsService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &GroupQuery) -> Result<Page<Group>> {
        self.api.get_with_query("/groups", &query.to_query()).await
    }

    pub async fn get(&self, id: &str) -> Result<Group> {
        self.api.get(&format!("/groups/{}", id)).await
    }

    pub async fn mine(&self) -> Result<Vec<Group>> {
        let listing: Listing<Group> = self.api.get("/groups/my-groups").await?;
        Ok(listing.into_vec())
    }

    pub async fn create(&self, form: &GroupForm) -> Result<Group> {
        form.validate()?;
        let group: Group = self.api.post("/groups", form).await?;
        tracing::info!("Created group {} ({})", group.name, group.id);
        Ok(group)
    }

    pub async fn update(&self, id: &str, form: &GroupForm) -> Result<Group> {
        form.validate()?;
        self.api.put(&format!("/groups/{}", id), form).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/groups/{}", id)).await?;
        tracing::info!("Deleted group {}", id);
        Ok(())
    }

    pub async fn join(&self, id: &str) -> Result<Group> {
        self.api.post(&format!("/groups/{}/join", id), &json!({})).await
    }

    pub async fn leave(&self, id: &str) -> Result<Group> {
        self.api.post(&format!("/groups/{}/leave", id), &json!({})).await
    }

    pub async fn members(&self, id: &str) -> Result<Vec<User>> {
        let listing: Listing<User> = self.api.get(&format!("/groups/{}/members", id)).await?;
        Ok(listing.into_vec())
    }

    pub async fn posts(&self, id: &str) -> Result<Vec<Post>> {
        let listing: Listing<Post> = self.api.get(&format!("/groups/{}/posts", id)).await?;
        Ok(listing.into_vec())
    }

    pub async fn create_post(&self, group_id: &str, form: &PostForm) -> Result<Post> {
        form.validate()?;
        self.api
            .post(&format!("/groups/{}/posts", group_id), form)
            .await
    }

    pub async fn delete_post(&self, group_id: &str, post_id: &str) -> Result<()> {
        self.api
            .delete(&format!("/groups/{}/posts/{}", group_id, post_id))
            .await
    }

    pub async fn like_post(&self, group_id: &str, post_id: &str) -> Result<LikeStatus> {
        self.api
            .post(
                &format!("/groups/{}/posts/{}/like", group_id, post_id),
                &json!({}),
            )
            .await
    }
}
