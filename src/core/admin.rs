use crate::core::api::ApiClient;
use crate::core::auth::AuthContext;
use crate::domain::model::{AdminStats, Page, Pet, PetStatus, Role, User};
use crate::utils::error::{ClientError, Result};
use serde_json::json;

/// 管理後台；只有管理員身分才能建立
#[derive(Clone)]
pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn for_session(auth: &AuthContext) -> Result<Self> {
        if !auth.is_admin()? {
            return Err(ClientError::ForbiddenError {
                message: "administrator role required".to_string(),
            });
        }
        Ok(Self {
            api: auth.api().clone(),
        })
    }

    pub async fn stats(&self) -> Result<AdminStats> {
        self.api.get("/admin/stats").await
    }

    pub async fn users(&self, page: u32, search: Option<&str>) -> Result<Page<User>> {
        let mut query = vec![("page", page.max(1).to_string())];
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.trim().to_string()));
        }
        self.api.get_with_query("/admin/users", &query).await
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<User> {
        tracing::info!("Setting role of {} to {:?}", user_id, role);
        self.api
            .put(&format!("/admin/users/{}/role", user_id), &json!({ "role": role }))
            .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        tracing::info!("Deleting user {}", user_id);
        self.api.delete(&format!("/admin/users/{}", user_id)).await
    }

    pub async fn pets(&self, status: Option<PetStatus>, page: u32) -> Result<Page<Pet>> {
        let mut query = vec![("page", page.max(1).to_string())];
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        self.api.get_with_query("/admin/pets", &query).await
    }

    pub async fn set_pet_status(&self, pet_id: &str, status: PetStatus) -> Result<Pet> {
        tracing::info!("Setting status of pet {} to {}", pet_id, status.as_str());
        self.api
            .put(
                &format!("/admin/pets/{}/status", pet_id),
                &json!({ "status": status }),
            )
            .await
    }

    pub async fn delete_pet(&self, pet_id: &str) -> Result<()> {
        tracing::info!("Removing pet {}", pet_id);
        self.api.delete(&format!("/admin/pets/{}", pet_id)).await
    }
}
