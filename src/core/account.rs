use crate::core::api::ApiClient;
use crate::core::forms::{PasswordChange, ProfileUpdate};
use crate::domain::model::User;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use serde_json::json;
use std::path::Path;

/// 個人資料與帳號設定
#[derive(Clone)]
pub struct AccountService {
    api: ApiClient,
}

impl AccountService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn profile(&self) -> Result<User> {
        self.api.get("/auth/me").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        update.validate()?;
        let user: User = self.api.put("/auth/profile", update).await?;
        self.sync_session_user(&user)?;
        Ok(user)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> Result<()> {
        change.validate()?;
        let _: serde_json::Value = self
            .api
            .put(
                "/auth/password",
                &json!({
                    "currentPassword": change.current_password,
                    "newPassword": change.new_password,
                }),
            )
            .await?;
        tracing::info!("Password changed");
        Ok(())
    }

    /// 上傳頭像後同步更新個人資料
    pub async fn upload_avatar(&self, file: &Path) -> Result<User> {
        crate::utils::validation::validate_file_extensions(
            "avatar",
            &[file.to_string_lossy()],
            crate::core::forms::IMAGE_EXTENSIONS,
        )?;
        let url = self.api.upload_file("/upload/avatar", "avatar", file).await?;
        tracing::debug!("Avatar uploaded to {}", url);

        self.update_profile(&ProfileUpdate {
            avatar: Some(url),
            ..Default::default()
        })
        .await
    }

    pub async fn delete_account(&self) -> Result<()> {
        self.api.delete("/auth/account").await?;
        self.api.session().clear()?;
        tracing::info!("Account deleted, session cleared");
        Ok(())
    }

    fn sync_session_user(&self, user: &User) -> Result<()> {
        if let Some(mut session) = self.api.session().load()? {
            session.user = Some(user.clone());
            self.api.session().save(&session)?;
        }
        Ok(())
    }
}
