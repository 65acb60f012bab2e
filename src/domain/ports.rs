use crate::domain::model::{Insights, LikeStatus, Page, Pet, PetFilters, PetStats, Session};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 登入狀態的持久化位置（相當於瀏覽器的 local storage）
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
    fn page_size(&self) -> u32;
    fn featured_limit(&self) -> u32;
    fn session_file(&self) -> &str;
    fn default_location(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
}

pub trait ToastSink: Send + Sync {
    fn push(&self, toast: Toast);

    fn success(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.push(Toast {
            level: ToastLevel::Success,
            message: message.into(),
        });
    }

    fn info(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.push(Toast {
            level: ToastLevel::Info,
            message: message.into(),
        });
    }

    fn error(&self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.push(Toast {
            level: ToastLevel::Error,
            message: message.into(),
        });
    }
}

/// 探索頁所需的寵物資料來源
#[async_trait]
pub trait PetSource: Send + Sync {
    async fn list_pets(&self, filters: &PetFilters, page: u32, limit: u32) -> Result<Page<Pet>>;
    async fn trending(&self, limit: u32) -> Result<Vec<Pet>>;
    async fn recommended(&self, limit: u32) -> Result<Vec<Pet>>;
    async fn nearby(&self, location: Option<&str>, limit: u32) -> Result<Vec<Pet>>;
    async fn stats(&self) -> Result<PetStats>;
    async fn insights(&self) -> Result<Insights>;
    async fn toggle_like(&self, pet_id: &str) -> Result<LikeStatus>;
}
