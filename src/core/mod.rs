pub mod account;
pub mod admin;
pub mod api;
pub mod auth;
pub mod feed;
pub mod forms;
pub mod groups;
pub mod likes;
pub mod pets;

pub use crate::domain::model::{Identified, Page, Pet, PetFilters};
pub use crate::domain::ports::{ConfigProvider, PetSource, SessionStore, ToastSink};
pub use crate::utils::error::Result;
