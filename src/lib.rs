pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::{Cli, Command};

pub use crate::adapters::{ConsoleToasts, FileSessionStore, MemorySessionStore, ToastLog};
pub use crate::config::ClientConfig;
pub use crate::core::{
    api::ApiClient,
    auth::{AuthContext, Navigation, Route},
    feed::{exclude_featured, DiscoveryFeed, FeedOptions},
    pets::PetsService,
};
pub use crate::utils::error::{ClientError, Result};
