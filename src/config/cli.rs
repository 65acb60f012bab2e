use crate::config::ClientConfig;
use crate::core::auth::Route;
use crate::core::forms::PetForm;
use crate::domain::model::{PetFilters, PetStatus, Role};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pet-adopt")]
#[command(about = "Browse, post and manage adoptable pets from the terminal")]
pub struct Cli {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Base URL of the REST API")]
    pub api_base_url: Option<String>,

    #[arg(long, global = true, help = "Where the login session is stored")]
    pub session_file: Option<String>,

    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    #[arg(long, global = true)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// 讀取設定檔（若有），再以命令列參數覆蓋
    pub fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };

        if let Some(url) = &self.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(path) = &self.session_file {
            config.session_file = path.clone();
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, help = "Defaults to --password")]
        confirm_password: Option<String>,
    },
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Discovery feed: featured sections plus the filtered listing
    Feed {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, help = "Local search over the loaded page")]
        search: Option<String>,
    },
    Pets {
        #[command(subcommand)]
        command: PetCommand,
    },
    Favorites,
    Groups {
        #[command(subcommand)]
        command: GroupCommand,
    },
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

impl Command {
    /// 對應的頁面路由，用於登入檢查
    pub fn route(&self) -> Route {
        match self {
            Command::Login { .. } => Route::Login,
            Command::Register { .. } => Route::Register,
            Command::Logout | Command::Whoami | Command::Account { .. } => Route::Account,
            Command::Feed { .. } => Route::Home,
            Command::Favorites => Route::Favorites,
            Command::Pets { command } => match command {
                PetCommand::List { .. } | PetCommand::Nearby { .. } => Route::Home,
                PetCommand::Show { id } => Route::PetDetail(id.clone()),
                PetCommand::Like { .. } => Route::Favorites,
                PetCommand::Post(_) => Route::PostPet,
                PetCommand::Edit { id, .. } | PetCommand::Delete { id } => {
                    Route::EditPet(id.clone())
                }
                PetCommand::Mine => Route::MyPets,
            },
            Command::Groups { command } => match command {
                GroupCommand::List { .. } => Route::Groups,
                GroupCommand::Show { id }
                | GroupCommand::Members { id }
                | GroupCommand::Posts { id } => Route::GroupDetail(id.clone()),
                _ => Route::Profile,
            },
            Command::Admin { .. } => Route::Admin,
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    #[arg(long)]
    pub species: Option<String>,
    #[arg(long)]
    pub breed: Option<String>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub age_min: Option<u32>,
    #[arg(long)]
    pub age_max: Option<u32>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub status: Option<PetStatus>,
    #[arg(long)]
    pub sort: Option<String>,
}

impl From<FilterArgs> for PetFilters {
    fn from(args: FilterArgs) -> Self {
        PetFilters {
            species: args.species,
            breed: args.breed,
            gender: args.gender,
            size: args.size,
            age_min: args.age_min,
            age_max: args.age_max,
            location: args.location,
            status: args.status,
            sort: args.sort,
            search: None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct PetArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub species: String,
    #[arg(long)]
    pub breed: Option<String>,
    #[arg(long)]
    pub age: Option<u32>,
    #[arg(long)]
    pub gender: Option<String>,
    #[arg(long)]
    pub size: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub status: Option<PetStatus>,
    #[arg(long = "image", help = "Image file; repeat for several")]
    pub images: Vec<PathBuf>,
}

impl From<PetArgs> for PetForm {
    fn from(args: PetArgs) -> Self {
        PetForm {
            name: args.name,
            species: args.species,
            breed: args.breed,
            age: args.age,
            gender: args.gender,
            size: args.size,
            location: args.location,
            description: args.description,
            status: args.status,
            images: args.images,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum PetCommand {
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, help = "Server-side search term")]
        search: Option<String>,
    },
    Show {
        id: String,
    },
    /// Pets near a location (defaults to `default_location`)
    Nearby {
        #[arg(long)]
        location: Option<String>,
    },
    /// Like or unlike a pet
    Like {
        id: String,
    },
    Post(PetArgs),
    Edit {
        id: String,
        #[command(flatten)]
        pet: PetArgs,
    },
    Delete {
        id: String,
    },
    Mine,
}

#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show {
        id: String,
    },
    Mine,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        category: String,
    },
    Delete {
        id: String,
    },
    Join {
        id: String,
    },
    Leave {
        id: String,
    },
    Members {
        id: String,
    },
    Posts {
        id: String,
    },
    /// Write a post in a group
    Post {
        id: String,
        #[arg(long)]
        content: String,
    },
    DeletePost {
        group_id: String,
        post_id: String,
    },
    LikePost {
        group_id: String,
        post_id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    Show,
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        bio: Option<String>,
    },
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long, help = "Defaults to --new")]
        confirm: Option<String>,
    },
    Avatar {
        path: PathBuf,
    },
    Delete {
        #[arg(long, help = "Confirm account deletion")]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    Stats,
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        search: Option<String>,
    },
    Role {
        user_id: String,
        role: Role,
    },
    DeleteUser {
        user_id: String,
    },
    Pets {
        #[arg(long)]
        status: Option<PetStatus>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    PetStatus {
        pet_id: String,
        status: PetStatus,
    },
    DeletePet {
        pet_id: String,
    },
}
