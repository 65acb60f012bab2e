use clap::Parser;
use pet_adopt::config::cli::{
    AccountCommand, AdminCommand, Cli, Command, GroupCommand, PetCommand,
};
use pet_adopt::core::account::AccountService;
use pet_adopt::core::admin::AdminService;
use pet_adopt::core::forms::{
    GroupForm, LoginForm, PasswordChange, PostForm, ProfileUpdate, RegisterForm,
};
use pet_adopt::core::groups::{GroupQuery, GroupsService};
use pet_adopt::core::likes::toggle_pet_like;
use pet_adopt::domain::model::{Pet, PetFilters};
use pet_adopt::domain::ports::{ConfigProvider, PetSource, ToastSink};
use pet_adopt::utils::error::ErrorSeverity;
use pet_adopt::utils::{logger, validation::Validate};
use pet_adopt::{
    ApiClient, AuthContext, ClientConfig, ConsoleToasts, DiscoveryFeed, FeedOptions,
    FileSessionStore, PetsService,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pet-adopt CLI");
    tracing::debug!("Command route: {}", cli.command.route().path());

    let result = match cli.client_config() {
        Ok(config) => match config.validate() {
            Ok(()) => run(cli.command, config).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 2,
            ErrorSeverity::Medium => 3,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 4,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(command: Command, config: ClientConfig) -> pet_adopt::Result<()> {
    let store = Arc::new(FileSessionStore::new(config.session_file()));
    let api = ApiClient::new(&config, store)?;
    let auth = AuthContext::new(api.clone());
    let toasts = ConsoleToasts;

    if let Err(e) = auth.require(&command.route()) {
        if e.is_unauthorized() {
            eprintln!("🔒 Please log in first: pet-adopt login --email <EMAIL> --password <PW>");
        }
        return Err(e);
    }

    match command {
        Command::Login { email, password } => {
            let user = auth.login(&LoginForm { email, password }).await?;
            toasts.success(format!("Welcome back, {}!", user.name));
        }
        Command::Register {
            name,
            email,
            password,
            confirm_password,
        } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            let user = auth
                .register(&RegisterForm {
                    name,
                    email,
                    password,
                    confirm_password,
                })
                .await?;
            toasts.success(format!("Account created for {}", user.email));
        }
        Command::Logout => {
            auth.logout()?;
            toasts.success("Logged out");
        }
        Command::Whoami => match auth.refresh_user().await? {
            Some(user) => println!("👤 {} <{}> ({:?})", user.name, user.email, user.role),
            None => println!("Not logged in"),
        },
        Command::Feed {
            filters,
            page,
            search,
        } => {
            let options = FeedOptions {
                page_size: config.page_size(),
                featured_limit: config.featured_limit(),
                location: config.default_location().map(str::to_string),
            };
            let mut feed = DiscoveryFeed::new(PetsService::new(api), toasts, options);
            *feed.filters_mut() = filters.into();
            feed.load_featured().await;
            feed.apply_filters().await?;
            if page > 1 && !feed.go_to_page(page).await? {
                toasts.info(format!("Page {} is out of range (1-{})", page, feed.pages()));
            }
            if let Some(search) = search {
                feed.set_search(search);
            }
            print_feed(&feed);
        }
        Command::Pets { command } => {
            run_pets(command, PetsService::new(api), toasts, &config).await?
        }
        Command::Favorites => {
            let pets = PetsService::new(api).favorites().await?;
            print_pet_list("❤️  Favorites", &pets.iter().collect::<Vec<_>>());
        }
        Command::Groups { command } => run_groups(command, GroupsService::new(api), toasts).await?,
        Command::Account { command } => {
            run_account(command, AccountService::new(api), toasts).await?
        }
        Command::Admin { command } => {
            run_admin(command, AdminService::for_session(&auth)?, toasts).await?
        }
    }

    Ok(())
}

async fn run_pets(
    command: PetCommand,
    pets: PetsService,
    toasts: ConsoleToasts,
    config: &ClientConfig,
) -> pet_adopt::Result<()> {
    match command {
        PetCommand::List {
            filters,
            page,
            search,
        } => {
            let mut filters: PetFilters = filters.into();
            filters.search = search;
            let result = pets.list(&filters, page, config.page_size()).await?;
            let title = format!(
                "🐾 Pets (page {}/{}, {} total)",
                result.page, result.pages, result.total
            );
            print_pet_list(&title, &result.items.iter().collect::<Vec<_>>());
        }
        PetCommand::Show { id } => {
            let pet = pets.get(&id).await?;
            print_pet_detail(&pet);
        }
        PetCommand::Nearby { location } => {
            let location = config.nearby_location(location)?;
            let nearby = pets.nearby(Some(&location), config.featured_limit()).await?;
            print_pet_list(&format!("📍 Near {}", location), &nearby.iter().collect::<Vec<_>>());
        }
        PetCommand::Like { id } => {
            let mut pet = pets.get(&id).await?;
            let state = toggle_pet_like(&pets, &toasts, &mut pet).await?;
            let verb = if state.is_liked { "Liked" } else { "Unliked" };
            toasts.success(format!("{} {} ({} likes)", verb, pet.name, state.like_count));
        }
        PetCommand::Post(args) => {
            let pet = pets.create(&args.into()).await?;
            toasts.success(format!("Posted {} ({})", pet.name, pet.id));
        }
        PetCommand::Edit { id, pet } => {
            let pet = pets.update(&id, &pet.into()).await?;
            toasts.success(format!("Updated {}", pet.name));
        }
        PetCommand::Delete { id } => {
            pets.delete(&id).await?;
            toasts.success("Pet deleted");
        }
        PetCommand::Mine => {
            let mine = pets.my_pets().await?;
            print_pet_list("📋 My pets", &mine.iter().collect::<Vec<_>>());
        }
    }
    Ok(())
}

async fn run_groups(
    command: GroupCommand,
    groups: GroupsService,
    toasts: ConsoleToasts,
) -> pet_adopt::Result<()> {
    match command {
        GroupCommand::List {
            search,
            category,
            page,
        } => {
            let result = groups
                .list(&GroupQuery {
                    search,
                    category,
                    page,
                    limit: 0,
                })
                .await?;
            println!("👥 Groups (page {}/{})", result.page, result.pages);
            for group in &result.items {
                let joined = if group.is_member { " ✓" } else { "" };
                println!(
                    "  {}  {} [{}] · {} members{}",
                    group.id,
                    group.name,
                    group.category.as_deref().unwrap_or("general"),
                    group.member_count,
                    joined
                );
            }
        }
        GroupCommand::Show { id } => {
            let group = groups.get(&id).await?;
            println!("👥 {} ({} members)", group.name, group.member_count);
            if let Some(description) = &group.description {
                println!("{}", description);
            }
        }
        GroupCommand::Mine => {
            for group in groups.mine().await? {
                println!("  {}  {}", group.id, group.name);
            }
        }
        GroupCommand::Create {
            name,
            description,
            category,
        } => {
            let group = groups
                .create(&GroupForm {
                    name,
                    description,
                    category,
                    image: None,
                })
                .await?;
            toasts.success(format!("Created group {} ({})", group.name, group.id));
        }
        GroupCommand::Delete { id } => {
            groups.delete(&id).await?;
            toasts.success("Group deleted");
        }
        GroupCommand::Join { id } => {
            let group = groups.join(&id).await?;
            toasts.success(format!("Joined {}", group.name));
        }
        GroupCommand::Leave { id } => {
            let group = groups.leave(&id).await?;
            toasts.success(format!("Left {}", group.name));
        }
        GroupCommand::Members { id } => {
            for member in groups.members(&id).await? {
                println!("  {}  {}", member.id, member.name);
            }
        }
        GroupCommand::Posts { id } => {
            for post in groups.posts(&id).await? {
                println!(
                    "  [{}] {}: {} (♥ {})",
                    post.id,
                    post.author_name().unwrap_or("unknown"),
                    post.content,
                    post.like_count
                );
            }
        }
        GroupCommand::Post { id, content } => {
            let post = groups.create_post(&id, &PostForm { content }).await?;
            toasts.success(format!("Posted ({})", post.id));
        }
        GroupCommand::DeletePost { group_id, post_id } => {
            groups.delete_post(&group_id, &post_id).await?;
            toasts.success("Post deleted");
        }
        GroupCommand::LikePost { group_id, post_id } => {
            let status = groups.like_post(&group_id, &post_id).await?;
            toasts.success(format!("♥ {}", status.like_count));
        }
    }
    Ok(())
}

async fn run_account(
    command: AccountCommand,
    account: AccountService,
    toasts: ConsoleToasts,
) -> pet_adopt::Result<()> {
    match command {
        AccountCommand::Show => {
            let user = account.profile().await?;
            println!("👤 {} <{}>", user.name, user.email);
            println!("   role: {:?}", user.role);
            if let Some(location) = &user.location {
                println!("   location: {}", location);
            }
            if let Some(bio) = &user.bio {
                println!("   bio: {}", bio);
            }
        }
        AccountCommand::Update {
            name,
            location,
            bio,
        } => {
            let user = account
                .update_profile(&ProfileUpdate {
                    name,
                    location,
                    bio,
                    avatar: None,
                })
                .await?;
            toasts.success(format!("Profile updated for {}", user.name));
        }
        AccountCommand::Password {
            current,
            new,
            confirm,
        } => {
            let confirm_password = confirm.unwrap_or_else(|| new.clone());
            account
                .change_password(&PasswordChange {
                    current_password: current,
                    new_password: new,
                    confirm_password,
                })
                .await?;
            toasts.success("Password changed");
        }
        AccountCommand::Avatar { path } => {
            account.upload_avatar(&path).await?;
            toasts.success("Avatar updated");
        }
        AccountCommand::Delete { yes } => {
            if !yes {
                toasts.info("Re-run with --yes to permanently delete your account");
                return Ok(());
            }
            account.delete_account().await?;
            toasts.success("Account deleted");
        }
    }
    Ok(())
}

async fn run_admin(
    command: AdminCommand,
    admin: AdminService,
    toasts: ConsoleToasts,
) -> pet_adopt::Result<()> {
    match command {
        AdminCommand::Stats => {
            let stats = admin.stats().await?;
            println!("📊 Users: {}", stats.total_users);
            println!(
                "📊 Pets: {} (adopted {}, pending {})",
                stats.total_pets, stats.adopted_pets, stats.pending_pets
            );
            println!("📊 Groups: {}", stats.total_groups);
        }
        AdminCommand::Users { page, search } => {
            let users = admin.users(page, search.as_deref()).await?;
            println!("👥 Users (page {}/{})", users.page, users.pages);
            for user in &users.items {
                println!("  {}  {} <{}> {:?}", user.id, user.name, user.email, user.role);
            }
        }
        AdminCommand::Role { user_id, role } => {
            let user = admin.set_role(&user_id, role).await?;
            toasts.success(format!("{} is now {:?}", user.name, user.role));
        }
        AdminCommand::DeleteUser { user_id } => {
            admin.delete_user(&user_id).await?;
            toasts.success("User deleted");
        }
        AdminCommand::Pets { status, page } => {
            let pets = admin.pets(status, page).await?;
            print_pet_list(
                &format!("🐾 Pets (page {}/{})", pets.page, pets.pages),
                &pets.items.iter().collect::<Vec<_>>(),
            );
        }
        AdminCommand::PetStatus { pet_id, status } => {
            let pet = admin.set_pet_status(&pet_id, status).await?;
            toasts.success(format!("{} is now {}", pet.name, pet.status.as_str()));
        }
        AdminCommand::DeletePet { pet_id } => {
            admin.delete_pet(&pet_id).await?;
            toasts.success("Pet removed");
        }
    }
    Ok(())
}

fn print_feed(feed: &DiscoveryFeed<PetsService, ConsoleToasts>) {
    if feed.stats().error.is_none() {
        let stats = &feed.stats().data;
        println!(
            "📊 {} pets · {} available · {} adopted · {} new this week",
            stats.total_pets, stats.available, stats.adopted, stats.new_this_week
        );
    }

    let sections = [
        ("🔥 Trending", feed.trending()),
        ("⭐ Recommended", feed.recommended()),
        ("📍 Nearby", feed.nearby()),
    ];
    for (title, section) in sections {
        if !section.data.is_empty() {
            print_pet_list(title, &section.data.iter().collect::<Vec<_>>());
        }
    }

    print_pet_list(
        &format!("🐾 All pets (page {}/{}, {} total)", feed.page(), feed.pages(), feed.total()),
        &feed.main_grid(),
    );
}

fn print_pet_list(title: &str, pets: &[&Pet]) {
    println!("{}", title);
    if pets.is_empty() {
        println!("  (none)");
        return;
    }
    for pet in pets {
        let heart = if pet.is_liked { "♥" } else { "♡" };
        println!(
            "  {}  {:<16} {:<10} {:<18} {:<10} {} {}",
            pet.id,
            pet.name,
            pet.species,
            pet.breed.as_deref().unwrap_or("-"),
            pet.status.as_str(),
            heart,
            pet.like_count
        );
    }
}

fn print_pet_detail(pet: &Pet) {
    println!("🐾 {} ({})", pet.name, pet.id);
    println!("   species: {}", pet.species);
    if let Some(breed) = &pet.breed {
        println!("   breed: {}", breed);
    }
    if let Some(age) = pet.age {
        println!("   age: {}", age);
    }
    if let Some(location) = &pet.location {
        println!("   location: {}", location);
    }
    println!("   status: {}", pet.status.as_str());
    println!("   likes: {}", pet.like_count);
    if let Some(description) = &pet.description {
        println!("\n{}", description);
    }
    for image in &pet.images {
        println!("   🖼  {}", image);
    }
}
