mod cli;

use foodie::config::{self, Config};
use foodie::storage::OverwriteStorage;
use foodie::users::UserService;
use foodie_db::pool::{get_conn, init_pool, open_read_only, DbPool};
use foodie_db::queries::{base_users, menus};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise pick defaults from the verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "foodie=debug,foodie_db=debug".to_string()
        } else {
            "foodie=info,foodie_db=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Migrate => migrate(cli.config.as_deref()),
        Commands::CreateUser {
            email,
            first_name,
            last_name,
            role,
        } => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            let service = user_service(&config)?;
            let named = service.register(
                &email,
                first_name.as_deref(),
                last_name.as_deref(),
                role.into(),
            )?;
            println!("{}", named.base_user_id());
            Ok(())
        }
        Commands::SetImage { email, path } => {
            set_image(&email, &path, cli.config.as_deref())
        }
        Commands::CurrentMenu { json } => current_menu(json, cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("foodie {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn open_pool(config: &Config) -> Result<DbPool> {
    let db_path = config.database.path.to_string_lossy();
    tracing::debug!("Opening database at {}", db_path);
    init_pool(&db_path).with_context(|| format!("Failed to open database {db_path}"))
}

fn user_service(config: &Config) -> Result<UserService> {
    let pool = open_pool(config)?;
    let storage = Arc::new(OverwriteStorage::new(&config.media.root));
    Ok(UserService::new(pool, storage, config.thumbnails))
}

fn migrate(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_pool(&config)?;
    let conn = get_conn(&pool)?;
    println!(
        "Database {:?} at schema version {}",
        config.database.path,
        foodie_db::migrations::current_version(&conn)?
    );
    Ok(())
}

fn set_image(email: &str, path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let service = user_service(&config)?;

    let content =
        std::fs::read(path).with_context(|| format!("Failed to read image file: {:?}", path))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Image path has no usable file name: {:?}", path))?;

    let mut user = service.find_by_email(email)?;
    service.set_image(&mut user, file_name, &content)?;

    println!("image: {}", user.image.as_deref().unwrap_or("-"));
    println!("thumbnail: {}", user.thumbnail.as_deref().unwrap_or("-"));
    Ok(())
}

fn current_menu(json: bool, config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = open_pool(&config)?;
    let conn = get_conn(&pool)?;

    let Some(menu) = menus::get_current_menu(&conn)? else {
        if json {
            println!("null");
        } else {
            println!("No upcoming menu");
        }
        return Ok(());
    };
    let items = menus::list_menu_items(&conn, menu.id)?;

    if json {
        let out = serde_json::json!({ "menu": menu, "items": items });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("Menu for {}", menu);
        for item in &items {
            println!("  [{}] {}", item.item_type, item);
        }
    }
    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            config::load_config(p)?
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!("✓ Configuration is valid");
    println!("  Database: {:?}", config.database.path);
    println!("  Media root: {:?}", config.media.root);
    println!(
        "  Thumbnails: {}x{}",
        config.thumbnails.width, config.thumbnails.height
    );

    // Read-only: validating must not create or migrate the database
    if config.database.path.exists() {
        let conn = open_read_only(&config.database.path.to_string_lossy())?;
        match base_users::list_base_users(&conn) {
            Ok(users) => println!("  Users: {}", users.len()),
            Err(e) => println!("  Users: unavailable ({e})"),
        }
    }

    Ok(())
}
