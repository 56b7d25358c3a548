use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use iqra_cli::admin;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "iqra-cli")]
#[command(about = "IQRA CLI - Administrative tools for the IQRA backend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a superuser account
    CreateSuperuser {
        /// Username
        #[arg(short = 'u', long)]
        username: Option<String>,

        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Create a permission group
    CreateGroup {
        /// Group name
        name: String,
    },
    /// Grant a permission codename (e.g. view_studentprofile) to a group
    GrantPermission { group: String, codename: String },
    /// Revoke a permission codename from a group
    RevokePermission { group: String, codename: String },
    /// Add a user to a group
    AddUserToGroup { username: String, group: String },
    /// List every known permission codename
    ListPermissions,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::CreateSuperuser {
            username,
            email,
            password,
        } => handle_create_superuser(&pool, username, email, password).await,
        Commands::CreateGroup { name } => {
            let group = admin::create_group(&pool, &name).await?;
            println!("✅ Created group '{}' ({})", group.name, group.id);
            Ok(())
        }
        Commands::GrantPermission { group, codename } => {
            if admin::grant_permission(&pool, &group, &codename).await? {
                println!("✅ Granted {} to '{}'", codename, group);
            } else {
                println!("ℹ️  '{}' already has {}", group, codename);
            }
            Ok(())
        }
        Commands::RevokePermission { group, codename } => {
            if admin::revoke_permission(&pool, &group, &codename).await? {
                println!("✅ Revoked {} from '{}'", codename, group);
            } else {
                println!("ℹ️  '{}' did not have {}", group, codename);
            }
            Ok(())
        }
        Commands::AddUserToGroup { username, group } => {
            if admin::add_user_to_group(&pool, &username, &group).await? {
                println!("✅ Added {} to '{}'", username, group);
            } else {
                println!("ℹ️  {} is already in '{}'", username, group);
            }
            Ok(())
        }
        Commands::ListPermissions => {
            for permission in admin::list_permissions(&pool).await? {
                println!("{:<24} {}", permission.codename, permission.name);
            }
            Ok(())
        }
    }
}

async fn handle_create_superuser(
    pool: &PgPool,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let username = match username {
        Some(username) => username,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .context("Failed to read username")?,
    };

    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("Failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("Failed to read password")?,
    };

    admin::create_superuser(pool, &username, &email, &password).await?;

    println!("\n✅ Superuser created successfully!");
    println!("   Username: {}", username);
    println!("   Email: {}", email);
    Ok(())
}
