//! Crown Shop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! crown-cli migrate
//!
//! # Load or refresh the catalog from a YAML file
//! crown-cli seed products -f catalog.yaml
//!
//! # Produce an ADMIN_PASSWORD_HASH value (reads the password from stdin)
//! crown-cli admin hash-password
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed products` - Upsert catalog rows from YAML
//! - `admin hash-password` - Hash the admin password for configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "crown-cli")]
#[command(author, version, about = "Crown Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Admin account setup
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert or replace catalog products
    Products {
        /// YAML file with a list of products
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Hash a password for `ADMIN_PASSWORD_HASH`
    HashPassword {
        /// Password to hash; read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,

        /// Skip the password strength checks
        #[arg(long)]
        allow_weak: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => {
                commands::seed::products(&file).await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::HashPassword {
                password,
                allow_weak,
            } => {
                let password = match password {
                    Some(password) => password,
                    None => commands::admin::read_password_from_stdin()?,
                };
                let hash = commands::admin::hash_password(&password, allow_weak)?;

                #[allow(clippy::print_stdout)]
                {
                    println!("{hash}");
                }
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_products() {
        let cli = Cli::try_parse_from(["crown-cli", "seed", "products", "-f", "catalog.yaml"])
            .map_err(|e| e.to_string());
        assert!(matches!(
            cli,
            Ok(Cli {
                command: Commands::Seed {
                    target: SeedTarget::Products { ref file }
                }
            }) if file == "catalog.yaml"
        ));
    }
}
