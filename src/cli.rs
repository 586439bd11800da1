//! CLI argument parsing, validation, and command execution.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use url::Url;

use crate::api::{NewProduct, SignupRequest, StorefrontClient};
use crate::db::{Database, SqliteStorage};
use crate::jwt::UserRole;
use crate::session::{Session, SessionError};

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "storefront", about = "Storefront client with a persistent login session")]
pub struct Args {
    /// Base URL of the storefront backend
    #[arg(long, env = "STOREFRONT_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Path to SQLite database file holding the session
    #[arg(short, long, env = "STOREFRONT_DATABASE", default_value = "storefront.db")]
    pub database: String,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Log in and keep the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Signup {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: String,
        /// "user" or "admin"
        #[arg(long, default_value = "user", value_parser = parse_role)]
        role: UserRole,
        /// Avatar image URL
        #[arg(long, default_value = "")]
        image_url: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user and capabilities
    Whoami,
    /// Search products
    Search { query: String },
    /// Create a product (admin only)
    AddProduct {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        stock: u32,
        #[arg(long)]
        price: f64,
    },
}

fn parse_role(s: &str) -> Result<UserRole, String> {
    match s {
        "user" | "admin" => Ok(UserRole::from_str(s)),
        _ => Err(format!("Role must be 'user' or 'admin': {}", s)),
    }
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_writer(std::io::stderr).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Compact => tracing_subscriber::fmt()
            .compact()
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Parse and validate the backend URL.
/// Returns None and logs an error if validation fails.
pub fn validate_api_url(api_url: &str) -> Option<Url> {
    let url = match Url::parse(api_url) {
        Ok(url) => url,
        Err(e) => {
            error!(url = %api_url, error = %e, "Invalid API URL");
            return None;
        }
    };

    let is_localhost = matches!(url.host_str(), Some("localhost" | "127.0.0.1" | "[::1]"));

    match url.scheme() {
        "https" => {}
        "http" if is_localhost => {}
        "http" => {
            error!("API URL must use HTTPS for non-localhost backends");
            return None;
        }
        scheme => {
            error!(scheme = %scheme, "API URL must be http or https");
            return None;
        }
    }

    Some(url)
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}

/// Build a session whose storage is scoped to the backend's origin.
pub fn build_session(db: &Database, api_url: Url) -> Session<SqliteStorage> {
    let client = StorefrontClient::new(api_url);
    let storage = db.storage(&client.origin());
    Session::new(client, storage)
}

/// Execute one command against the session.
pub async fn run(session: &Session<SqliteStorage>, command: Command) -> Result<(), SessionError> {
    match command {
        Command::Login { email, password } => match session.login(&email, &password).await? {
            Some(claims) => println!("Logged in as {}", claims.display_name()),
            None => println!("Logged in"),
        },
        Command::Signup {
            first_name,
            last_name,
            email,
            password,
            role,
            image_url,
        } => {
            let request = SignupRequest {
                first_name,
                last_name,
                email,
                password,
                role,
                image_url,
            };
            match session.signup(&request).await? {
                Some(claims) => println!("Account created, logged in as {}", claims.display_name()),
                None => println!("Account created. Log in to continue."),
            }
        }
        Command::Logout => {
            session.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => {
            let caps = session.gate().capabilities().await;
            match caps.display_name {
                Some(name) => {
                    println!("Logged in as {}", name);
                    println!("Administrator: {}", if caps.admin { "yes" } else { "no" });
                    if let Some(avatar) = caps.avatar_url {
                        println!("Avatar: {}", avatar);
                    }
                }
                None => println!("Not logged in"),
            }
        }
        Command::Search { query } => {
            let products = session.search(&query).await?;
            if products.is_empty() {
                println!("No products found");
            }
            for p in products {
                println!("{}  {} {}  ${:.2}  ({} in stock)", p.id, p.brand, p.model, p.price, p.stock);
            }
        }
        Command::AddProduct {
            brand,
            model,
            stock,
            price,
        } => {
            let product = NewProduct {
                brand,
                model,
                stock,
                price,
            };
            session.add_product(&product).await?;
            println!("Product created");
        }
    }
    Ok(())
}
