//! Operator tool for provisioning admin identities with direct database
//! access. Admin rights are granted here and only here; the public API has
//! no path to them.
//!
//! Usage: create_admin <username> <password> [email]

use sqlx::postgres::PgPoolOptions;

use learnhub::auth::{password::hash_password, repo::User};
use learnhub::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "learnhub=info".to_string()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let (username, password) = match (args.next(), args.next()) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            eprintln!("usage: create_admin <username> <password> [email]");
            std::process::exit(2);
        }
    };
    let email = args.next();

    if username.trim().len() < 3 {
        anyhow::bail!("username must be at least 3 characters");
    }
    if password.len() < 6 {
        anyhow::bail!("password must be at least 6 characters");
    }

    let config = AppConfig::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;

    match User::find_by_username(&db, username.trim()).await? {
        Some(user) if user.is_admin => {
            tracing::info!(username = %user.username, "user is already an admin");
        }
        Some(user) => {
            User::promote_to_admin(&db, user.id).await?;
            tracing::info!(username = %user.username, user_id = %user.id, "user promoted to admin");
        }
        None => {
            let hash = hash_password(&password)?;
            let user =
                User::create_admin(&db, username.trim(), &hash, email.as_deref()).await?;
            tracing::info!(username = %user.username, user_id = %user.id, "admin user created");
        }
    }

    Ok(())
}
