use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use agentdesk::{
    AppState,
    auth::password,
    config::AppConfig,
    db::DbPool,
    models::{CreateUserRecord, Role},
    routes,
};

/// CLI arguments for the agentdesk server
#[derive(Parser, Debug)]
#[command(version, about = "Analytics and CRM backend for AI agent workflows", long_about = None)]
struct Args {
    /// Path to the TOML config file (defaults apply when omitted)
    #[arg(short, long, env = "AGENTDESK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run(args).await {
        tracing::error!(error = %err, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(args.config.as_deref())?;

    let db = Arc::new(DbPool::from_config(&config.database).await?);
    db.run_migrations().await?;

    bootstrap_admin(&db, &config).await?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(db, config);

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "agentdesk listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Create the configured initial admin when the users table is empty.
/// Without this a fresh database has no account that can log in.
async fn bootstrap_admin(
    db: &DbPool,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if db.users().count().await? > 0 {
        return Ok(());
    }

    let (Some(email), Some(pass)) = (
        config.auth.bootstrap_admin_email.as_deref(),
        config.auth.bootstrap_admin_password.as_deref(),
    ) else {
        tracing::warn!(
            "No users exist and no bootstrap admin is configured; logins will fail until \
             [auth] bootstrap_admin_email / bootstrap_admin_password are set"
        );
        return Ok(());
    };

    let user = db
        .users()
        .create(CreateUserRecord {
            email: email.to_string(),
            password_hash: password::hash_password(pass)?,
            name: config.auth.bootstrap_admin_name.clone(),
            role: Role::Admin,
        })
        .await?;

    tracing::info!(user_id = %user.id, email = %email, "Bootstrap admin created");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
