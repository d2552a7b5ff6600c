use std::io;
use std::sync::Arc;

use actix_web::{App, HttpServer};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

use job_board::api::{self, state::AppState};
use job_board::auth::JwtKeys;
use job_board::cli::{Cli, Command};
use job_board::config::Config;
use job_board::db::{self, PgStore, Store};
use job_board::mail::SmtpMailer;
use job_board::shutdown::ShutdownCoordinator;

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("{}: {}", context, err))
}

/// Console output plus daily rotating files per level, e.g. logs/info.log.2025-01-01
fn init_tracing(log_dir: &str) -> io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "info.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "warn.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "error.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "debug.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Token { user_id, role, ttl_hours }) = cli.command {
        let secret = Config::jwt_secret_from_env().map_err(|e| startup_error("config", e))?;
        let token = JwtKeys::new(&secret)
            .issue(user_id, role, ttl_hours)
            .map_err(|e| startup_error("token", e))?;
        println!("{}", token);
        return Ok(());
    }

    let config = Config::from_env().map_err(|e| startup_error("Failed to load configuration", e))?;
    init_tracing(&config.log_dir)?;

    let pool = db::pool::connect(&config.database_url, config.max_db_connections)
        .await
        .map_err(|e| startup_error("Failed to connect to database", e))?;

    db::pool::migrate(&pool)
        .await
        .map_err(|e| startup_error("Failed to run database migrations", e))?;

    if matches!(cli.command, Some(Command::Migrate)) {
        pool.close().await;
        return Ok(());
    }

    info!("Starting job-board application");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);

    let mailer = SmtpMailer::new(
        &config.smtp_host,
        config.smtp_port,
        &config.smtp_user,
        &config.smtp_pass,
    )
    .map_err(|e| startup_error("Failed to configure SMTP transport", e))?;
    let probe = mailer.clone();
    tokio::spawn(async move {
        match probe.verify().await {
            Ok(true) => info!("SMTP server is ready to send emails"),
            Ok(false) => warn!("SMTP server did not accept the connection test"),
            Err(e) => error!("SMTP connection failed: {}", e),
        }
    });

    let store: Arc<dyn Store> = Arc::new(PgStore::new(pool));
    let state = AppState::new(
        store.clone(),
        Arc::new(mailer),
        JwtKeys::new(&config.jwt_secret),
        config.mail_from.clone(),
    )
    .with_max_payload_size(config.max_payload_size);

    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .configure(move |cfg| api::configure(&state, cfg))
    });

    info!("Server starting on http://{}:{}", config.bind_addr, config.port);

    let server = server
        .bind((config.bind_addr.as_str(), config.port))?
        .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, store)
        .wait_for_shutdown()
        .await
}
