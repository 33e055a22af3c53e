use actix_cors::Cors;
use actix_web::{App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use federal_invest::config::{Config, LogFormat};
use federal_invest::middleware::{RateLimiter, RequestIdMiddlewareFactory, SessionAuth};
use federal_invest::AppServices;

fn init_tracing() {
    let (json, pretty) = match LogFormat::from_env() {
        LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json()), None),
        LogFormat::Pretty => (None, Some(tracing_subscriber::fmt::layer())),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "federal_invest=debug,actix_web=info".into()),
        )
        .with(json)
        .with(pretty)
        .init();
}

fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    tracing::info!(env = %config.app.env, "Starting Federal Invest finance service");

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        pool_size = config.database.pool_size,
        max_connections = config.database.max_connections,
        "Database pool initialized"
    );

    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .context("Failed to run database migrations")?;

    let services = AppServices::from_pool(db_pool, &config.security, &config.cache)
        .context("Failed to build services")?;

    if config.app.migrate_legacy_deductions {
        let report = services
            .deductions
            .migrate_legacy_quarterly()
            .await
            .context("Legacy deduction migration failed")?;
        tracing::info!(
            quarters_scanned = report.quarters_scanned,
            months_created = report.months_created,
            months_skipped = report.months_skipped,
            "Legacy quarterly deductions migrated"
        );
    }

    let rate_limiter = RateLimiter::new(config.security.rate_limit_per_minute);
    let allowed_origin = config.security.cors_allowed_origin.clone();
    let bind_address = config.server.bind_address();

    let server = HttpServer::new(move || {
        let services = services.clone();
        App::new()
            .configure(|cfg| services.configure(cfg))
            .wrap(SessionAuth::new(services.auth.clone()))
            .wrap(rate_limiter.clone())
            .wrap(RequestIdMiddlewareFactory)
            .wrap(TracingLogger::default())
            .wrap(cors(allowed_origin.as_deref()))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!(address = %bind_address, workers = config.server.workers, "Server started");

    server.await?;
    Ok(())
}
