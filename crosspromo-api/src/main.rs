use std::sync::Arc;
use std::net::SocketAddr;
use anyhow::Context;
use crosspromo_api::{app, AppState, Repositories};
use crosspromo_store::{
    app_config::Config, DbClient, PgAffiliationRepository, PgCouponRepository, PgDealRepository,
    PgStoreRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crosspromo_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting coupon exchange on port {}", config.server.port);

    let db = DbClient::new(&config.database)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    // Rows in the business_rules table win over file/env configuration
    let business_rules = db
        .fetch_business_rules(config.business_rules.clone())
        .await
        .context("Failed to load business rules")?;
    tracing::info!("Business rules: {:?}", business_rules);

    let repos = Repositories {
        stores: Arc::new(PgStoreRepository::new(db.pool.clone())),
        deals: Arc::new(PgDealRepository::new(db.pool.clone())),
        affiliations: Arc::new(PgAffiliationRepository::new(db.pool.clone())),
        coupons: Arc::new(PgCouponRepository::new(db.pool.clone())),
    };
    let app = app(AppState::new(repos, &business_rules));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
