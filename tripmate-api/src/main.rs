use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripmate_api::{
    app,
    state::{AppState, AuthConfig},
    worker,
};
use tripmate_core::repository::{PlanRepository, TravelerRepository};
use tripmate_store::{
    app_config::{AdminConfig, Config},
    DbClient, PgPlanRepository, PgRequestRepository, PgReviewRepository, PgTravelerRepository,
};

/// Makes sure the admin account from config exists, so the admin surface is
/// reachable on a fresh database.
async fn seed_admin(repo: &dyn TravelerRepository, admin: &AdminConfig) {
    let password_hash =
        bcrypt::hash(&admin.password, bcrypt::DEFAULT_COST).expect("Failed to hash admin password");

    match repo.create_admin_if_absent(&admin.email, &password_hash).await {
        Ok(true) => tracing::info!("Seeded admin account {}", admin.email),
        Ok(false) => tracing::debug!("Admin account {} already present", admin.email),
        Err(e) => tracing::error!("Failed to seed admin account: {}", e),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tripmate_api=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting TripMate API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let plan_repo = Arc::new(PgPlanRepository::new(db.pool.clone()));
    let traveler_repo = Arc::new(PgTravelerRepository::new(db.pool.clone()));

    seed_admin(traveler_repo.as_ref(), &config.admin).await;

    let app_state = AppState {
        plan_repo: plan_repo.clone(),
        match_repo: plan_repo.clone(),
        request_repo: Arc::new(PgRequestRepository::new(db.pool.clone())),
        review_repo: Arc::new(PgReviewRepository::new(db.pool.clone())),
        traveler_repo,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    if config.scheduler.enabled {
        let sweep_repo: Arc<dyn PlanRepository> = plan_repo.clone();
        tokio::spawn(worker::start_lifecycle_worker(sweep_repo));
    } else {
        tracing::info!("Plan lifecycle worker disabled by config");
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
