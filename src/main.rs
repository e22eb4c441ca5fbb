use hoops_academy::api::create_routes_with_login_limit;
use hoops_academy::config::{run_migrations, AppConfig, DatabaseConfig, DatabaseSeeder};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    // RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let database = DatabaseConfig::from_env()?;
    let pool = database.create_pool().await?;
    run_migrations(&pool).await?;
    info!("Database migrations applied");

    let seeder = DatabaseSeeder::new(pool.clone());
    if let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) {
        seeder.seed_admin(email, password).await?;
    }
    if config.is_development() && std::env::var("SEED_DEMO_DATA").is_ok() {
        seeder.seed_demo_data().await?;
    }

    let app = create_routes_with_login_limit(pool, &config.jwt_secret, &config.login_rate_limit());

    let address = config.server_address();
    let listener = TcpListener::bind(&address).await?;
    info!("Hoops academy server starting on http://{}", address);
    info!("Health check available at http://{}/health", address);

    // Peer addresses key the login rate limiter
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
