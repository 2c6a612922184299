//! DEMOLA KBJ AUTOS storefront
//!
//! A server-rendered car showroom backed by a hosted table and photo bucket,
//! or by SQLite and a local media directory.

mod api;
mod auth;
mod config;
mod contact;
mod db;
mod editor;
mod errors;
mod inventory;
mod models;
mod remote;
mod session;
mod storefront;
mod view;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::AdminGate;
use config::{Config, DEALER_PASSCODE, DEALER_PHONE};
use contact::ContactDispatcher;
use db::{LocalBucket, Repository, MEDIA_ROUTE};
use remote::{RemoteDataService, SupabaseClient};
use session::SessionStore;
use storefront::Storefront;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub storefront: Arc<Storefront>,
    pub sessions: Arc<SessionStore>,
    /// Served under `/media` when the local bucket is in use
    pub media_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting DEMOLA KBJ AUTOS storefront");
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Table: {}, bucket: {}", config.table, config.bucket);

    let (remote, media_dir) = match &config.supabase {
        Some(supabase) => {
            tracing::info!("Using hosted backend at {}", supabase.url);
            let client = SupabaseClient::new(supabase, &config.table, &config.bucket);
            (RemoteDataService::hosted(client), None)
        }
        None => {
            tracing::warn!("KBJ_SUPABASE_URL not set, using the local backend");
            tracing::info!("Database path: {:?}", config.db_path);
            tracing::info!("Media directory: {:?}", config.media_dir);

            let pool = db::init_database(&config.db_path).await?;
            let bucket = LocalBucket::open(&config.media_dir, &config.public_base_url).await?;
            let media_dir = bucket.dir().to_path_buf();
            let remote =
                RemoteDataService::new(Arc::new(Repository::new(pool)), Arc::new(bucket));
            (remote, Some(media_dir))
        }
    };

    // The passcode ships with the binary; writes must be guarded by the backend.
    tracing::warn!("Dealer access is a visibility gate only; enforce write access in the data service");

    let storefront = Storefront::new(
        remote,
        AdminGate::new(DEALER_PASSCODE),
        ContactDispatcher::new(DEALER_PHONE),
    )
    .with_verify_delay(config.verify_delay);

    // Create application state
    let state = AppState {
        storefront: Arc::new(storefront),
        sessions: Arc::new(SessionStore::new(config.session_idle, config.max_sessions)),
        media_dir,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // JSON routes
    let api_routes = Router::new()
        .route("/listings", get(api::list_listings))
        .route("/listings/{id}/contact", get(api::contact_link))
        .layer(cors);

    // Page and form actions
    let page_routes = Router::new()
        .route("/", get(api::index))
        .route("/search", post(api::search))
        .route("/theme", post(api::toggle_theme))
        .route("/menu", post(api::toggle_menu))
        .route("/refresh", post(api::refresh))
        .route("/modal/close", post(api::close_modal))
        // Dealer access
        .route("/admin", post(api::open_login))
        .route("/admin/login", post(api::login))
        .route("/admin/logout", post(api::logout))
        // Listings
        .route("/listings", post(api::create_listing))
        .route("/listings/new", post(api::open_editor))
        .route("/listings/photo", post(api::select_photo))
        .route("/listings/{id}/view", post(api::view_listing))
        .route("/listings/{id}/delete", post(api::request_delete))
        .route("/listings/{id}/delete/confirm", post(api::confirm_delete))
        .layer(DefaultBodyLimit::max(api::MAX_UPLOAD_BYTES));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    let mut router = Router::new()
        .nest("/api", api_routes)
        .merge(page_routes)
        .merge(health_routes);

    if let Some(dir) = &state.media_dir {
        router = router.nest_service(MEDIA_ROUTE, ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
