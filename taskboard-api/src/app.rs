/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with
/// all routes and middleware, including the request authorizer that gates
/// every protected route.

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskboard_shared::auth::{
    jwt,
    middleware::{extract_bearer_token, AuthContext},
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor. Uses Arc
/// internally for cheap cloning. The signing secret inside is read-only
/// after startup.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the signing secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET  /health                 # Health check (public)
/// ├── POST /auth/register          # Register (public)
/// ├── POST /auth/login             # Login (public)
/// ├── GET  /users                  # List users (bearer)
/// ├── GET  /tasks                  # List tasks with usernames (bearer)
/// ├── POST /tasks                  # Create task (bearer)
/// ├── PUT  /tasks/:id/status       # Set status (bearer)
/// ├── PUT  /tasks/:id/assign       # Set/clear assignee (bearer)
/// └── PUT  /tasks/:id              # Update title/description (bearer)
/// ```
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer, permissive in development)
/// 3. Bearer authentication on the protected subtree
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Protected routes: the authorizer rejects unauthenticated requests
    // before any of these handlers run
    let protected_routes = Router::new()
        .route("/users", get(routes::users::list_users))
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/tasks/:id/status", put(routes::tasks::update_status))
        .route("/tasks/:id/assign", put(routes::tasks::assign_task))
        .route("/tasks/:id", put(routes::tasks::update_task))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer authentication middleware layer
///
/// Extracts the bearer token, validates it, and binds the resulting
/// identity to this request's extensions. A missing header, a non-Bearer
/// scheme, a bad signature, a malformed token, and an expired token all
/// produce the identical 401 response.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = extract_bearer_token(req.headers()).ok_or_else(|| {
        crate::error::ApiError::Unauthorized("Invalid or missing credentials".to_string())
    })?;

    // From<JwtError> collapses every validation failure to the same 401
    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthContext::from_claims(&claims));

    Ok(next.run(req).await)
}
