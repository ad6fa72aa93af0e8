use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::SubmissionStore;
use crate::handlers;
use crate::handlers::system::not_found;
use crate::schema::FormSchema;

/// Everything a handler needs, passed explicitly through axum state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub schema: Arc<FormSchema>,
    pub store: Arc<dyn SubmissionStore>,
}

impl AppState {
    pub fn new(config: AppConfig, schema: FormSchema, store: impl SubmissionStore + 'static) -> Self {
        Self {
            config: Arc::new(config),
            schema: Arc::new(schema),
            store: Arc::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let body_limit = state.config.api.max_request_size_bytes;

    let mut app = Router::new()
        // Public
        .route("/", get(handlers::system::root).fallback(not_found))
        .route("/health", get(handlers::system::health).fallback(not_found))
        .nest("/api", api_routes())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), crate::middleware::error_boundary))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors);

    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn api_routes() -> Router<AppState> {
    use handlers::{form_schema, submissions};

    // Unsupported methods on a known path get the same 404 as unknown paths
    Router::new()
        .route("/form-schema", get(form_schema::get).fallback(not_found))
        .route(
            "/submissions",
            get(submissions::list)
                .post(submissions::create)
                .fallback(not_found),
        )
        .route(
            "/submissions/:id",
            get(submissions::get)
                .put(submissions::update)
                .delete(submissions::delete)
                .fallback(not_found),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
