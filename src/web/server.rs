//! Axum HTTP server for the case-management API.
//!
//! Public routes: health, registration, login. Everything else sits behind
//! the bearer-token middleware. The server is spawned in the background and
//! the bound address returned, so callers (and tests) can bind port 0.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, header},
    middleware,
    routing::{get, post},
};
use tokio::sync::oneshot;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::db::Database;
use crate::error::ServerError;
use crate::web::auth::{AuthState, auth_middleware};
use crate::web::handlers::{
    assistant, auth, billing, calendar, cases, clients, documents, notifications, reports, tasks,
};
use crate::web::types::HealthResponse;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared state for all API handlers.
pub struct AppState {
    pub db: Arc<dyn Database>,
    pub auth: AuthState,
    /// Shutdown signal sender, installed by `start_server`.
    pub shutdown_tx: tokio::sync::RwLock<Option<oneshot::Sender<()>>>,
}

impl AppState {
    pub fn new(db: Arc<dyn Database>, auth: AuthState) -> Self {
        Self {
            db,
            auth,
            shutdown_tx: tokio::sync::RwLock::new(None),
        }
    }
}

async fn health_handler() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy",
        service: "lexfirm",
    })
}

fn api_router(state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/auth/register-lawyer", post(auth::register_lawyer_handler))
        .route("/api/auth/login", post(auth::login_handler));

    let protected = Router::new()
        // Auth
        .route("/api/auth/me", get(auth::me_handler))
        // Clients
        .route("/api/clients", get(clients::list_handler).post(clients::create_handler))
        .route(
            "/api/clients/{id}",
            get(clients::get_handler)
                .patch(clients::update_handler)
                .delete(clients::delete_handler),
        )
        // Cases and sessions
        .route("/api/cases", get(cases::list_handler).post(cases::create_handler))
        .route(
            "/api/cases/{id}",
            get(cases::get_handler)
                .patch(cases::update_handler)
                .delete(cases::delete_handler),
        )
        .route(
            "/api/cases/{id}/sessions",
            get(cases::list_sessions_handler).post(cases::add_session_handler),
        )
        // Calendar
        .route(
            "/api/calendar",
            get(calendar::list_handler).post(calendar::create_handler),
        )
        .route("/api/calendar/suggest/slots", get(calendar::suggest_slots_handler))
        .route(
            "/api/calendar/{id}",
            get(calendar::get_handler)
                .patch(calendar::update_handler)
                .delete(calendar::delete_handler),
        )
        // Billing
        .route(
            "/api/billing/invoices",
            get(billing::list_invoices_handler).post(billing::create_invoice_handler),
        )
        .route(
            "/api/billing/invoices/{id}",
            get(billing::get_invoice_handler)
                .patch(billing::update_invoice_handler)
                .delete(billing::delete_invoice_handler),
        )
        .route(
            "/api/billing/invoices/{id}/payments",
            get(billing::list_payments_handler).post(billing::record_payment_handler),
        )
        .route("/api/billing/summary", get(billing::summary_handler))
        // Tasks
        .route("/api/tasks", get(tasks::list_handler).post(tasks::create_handler))
        .route("/api/tasks/stats/users", get(tasks::user_stats_handler))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_handler)
                .patch(tasks::update_handler)
                .delete(tasks::delete_handler),
        )
        // Documents
        .route(
            "/api/documents",
            get(documents::list_handler).post(documents::create_handler),
        )
        .route(
            "/api/documents/{id}",
            get(documents::get_handler)
                .patch(documents::update_handler)
                .delete(documents::delete_handler),
        )
        // Notifications
        .route(
            "/api/notifications",
            get(notifications::list_handler).post(notifications::create_handler),
        )
        .route(
            "/api/notifications/preview/case-sessions",
            get(notifications::preview_case_sessions_handler),
        )
        .route(
            "/api/notifications/{id}/simulate-send",
            post(notifications::simulate_send_handler),
        )
        // Reports
        .route("/api/reports/cases-overview", get(reports::cases_overview_handler))
        .route(
            "/api/reports/financial-overview",
            get(reports::financial_overview_handler),
        )
        .route(
            "/api/reports/team-performance",
            get(reports::team_performance_handler),
        )
        .route(
            "/api/reports/client-profitability",
            get(reports::client_profitability_handler),
        )
        .route("/api/reports/top-case-types", get(reports::top_case_types_handler))
        .route("/api/reports/dashboard", get(reports::dashboard_handler))
        // Assistant stubs
        .route("/api/ai/summarize-text", post(assistant::summarize_text_handler))
        .route(
            "/api/ai/summarize-document",
            post(assistant::summarize_document_handler),
        )
        .route(
            "/api/ai/generate-case-memo",
            post(assistant::generate_case_memo_handler),
        )
        .route(
            "/api/ai/analyze-client-sentiment",
            post(assistant::analyze_sentiment_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
}

fn cors_layer(addr: SocketAddr, extra_origins: &[String]) -> CorsLayer {
    let mut origins: Vec<HeaderValue> = vec![
        format!("http://{}:{}", addr.ip(), addr.port())
            .parse()
            .expect("valid origin"),
        format!("http://localhost:{}", addr.port())
            .parse()
            .expect("valid origin"),
    ];
    for origin in extra_origins {
        match origin.parse::<HeaderValue>() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!(%origin, "ignoring malformed CORS origin"),
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PATCH,
            axum::http::Method::DELETE,
        ])
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
        ]))
}

/// Start the API server.
///
/// Returns the actual bound `SocketAddr` (useful when binding to port 0).
pub async fn start_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<SocketAddr, ServerError> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| ServerError::StartupFailed {
            reason: format!("failed to bind {}: {e}", config.bind),
        })?;
    let bound_addr = listener
        .local_addr()
        .map_err(|e| ServerError::StartupFailed {
            reason: format!("failed to read local addr: {e}"),
        })?;

    let app = api_router(state.clone()).layer(
        tower::ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(cors_layer(bound_addr, &config.cors_origins))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            )),
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    *state.shutdown_tx.write().await = Some(shutdown_tx);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                tracing::info!("API server shutting down");
            })
            .await
        {
            tracing::error!("API server error: {e}");
        }
    });

    tracing::info!(%bound_addr, "API server listening");
    Ok(bound_addr)
}
