// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Calculadora: pública, não grava nada
    let calculator_routes = Router::new()
        .route("/defaults", get(handlers::calculator::get_defaults))
        .route("/quote", post(handlers::calculator::quote))
        .route("/payment-plan", post(handlers::calculator::payment_plan));

    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let proposal_routes = Router::new()
        .route(
            "/",
            post(handlers::proposals::create_proposal).get(handlers::proposals::list_proposals),
        )
        .route(
            "/{id}",
            get(handlers::proposals::get_proposal).patch(handlers::proposals::update_proposal),
        )
        .route("/{id}/payment-plan", get(handlers::proposals::get_payment_plan))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let lead_routes = Router::new()
        .route(
            "/",
            post(handlers::leads::create_lead).get(handlers::leads::list_leads),
        )
        .route("/stats", get(handlers::leads::get_stats))
        .route("/{id}", get(handlers::leads::get_lead))
        .route("/{id}/status", patch(handlers::leads::update_status))
        .route("/{id}/meeting", post(handlers::leads::schedule_meeting))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let report_routes = Router::new()
        .route("/commissions", get(handlers::reports::get_commissions))
        .route("/kpis", get(handlers::reports::get_kpis))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/auth", auth_routes)
        .nest("/users", user_routes)
        .nest("/calculator", calculator_routes)
        .nest("/proposals", proposal_routes)
        .nest("/leads", lead_routes)
        .nest("/reports", report_routes);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api_routes)
        .with_state(app_state)
}
