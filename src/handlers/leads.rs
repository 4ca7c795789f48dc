// src/handlers/leads.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::lead::{
        CreateLeadPayload, Lead, LeadFilter, LeadStats, ScheduleMeetingPayload,
        UpdateLeadStatusPayload,
    },
};

// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead cadastrado", body = Lead),
        (status = 400, description = "Campos obrigatórios ausentes ou inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    let payload = payload.normalized();
    payload.validate()?;

    let lead = app_state.lead_service.create_lead(Some(user.id), payload).await?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    params(LeadFilter),
    responses(
        (status = 200, description = "Leads, mais recentes primeiro", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<Vec<Lead>>, AppError> {
    Ok(Json(app_state.lead_service.list_leads(&filter).await?))
}

// GET /api/leads/stats
#[utoipa::path(
    get,
    path = "/api/leads/stats",
    tag = "Leads",
    responses(
        (status = 200, description = "Contadores do funil", body = LeadStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(State(app_state): State<AppState>) -> Result<Json<LeadStats>, AppError> {
    Ok(Json(app_state.lead_service.stats().await?))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Lead>, AppError> {
    Ok(Json(app_state.lead_service.get_lead(id).await?))
}

// PATCH /api/leads/{id}/status
#[utoipa::path(
    patch,
    path = "/api/leads/{id}/status",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = UpdateLeadStatusPayload,
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLeadStatusPayload>,
) -> Result<Json<Lead>, AppError> {
    Ok(Json(app_state.lead_service.update_status(id, payload).await?))
}

// POST /api/leads/{id}/meeting
#[utoipa::path(
    post,
    path = "/api/leads/{id}/meeting",
    tag = "Leads",
    params(("id" = Uuid, Path, description = "ID do lead")),
    request_body = ScheduleMeetingPayload,
    responses(
        (status = 200, description = "Reunião agendada", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn schedule_meeting(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScheduleMeetingPayload>,
) -> Result<Json<Lead>, AppError> {
    let lead = app_state
        .lead_service
        .schedule_meeting(id, payload.meeting_date)
        .await?;

    Ok(Json(lead))
}
