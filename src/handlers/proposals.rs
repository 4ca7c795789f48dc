// src/handlers/proposals.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        calculator::PaymentPlan,
        proposal::{CreateProposalPayload, Proposal, ProposalFilter, UpdateProposalPayload},
    },
};

// POST /api/proposals
#[utoipa::path(
    post,
    path = "/api/proposals",
    tag = "Proposals",
    request_body = CreateProposalPayload,
    responses(
        (status = 201, description = "Proposta registrada", body = Proposal),
        (status = 400, description = "Campos obrigatórios ausentes"),
        (status = 422, description = "Dívida zerada: nada a calcular")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_proposal(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateProposalPayload>,
) -> Result<(StatusCode, Json<Proposal>), AppError> {
    let proposal = app_state
        .proposal_service
        .create_proposal(Some(user.id), payload)
        .await?;

    Ok((StatusCode::CREATED, Json(proposal)))
}

// GET /api/proposals
#[utoipa::path(
    get,
    path = "/api/proposals",
    tag = "Proposals",
    params(ProposalFilter),
    responses(
        (status = 200, description = "Histórico de propostas, mais recentes primeiro", body = Vec<Proposal>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_proposals(
    State(app_state): State<AppState>,
    Query(filter): Query<ProposalFilter>,
) -> Result<Json<Vec<Proposal>>, AppError> {
    let proposals = app_state.proposal_service.list_proposals(&filter).await?;
    Ok(Json(proposals))
}

// GET /api/proposals/{id}
#[utoipa::path(
    get,
    path = "/api/proposals/{id}",
    tag = "Proposals",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    responses(
        (status = 200, description = "Proposta", body = Proposal),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_proposal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Proposal>, AppError> {
    Ok(Json(app_state.proposal_service.get_proposal(id).await?))
}

// PATCH /api/proposals/{id}
#[utoipa::path(
    patch,
    path = "/api/proposals/{id}",
    tag = "Proposals",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    request_body = UpdateProposalPayload,
    responses(
        (status = 200, description = "Proposta atualizada", body = Proposal),
        (status = 400, description = "Edição de valores sem status"),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_proposal(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProposalPayload>,
) -> Result<Json<Proposal>, AppError> {
    Ok(Json(app_state.proposal_service.update_proposal(id, payload).await?))
}

// GET /api/proposals/{id}/payment-plan
#[utoipa::path(
    get,
    path = "/api/proposals/{id}/payment-plan",
    tag = "Proposals",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    responses(
        (status = 200, description = "Condições de pagamento da proposta", body = PaymentPlan),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_payment_plan(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentPlan>, AppError> {
    Ok(Json(app_state.proposal_service.payment_plan_for(id).await?))
}
