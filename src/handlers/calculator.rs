// src/handlers/calculator.rs
//
// Calculadora pública: não grava nada, só devolve os valores.

use axum::Json;

use crate::{
    common::error::AppError,
    models::calculator::{
        CalculationResults, PaymentPlan, PaymentPlanPayload, PercentageConfig, QuotePayload,
    },
    services::{fee_calculator::FeeCalculator, proposal_service::payment_plan_or_error},
};

// GET /api/calculator/defaults
#[utoipa::path(
    get,
    path = "/api/calculator/defaults",
    tag = "Calculator",
    responses(
        (status = 200, description = "Percentuais e mínimos padrão", body = PercentageConfig)
    )
)]
pub async fn get_defaults() -> Json<PercentageConfig> {
    Json(PercentageConfig::default())
}

// POST /api/calculator/quote
#[utoipa::path(
    post,
    path = "/api/calculator/quote",
    tag = "Calculator",
    request_body = QuotePayload,
    responses(
        (status = 200, description = "Valores das três modalidades", body = CalculationResults),
        (status = 422, description = "Dívida zerada ou valores fora da faixa calculável")
    )
)]
pub async fn quote(Json(payload): Json<QuotePayload>) -> Result<Json<CalculationResults>, AppError> {
    let calculator = FeeCalculator::new(payload.percentages.resolve());

    let results = calculator.calculate(&payload.debt_input(), payload.with_cap_clause)?;

    Ok(Json(results))
}

// POST /api/calculator/payment-plan
#[utoipa::path(
    post,
    path = "/api/calculator/payment-plan",
    tag = "Calculator",
    request_body = PaymentPlanPayload,
    responses(
        (status = 200, description = "Condições no cartão e no boleto", body = PaymentPlan),
        (status = 400, description = "Valor negativo")
    )
)]
pub async fn payment_plan(Json(payload): Json<PaymentPlanPayload>) -> Result<Json<PaymentPlan>, AppError> {
    Ok(Json(payment_plan_or_error(payload.proposal_value)?))
}
