// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    models::reports::{CommissionFilter, CommissionReport, KpiReport},
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CommissionQuery {
    /// Percentual de comissão em texto livre ("5", "7,5"); inválido usa o padrão
    pub rate: Option<String>,
    /// Filtra os meses exibidos por ano
    pub year: Option<i32>,
    /// Filtra os meses exibidos por mês (1-12)
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct KpiQuery {
    /// Janela em dias: 7, 30, 90 ou 365 (padrão 30)
    pub days: Option<i64>,
}

// GET /api/reports/commissions
#[utoipa::path(
    get,
    path = "/api/reports/commissions",
    tag = "Reports",
    params(CommissionQuery),
    responses(
        (status = 200, description = "Comissões por mês e totais", body = CommissionReport)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_commissions(
    State(app_state): State<AppState>,
    Query(query): Query<CommissionQuery>,
) -> Result<Json<CommissionReport>, AppError> {
    let filter = CommissionFilter { year: query.year, month: query.month };

    let report = app_state
        .report_service
        .commission_report(query.rate.as_deref(), filter)
        .await?;

    Ok(Json(report))
}

// GET /api/reports/kpis
#[utoipa::path(
    get,
    path = "/api/reports/kpis",
    tag = "Reports",
    params(KpiQuery),
    responses(
        (status = 200, description = "KPIs do funil na janela", body = KpiReport),
        (status = 400, description = "Período não suportado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_kpis(
    State(app_state): State<AppState>,
    Query(query): Query<KpiQuery>,
) -> Result<Json<KpiReport>, AppError> {
    Ok(Json(app_state.report_service.kpi_report(query.days).await?))
}
