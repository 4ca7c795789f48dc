// src/models/reports.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppError;
use crate::models::proposal::Proposal;

// =========================================================================
//  COMISSÕES
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCommission {
    #[schema(example = "Outubro")]
    pub month: String,
    #[schema(example = 10)]
    pub month_number: u32,
    #[schema(example = 2026)]
    pub year: i32,
    pub total_contracts: usize,
    pub total_honorarios: Decimal,
    pub total_commission: Decimal,
    // Contratos do mês (para o detalhamento)
    pub contracts: Vec<Proposal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionTotals {
    pub total_contracts: usize,
    pub total_honorarios: Decimal,
    pub total_commissions: Decimal,
    pub current_month_commission: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommissionReport {
    #[schema(example = "5")]
    pub commission_rate: Decimal,
    pub months: Vec<MonthlyCommission>,
    pub totals: CommissionTotals,
    pub available_years: Vec<i32>,
    pub available_months: Vec<u32>,
}

/// Filtro de exibição: estreita os meses listados, nunca os totais.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommissionFilter {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl CommissionFilter {
    pub fn matches(&self, year: i32, month: u32) -> bool {
        self.year.map_or(true, |y| y == year) && self.month.map_or(true, |m| m == month)
    }
}

// =========================================================================
//  KPIs / FUNIL
// =========================================================================

/// Janelas aceitas pelo painel de relatórios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Last7Days,
    Last30Days,
    Last90Days,
    LastYear,
}

impl ReportPeriod {
    pub fn days(&self) -> i64 {
        match self {
            ReportPeriod::Last7Days => 7,
            ReportPeriod::Last30Days => 30,
            ReportPeriod::Last90Days => 90,
            ReportPeriod::LastYear => 365,
        }
    }
}

impl Default for ReportPeriod {
    fn default() -> Self {
        ReportPeriod::Last30Days
    }
}

impl TryFrom<i64> for ReportPeriod {
    type Error = AppError;

    fn try_from(days: i64) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(ReportPeriod::Last7Days),
            30 => Ok(ReportPeriod::Last30Days),
            90 => Ok(ReportPeriod::Last90Days),
            365 => Ok(ReportPeriod::LastYear),
            other => Err(AppError::InvalidReportPeriod(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiSummary {
    pub total_leads: usize,
    pub leads_novos: usize,
    pub reunioes_agendadas: usize,
    pub propostas_enviadas: usize,
    pub contratos_assinados: usize,
    pub contratos_recusados: usize,
    pub leads_perdidos: usize,
    #[schema(example = "25.0")]
    pub taxa_conversao_reuniao: String,
    #[schema(example = "10.0")]
    pub taxa_fechamento: String,
    pub receita_gerada: Decimal,
    pub ticket_medio: Decimal,
    pub comissao_gerada: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyEvolutionEntry {
    #[schema(example = "out/26")]
    pub month: String,
    pub year: i32,
    pub month_number: u32,
    pub leads: usize,
    pub fechamentos: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KpiReport {
    pub period_days: i64,
    pub kpis: KpiSummary,
    // Contagem por status (chave = valor do enum no JSON)
    pub lead_status_counts: BTreeMap<String, usize>,
    pub proposal_status_counts: BTreeMap<String, usize>,
    pub status_distribution: Vec<DistributionEntry>,
    pub origem_distribution: Vec<DistributionEntry>,
    pub top_banks: Vec<DistributionEntry>,
    pub monthly_evolution: Vec<MonthlyEvolutionEntry>,
}
