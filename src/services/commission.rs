// src/services/commission.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        money::{checked_sum, percent_of},
    },
    models::{
        proposal::{Proposal, ProposalStatus},
        reports::{CommissionFilter, CommissionReport, CommissionTotals, MonthlyCommission},
    },
};

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

pub fn month_name(month_number: u32) -> &'static str {
    MONTH_NAMES
        .get(month_number.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

pub fn commission_for(value: Decimal, rate_percent: Decimal) -> Result<Decimal, AppError> {
    percent_of(value, rate_percent)
}

/// Primeiro instante do mês corrente, no fuso dos relatórios.
pub fn start_of_month(now: DateTime<Utc>, offset: &FixedOffset) -> DateTime<Utc> {
    let local = now.with_timezone(offset);
    offset
        .with_ymd_and_hms(local.year(), local.month(), 1, 0, 0, 0)
        .single()
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or(now)
}

/// Relatório de comissões: só contratos fechados, agrupados por (ano, mês).
///
/// Os grupos saem do ano mais recente para o mais antigo e, dentro do ano,
/// em ordem de calendário. O filtro reduz os meses listados; os totais
/// consideram sempre todos os contratos fechados. Somas que estouram o
/// `Decimal` retornam `CalculationOverflow`.
pub fn build_commission_report(
    proposals: &[Proposal],
    rate_percent: Decimal,
    filter: CommissionFilter,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> Result<CommissionReport, AppError> {
    let closed: Vec<&Proposal> = proposals
        .iter()
        .filter(|p| p.status == ProposalStatus::Fechado)
        .collect();

    let mut groups: BTreeMap<(i32, u32), MonthlyCommission> = BTreeMap::new();

    for proposal in &closed {
        let local = proposal.date.with_timezone(offset);
        let (year, month) = (local.year(), local.month());

        let group = groups.entry((year, month)).or_insert_with(|| MonthlyCommission {
            month: month_name(month).to_string(),
            month_number: month,
            year,
            total_contracts: 0,
            total_honorarios: Decimal::ZERO,
            total_commission: Decimal::ZERO,
            contracts: Vec::new(),
        });

        group.total_contracts += 1;
        group.total_honorarios = checked_sum([group.total_honorarios, proposal.proposal_value])?;
        group.total_commission = checked_sum([
            group.total_commission,
            commission_for(proposal.proposal_value, rate_percent)?,
        ])?;
        group.contracts.push((*proposal).clone());
    }

    let mut months: Vec<MonthlyCommission> = groups.into_values().collect();
    months.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| a.month_number.cmp(&b.month_number))
    });

    let mut available_years: Vec<i32> = months.iter().map(|m| m.year).collect();
    available_years.dedup();

    let mut available_months: Vec<u32> = months
        .iter()
        .filter(|m| filter.year.map_or(true, |y| y == m.year))
        .map(|m| m.month_number)
        .collect();
    available_months.sort_unstable();
    available_months.dedup();

    let month_start = start_of_month(now, offset);
    let current_month_commission = checked_sum(
        closed
            .iter()
            .filter(|p| p.date >= month_start && p.date <= now)
            .map(|p| commission_for(p.proposal_value, rate_percent))
            .collect::<Result<Vec<_>, _>>()?,
    )?;

    let totals = CommissionTotals {
        total_contracts: closed.len(),
        total_honorarios: checked_sum(closed.iter().map(|p| p.proposal_value))?,
        total_commissions: checked_sum(
            closed
                .iter()
                .map(|p| commission_for(p.proposal_value, rate_percent))
                .collect::<Result<Vec<_>, _>>()?,
        )?,
        current_month_commission,
    };

    let months = months
        .into_iter()
        .filter(|m| filter.matches(m.year, m.month_number))
        .collect();

    Ok(CommissionReport {
        commission_rate: rate_percent,
        months,
        totals,
        available_years,
        available_months,
    })
}
