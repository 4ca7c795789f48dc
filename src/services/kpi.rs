// src/services/kpi.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, FixedOffset, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::{error::AppError, money::checked_sum};
use crate::models::{
    lead::{Lead, LeadStatus},
    proposal::{Proposal, ProposalStatus},
    reports::{DistributionEntry, KpiReport, KpiSummary, MonthlyEvolutionEntry, ReportPeriod},
};
use crate::services::commission::commission_for;

const SHORT_MONTHS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];
const TOP_BANKS_LIMIT: usize = 10;
const EVOLUTION_MONTHS: i32 = 6;
const UNKNOWN_ORIGIN: &str = "Não informado";

/// Percentual com uma casa decimal; `"0"` quando o denominador é zero.
pub fn format_rate(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        return "0".to_string();
    }
    let rate = Decimal::from(numerator) * Decimal::ONE_HUNDRED / Decimal::from(denominator);
    format!(
        "{:.1}",
        rate.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    )
}

/// Conta ocorrências preservando a ordem em que cada nome aparece.
fn count_in_order<'a>(names: impl Iterator<Item = &'a str>) -> Vec<DistributionEntry> {
    let mut entries: Vec<DistributionEntry> = Vec::new();
    for name in names {
        match entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.value += 1,
            None => entries.push(DistributionEntry { name: name.to_string(), value: 1 }),
        }
    }
    entries
}

/// (ano, mês) deslocado `back` meses para trás.
fn shift_month(year: i32, month: u32, back: i32) -> (i32, u32) {
    let total = year * 12 + month as i32 - 1 - back;
    (total.div_euclid(12), total.rem_euclid(12) as u32 + 1)
}

fn same_month(date: DateTime<Utc>, offset: &FixedOffset, year: i32, month: u32) -> bool {
    let local = date.with_timezone(offset);
    local.year() == year && local.month() == month
}

/// Painel de KPIs do funil dentro da janela escolhida.
///
/// `taxaFechamento` divide contratos fechados (propostas) pelo total de leads,
/// duas coleções diferentes. A comissão usa `kpi_commission_percent`, que é
/// independente da taxa do relatório de comissões.
pub fn build_kpi_report(
    leads: &[Lead],
    proposals: &[Proposal],
    period: ReportPeriod,
    kpi_commission_percent: Decimal,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> Result<KpiReport, AppError> {
    let cutoff = now - Duration::days(period.days());

    let window_leads: Vec<&Lead> = leads.iter().filter(|l| l.created_at >= cutoff).collect();
    let window_proposals: Vec<&Proposal> = proposals.iter().filter(|p| p.date >= cutoff).collect();

    let leads_with = |status: LeadStatus| window_leads.iter().filter(|l| l.status == status).count();
    let proposals_with =
        |status: ProposalStatus| window_proposals.iter().filter(|p| p.status == status).count();

    let total_leads = window_leads.len();
    let reunioes = leads_with(LeadStatus::EmReuniao);
    let fechados = proposals_with(ProposalStatus::Fechado);

    let receita = checked_sum(
        window_proposals
            .iter()
            .filter(|p| p.status == ProposalStatus::Fechado)
            .map(|p| p.proposal_value),
    )?;

    let ticket_medio = receita
        .checked_div(Decimal::from(fechados))
        .map(|t| t.round_dp(2))
        .unwrap_or(Decimal::ZERO);

    let kpis = KpiSummary {
        total_leads,
        leads_novos: leads_with(LeadStatus::Novo),
        reunioes_agendadas: reunioes,
        propostas_enviadas: leads_with(LeadStatus::PropostaEnviada),
        contratos_assinados: fechados,
        contratos_recusados: proposals_with(ProposalStatus::Recusado),
        leads_perdidos: leads_with(LeadStatus::Perdido),
        taxa_conversao_reuniao: format_rate(reunioes, total_leads),
        taxa_fechamento: format_rate(fechados, total_leads),
        receita_gerada: receita,
        ticket_medio,
        comissao_gerada: commission_for(receita, kpi_commission_percent)?,
    };

    let lead_status_counts: BTreeMap<String, usize> = LeadStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), leads_with(*s)))
        .collect();
    let proposal_status_counts: BTreeMap<String, usize> = ProposalStatus::ALL
        .iter()
        .map(|s| (s.as_str().to_string(), proposals_with(*s)))
        .collect();

    // "Fechados" no gráfico vem dos contratos, o resto do funil de leads
    let status_distribution = vec![
        DistributionEntry { name: LeadStatus::Novo.label().to_string(), value: kpis.leads_novos },
        DistributionEntry { name: LeadStatus::EmReuniao.label().to_string(), value: kpis.reunioes_agendadas },
        DistributionEntry { name: LeadStatus::PropostaEnviada.label().to_string(), value: kpis.propostas_enviadas },
        DistributionEntry { name: LeadStatus::Fechado.label().to_string(), value: kpis.contratos_assinados },
        DistributionEntry { name: LeadStatus::Perdido.label().to_string(), value: kpis.leads_perdidos },
    ];

    let origem_distribution = count_in_order(window_leads.iter().map(|l| {
        let origem = l.origem.trim();
        if origem.is_empty() { UNKNOWN_ORIGIN } else { origem }
    }));

    let mut top_banks = count_in_order(window_leads.iter().map(|l| l.bank_name.as_str()));
    // sort_by é estável: empates mantêm a ordem de aparição
    top_banks.sort_by(|a, b| b.value.cmp(&a.value));
    top_banks.truncate(TOP_BANKS_LIMIT);

    // Evolução mensal olha todos os registros, não só a janela
    let local_now = now.with_timezone(offset);
    let monthly_evolution = (0..EVOLUTION_MONTHS)
        .rev()
        .map(|back| {
            let (year, month) = shift_month(local_now.year(), local_now.month(), back);
            MonthlyEvolutionEntry {
                month: format!("{}/{:02}", SHORT_MONTHS[(month - 1) as usize], year.rem_euclid(100)),
                year,
                month_number: month,
                leads: leads
                    .iter()
                    .filter(|l| same_month(l.created_at, offset, year, month))
                    .count(),
                fechamentos: proposals
                    .iter()
                    .filter(|p| {
                        p.status == ProposalStatus::Fechado && same_month(p.date, offset, year, month)
                    })
                    .count(),
            }
        })
        .collect();

    Ok(KpiReport {
        period_days: period.days(),
        kpis,
        lead_status_counts,
        proposal_status_counts,
        status_distribution,
        origem_distribution,
        top_banks,
        monthly_evolution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, brasilia, lead, proposal};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        at(2026, 10, 16, 15)
    }

    #[test]
    fn empty_window_reports_zeros() {
        let report = build_kpi_report(&[], &[], ReportPeriod::Last30Days, dec!(5), now(), &brasilia())
            .unwrap();

        assert_eq!(report.kpis.total_leads, 0);
        assert_eq!(report.kpis.contratos_assinados, 0);
        assert_eq!(report.kpis.taxa_conversao_reuniao, "0");
        assert_eq!(report.kpis.taxa_fechamento, "0");
        assert_eq!(report.kpis.receita_gerada, Decimal::ZERO);
        assert_eq!(report.kpis.ticket_medio, Decimal::ZERO);
        assert_eq!(report.kpis.comissao_gerada, Decimal::ZERO);
        assert!(report.lead_status_counts.values().all(|v| *v == 0));
        assert!(report.proposal_status_counts.values().all(|v| *v == 0));
        assert!(report.top_banks.is_empty());
    }

    #[test]
    fn rates_are_zero_without_leads_even_with_closed_contracts() {
        let proposals = vec![proposal(dec!(3000), ProposalStatus::Fechado, at(2026, 10, 10, 12))];

        let report = build_kpi_report(&[], &proposals, ReportPeriod::Last30Days, dec!(5), now(), &brasilia())
            .unwrap();

        assert_eq!(report.kpis.taxa_fechamento, "0");
        assert_eq!(report.kpis.contratos_assinados, 1);
        assert_eq!(report.kpis.receita_gerada, dec!(3000));
    }

    #[test]
    fn funnel_inside_the_window() {
        let leads = vec![
            lead(LeadStatus::Novo, "Itaú", "WhatsApp", at(2026, 10, 1, 12)),
            lead(LeadStatus::EmReuniao, "Itaú", "Instagram", at(2026, 10, 5, 12)),
            lead(LeadStatus::Perdido, "Bradesco", "", at(2026, 10, 6, 12)),
            lead(LeadStatus::PropostaEnviada, "Caixa", "WhatsApp", at(2026, 10, 15, 12)),
            // Fora da janela de 30 dias
            lead(LeadStatus::EmReuniao, "Itaú", "WhatsApp", at(2026, 8, 1, 12)),
        ];
        let proposals = vec![
            proposal(dec!(3000), ProposalStatus::Fechado, at(2026, 10, 2, 12)),
            proposal(dec!(5000), ProposalStatus::Fechado, at(2026, 10, 12, 12)),
            proposal(dec!(2000), ProposalStatus::Recusado, at(2026, 10, 12, 12)),
            proposal(dec!(9000), ProposalStatus::Fechado, at(2026, 7, 12, 12)),
        ];

        let report = build_kpi_report(&leads, &proposals, ReportPeriod::Last30Days, dec!(5), now(), &brasilia())
            .unwrap();
        let kpis = &report.kpis;

        assert_eq!(kpis.total_leads, 4);
        assert_eq!(kpis.leads_novos, 1);
        assert_eq!(kpis.reunioes_agendadas, 1);
        assert_eq!(kpis.propostas_enviadas, 1);
        assert_eq!(kpis.leads_perdidos, 1);
        assert_eq!(kpis.contratos_assinados, 2);
        assert_eq!(kpis.contratos_recusados, 1);
        assert_eq!(kpis.taxa_conversao_reuniao, "25.0");
        assert_eq!(kpis.taxa_fechamento, "50.0");
        assert_eq!(kpis.receita_gerada, dec!(8000));
        assert_eq!(kpis.ticket_medio, dec!(4000));
        assert_eq!(kpis.comissao_gerada, dec!(400));

        assert_eq!(report.lead_status_counts["em_reuniao"], 1);
        assert_eq!(report.proposal_status_counts["fechado"], 2);

        assert_eq!(
            report.origem_distribution,
            vec![
                DistributionEntry { name: "WhatsApp".into(), value: 2 },
                DistributionEntry { name: "Instagram".into(), value: 1 },
                DistributionEntry { name: "Não informado".into(), value: 1 },
            ]
        );
        assert_eq!(report.top_banks[0], DistributionEntry { name: "Itaú".into(), value: 2 });
    }

    #[test]
    fn kpi_commission_rate_is_its_own_setting() {
        let proposals = vec![proposal(dec!(10000), ProposalStatus::Fechado, at(2026, 10, 10, 12))];

        let report = build_kpi_report(&[], &proposals, ReportPeriod::Last7Days, dec!(8), now(), &brasilia())
            .unwrap();

        assert_eq!(report.kpis.comissao_gerada, dec!(800));
    }

    #[test]
    fn huge_kpi_commission_rate_is_an_error() {
        let proposals = vec![proposal(dec!(1000000), ProposalStatus::Fechado, at(2026, 10, 10, 12))];

        let err = build_kpi_report(
            &[],
            &proposals,
            ReportPeriod::Last30Days,
            dec!(99999999999999999999999999),
            now(),
            &brasilia(),
        )
        .unwrap_err();

        assert!(matches!(err, AppError::CalculationOverflow));
    }

    #[rstest]
    #[case(ReportPeriod::Last7Days, 1)]
    #[case(ReportPeriod::Last30Days, 2)]
    #[case(ReportPeriod::Last90Days, 3)]
    #[case(ReportPeriod::LastYear, 4)]
    fn window_length_filters_leads(#[case] period: ReportPeriod, #[case] expected: usize) {
        let leads = vec![
            lead(LeadStatus::Novo, "Inter", "Site", at(2026, 10, 12, 12)),
            lead(LeadStatus::Novo, "Inter", "Site", at(2026, 9, 20, 12)),
            lead(LeadStatus::Novo, "Inter", "Site", at(2026, 8, 1, 12)),
            lead(LeadStatus::Novo, "Inter", "Site", at(2026, 1, 2, 12)),
            lead(LeadStatus::Novo, "Inter", "Site", at(2025, 6, 2, 12)),
        ];

        let report = build_kpi_report(&leads, &[], period, dec!(5), now(), &brasilia()).unwrap();

        assert_eq!(report.kpis.total_leads, expected);
        assert_eq!(report.period_days, period.days());
    }

    #[test]
    fn top_banks_are_ranked_and_capped() {
        let banks = [
            "A", "B", "B", "C", "C", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L",
        ];
        let leads: Vec<Lead> = banks
            .iter()
            .map(|b| lead(LeadStatus::Novo, b, "Site", at(2026, 10, 10, 12)))
            .collect();

        let report = build_kpi_report(&leads, &[], ReportPeriod::Last30Days, dec!(5), now(), &brasilia())
            .unwrap();

        assert_eq!(report.top_banks.len(), 10);
        assert_eq!(report.top_banks[0].name, "C");
        assert_eq!(report.top_banks[1].name, "B");
        // Empate: ordem de aparição
        assert_eq!(report.top_banks[2].name, "A");
        assert_eq!(report.top_banks[3].name, "D");
    }

    #[test]
    fn six_month_evolution_oldest_first() {
        let leads = vec![
            lead(LeadStatus::Novo, "Itaú", "Site", at(2026, 10, 1, 12)),
            lead(LeadStatus::Novo, "Itaú", "Site", at(2026, 5, 20, 12)),
            lead(LeadStatus::Novo, "Itaú", "Site", at(2026, 4, 20, 12)),
        ];
        let proposals = vec![
            proposal(dec!(3000), ProposalStatus::Fechado, at(2026, 5, 21, 12)),
            proposal(dec!(3000), ProposalStatus::Pendente, at(2026, 5, 21, 12)),
        ];

        let report = build_kpi_report(&leads, &proposals, ReportPeriod::Last7Days, dec!(5), now(), &brasilia())
            .unwrap();
        let labels: Vec<&str> = report.monthly_evolution.iter().map(|e| e.month.as_str()).collect();

        assert_eq!(labels, vec!["mai/26", "jun/26", "jul/26", "ago/26", "set/26", "out/26"]);
        assert_eq!(report.monthly_evolution[0].leads, 1);
        assert_eq!(report.monthly_evolution[0].fechamentos, 1);
        assert_eq!(report.monthly_evolution[5].leads, 1);
    }

    #[test]
    fn evolution_crosses_year_boundary() {
        assert_eq!(shift_month(2026, 2, 3), (2025, 11));
        assert_eq!(shift_month(2026, 1, 0), (2026, 1));
    }

    #[rstest]
    #[case(1, 3, "33.3")]
    #[case(2, 3, "66.7")]
    #[case(3, 2, "150.0")]
    #[case(0, 4, "0.0")]
    #[case(5, 0, "0")]
    fn rate_formatting(#[case] num: usize, #[case] den: usize, #[case] expected: &str) {
        assert_eq!(format_rate(num, den), expected);
    }
}
