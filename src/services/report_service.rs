// src/services/report_service.rs

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, money::is_valid_percent, parsing::parse_setting},
    db::{LeadStore, ProposalStore},
    models::{
        lead::LeadFilter,
        proposal::ProposalFilter,
        reports::{CommissionFilter, CommissionReport, KpiReport, ReportPeriod},
    },
    services::{commission::build_commission_report, kpi::build_kpi_report},
};

/// Taxas e fuso usados pelos relatórios.
#[derive(Debug, Clone, Copy)]
pub struct ReportSettings {
    pub default_commission_percent: Decimal,
    pub kpi_commission_percent: Decimal,
    pub offset: FixedOffset,
}

#[derive(Clone)]
pub struct ReportService {
    proposals: Arc<dyn ProposalStore>,
    leads: Arc<dyn LeadStore>,
    settings: ReportSettings,
}

impl ReportService {
    pub fn new(proposals: Arc<dyn ProposalStore>, leads: Arc<dyn LeadStore>, settings: ReportSettings) -> Self {
        Self { proposals, leads, settings }
    }

    /// Taxa digitada pelo operador; vazia, inválida ou fora de 0..=100 usa a padrão.
    pub fn resolve_rate(&self, raw: Option<&str>) -> Decimal {
        raw.and_then(parse_setting)
            .filter(|r| is_valid_percent(*r))
            .unwrap_or(self.settings.default_commission_percent)
    }

    pub async fn commission_report(
        &self,
        raw_rate: Option<&str>,
        filter: CommissionFilter,
    ) -> Result<CommissionReport, AppError> {
        self.commission_report_at(raw_rate, filter, Utc::now()).await
    }

    async fn commission_report_at(
        &self,
        raw_rate: Option<&str>,
        filter: CommissionFilter,
        now: DateTime<Utc>,
    ) -> Result<CommissionReport, AppError> {
        let rate = self.resolve_rate(raw_rate);
        let proposals = self.proposals.list(&ProposalFilter::default()).await?;

        tracing::debug!(%rate, total = proposals.len(), "Gerando relatório de comissões");

        build_commission_report(&proposals, rate, filter, now, &self.settings.offset)
    }

    /// `days` ausente usa a janela padrão de 30 dias.
    pub async fn kpi_report(&self, days: Option<i64>) -> Result<KpiReport, AppError> {
        self.kpi_report_at(days, Utc::now()).await
    }

    async fn kpi_report_at(&self, days: Option<i64>, now: DateTime<Utc>) -> Result<KpiReport, AppError> {
        let period = days.map(ReportPeriod::try_from).transpose()?.unwrap_or_default();

        let leads = self.leads.list(&LeadFilter::default()).await?;
        let proposals = self.proposals.list(&ProposalFilter::default()).await?;

        build_kpi_report(
            &leads,
            &proposals,
            period,
            self.settings.kpi_commission_percent,
            now,
            &self.settings.offset,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryStore;
    use crate::models::{lead::LeadStatus, proposal::ProposalStatus};
    use crate::test_support::{at, brasilia, lead, proposal};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn service(store: Arc<InMemoryStore>) -> ReportService {
        ReportService::new(
            store.clone(),
            store,
            ReportSettings {
                default_commission_percent: dec!(5),
                kpi_commission_percent: dec!(5),
                offset: brasilia(),
            },
        )
    }

    #[rstest]
    #[case(None, dec!(5))]
    #[case(Some(""), dec!(5))]
    #[case(Some("abc"), dec!(5))]
    #[case(Some("-2"), dec!(5))]
    #[case(Some("7,5"), dec!(7.5))]
    #[case(Some("0"), dec!(0))]
    #[case(Some("100"), dec!(100))]
    #[case(Some("100,01"), dec!(5))]
    #[case(Some("99999999999999999999999999"), dec!(5))]
    fn commission_rate_input_is_lenient(#[case] raw: Option<&str>, #[case] expected: Decimal) {
        let service = service(Arc::new(InMemoryStore::default()));
        assert_eq!(service.resolve_rate(raw), expected);
    }

    #[tokio::test]
    async fn commission_report_reads_every_proposal() {
        let store = Arc::new(InMemoryStore::default());
        store.insert_proposal(proposal(dec!(3000), ProposalStatus::Fechado, at(2026, 8, 3, 12)));
        store.insert_proposal(proposal(dec!(5000), ProposalStatus::Fechado, at(2026, 8, 20, 12)));
        store.insert_proposal(proposal(dec!(9000), ProposalStatus::Pendente, at(2026, 8, 20, 12)));

        let report = service(store)
            .commission_report_at(Some("10"), CommissionFilter::default(), at(2026, 10, 16, 15))
            .await
            .unwrap();

        assert_eq!(report.commission_rate, dec!(10));
        assert_eq!(report.totals.total_contracts, 2);
        assert_eq!(report.totals.total_commissions, dec!(800));
    }

    #[tokio::test]
    async fn huge_typed_rate_falls_back_to_the_default() {
        let store = Arc::new(InMemoryStore::default());
        store.insert_proposal(proposal(dec!(1000000), ProposalStatus::Fechado, at(2026, 8, 3, 12)));

        let report = service(store)
            .commission_report_at(
                Some("99999999999999999999999999"),
                CommissionFilter::default(),
                at(2026, 10, 16, 15),
            )
            .await
            .unwrap();

        assert_eq!(report.commission_rate, dec!(5));
        assert_eq!(report.totals.total_commissions, dec!(50000));
    }

    #[tokio::test]
    async fn kpi_report_defaults_to_thirty_days() {
        let store = Arc::new(InMemoryStore::default());
        store.insert_lead(lead(LeadStatus::EmReuniao, "Itaú", "Site", at(2026, 10, 10, 12)));
        store.insert_lead(lead(LeadStatus::Novo, "Itaú", "Site", at(2026, 6, 10, 12)));

        let report = service(store).kpi_report_at(None, at(2026, 10, 16, 15)).await.unwrap();

        assert_eq!(report.period_days, 30);
        assert_eq!(report.kpis.total_leads, 1);
        assert_eq!(report.kpis.taxa_conversao_reuniao, "100.0");
    }

    #[tokio::test]
    async fn unsupported_period_is_rejected() {
        let err = service(Arc::new(InMemoryStore::default()))
            .kpi_report(Some(15))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidReportPeriod(15)));
    }
}
