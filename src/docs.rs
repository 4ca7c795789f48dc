// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Calculator ---
        handlers::calculator::get_defaults,
        handlers::calculator::quote,
        handlers::calculator::payment_plan,

        // --- Proposals ---
        handlers::proposals::create_proposal,
        handlers::proposals::list_proposals,
        handlers::proposals::get_proposal,
        handlers::proposals::update_proposal,
        handlers::proposals::get_payment_plan,

        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_leads,
        handlers::leads::get_stats,
        handlers::leads::get_lead,
        handlers::leads::update_status,
        handlers::leads::schedule_meeting,

        // --- Reports ---
        handlers::reports::get_commissions,
        handlers::reports::get_kpis,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Calculator ---
            models::calculator::PercentageConfig,
            models::calculator::PercentageOverrides,
            models::calculator::QuotePayload,
            models::calculator::HonorarioQuote,
            models::calculator::OutrasAcoesQuote,
            models::calculator::ConsignadoQuote,
            models::calculator::ClausulaTetoQuote,
            models::calculator::CalculationResults,
            models::calculator::PaymentPlanPayload,
            models::calculator::CardPlan,
            models::calculator::BoletoPlan,
            models::calculator::PaymentPlan,

            // --- Proposals ---
            models::proposal::ProposalType,
            models::proposal::ProposalStatus,
            models::proposal::Proposal,
            models::proposal::CreateProposalPayload,
            models::proposal::UpdateProposalPayload,

            // --- Leads ---
            models::lead::LeadStatus,
            models::lead::Lead,
            models::lead::LeadStats,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadStatusPayload,
            models::lead::ScheduleMeetingPayload,

            // --- Reports ---
            models::reports::MonthlyCommission,
            models::reports::CommissionTotals,
            models::reports::CommissionReport,
            models::reports::KpiSummary,
            models::reports::DistributionEntry,
            models::reports::MonthlyEvolutionEntry,
            models::reports::KpiReport,
        )
    ),
    tags(
        (name = "Health", description = "Verificação de disponibilidade"),
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário"),
        (name = "Calculator", description = "Calculadora de honorários e condições de pagamento"),
        (name = "Proposals", description = "Propostas e histórico de clientes"),
        (name = "Leads", description = "Gestão do funil de leads"),
        (name = "Reports", description = "Comissões e indicadores")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/health",
            "/api/calculator/quote",
            "/api/proposals/{id}/payment-plan",
            "/api/leads/{id}/meeting",
            "/api/reports/kpis",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
