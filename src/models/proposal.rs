// src/models/proposal.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::common::parsing::{lenient_amount, lenient_amount_opt};
use crate::models::calculator::PercentageOverrides;

// --- ENUMS ---

// Mapeia o CREATE TYPE proposal_type do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "proposal_type", rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum ProposalType {
    Honorario,
    OutrasAcoes,
    Consignado,
}

impl ProposalType {
    pub fn label(&self) -> &'static str {
        match self {
            ProposalType::Honorario => "Honorário",
            ProposalType::OutrasAcoes => "Outras Ações",
            ProposalType::Consignado => "Consignado",
        }
    }
}

// Mapeia o CREATE TYPE proposal_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "proposal_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pendente,
    Fechado,
    Recusado,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 3] = [
        ProposalStatus::Pendente,
        ProposalStatus::Fechado,
        ProposalStatus::Recusado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pendente => "pendente",
            ProposalStatus::Fechado => "fechado",
            ProposalStatus::Recusado => "recusado",
        }
    }
}

impl Default for ProposalStatus {
    fn default() -> Self {
        ProposalStatus::Pendente
    }
}

// --- PROPOSTA (O Contrato) ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    // Quem registrou a proposta
    pub user_id: Option<Uuid>,

    #[schema(example = "Maria da Silva")]
    pub client_name: String,
    #[schema(example = "(11) 99999-9999")]
    pub client_phone: String,
    #[schema(example = "000.000.000-00")]
    pub client_document: String,

    #[schema(example = "100000.00")]
    pub debt_value: Decimal,
    #[schema(example = "20000.00")]
    pub economia_value: Decimal,
    #[schema(example = "0")]
    pub indenizacao_value: Decimal,

    pub proposal_type: ProposalType,
    #[schema(example = "3000.00")]
    pub proposal_value: Decimal,

    pub status: ProposalStatus,
    pub notes: String,

    // Data de criação (usada nos relatórios)
    pub date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dados para gravar uma nova proposta (o valor já vem calculado).
#[derive(Debug, Clone)]
pub struct NewProposal {
    pub user_id: Option<Uuid>,
    pub client_name: String,
    pub client_phone: String,
    pub client_document: String,
    pub debt_value: Decimal,
    pub economia_value: Decimal,
    pub indenizacao_value: Decimal,
    pub proposal_type: ProposalType,
    pub proposal_value: Decimal,
    pub status: ProposalStatus,
    pub notes: String,
}

/// Atualização parcial. `None` mantém o valor gravado.
#[derive(Debug, Clone, Default)]
pub struct ProposalChanges {
    pub status: Option<ProposalStatus>,
    pub notes: Option<String>,
    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_document: Option<String>,
    pub debt_value: Option<Decimal>,
    pub economia_value: Option<Decimal>,
    pub indenizacao_value: Option<Decimal>,
    pub proposal_type: Option<ProposalType>,
    pub proposal_value: Option<Decimal>,
}

impl ProposalChanges {
    /// Aplica as mudanças sobre uma proposta em memória.
    pub fn apply_to(&self, proposal: &mut Proposal) {
        if let Some(status) = self.status {
            proposal.status = status;
        }
        if let Some(notes) = &self.notes {
            proposal.notes = notes.clone();
        }
        if let Some(name) = &self.client_name {
            proposal.client_name = name.clone();
        }
        if let Some(phone) = &self.client_phone {
            proposal.client_phone = phone.clone();
        }
        if let Some(document) = &self.client_document {
            proposal.client_document = document.clone();
        }
        if let Some(debt) = self.debt_value {
            proposal.debt_value = debt;
        }
        if let Some(economia) = self.economia_value {
            proposal.economia_value = economia;
        }
        if let Some(indenizacao) = self.indenizacao_value {
            proposal.indenizacao_value = indenizacao;
        }
        if let Some(kind) = self.proposal_type {
            proposal.proposal_type = kind;
        }
        if let Some(value) = self.proposal_value {
            proposal.proposal_value = value;
        }
    }
}

// --- PAYLOADS ---

// Corpo do POST /api/proposals. O valor da proposta é sempre calculado no servidor.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProposalPayload {
    #[serde(default)]
    #[schema(example = "Maria da Silva")]
    pub client_name: String,
    #[serde(default)]
    #[schema(example = "(11) 99999-9999")]
    pub client_phone: String,
    #[serde(default)]
    #[schema(example = "000.000.000-00")]
    pub client_document: String,

    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "100.000,00")]
    pub debt_value: Decimal,
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "20000")]
    pub economia_value: Decimal,
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "0")]
    pub indenizacao_value: Decimal,

    pub proposal_type: ProposalType,
    pub status: Option<ProposalStatus>,
    pub notes: Option<String>,

    #[serde(default)]
    pub percentages: PercentageOverrides,
}

// Corpo do PATCH /api/proposals/{id}
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProposalPayload {
    pub status: Option<ProposalStatus>,
    pub notes: Option<String>,

    pub client_name: Option<String>,
    pub client_phone: Option<String>,
    pub client_document: Option<String>,

    #[serde(default, deserialize_with = "lenient_amount_opt")]
    #[schema(value_type = Option<String>)]
    pub debt_value: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    #[schema(value_type = Option<String>)]
    pub economia_value: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    #[schema(value_type = Option<String>)]
    pub indenizacao_value: Option<Decimal>,
    pub proposal_type: Option<ProposalType>,

    pub percentages: Option<PercentageOverrides>,
}

impl UpdateProposalPayload {
    /// Mexe em cliente, valores ou modalidade (não só status/observações)?
    pub fn edits_values(&self) -> bool {
        self.client_name.is_some()
            || self.client_phone.is_some()
            || self.client_document.is_some()
            || self.reprices()
    }

    /// Só valores, modalidade ou percentuais mudam o honorário.
    /// Corrigir nome, telefone ou documento mantém o valor gravado.
    pub fn reprices(&self) -> bool {
        self.debt_value.is_some()
            || self.economia_value.is_some()
            || self.indenizacao_value.is_some()
            || self.proposal_type.is_some()
            || self.percentages.is_some()
    }
}

/// Filtros da tela de histórico.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProposalFilter {
    /// Nome, documento ou telefone
    pub search: Option<String>,
    pub status: Option<ProposalStatus>,
}

impl ProposalFilter {
    pub fn matches(&self, proposal: &Proposal) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                proposal.client_name.to_lowercase().contains(&term.to_lowercase())
                    || proposal.client_document.contains(term)
                    || proposal.client_phone.contains(term)
            }
        };

        let matches_status = self.status.map_or(true, |s| proposal.status == s);

        matches_search && matches_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, proposal};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("maria", true)]
    #[case("000.000", true)]
    #[case("99999-9999", true)]
    #[case("%", false)]
    #[case("M_ria", false)]
    #[case("000%000", false)]
    fn search_is_literal(#[case] term: &str, #[case] expected: bool) {
        let stored = proposal(dec!(3000), ProposalStatus::Pendente, at(2026, 9, 10, 12));
        let filter = ProposalFilter { search: Some(term.into()), status: None };

        assert_eq!(filter.matches(&stored), expected);
    }

    #[test]
    fn identity_edit_does_not_reprice() {
        let payload = UpdateProposalPayload {
            client_phone: Some("(21) 98888-7777".into()),
            ..Default::default()
        };
        assert!(payload.edits_values());
        assert!(!payload.reprices());

        let payload = UpdateProposalPayload {
            proposal_type: Some(ProposalType::Consignado),
            ..Default::default()
        };
        assert!(payload.reprices());
    }
}
