// src/models/lead.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::parsing::{lenient_amount, lenient_amount_opt};

// Mapeia o CREATE TYPE lead_status do banco (o funil completo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "lead_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    Novo,
    EmReuniao,
    PropostaEnviada,
    Fechado,
    Perdido,
    Recusado,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::Novo,
        LeadStatus::EmReuniao,
        LeadStatus::PropostaEnviada,
        LeadStatus::Fechado,
        LeadStatus::Perdido,
        LeadStatus::Recusado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Novo => "novo",
            LeadStatus::EmReuniao => "em_reuniao",
            LeadStatus::PropostaEnviada => "proposta_enviada",
            LeadStatus::Fechado => "fechado",
            LeadStatus::Perdido => "perdido",
            LeadStatus::Recusado => "recusado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LeadStatus::Novo => "Novos",
            LeadStatus::EmReuniao => "Em Reunião",
            LeadStatus::PropostaEnviada => "Proposta Enviada",
            LeadStatus::Fechado => "Fechados",
            LeadStatus::Perdido => "Perdidos",
            LeadStatus::Recusado => "Recusados",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub user_id: Option<Uuid>,

    #[schema(example = "João Pereira")]
    pub client_name: String,
    #[schema(example = "(11) 98888-7777")]
    pub client_phone: String,
    #[schema(example = "123.456.789-00")]
    pub client_document: String,
    pub client_email: Option<String>,

    #[schema(example = "Banco do Brasil")]
    pub bank_name: String,
    #[schema(example = "85000.00")]
    pub debt_value: Decimal,
    #[schema(example = "Cobrança judicial iniciada")]
    pub current_situation: String,
    #[schema(example = "WhatsApp")]
    pub origem: String,

    pub status: LeadStatus,
    pub meeting_date: Option<DateTime<Utc>>,

    // Histórico: cada atualização acrescenta uma linha com data e hora
    pub notes: String,
    pub objecoes: Option<String>,
    pub proposal_value: Option<Decimal>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLead {
    pub user_id: Option<Uuid>,
    pub client_name: String,
    pub client_phone: String,
    pub client_document: String,
    pub client_email: Option<String>,
    pub bank_name: String,
    pub debt_value: Decimal,
    pub current_situation: String,
    pub origem: String,
    pub meeting_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub objecoes: Option<String>,
}

// --- PAYLOADS ---

// Corpo do POST /api/leads
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[serde(default)]
    #[schema(example = "João Pereira")]
    pub client_name: String,
    #[serde(default)]
    #[schema(example = "(11) 98888-7777")]
    pub client_phone: String,
    #[serde(default)]
    #[schema(example = "123.456.789-00")]
    pub client_document: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "joao@email.com")]
    pub client_email: Option<String>,

    #[serde(default)]
    #[schema(example = "Banco do Brasil")]
    pub bank_name: String,
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "85.000,00")]
    pub debt_value: Decimal,
    #[serde(default)]
    pub current_situation: String,
    #[serde(default)]
    #[schema(example = "WhatsApp")]
    pub origem: String,

    pub meeting_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: String,
    pub objecoes: Option<String>,
}

impl CreateLeadPayload {
    /// E-mail em branco conta como não informado.
    pub fn normalized(mut self) -> Self {
        self.client_email = self
            .client_email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        self
    }
}

// Corpo do PATCH /api/leads/{id}/status
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeadStatusPayload {
    pub status: LeadStatus,
    // Observação acrescentada ao histórico com data e hora
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount_opt")]
    #[schema(value_type = Option<String>, example = "3000")]
    pub proposal_value: Option<Decimal>,
}

// Corpo do POST /api/leads/{id}/meeting
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMeetingPayload {
    pub meeting_date: DateTime<Utc>,
}

/// Atualização parcial do funil. `None` mantém o valor gravado.
#[derive(Debug, Clone, Default)]
pub struct LeadChanges {
    pub status: Option<LeadStatus>,
    /// Linha nova do histórico. Só é acrescentada, nunca substitui o que já existe.
    pub note_line: Option<String>,
    pub meeting_date: Option<DateTime<Utc>>,
    pub proposal_value: Option<Decimal>,
}

impl LeadChanges {
    pub fn apply_to(&self, lead: &mut Lead) {
        if let Some(status) = self.status {
            lead.status = status;
        }
        if let Some(line) = &self.note_line {
            lead.notes.push('\n');
            lead.notes.push_str(line);
        }
        if self.meeting_date.is_some() {
            lead.meeting_date = self.meeting_date;
        }
        if self.proposal_value.is_some() {
            lead.proposal_value = self.proposal_value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeadFilter {
    /// Nome, documento, telefone ou banco
    pub search: Option<String>,
    pub status: Option<LeadStatus>,
}

impl LeadFilter {
    pub fn matches(&self, lead: &Lead) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let lowered = term.to_lowercase();
                lead.client_name.to_lowercase().contains(&lowered)
                    || lead.client_document.contains(term)
                    || lead.client_phone.contains(term)
                    || lead.bank_name.to_lowercase().contains(&lowered)
            }
        };

        matches_search && self.status.map_or(true, |s| lead.status == s)
    }
}

/// Os cards do topo da gestão de leads.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadStats {
    pub total: usize,
    pub novos: usize,
    pub em_reuniao: usize,
    pub proposta_enviada: usize,
    pub fechados: usize,
    pub perdidos: usize,
    pub recusados: usize,
    #[schema(example = "12.5")]
    pub taxa_fechamento: String,
    pub ticket_medio: Decimal,
}
