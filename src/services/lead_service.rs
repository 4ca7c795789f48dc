// src/services/lead_service.rs

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadStore,
    models::lead::{
        CreateLeadPayload, Lead, LeadChanges, LeadFilter, LeadStats, LeadStatus, NewLead,
        UpdateLeadStatusPayload,
    },
    services::kpi::format_rate,
};

/// Linha `dd/mm/aaaa HH:MM:SS: nota` do histórico do lead.
fn note_line(note: &str, when: DateTime<FixedOffset>) -> String {
    format!("{}: {}", when.format("%d/%m/%Y %H:%M:%S"), note)
}

pub fn lead_stats(leads: &[Lead]) -> LeadStats {
    let count = |status: LeadStatus| leads.iter().filter(|l| l.status == status).count();

    // Ticket médio só sobre leads com valor de proposta informado
    let values: Vec<Decimal> = leads
        .iter()
        .filter_map(|l| l.proposal_value)
        .filter(|v| !v.is_zero())
        .collect();
    let ticket_medio = if values.is_empty() {
        Decimal::ZERO
    } else {
        (values.iter().sum::<Decimal>() / Decimal::from(values.len())).round_dp(2)
    };

    let fechados = count(LeadStatus::Fechado);

    LeadStats {
        total: leads.len(),
        novos: count(LeadStatus::Novo),
        em_reuniao: count(LeadStatus::EmReuniao),
        proposta_enviada: count(LeadStatus::PropostaEnviada),
        fechados,
        perdidos: count(LeadStatus::Perdido),
        recusados: count(LeadStatus::Recusado),
        taxa_fechamento: format_rate(fechados, leads.len()),
        ticket_medio,
    }
}

#[derive(Clone)]
pub struct LeadService {
    repo: Arc<dyn LeadStore>,
    // Fuso usado nas datas escritas no histórico
    offset: FixedOffset,
}

impl LeadService {
    pub fn new(repo: Arc<dyn LeadStore>, offset: FixedOffset) -> Self {
        Self { repo, offset }
    }

    pub async fn create_lead(&self, user_id: Option<Uuid>, payload: CreateLeadPayload) -> Result<Lead, AppError> {
        AppError::check_required(&[
            ("clientName", !payload.client_name.trim().is_empty()),
            ("clientDocument", !payload.client_document.trim().is_empty()),
            ("clientPhone", !payload.client_phone.trim().is_empty()),
            ("bankName", !payload.bank_name.trim().is_empty()),
            ("debtValue", payload.debt_value > Decimal::ZERO),
        ])?;

        let lead = self
            .repo
            .create(NewLead {
                user_id,
                client_name: payload.client_name.trim().to_string(),
                client_phone: payload.client_phone.trim().to_string(),
                client_document: payload.client_document.trim().to_string(),
                client_email: payload.client_email,
                bank_name: payload.bank_name.trim().to_string(),
                debt_value: payload.debt_value,
                current_situation: payload.current_situation,
                origem: payload.origem.trim().to_string(),
                meeting_date: payload.meeting_date,
                notes: payload.notes,
                objecoes: payload.objecoes,
            })
            .await?;

        tracing::info!(lead_id = %lead.id, bank = %lead.bank_name, "Novo lead cadastrado");

        Ok(lead)
    }

    pub async fn get_lead(&self, id: Uuid) -> Result<Lead, AppError> {
        self.repo.get(id).await?.ok_or(AppError::LeadNotFound)
    }

    pub async fn list_leads(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        self.repo.list(filter).await
    }

    pub async fn stats(&self) -> Result<LeadStats, AppError> {
        let leads = self.repo.list(&LeadFilter::default()).await?;
        Ok(lead_stats(&leads))
    }

    /// Move o lead no funil. Uma observação não vazia entra no histórico.
    pub async fn update_status(&self, id: Uuid, payload: UpdateLeadStatusPayload) -> Result<Lead, AppError> {
        self.update_status_at(id, payload, Utc::now()).await
    }

    async fn update_status_at(
        &self,
        id: Uuid,
        payload: UpdateLeadStatusPayload,
        now: DateTime<Utc>,
    ) -> Result<Lead, AppError> {
        let line = payload
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(|note| note_line(note, now.with_timezone(&self.offset)));

        let changes = LeadChanges {
            status: Some(payload.status),
            note_line: line,
            meeting_date: None,
            proposal_value: payload.proposal_value,
        };

        let updated = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or(AppError::LeadNotFound)?;

        tracing::info!(lead_id = %id, status = updated.status.as_str(), "Status do lead atualizado");

        Ok(updated)
    }

    /// Agenda a reunião: o lead passa para `em_reuniao` e o histórico registra a data.
    pub async fn schedule_meeting(&self, id: Uuid, meeting_date: DateTime<Utc>) -> Result<Lead, AppError> {
        self.schedule_meeting_at(id, meeting_date, Utc::now()).await
    }

    async fn schedule_meeting_at(
        &self,
        id: Uuid,
        meeting_date: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Lead, AppError> {
        let note = format!(
            "Reunião agendada para {}",
            meeting_date.with_timezone(&self.offset).format("%d/%m/%Y")
        );

        let changes = LeadChanges {
            status: Some(LeadStatus::EmReuniao),
            note_line: Some(note_line(&note, now.with_timezone(&self.offset))),
            meeting_date: Some(meeting_date),
            proposal_value: None,
        };

        let updated = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or(AppError::LeadNotFound)?;

        tracing::info!(lead_id = %id, meeting = %meeting_date, "Reunião agendada");

        Ok(updated)
    }
}
