// src/db/lead_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{Lead, LeadChanges, LeadFilter, NewLead},
};

#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create(&self, lead: NewLead) -> Result<Lead, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<Lead>, AppError>;
    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError>;
    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError>;
}

const LEAD_COLUMNS: &str = r#"
    id, user_id, client_name, client_phone, client_document, client_email,
    bank_name, debt_value, current_situation, origem, status, meeting_date,
    notes, objecoes, proposal_value, created_at, updated_at
"#;

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for LeadRepository {
    async fn create(&self, lead: NewLead) -> Result<Lead, AppError> {
        let sql = format!(
            r#"
            INSERT INTO leads (
                user_id, client_name, client_phone, client_document, client_email,
                bank_name, debt_value, current_situation, origem,
                meeting_date, notes, objecoes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {LEAD_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Lead>(&sql)
            .bind(lead.user_id)
            .bind(&lead.client_name)
            .bind(&lead.client_phone)
            .bind(&lead.client_document)
            .bind(lead.client_email.as_deref())
            .bind(&lead.bank_name)
            .bind(lead.debt_value)
            .bind(&lead.current_situation)
            .bind(&lead.origem)
            .bind(lead.meeting_date)
            .bind(&lead.notes)
            .bind(lead.objecoes.as_deref())
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1");

        let lead = sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(lead)
    }

    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        // Mesma busca literal das propostas, incluindo o banco
        let sql = format!(
            r#"
            SELECT {LEAD_COLUMNS}
            FROM leads
            WHERE ($1::text IS NULL
                   OR strpos(lower(client_name), lower($1)) > 0
                   OR strpos(lower(bank_name), lower($1)) > 0
                   OR strpos(client_document, $1) > 0
                   OR strpos(client_phone, $1) > 0)
              AND ($2::lead_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#
        );

        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let leads = sqlx::query_as::<_, Lead>(&sql)
            .bind(search)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;

        Ok(leads)
    }

    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError> {
        let sql = format!(
            r#"
            UPDATE leads SET
                status = COALESCE($2, status),
                notes = CASE WHEN $3::text IS NULL THEN notes ELSE notes || E'\n' || $3 END,
                meeting_date = COALESCE($4, meeting_date),
                proposal_value = COALESCE($5, proposal_value),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .bind(changes.status)
            .bind(changes.note_line.as_deref())
            .bind(changes.meeting_date)
            .bind(changes.proposal_value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }
}
