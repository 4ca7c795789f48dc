// src/db/proposal_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::proposal::{NewProposal, Proposal, ProposalChanges, ProposalFilter},
};

#[async_trait]
pub trait ProposalStore: Send + Sync {
    async fn create(&self, proposal: NewProposal) -> Result<Proposal, AppError>;
    async fn get(&self, id: Uuid) -> Result<Option<Proposal>, AppError>;
    /// Mais recentes primeiro.
    async fn list(&self, filter: &ProposalFilter) -> Result<Vec<Proposal>, AppError>;
    /// `None` quando o id não existe.
    async fn update(&self, id: Uuid, changes: &ProposalChanges) -> Result<Option<Proposal>, AppError>;
}

const PROPOSAL_COLUMNS: &str = r#"
    id, user_id, client_name, client_phone, client_document,
    debt_value, economia_value, indenizacao_value,
    proposal_type, proposal_value, status, notes, date, updated_at
"#;

#[derive(Clone)]
pub struct ProposalRepository {
    pool: PgPool,
}

impl ProposalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProposalStore for ProposalRepository {
    async fn create(&self, proposal: NewProposal) -> Result<Proposal, AppError> {
        let sql = format!(
            r#"
            INSERT INTO proposals (
                user_id, client_name, client_phone, client_document,
                debt_value, economia_value, indenizacao_value,
                proposal_type, proposal_value, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PROPOSAL_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Proposal>(&sql)
            .bind(proposal.user_id)
            .bind(&proposal.client_name)
            .bind(&proposal.client_phone)
            .bind(&proposal.client_document)
            .bind(proposal.debt_value)
            .bind(proposal.economia_value)
            .bind(proposal.indenizacao_value)
            .bind(proposal.proposal_type)
            .bind(proposal.proposal_value)
            .bind(proposal.status)
            .bind(&proposal.notes)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Proposal>, AppError> {
        let sql = format!("SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE id = $1");

        let proposal = sqlx::query_as::<_, Proposal>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(proposal)
    }

    async fn list(&self, filter: &ProposalFilter) -> Result<Vec<Proposal>, AppError> {
        // Busca literal (`%` e `_` não são curingas). Nome sem diferenciar
        // maiúsculas; documento e telefone como digitados
        let sql = format!(
            r#"
            SELECT {PROPOSAL_COLUMNS}
            FROM proposals
            WHERE ($1::text IS NULL
                   OR strpos(lower(client_name), lower($1)) > 0
                   OR strpos(client_document, $1) > 0
                   OR strpos(client_phone, $1) > 0)
              AND ($2::proposal_status IS NULL OR status = $2)
            ORDER BY date DESC
            "#
        );

        let search = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let proposals = sqlx::query_as::<_, Proposal>(&sql)
            .bind(search)
            .bind(filter.status)
            .fetch_all(&self.pool)
            .await?;

        Ok(proposals)
    }

    async fn update(&self, id: Uuid, changes: &ProposalChanges) -> Result<Option<Proposal>, AppError> {
        let sql = format!(
            r#"
            UPDATE proposals SET
                status = COALESCE($2, status),
                notes = COALESCE($3, notes),
                client_name = COALESCE($4, client_name),
                client_phone = COALESCE($5, client_phone),
                client_document = COALESCE($6, client_document),
                debt_value = COALESCE($7, debt_value),
                economia_value = COALESCE($8, economia_value),
                indenizacao_value = COALESCE($9, indenizacao_value),
                proposal_type = COALESCE($10, proposal_type),
                proposal_value = COALESCE($11, proposal_value),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROPOSAL_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Proposal>(&sql)
            .bind(id)
            .bind(changes.status)
            .bind(changes.notes.as_deref())
            .bind(changes.client_name.as_deref())
            .bind(changes.client_phone.as_deref())
            .bind(changes.client_document.as_deref())
            .bind(changes.debt_value)
            .bind(changes.economia_value)
            .bind(changes.indenizacao_value)
            .bind(changes.proposal_type)
            .bind(changes.proposal_value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }
}
