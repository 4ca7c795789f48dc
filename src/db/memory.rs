// src/db/memory.rs
//
// Implementação em memória dos repositórios, usada pelos testes de serviço e de rotas.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LeadStore, ProposalStore, UserStore},
    models::{
        auth::User,
        lead::{Lead, LeadChanges, LeadFilter, LeadStatus, NewLead},
        proposal::{NewProposal, Proposal, ProposalChanges, ProposalFilter},
    },
};

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<User>>,
    proposals: Mutex<Vec<Proposal>>,
    leads: Mutex<Vec<Lead>>,
    // Força falha de persistência para testar o caminho de erro 500
    pub fail_writes: bool,
}

impl InMemoryStore {
    pub fn failing() -> Self {
        Self { fail_writes: true, ..Self::default() }
    }

    pub fn insert_proposal(&self, proposal: Proposal) {
        self.proposals.lock().unwrap().push(proposal);
    }

    pub fn insert_lead(&self, lead: Lead) {
        self.leads.lock().unwrap().push(lead);
    }

    pub fn proposal_count(&self) -> usize {
        self.proposals.lock().unwrap().len()
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User, AppError> {
        self.check_writable()?;
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == email) {
            return Err(AppError::EmailAlreadyExists);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProposalStore for InMemoryStore {
    async fn create(&self, proposal: NewProposal) -> Result<Proposal, AppError> {
        self.check_writable()?;
        let now = Utc::now();
        let created = Proposal {
            id: Uuid::new_v4(),
            user_id: proposal.user_id,
            client_name: proposal.client_name,
            client_phone: proposal.client_phone,
            client_document: proposal.client_document,
            debt_value: proposal.debt_value,
            economia_value: proposal.economia_value,
            indenizacao_value: proposal.indenizacao_value,
            proposal_type: proposal.proposal_type,
            proposal_value: proposal.proposal_value,
            status: proposal.status,
            notes: proposal.notes,
            date: now,
            updated_at: now,
        };
        self.proposals.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Proposal>, AppError> {
        Ok(self.proposals.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, filter: &ProposalFilter) -> Result<Vec<Proposal>, AppError> {
        let mut proposals: Vec<Proposal> = self
            .proposals
            .lock()
            .unwrap()
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        proposals.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(proposals)
    }

    async fn update(&self, id: Uuid, changes: &ProposalChanges) -> Result<Option<Proposal>, AppError> {
        self.check_writable()?;
        let mut proposals = self.proposals.lock().unwrap();
        Ok(proposals.iter_mut().find(|p| p.id == id).map(|p| {
            changes.apply_to(p);
            p.updated_at = Utc::now();
            p.clone()
        }))
    }
}

#[async_trait]
impl LeadStore for InMemoryStore {
    async fn create(&self, lead: NewLead) -> Result<Lead, AppError> {
        self.check_writable()?;
        let now = Utc::now();
        let created = Lead {
            id: Uuid::new_v4(),
            user_id: lead.user_id,
            client_name: lead.client_name,
            client_phone: lead.client_phone,
            client_document: lead.client_document,
            client_email: lead.client_email,
            bank_name: lead.bank_name,
            debt_value: lead.debt_value,
            current_situation: lead.current_situation,
            origem: lead.origem,
            status: LeadStatus::Novo,
            meeting_date: lead.meeting_date,
            notes: lead.notes,
            objecoes: lead.objecoes,
            proposal_value: None,
            created_at: now,
            updated_at: now,
        };
        self.leads.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        Ok(self.leads.lock().unwrap().iter().find(|l| l.id == id).cloned())
    }

    async fn list(&self, filter: &LeadFilter) -> Result<Vec<Lead>, AppError> {
        let mut leads: Vec<Lead> = self
            .leads
            .lock()
            .unwrap()
            .iter()
            .filter(|l| filter.matches(l))
            .cloned()
            .collect();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(leads)
    }

    async fn update(&self, id: Uuid, changes: &LeadChanges) -> Result<Option<Lead>, AppError> {
        self.check_writable()?;
        let mut leads = self.leads.lock().unwrap();
        Ok(leads.iter_mut().find(|l| l.id == id).map(|l| {
            changes.apply_to(l);
            l.updated_at = Utc::now();
            l.clone()
        }))
    }
}
