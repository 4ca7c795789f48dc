// src/services/proposal_service.rs

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProposalStore,
    models::{
        calculator::{DebtInput, PaymentPlan},
        proposal::{
            CreateProposalPayload, NewProposal, Proposal, ProposalChanges, ProposalFilter,
            UpdateProposalPayload,
        },
    },
    services::{fee_calculator::FeeCalculator, payment_plan::build_payment_plan},
};

#[derive(Clone)]
pub struct ProposalService {
    repo: Arc<dyn ProposalStore>,
}

impl ProposalService {
    pub fn new(repo: Arc<dyn ProposalStore>) -> Self {
        Self { repo }
    }

    /// Registra uma proposta com o valor calculado a partir dos dados brutos.
    pub async fn create_proposal(
        &self,
        user_id: Option<Uuid>,
        payload: CreateProposalPayload,
    ) -> Result<Proposal, AppError> {
        AppError::check_required(&[
            ("clientName", !payload.client_name.trim().is_empty()),
            ("clientDocument", !payload.client_document.trim().is_empty()),
        ])?;

        let calculator = FeeCalculator::new(payload.percentages.resolve());
        let input = DebtInput {
            debt: payload.debt_value,
            economia: payload.economia_value,
            indenizacao: payload.indenizacao_value,
        };
        let proposal_value = calculator.calculate(&input, false)?.value_for(payload.proposal_type);

        let proposal = self
            .repo
            .create(NewProposal {
                user_id,
                client_name: payload.client_name.trim().to_string(),
                client_phone: payload.client_phone.trim().to_string(),
                client_document: payload.client_document.trim().to_string(),
                debt_value: payload.debt_value,
                economia_value: payload.economia_value,
                indenizacao_value: payload.indenizacao_value,
                proposal_type: payload.proposal_type,
                proposal_value,
                status: payload.status.unwrap_or_default(),
                notes: payload.notes.unwrap_or_default(),
            })
            .await?;

        tracing::info!(
            proposal_id = %proposal.id,
            proposal_type = proposal.proposal_type.label(),
            value = %proposal.proposal_value,
            "Proposta registrada"
        );

        Ok(proposal)
    }

    pub async fn get_proposal(&self, id: Uuid) -> Result<Proposal, AppError> {
        self.repo.get(id).await?.ok_or(AppError::ProposalNotFound)
    }

    pub async fn list_proposals(&self, filter: &ProposalFilter) -> Result<Vec<Proposal>, AppError> {
        self.repo.list(filter).await
    }

    /// Atualiza status/observações. Editar cliente ou valores exige um status.
    /// Só a edição de valores, modalidade ou percentuais recalcula o valor da
    /// proposta sobre o registro resultante.
    pub async fn update_proposal(
        &self,
        id: Uuid,
        payload: UpdateProposalPayload,
    ) -> Result<Proposal, AppError> {
        let mut changes = ProposalChanges {
            status: payload.status,
            notes: payload.notes.clone(),
            ..ProposalChanges::default()
        };

        if payload.edits_values() {
            if payload.status.is_none() {
                return Err(AppError::StatusRequiredForEdit);
            }

            let reprices = payload.reprices();
            let mut edited = self.get_proposal(id).await?;

            changes.client_name = payload.client_name.map(|s| s.trim().to_string());
            changes.client_phone = payload.client_phone.map(|s| s.trim().to_string());
            changes.client_document = payload.client_document.map(|s| s.trim().to_string());
            changes.debt_value = payload.debt_value;
            changes.economia_value = payload.economia_value;
            changes.indenizacao_value = payload.indenizacao_value;
            changes.proposal_type = payload.proposal_type;
            changes.apply_to(&mut edited);

            AppError::check_required(&[
                ("clientName", !edited.client_name.is_empty()),
                ("clientDocument", !edited.client_document.is_empty()),
            ])?;

            if reprices {
                let config = payload.percentages.unwrap_or_default().resolve();
                let input = DebtInput {
                    debt: edited.debt_value,
                    economia: edited.economia_value,
                    indenizacao: edited.indenizacao_value,
                };
                changes.proposal_value = Some(
                    FeeCalculator::new(config)
                        .calculate(&input, false)?
                        .value_for(edited.proposal_type),
                );
            }
        }

        let updated = self
            .repo
            .update(id, &changes)
            .await?
            .ok_or(AppError::ProposalNotFound)?;

        tracing::info!(proposal_id = %id, status = updated.status.as_str(), "Proposta atualizada");

        Ok(updated)
    }

    pub async fn payment_plan_for(&self, id: Uuid) -> Result<PaymentPlan, AppError> {
        let proposal = self.get_proposal(id).await?;
        payment_plan_or_error(proposal.proposal_value)
    }
}

pub fn payment_plan_or_error(value: Decimal) -> Result<PaymentPlan, AppError> {
    build_payment_plan(value).ok_or(AppError::NegativeProposalValue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryStore;
    use crate::models::proposal::{ProposalStatus, ProposalType};
    use crate::test_support::{at, proposal};
    use rust_decimal_macros::dec;

    fn payload(name: &str, document: &str, debt: Decimal) -> CreateProposalPayload {
        CreateProposalPayload {
            client_name: name.into(),
            client_phone: "(11) 90000-0000".into(),
            client_document: document.into(),
            debt_value: debt,
            economia_value: dec!(20000),
            indenizacao_value: dec!(10000),
            proposal_type: ProposalType::Honorario,
            status: None,
            notes: None,
            percentages: Default::default(),
        }
    }

    fn service_with(store: Arc<InMemoryStore>) -> ProposalService {
        ProposalService::new(store)
    }

    #[tokio::test]
    async fn create_computes_value_and_defaults() {
        let service = service_with(Arc::new(InMemoryStore::default()));

        let created = service
            .create_proposal(None, payload("Maria", "111", dec!(100000)))
            .await
            .unwrap();

        assert_eq!(created.proposal_value, dec!(3000));
        assert_eq!(created.status, ProposalStatus::Pendente);
        assert_eq!(created.notes, "");
    }

    #[tokio::test]
    async fn create_uses_the_chosen_type_and_overrides() {
        let service = service_with(Arc::new(InMemoryStore::default()));
        let mut input = payload("Maria", "111", dec!(100000));
        input.proposal_type = ProposalType::Consignado;
        input.percentages.consignado_percent = Some(dec!(40));

        let created = service.create_proposal(None, input).await.unwrap();

        assert_eq!(created.proposal_value, dec!(8000));
    }

    #[tokio::test]
    async fn missing_required_fields_block_the_save() {
        let store = Arc::new(InMemoryStore::default());
        let service = service_with(store.clone());

        let err = service
            .create_proposal(None, payload("  ", "", dec!(100000)))
            .await
            .unwrap_err();

        match err {
            AppError::MissingRequiredFields(fields) => {
                assert_eq!(fields, "clientName, clientDocument")
            }
            other => panic!("erro inesperado: {other:?}"),
        }
        assert_eq!(store.proposal_count(), 0);
    }

    #[tokio::test]
    async fn zero_debt_is_not_computable() {
        let service = service_with(Arc::new(InMemoryStore::default()));

        let err = service
            .create_proposal(None, payload("Maria", "111", Decimal::ZERO))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DebtNotComputable));
    }

    #[tokio::test]
    async fn persistence_failure_surfaces_as_database_error() {
        let service = service_with(Arc::new(InMemoryStore::failing()));

        let err = service
            .create_proposal(None, payload("Maria", "111", dec!(100000)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DatabaseError(_)));
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let service = service_with(Arc::new(InMemoryStore::default()));

        let err = service.get_proposal(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::ProposalNotFound));

        let err = service
            .update_proposal(Uuid::new_v4(), UpdateProposalPayload {
                status: Some(ProposalStatus::Fechado),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ProposalNotFound));
    }

    #[tokio::test]
    async fn list_is_newest_first_and_filtered() {
        let store = Arc::new(InMemoryStore::default());
        let mut old = proposal(dec!(3000), ProposalStatus::Fechado, at(2026, 1, 10, 12));
        old.client_name = "Carlos Souza".into();
        let recent = proposal(dec!(4000), ProposalStatus::Pendente, at(2026, 9, 10, 12));
        store.insert_proposal(old.clone());
        store.insert_proposal(recent.clone());
        let service = service_with(store);

        let all = service.list_proposals(&ProposalFilter::default()).await.unwrap();
        assert_eq!(all.iter().map(|p| p.id).collect::<Vec<_>>(), vec![recent.id, old.id]);

        let by_name = service
            .list_proposals(&ProposalFilter { search: Some("carlos".into()), status: None })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);

        let closed = service
            .list_proposals(&ProposalFilter { search: None, status: Some(ProposalStatus::Fechado) })
            .await
            .unwrap();
        assert_eq!(closed[0].id, old.id);
    }

    #[tokio::test]
    async fn status_only_update_keeps_the_value() {
        let store = Arc::new(InMemoryStore::default());
        let existing = proposal(dec!(3000), ProposalStatus::Pendente, at(2026, 9, 10, 12));
        store.insert_proposal(existing.clone());
        let service = service_with(store);

        let updated = service
            .update_proposal(existing.id, UpdateProposalPayload {
                status: Some(ProposalStatus::Fechado),
                notes: Some("Cliente assinou".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.status, ProposalStatus::Fechado);
        assert_eq!(updated.notes, "Cliente assinou");
        assert_eq!(updated.proposal_value, dec!(3000));
    }

    #[tokio::test]
    async fn editing_values_requires_status_and_recomputes() {
        let store = Arc::new(InMemoryStore::default());
        let existing = proposal(dec!(3000), ProposalStatus::Pendente, at(2026, 9, 10, 12));
        store.insert_proposal(existing.clone());
        let service = service_with(store);

        let err = service
            .update_proposal(existing.id, UpdateProposalPayload {
                debt_value: Some(dec!(500000)),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StatusRequiredForEdit));

        let updated = service
            .update_proposal(existing.id, UpdateProposalPayload {
                status: Some(ProposalStatus::Pendente),
                debt_value: Some(dec!(500000)),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.debt_value, dec!(500000));
        assert_eq!(updated.proposal_value, dec!(5000));
    }

    #[tokio::test]
    async fn client_identity_edit_keeps_the_overridden_value() {
        let store = Arc::new(InMemoryStore::default());
        let service = service_with(store);
        let mut input = payload("Maria", "111", dec!(100000));
        input.proposal_type = ProposalType::Consignado;
        input.percentages.consignado_percent = Some(dec!(40));
        let created = service.create_proposal(None, input).await.unwrap();
        assert_eq!(created.proposal_value, dec!(8000));

        let updated = service
            .update_proposal(created.id, UpdateProposalPayload {
                status: Some(ProposalStatus::Pendente),
                client_phone: Some(" (21) 98888-7777 ".into()),
                client_name: Some("Maria Silva".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.client_phone, "(21) 98888-7777");
        assert_eq!(updated.client_name, "Maria Silva");
        assert_eq!(updated.proposal_value, dec!(8000));
    }

    #[tokio::test]
    async fn client_identity_edit_still_requires_status() {
        let store = Arc::new(InMemoryStore::default());
        let existing = proposal(dec!(3000), ProposalStatus::Pendente, at(2026, 9, 10, 12));
        store.insert_proposal(existing.clone());
        let service = service_with(store);

        let err = service
            .update_proposal(existing.id, UpdateProposalPayload {
                client_phone: Some("(21) 98888-7777".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StatusRequiredForEdit));
    }

    #[tokio::test]
    async fn payment_plan_for_a_stored_proposal() {
        let store = Arc::new(InMemoryStore::default());
        let existing = proposal(dec!(3000), ProposalStatus::Fechado, at(2026, 9, 10, 12));
        store.insert_proposal(existing.clone());
        let service = service_with(store);

        let plan = service.payment_plan_for(existing.id).await.unwrap();
        assert_eq!(plan.cartao.installment_value, dec!(300));
        assert_eq!(plan.boleto.down_payment, dec!(900));
    }
}
