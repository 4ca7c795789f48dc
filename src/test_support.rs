// src/test_support.rs
//
// Fixtures compartilhadas pelos testes.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{
    lead::{Lead, LeadStatus},
    proposal::{Proposal, ProposalStatus, ProposalType},
};

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

pub fn brasilia() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap()
}

pub fn proposal(value: Decimal, status: ProposalStatus, date: DateTime<Utc>) -> Proposal {
    Proposal {
        id: Uuid::new_v4(),
        user_id: None,
        client_name: "Maria da Silva".to_string(),
        client_phone: "(11) 99999-9999".to_string(),
        client_document: "000.000.000-00".to_string(),
        debt_value: Decimal::from(100_000),
        economia_value: Decimal::from(20_000),
        indenizacao_value: Decimal::ZERO,
        proposal_type: ProposalType::Honorario,
        proposal_value: value,
        status,
        notes: String::new(),
        date,
        updated_at: date,
    }
}

pub fn lead(status: LeadStatus, bank: &str, origem: &str, created_at: DateTime<Utc>) -> Lead {
    Lead {
        id: Uuid::new_v4(),
        user_id: None,
        client_name: "João Pereira".to_string(),
        client_phone: "(11) 98888-7777".to_string(),
        client_document: "123.456.789-00".to_string(),
        client_email: None,
        bank_name: bank.to_string(),
        debt_value: Decimal::from(85_000),
        current_situation: String::new(),
        origem: origem.to_string(),
        status,
        meeting_date: None,
        notes: String::new(),
        objecoes: None,
        proposal_value: None,
        created_at,
        updated_at: created_at,
    }
}
