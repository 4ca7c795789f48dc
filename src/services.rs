pub mod auth;
pub mod lead_service;
pub mod proposal_service;
pub mod report_service;

// Núcleo de cálculo: funções puras, sem acesso a banco
pub mod commission;
pub mod fee_calculator;
pub mod kpi;
pub mod payment_plan;
