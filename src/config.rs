// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::FixedOffset;
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::money::is_valid_percent,
    db::{LeadRepository, LeadStore, ProposalRepository, ProposalStore, UserRepository, UserStore},
    services::{
        auth::AuthService,
        lead_service::LeadService,
        proposal_service::ProposalService,
        report_service::{ReportService, ReportSettings},
    },
};

/// Configuração lida do ambiente (`.env` em desenvolvimento).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    // Taxa padrão do relatório de comissões (o operador pode trocar por requisição)
    pub default_commission_percent: Decimal,
    // Taxa fixa usada na "comissão gerada" do painel de KPIs
    pub kpi_commission_percent: Decimal,
    pub report_offset: FixedOffset,
    pub bcrypt_cost: u32,
}

fn var_or<T: FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} inválida ({}): {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

fn percent_var(name: &str, default: Decimal) -> anyhow::Result<Decimal> {
    let value = var_or(name, default)?;
    anyhow::ensure!(is_valid_percent(value), "{} deve estar entre 0 e 100: {}", name, value);
    Ok(value)
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let offset_hours: i32 = var_or("REPORT_UTC_OFFSET_HOURS", -3)?;
        let report_offset = FixedOffset::east_opt(offset_hours * 3600)
            .with_context(|| format!("REPORT_UTC_OFFSET_HOURS fora do intervalo: {}", offset_hours))?;

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:8000".to_string())?,
            db_max_connections: var_or("DB_MAX_CONNECTIONS", 5)?,
            default_commission_percent: percent_var("DEFAULT_COMMISSION_PERCENT", Decimal::from(5))?,
            kpi_commission_percent: percent_var("KPI_COMMISSION_PERCENT", Decimal::from(5))?,
            report_offset,
            bcrypt_cost: var_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        })
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            default_commission_percent: self.default_commission_percent,
            kpi_commission_percent: self.kpi_commission_percent,
            offset: self.report_offset,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub proposal_service: ProposalService,
    pub lead_service: LeadService,
    pub report_service: ReportService,
}

impl AppState {
    /// Conecta ao banco e monta o gráfico de dependências.
    pub async fn connect(config: &AppConfig) -> anyhow::Result<(Self, PgPool)> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let state = Self::from_stores(
            config,
            Arc::new(UserRepository::new(db_pool.clone())),
            Arc::new(ProposalRepository::new(db_pool.clone())),
            Arc::new(LeadRepository::new(db_pool.clone())),
        );

        Ok((state, db_pool))
    }

    pub fn from_stores(
        config: &AppConfig,
        users: Arc<dyn UserStore>,
        proposals: Arc<dyn ProposalStore>,
        leads: Arc<dyn LeadStore>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users, config.jwt_secret.clone(), config.bcrypt_cost),
            proposal_service: ProposalService::new(proposals.clone()),
            lead_service: LeadService::new(leads.clone(), config.report_offset),
            report_service: ReportService::new(proposals, leads, config.report_settings()),
        }
    }
}
