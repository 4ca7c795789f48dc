// src/services/fee_calculator.rs

use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, money::percent_of},
    models::{
        calculator::{
            CalculationResults, ClausulaTetoQuote, ConsignadoQuote, DebtInput, HonorarioQuote,
            OutrasAcoesQuote, PercentageConfig,
        },
        proposal::ProposalType,
    },
};

/// Calculadora de honorários. Função pura sobre a configuração recebida.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeCalculator {
    config: PercentageConfig,
}

impl FeeCalculator {
    pub fn new(config: PercentageConfig) -> Self {
        Self { config }
    }

    /// Calcula as três modalidades de proposta.
    ///
    /// Dívida zero ou negativa ainda não é calculável (`DebtNotComputable`),
    /// nunca um honorário zerado. Produto que estoura o `Decimal` vira
    /// `CalculationOverflow`. A cláusula de teto só entra quando `with_cap_clause`.
    pub fn calculate(&self, input: &DebtInput, with_cap_clause: bool) -> Result<CalculationResults, AppError> {
        if input.debt <= Decimal::ZERO {
            return Err(AppError::DebtNotComputable);
        }

        let cfg = &self.config;
        let economia_min = percent_of(input.economia, cfg.economia_min_percent)?;
        let economia_max = percent_of(input.economia, cfg.economia_max_percent)?;

        let honorario = HonorarioQuote {
            percentual: cfg.honorario_percent,
            valor: percent_of(input.debt, cfg.honorario_percent)?.max(cfg.honorario_minimo),
            minimo: cfg.honorario_minimo,
            economia_min,
            economia_max,
        };

        let outras_acoes = OutrasAcoesQuote {
            percentual: cfg.outras_acoes_percent,
            valor: percent_of(input.debt, cfg.outras_acoes_percent)?.max(cfg.outras_acoes_minimo),
            minimo: cfg.outras_acoes_minimo,
            economia_min,
            economia_max,
            indenizacao: percent_of(input.indenizacao, cfg.indenizacao_percent)?,
        };

        let consignado = ConsignadoQuote {
            economia: percent_of(input.economia, cfg.consignado_percent)?,
        };

        let clausula_teto = if with_cap_clause {
            Some(ClausulaTetoQuote {
                valor: percent_of(input.debt, cfg.clausula_teto_percent)?,
            })
        } else {
            None
        };

        Ok(CalculationResults {
            honorario,
            outras_acoes,
            consignado,
            clausula_teto,
        })
    }
}

impl CalculationResults {
    /// O valor que vai para a proposta, conforme a modalidade escolhida.
    pub fn value_for(&self, proposal_type: ProposalType) -> Decimal {
        match proposal_type {
            ProposalType::Honorario => self.honorario.valor,
            ProposalType::OutrasAcoes => self.outras_acoes.valor,
            ProposalType::Consignado => self.consignado.economia,
        }
    }
}
