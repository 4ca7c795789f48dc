// src/models/calculator.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::{
    money::is_valid_percent,
    parsing::{lenient_amount, lenient_setting},
};

// --- CONFIGURAÇÃO (Os Percentuais) ---

/// Parâmetros da calculadora. Percentuais em "pontos" (1 = 1%).
/// Valor imutável: cada cálculo recebe a sua configuração.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PercentageConfig {
    #[schema(example = "1")]
    pub honorario_percent: Decimal,
    #[schema(example = "3000")]
    pub honorario_minimo: Decimal,
    #[schema(example = "15")]
    pub economia_min_percent: Decimal,
    #[schema(example = "20")]
    pub economia_max_percent: Decimal,
    #[schema(example = "1")]
    pub outras_acoes_percent: Decimal,
    #[schema(example = "1500")]
    pub outras_acoes_minimo: Decimal,
    #[schema(example = "30")]
    pub indenizacao_percent: Decimal,
    #[schema(example = "35")]
    pub consignado_percent: Decimal,
    #[schema(example = "5")]
    pub clausula_teto_percent: Decimal,
}

impl Default for PercentageConfig {
    fn default() -> Self {
        Self {
            honorario_percent: Decimal::ONE,
            honorario_minimo: Decimal::from(3000),
            economia_min_percent: Decimal::from(15),
            economia_max_percent: Decimal::from(20),
            outras_acoes_percent: Decimal::ONE,
            outras_acoes_minimo: Decimal::from(1500),
            indenizacao_percent: Decimal::from(30),
            consignado_percent: Decimal::from(35),
            clausula_teto_percent: Decimal::from(5),
        }
    }
}

/// O que vem do formulário. Campo ausente, não numérico, negativo ou
/// percentual acima de 100 cai no padrão, sem erro.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PercentageOverrides {
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "1")]
    pub honorario_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "3000")]
    pub honorario_minimo: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "15")]
    pub economia_min_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "20")]
    pub economia_max_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "1")]
    pub outras_acoes_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "1500")]
    pub outras_acoes_minimo: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "30")]
    pub indenizacao_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "35")]
    pub consignado_percent: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient_setting")]
    #[schema(value_type = Option<String>, example = "5")]
    pub clausula_teto_percent: Option<Decimal>,
}

impl PercentageOverrides {
    /// Percentuais fora de 0..=100 e mínimos negativos voltam ao padrão.
    pub fn resolve(&self) -> PercentageConfig {
        let defaults = PercentageConfig::default();
        let percent = |value: Option<Decimal>, fallback: Decimal| {
            value.filter(|v| is_valid_percent(*v)).unwrap_or(fallback)
        };
        let minimum = |value: Option<Decimal>, fallback: Decimal| {
            value.filter(|v| !v.is_sign_negative()).unwrap_or(fallback)
        };

        PercentageConfig {
            honorario_percent: percent(self.honorario_percent, defaults.honorario_percent),
            honorario_minimo: minimum(self.honorario_minimo, defaults.honorario_minimo),
            economia_min_percent: percent(self.economia_min_percent, defaults.economia_min_percent),
            economia_max_percent: percent(self.economia_max_percent, defaults.economia_max_percent),
            outras_acoes_percent: percent(self.outras_acoes_percent, defaults.outras_acoes_percent),
            outras_acoes_minimo: minimum(self.outras_acoes_minimo, defaults.outras_acoes_minimo),
            indenizacao_percent: percent(self.indenizacao_percent, defaults.indenizacao_percent),
            consignado_percent: percent(self.consignado_percent, defaults.consignado_percent),
            clausula_teto_percent: percent(self.clausula_teto_percent, defaults.clausula_teto_percent),
        }
    }
}

// --- ENTRADA E RESULTADO DO CÁLCULO ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebtInput {
    pub debt: Decimal,
    pub economia: Decimal,
    pub indenizacao: Decimal,
}

// Corpo do POST /api/calculator/quote. Valores aceitam texto ("100.000,00") ou número.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePayload {
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "100.000,00")]
    pub debt_value: Decimal,
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "20000")]
    pub economia_value: Decimal,
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "0")]
    pub indenizacao_value: Decimal,
    #[serde(default)]
    pub with_cap_clause: bool,
    #[serde(default)]
    pub percentages: PercentageOverrides,
}

impl QuotePayload {
    pub fn debt_input(&self) -> DebtInput {
        DebtInput {
            debt: self.debt_value,
            economia: self.economia_value,
            indenizacao: self.indenizacao_value,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlanPayload {
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "3000")]
    pub proposal_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HonorarioQuote {
    pub percentual: Decimal,
    pub valor: Decimal,
    pub minimo: Decimal,
    pub economia_min: Decimal,
    pub economia_max: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutrasAcoesQuote {
    pub percentual: Decimal,
    pub valor: Decimal,
    pub minimo: Decimal,
    pub economia_min: Decimal,
    pub economia_max: Decimal,
    pub indenizacao: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsignadoQuote {
    pub economia: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClausulaTetoQuote {
    pub valor: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResults {
    pub honorario: HonorarioQuote,
    pub outras_acoes: OutrasAcoesQuote,
    pub consignado: ConsignadoQuote,
    // Só aparece quando o operador pede a cláusula de teto
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clausula_teto: Option<ClausulaTetoQuote>,
}

// --- PLANO DE PAGAMENTO ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardPlan {
    pub installments: u32,
    pub installment_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BoletoPlan {
    pub down_payment: Decimal,
    pub remaining: Decimal,
    pub installments: u32,
    pub installment_value: Decimal,
    pub minimum_installment: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPlan {
    pub proposal_value: Decimal,
    pub cartao: CardPlan,
    pub boleto: BoletoPlan,
}
