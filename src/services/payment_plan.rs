// src/services/payment_plan.rs

use rust_decimal::Decimal;

use crate::models::calculator::{BoletoPlan, CardPlan, PaymentPlan};

pub const INSTALLMENTS: u32 = 10;
// Boleto: 30% de entrada, o resto em 10 parcelas de no mínimo R$ 300
pub const BOLETO_MIN_INSTALLMENT: Decimal = Decimal::from_parts(300, 0, 0, false, 0);
const BOLETO_DOWN_PAYMENT_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 1);
const BOLETO_REMAINING_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 1);

/// Monta as condições de pagamento (cartão e boleto) de uma proposta.
/// Valor negativo não tem plano: quem chama decide o que responder.
pub fn build_payment_plan(value: Decimal) -> Option<PaymentPlan> {
    if value < Decimal::ZERO {
        return None;
    }

    let installments = Decimal::from(INSTALLMENTS);
    let remaining = value * BOLETO_REMAINING_RATE;

    Some(PaymentPlan {
        proposal_value: value,
        cartao: CardPlan {
            installments: INSTALLMENTS,
            installment_value: value / installments,
        },
        boleto: BoletoPlan {
            down_payment: value * BOLETO_DOWN_PAYMENT_RATE,
            remaining,
            installments: INSTALLMENTS,
            installment_value: (remaining / installments).max(BOLETO_MIN_INSTALLMENT),
            minimum_installment: BOLETO_MIN_INSTALLMENT,
        },
    })
}
