// src/common/money.rs

use rust_decimal::Decimal;

use crate::common::error::AppError;

/// `percent` pontos percentuais de `amount` (5 = 5%), sem estourar.
pub fn percent_of(amount: Decimal, percent: Decimal) -> Result<Decimal, AppError> {
    percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|rate| amount.checked_mul(rate))
        .ok_or(AppError::CalculationOverflow)
}

pub fn checked_sum<I>(values: I) -> Result<Decimal, AppError>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or(AppError::CalculationOverflow)
    })
}

/// Percentual aceito nos formulários: entre 0 e 100.
pub fn is_valid_percent(value: Decimal) -> bool {
    !value.is_sign_negative() && value <= Decimal::ONE_HUNDRED
}
