// src/common/parsing.rs

//! Leitura tolerante de valores numéricos digitados no formulário.
//!
//! Os valores chegam como texto no formato brasileiro ("100.000,00", "R$ 3.000")
//! ou como números JSON. A regra é nunca falhar: o que não puder ser lido vira
//! zero (ou "ausente", no caso das configurações), exatamente como os dados já
//! gravados esperam.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Converte um texto livre em `Decimal`, sem nunca falhar.
///
/// 1. Remove tudo que não for dígito, vírgula ou ponto.
/// 2. A primeira vírgula vira ponto decimal.
/// 3. Lê o maior prefixo numérico válido (`"100.000.00"` vira `100`).
/// 4. Se nada puder ser lido, retorna `0`.
pub fn parse_value(text: &str) -> Decimal {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    let normalized = cleaned.replacen(',', ".", 1);

    parse_number_prefix(&normalized).unwrap_or(Decimal::ZERO)
}

/// Lê o maior prefixo numérico de `text` (sinal opcional, dígitos, um ponto).
/// Retorna `None` quando não há nenhum dígito no prefixo.
pub fn parse_number_prefix(text: &str) -> Option<Decimal> {
    let trimmed = text.trim_start();

    let (negative, rest) = match trimmed.chars().next() {
        Some('-') => (true, &trimmed[1..]),
        Some('+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut literal = String::new();
    let mut seen_dot = false;
    let mut digits = 0usize;

    for c in rest.chars() {
        if c.is_ascii_digit() {
            literal.push(c);
            digits += 1;
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            literal.push(c);
        } else {
            break;
        }
    }

    if digits == 0 {
        return None;
    }
    if literal.starts_with('.') {
        literal.insert(0, '0');
    }
    if literal.ends_with('.') {
        literal.pop();
    }

    let value = Decimal::from_str(&literal).ok()?;
    Some(if negative { -value } else { value })
}

/// Lê um número de configuração (percentual, mínimo, taxa) digitado como texto.
/// Aceita vírgula decimal. `None` quando o texto não é numérico.
pub fn parse_setting(text: &str) -> Option<Decimal> {
    parse_number_prefix(&text.trim().replacen(',', ".", 1))
}

fn amount_from_json(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => parse_number_prefix(&n.to_string()).unwrap_or(Decimal::ZERO),
        Value::String(s) => parse_value(s),
        _ => Decimal::ZERO,
    }
}

fn setting_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_number_prefix(&n.to_string()),
        Value::String(s) => parse_setting(s),
        _ => None,
    }
}

/// `deserialize_with` para valores monetários: aceita número ou texto, nulo vira zero.
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(amount_from_json).unwrap_or(Decimal::ZERO))
}

/// Igual a `lenient_amount`, mas preserva a ausência do campo (útil em PATCH).
pub fn lenient_amount_opt<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().filter(|v| !v.is_null()).map(amount_from_json))
}

/// `deserialize_with` para parâmetros de configuração: não numérico vira `None`.
pub fn lenient_setting<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(setting_from_json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("100000", dec!(100000))]
    #[case("R$ 3.000", dec!(3))]
    #[case("1500,50", dec!(1500.50))]
    #[case("100.000,00", dec!(100))]
    #[case("20000.75", dec!(20000.75))]
    #[case(",5", dec!(0.5))]
    #[case("-250", dec!(250))]
    #[case("", dec!(0))]
    #[case("abc", dec!(0))]
    #[case(".", dec!(0))]
    fn parse_value_is_lenient(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_value(input), expected);
    }

    #[rstest]
    #[case("12abc", Some(dec!(12)))]
    #[case("  -3.5", Some(dec!(-3.5)))]
    #[case("7.", Some(dec!(7)))]
    #[case("x1", None)]
    #[case("-", None)]
    fn number_prefix(#[case] input: &str, #[case] expected: Option<Decimal>) {
        assert_eq!(parse_number_prefix(input), expected);
    }

    #[test]
    fn settings_accept_decimal_comma() {
        assert_eq!(parse_setting("1,5"), Some(dec!(1.5)));
        assert_eq!(parse_setting(" 35 "), Some(dec!(35)));
        assert_eq!(parse_setting("abc"), None);
    }

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "lenient_amount")]
        debt: Decimal,
        #[serde(default, deserialize_with = "lenient_amount_opt")]
        economia: Option<Decimal>,
        #[serde(default, deserialize_with = "lenient_setting")]
        percent: Option<Decimal>,
    }

    #[test]
    fn json_fields_accept_numbers_and_text() {
        let form: Form =
            serde_json::from_str(r#"{"debt": "50.000", "economia": 1200.5, "percent": "dois"}"#)
                .unwrap();
        assert_eq!(form.debt, dec!(50));
        assert_eq!(form.economia, Some(dec!(1200.5)));
        assert_eq!(form.percent, None);

        let empty: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.debt, Decimal::ZERO);
        assert_eq!(empty.economia, None);
        assert_eq!(empty.percent, None);

        let null_debt: Form = serde_json::from_str(r#"{"debt": null, "percent": 2}"#).unwrap();
        assert_eq!(null_debt.debt, Decimal::ZERO);
        assert_eq!(null_debt.percent, Some(dec!(2)));
    }
}
