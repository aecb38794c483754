use crate::types::TxnDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Representa um trecho de texto suspeito de conter um valor monetário.
///
/// Normalmente os valores vêm em formas como:
/// - `1,234.56`
/// - `Rs. 1,00,000.00` (agrupamento indiano; os separadores são removidos)
/// - `2,500.00 Dr` / `(2,500.00)`
///
/// Este wrapper centraliza a limpeza e o parsing do valor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAmount(String);

impl RawAmount {
    /// Normaliza para um `Decimal` estritamente positivo com duas casas.
    ///
    /// Remove moeda e separadores de milhar, descarta um sufixo `Dr`/`Cr`
    /// (que nunca altera o sinal) e parênteses envolventes (idem: o sinal é
    /// resolvido pelo contexto, não aqui). Retorna `None` se o restante não
    /// for um decimal não-negativo ou se o valor for zero.
    pub fn normalize(&self) -> Option<Decimal> {
        let re_currency = Regex::new(r"(?i)rs\.?|inr\.?|aed\.?|rupees?|₹|\$|,|\s").ok()?;
        let mut cleaned = re_currency.replace_all(self.0.trim(), "").to_string();

        let re_drcr = Regex::new(r"(?i)(?:dr|cr)\.?$").ok()?;
        cleaned = re_drcr.replace(&cleaned, "").to_string();

        if cleaned.len() >= 2 && cleaned.starts_with('(') && cleaned.ends_with(')') {
            cleaned = cleaned[1..cleaned.len() - 1].to_string();
        }

        let value = cleaned.parse::<Decimal>().ok()?;
        if value.is_sign_negative() || value.is_zero() {
            return None;
        }
        Some(value.round_dp(2))
    }
}

impl From<String> for RawAmount {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Versão com sinal, usada pela coluna única de valor do CSV: o `-` é
/// preservado como evidência de classificação. Zero ainda é rejeitado.
pub fn parse_signed(raw: &str) -> Option<Decimal> {
    let token: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let value = token.parse::<Decimal>().ok()?;
    if value.is_zero() { None } else { Some(value) }
}

/// Representa uma data extraída de texto bancário.
///
/// Formatos aceitos, tentados nesta ordem:
/// - `DD/MM/YYYY` ou `DD-MM-YYYY`
/// - `DD/MM/YY` (ano expandido com prefixo `20`)
/// - `DD Mon YYYY` e `DD-Mon-YYYY` (abreviações de 3 letras)
/// - `YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDate(String);

impl RawDate {
    /// Converte para a data canônica `YYYY-MM-DD`, validando `1..=31` para o
    /// dia e `1..=12` para o mês. A validade real do calendário não é
    /// imposta; ver [`TxnDate`].
    pub fn normalize(&self) -> Option<TxnDate> {
        let parts: Vec<&str> = self
            .0
            .trim()
            .split(['/', '-', ' '])
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() < 3 {
            return None;
        }
        let (first, second, third) = (parts[0], parts[1], parts[2]);

        if is_digits(first) && is_digits(second) && is_digits(third) {
            // DD/MM/YYYY e DD/MM/YY
            if first.len() <= 2 {
                let day = first.parse().ok()?;
                let month = second.parse().ok()?;
                let year: u32 = match third.len() {
                    4 => third.parse().ok()?,
                    2 => 2000 + third.parse::<u32>().ok()?,
                    _ => return None,
                };
                return TxnDate::from_ymd(year, month, day);
            }
            // YYYY-MM-DD
            if first.len() == 4 {
                let year = first.parse().ok()?;
                let month = second.parse().ok()?;
                let day = third.parse().ok()?;
                return TxnDate::from_ymd(year, month, day);
            }
            return None;
        }

        // DD Mon YYYY / DD-Mon-YYYY
        if is_digits(first) && third.len() == 4 && is_digits(third) {
            let day = first.parse().ok()?;
            let month = month_abbrev(second)?;
            let year = third.parse().ok()?;
            return TxnDate::from_ymd(year, month, day);
        }

        None
    }
}

impl From<String> for RawDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RawDate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn month_abbrev(s: &str) -> Option<u32> {
    if s.len() != 3 {
        return None;
    }
    let month = match s.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

// -----------------------------------------------------------------------------
// Testes
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("1,00,000.00", "100000.00")] // agrupamento indiano
    #[case("1,234.56", "1234.56")]
    #[case("Rs. 2,500.00", "2500.00")]
    #[case("INR 1500", "1500.00")]
    #[case("₹ 250", "250.00")]
    #[case("AED 99.90", "99.90")]
    #[case("Rupees 75", "75.00")]
    #[case("1,234.56 Dr", "1234.56")]
    #[case("1,234.56 Cr.", "1234.56")]
    #[case("500cr", "500.00")]
    #[case("(2,500.00)", "2500.00")] // parênteses não mudam a magnitude
    fn test_amount_normalize_valid(#[case] input: &str, #[case] expected: &str) {
        let amount = RawAmount::from(input).normalize();
        assert_eq!(amount, Some(Decimal::from_str(expected).unwrap()));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("0")]
    #[case("0.00")]
    #[case("-500")] // negativo explícito é rejeitado; o sinal vem do contexto
    #[case("abc")]
    #[case("12abc34")]
    #[case("1.2.3")]
    fn test_amount_normalize_invalid(#[case] input: &str) {
        assert_eq!(RawAmount::from(input).normalize(), None);
    }

    #[test]
    fn test_amount_two_decimal_precision() {
        let amount = RawAmount::from("10.999").normalize().unwrap();
        assert_eq!(amount, Decimal::from_str("11.00").unwrap());
    }

    #[rstest]
    #[case("-1,500.00", "-1500.00")]
    #[case("1500", "1500")]
    #[case("Rs 300.50", "300.50")]
    fn test_parse_signed_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse_signed(input), Some(Decimal::from_str(expected).unwrap()));
    }

    #[rstest]
    #[case("0")]
    #[case("0.00")]
    #[case("n/a")]
    #[case("")]
    fn test_parse_signed_invalid(#[case] input: &str) {
        assert_eq!(parse_signed(input), None);
    }

    #[rstest]
    #[case("15/01/2024", "2024-01-15")]
    #[case("15-01-2024", "2024-01-15")]
    #[case("5/3/2024", "2024-03-05")]
    #[case("15/01/24", "2024-01-15")] // ano de 2 dígitos expandido com "20"
    #[case("15 Jan 2024", "2024-01-15")]
    #[case("15-jan-2024", "2024-01-15")]
    #[case("01 DEC 2023", "2023-12-01")]
    #[case("2024-01-15", "2024-01-15")]
    #[case("2024/01/15", "2024-01-15")]
    #[case("31/02/2024", "2024-02-31")] // leniência documentada: dia 1..=31
    #[case("  15/01/2024  ", "2024-01-15")]
    fn test_date_normalize_valid(#[case] input: &str, #[case] expected: &str) {
        let date = RawDate::from(input).normalize();
        assert_eq!(date.map(|d| d.to_string()), Some(expected.to_string()));
    }

    #[rstest]
    #[case("15/13/2024")] // mês 13
    #[case("32/01/2024")] // dia 32
    #[case("00/01/2024")]
    #[case("15/00/2024")]
    #[case("2024-13-01")]
    #[case("15 Janeiro 2024")] // só abreviações de 3 letras
    #[case("15 Xyz 2024")]
    #[case("15/01")]
    #[case("invalid-date")]
    #[case("")]
    #[case("   ")]
    fn test_date_normalize_invalid(#[case] input: &str) {
        assert_eq!(RawDate::from(input).normalize(), None);
    }

    #[test]
    fn test_date_serialization() {
        let raw = RawDate::from("26/12/2025");
        let json = serde_json::to_string(&raw).unwrap();
        assert!(json.contains("26/12/2025"));

        let deserialized: RawDate = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.normalize().unwrap().as_str(), "2025-12-26");
    }
}
