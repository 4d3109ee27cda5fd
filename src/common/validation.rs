// src/common/validation.rs
//
// Checagens puras: não tocam no banco. Quem chama busca o estado atual
// (ex.: o id do usuário que já usa um username) e passa para cá.

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::error::AppError;

pub const USERNAME_MAX_LENGTH: usize = 150;

// NUMERIC(10, 2): no máximo 8 dígitos inteiros
const MONEY_DECIMAL_PLACES: u32 = 2;
const MONEY_MAX_WHOLE: i64 = 100_000_000;

/// Aceita apenas `[A-Za-z0-9_]`, com ao menos um caractere.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    if username.is_empty() {
        return Err(AppError::InvalidFormat {
            field: "username",
            message: "O username não pode ser vazio.".to_string(),
        });
    }

    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
    {
        return Err(AppError::InvalidFormat {
            field: "username",
            message: format!(
                "O username contém o caractere inválido '{bad}'. Use apenas letras, números e '_'."
            ),
        });
    }

    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err(AppError::InvalidFormat {
            field: "username",
            message: format!("O username deve ter no máximo {USERNAME_MAX_LENGTH} caracteres."),
        });
    }

    Ok(())
}

/// Falha com `MissingField` no primeiro campo ausente, na ordem recebida.
pub fn validate_required(fields: &[(&'static str, bool)]) -> Result<(), AppError> {
    match fields.iter().find(|(_, present)| !present) {
        Some((name, _)) => Err(AppError::MissingField(*name)),
        None => Ok(()),
    }
}

/// `existing` é o id do registro que já possui o valor (se houver).
/// `current` é o id do próprio registro em uma atualização.
pub fn validate_unique(
    field: &'static str,
    value: &str,
    existing: Option<i64>,
    current: Option<i64>,
) -> Result<(), AppError> {
    match existing {
        Some(id) if Some(id) != current => Err(AppError::DuplicateValue {
            field,
            value: value.to_string(),
        }),
        _ => Ok(()),
    }
}

/// String presente e não vazia.
pub fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub fn validate_money(value: &Decimal) -> Result<(), ValidationError> {
    if value.normalize().scale() > MONEY_DECIMAL_PLACES {
        let mut err = ValidationError::new("decimal_places");
        err.message = Some("Informe no máximo 2 casas decimais.".into());
        return Err(err);
    }
    if value.abs() >= Decimal::from(MONEY_MAX_WHOLE) {
        let mut err = ValidationError::new("max_digits");
        err.message = Some("Informe no máximo 10 dígitos no total.".into());
        return Err(err);
    }
    Ok(())
}

/// Normaliza para exatamente duas casas ("1500" -> "1500.00").
pub fn to_money(value: Decimal) -> Decimal {
    let mut money = value;
    money.rescale(MONEY_DECIMAL_PLACES);
    money
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn username_accepts_letters_digits_and_underscore() {
        assert!(validate_username("jan_kowalski").is_ok());
        assert!(validate_username("User_2024").is_ok());
    }

    #[test]
    fn username_rejects_punctuation_and_empty() {
        assert!(matches!(
            validate_username("jan!kowalski"),
            Err(AppError::InvalidFormat { field: "username", .. })
        ));
        assert!(validate_username("jan kowalski").is_err());
        assert!(validate_username("jan.kowalski").is_err());
        assert!(validate_username("żółw").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn username_rejects_overlong_values() {
        let long = "a".repeat(USERNAME_MAX_LENGTH + 1);
        assert!(validate_username(&long).is_err());
        assert!(validate_username(&"a".repeat(USERNAME_MAX_LENGTH)).is_ok());
    }

    #[test]
    fn required_reports_first_missing_field() {
        let result = validate_required(&[("username", true), ("email", false), ("password", false)]);
        assert!(matches!(result, Err(AppError::MissingField("email"))));
        assert!(validate_required(&[("username", true)]).is_ok());
    }

    #[test]
    fn unique_ignores_the_record_being_updated() {
        assert!(validate_unique("username", "jan", None, None).is_ok());
        assert!(validate_unique("username", "jan", Some(3), Some(3)).is_ok());
        assert!(matches!(
            validate_unique("username", "jan", Some(3), None),
            Err(AppError::DuplicateValue { field: "username", .. })
        ));
        assert!(validate_unique("username", "jan", Some(3), Some(4)).is_err());
    }

    #[test]
    fn filled_treats_blank_as_missing() {
        assert!(filled(&Some("a".into())));
        assert!(!filled(&Some("   ".into())));
        assert!(!filled(&None));
    }

    #[test]
    fn money_limits_scale_and_magnitude() {
        assert!(validate_money(&Decimal::from_str("1500.50").unwrap()).is_ok());
        assert!(validate_money(&Decimal::from_str("1.500").unwrap()).is_ok());
        assert!(validate_money(&Decimal::from_str("1.505").unwrap()).is_err());
        assert!(validate_money(&Decimal::from_str("99999999.99").unwrap()).is_ok());
        assert!(validate_money(&Decimal::from_str("100000000").unwrap()).is_err());
    }

    #[test]
    fn money_is_rendered_with_two_places() {
        assert_eq!(to_money(Decimal::from(1500)).to_string(), "1500.00");
        assert_eq!(to_money(Decimal::from_str("3.1").unwrap()).to_string(), "3.10");
    }
}
