//! Input validation shared by the server and the client forms

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::{DomainError, DomainResult};
use super::money::MAX_PRICE;
use super::types::DateRange;

/// Validate a commission percentage is within [0, 100]
pub fn validate_percentage(percentage: Decimal) -> DomainResult<Decimal> {
    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(DomainError::validation(
            format!(
                "El porcentaje de comisión debe estar entre 0 y 100, recibido: {}",
                percentage
            ),
            "porcentaje_comision",
        ));
    }
    Ok(percentage)
}

/// Validate a price is strictly positive and at most [`MAX_PRICE`]
pub fn validate_price(price: Decimal) -> DomainResult<Decimal> {
    if price <= Decimal::ZERO {
        return Err(DomainError::validation(
            format!("El precio debe ser mayor que cero, recibido: {}", price),
            "precio",
        ));
    }
    if price > MAX_PRICE {
        return Err(DomainError::validation(
            format!(
                "El precio no puede superar {}, recibido: {}",
                MAX_PRICE, price
            ),
            "precio",
        ));
    }
    Ok(price)
}

/// Validate the start of a range is not after its end
pub fn validate_date_range(range: DateRange) -> DomainResult<DateRange> {
    if let (Some(start), Some(end)) = (range.start, range.end) {
        if start > end {
            return Err(DomainError::validation(
                "La fecha de inicio no puede ser posterior a la fecha de fin",
                "fecha_inicio",
            ));
        }
    }
    Ok(range)
}

/// Validate a text field is not blank; returns the trimmed value
pub fn validate_required(value: &str, field: &str, message: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(message, field));
    }
    Ok(trimmed.to_string())
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_date(value: &str, field: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        DomainError::validation(
            format!("Fecha inválida '{}', se espera AAAA-MM-DD", value.trim()),
            field,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_percentage_bounds() {
        assert!(validate_percentage(Decimal::ZERO).is_ok());
        assert!(validate_percentage(Decimal::ONE_HUNDRED).is_ok());
        assert!(validate_percentage(Decimal::new(455, 1)).is_ok());
        assert!(validate_percentage(Decimal::new(-1, 2)).is_err());
        assert!(validate_percentage(Decimal::new(10001, 2)).is_err());
    }

    #[test]
    fn test_validate_percentage_reports_field() {
        match validate_percentage(Decimal::new(150, 0)) {
            Err(DomainError::Validation { field, .. }) => {
                assert_eq!(field.as_deref(), Some("porcentaje_comision"))
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::new(1, 2)).is_ok());
        assert!(validate_price(Decimal::ZERO).is_err());
        assert!(validate_price(Decimal::new(-1000, 2)).is_err());
        assert!(validate_price(MAX_PRICE).is_ok());
        assert!(validate_price(MAX_PRICE + Decimal::new(1, 2)).is_err());
        assert!(validate_price(Decimal::MAX).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let d1 = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();

        assert!(validate_date_range(DateRange::between(d1, d2)).is_ok());
        assert!(validate_date_range(DateRange::between(d1, d1)).is_ok());
        assert!(validate_date_range(DateRange::new(Some(d2), None)).is_ok());
        assert!(validate_date_range(DateRange::between(d2, d1)).is_err());
    }

    #[test]
    fn test_validate_required_trims() {
        assert_eq!(
            validate_required("  Juan  ", "nombre", "El nombre es requerido").unwrap(),
            "Juan"
        );
        assert!(validate_required("   ", "nombre", "El nombre es requerido").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15", "fecha").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("15/01/2024", "fecha").is_err());
    }
}
