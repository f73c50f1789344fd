//! Display helpers
//!
//! Formatting used by cards, tables and report totals.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::{to_money, DateRange, RenderedService};

/// `$1234.56`, as shown on cards and in tables
pub fn format_money(amount: Decimal) -> String {
    format!("${}", to_money(amount))
}

/// `$5,000.00`, as shown on report totals
pub fn format_money_grouped(amount: Decimal) -> String {
    let amount = to_money(amount);
    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    let digits = amount.abs().to_string();
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", sign, grouped, frac_part)
}

/// `dd/mm/yyyy`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// `40%`, `12.5%`
pub fn format_percentage(percentage: Decimal) -> String {
    format!("{}%", percentage.normalize())
}

/// Colour band for a profit margin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginTone {
    /// 50% or more
    High,
    /// Between 0% and 50%
    Low,
    /// Losing money
    Negative,
}

impl MarginTone {
    pub fn from_margin(margin: i64) -> Self {
        if margin >= 50 {
            MarginTone::High
        } else if margin >= 0 {
            MarginTone::Low
        } else {
            MarginTone::Negative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MarginTone::High => "alto",
            MarginTone::Low => "bajo",
            MarginTone::Negative => "negativo",
        }
    }
}

/// Sort services newest first; services on the same date keep their order
pub fn sort_services_by_date_desc(services: &mut [RenderedService]) {
    services.sort_by(|a, b| b.fecha.cmp(&a.fecha));
}

/// Human label for the period a report covers
pub fn period_label(range: &DateRange) -> String {
    match (range.start, range.end) {
        (None, None) => "Todo el período".to_string(),
        (Some(start), None) => format!("Desde {}", format_date(start)),
        (None, Some(end)) => format!("Hasta {}", format_date(end)),
        (Some(start), Some(end)) => format!("{} – {}", format_date(start), format_date(end)),
    }
}
