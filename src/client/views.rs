//! Report views
//!
//! Income, profit and payout screens. `mount` runs the unfiltered fetch,
//! `apply` validates the filter form and fetches, `reset` clears the form and
//! fetches again.

use std::sync::Arc;
use thiserror::Error;

use crate::api::dto::ReportQuery;
use crate::client::display::{
    format_date, format_money, format_money_grouped, period_label, MarginTone,
};
use crate::client::forms::{FormErrors, ReportFilterForm};
use crate::client::http::{ClientError, SalonClient};
use crate::client::stores::{ReportStore, StoreStatus};
use crate::domain::{margin_percent, DateRange, IncomeReport, PayoutBreakdown, ProfitReport};

/// Shown by the payout view when the employee has no services in the period
pub const EMPTY_PAYOUT_MESSAGE: &str = "No hay servicios registrados";

#[derive(Error, Debug)]
pub enum ViewError {
    /// The filter form did not validate; no request was sent
    #[error("Filtro inválido")]
    Invalid(FormErrors),

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type ViewResult<T> = Result<T, ViewError>;

fn report_query(range: DateRange, empleado_id: Option<&str>) -> ReportQuery {
    ReportQuery {
        fecha_inicio: range.start,
        fecha_fin: range.end,
        empleado_id: empleado_id.map(str::to_string),
    }
}

// ============================================
// INCOME
// ============================================

pub struct IncomeView {
    reports: ReportStore,
    pub filter: ReportFilterForm,
    pub filter_errors: FormErrors,
}

impl IncomeView {
    pub fn new(client: Arc<SalonClient>) -> Self {
        Self {
            reports: ReportStore::new(client),
            filter: ReportFilterForm::new(),
            filter_errors: FormErrors::new(),
        }
    }

    pub async fn mount(&mut self) -> ViewResult<()> {
        self.reports.load_income(&ReportQuery::default()).await?;
        Ok(())
    }

    pub async fn apply(&mut self) -> ViewResult<()> {
        let range = self.filter.to_range().map_err(|errors| {
            self.filter_errors = errors.clone();
            ViewError::Invalid(errors)
        })?;
        self.filter_errors.clear();

        let query = report_query(range, self.filter.employee());
        self.reports.load_income(&query).await?;
        Ok(())
    }

    pub async fn reset(&mut self) -> ViewResult<()> {
        self.filter.clear();
        self.filter_errors.clear();
        self.mount().await
    }

    pub fn report(&self) -> Option<&IncomeReport> {
        self.reports.income.as_ref()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.reports.status
    }

    pub fn total_label(&self) -> Option<String> {
        self.report().map(|r| format_money_grouped(r.total))
    }

    pub fn period(&self) -> Option<String> {
        self.report()
            .map(|r| period_label(&DateRange::new(r.fecha_inicio, r.fecha_fin)))
    }
}

// ============================================
// PROFIT
// ============================================

pub struct ProfitView {
    reports: ReportStore,
    pub filter: ReportFilterForm,
    pub filter_errors: FormErrors,
}

impl ProfitView {
    pub fn new(client: Arc<SalonClient>) -> Self {
        Self {
            reports: ReportStore::new(client),
            filter: ReportFilterForm::new(),
            filter_errors: FormErrors::new(),
        }
    }

    pub async fn mount(&mut self) -> ViewResult<()> {
        self.reports.load_profit(&ReportQuery::default()).await?;
        Ok(())
    }

    pub async fn apply(&mut self) -> ViewResult<()> {
        let range = self.filter.to_range().map_err(|errors| {
            self.filter_errors = errors.clone();
            ViewError::Invalid(errors)
        })?;
        self.filter_errors.clear();

        let query = report_query(range, self.filter.employee());
        self.reports.load_profit(&query).await?;
        Ok(())
    }

    pub async fn reset(&mut self) -> ViewResult<()> {
        self.filter.clear();
        self.filter_errors.clear();
        self.mount().await
    }

    pub fn report(&self) -> Option<&ProfitReport> {
        self.reports.profit.as_ref()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.reports.status
    }

    /// Profit over income as a whole percentage
    pub fn margin(&self) -> Option<i64> {
        self.report()
            .map(|r| margin_percent(r.beneficios, r.ingresos))
    }

    pub fn tone(&self) -> Option<MarginTone> {
        self.margin().map(MarginTone::from_margin)
    }

    pub fn period(&self) -> Option<String> {
        self.report()
            .map(|r| period_label(&DateRange::new(r.fecha_inicio, r.fecha_fin)))
    }
}

// ============================================
// PAYOUT
// ============================================

/// One formatted row of the payout table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutRow {
    pub fecha: String,
    pub tipo_servicio: String,
    pub precio: String,
    pub comision: String,
}

pub struct PayoutView {
    reports: ReportStore,
    pub filter: ReportFilterForm,
    pub filter_errors: FormErrors,
}

impl PayoutView {
    pub fn new(client: Arc<SalonClient>) -> Self {
        Self {
            reports: ReportStore::new(client),
            filter: ReportFilterForm::new(),
            filter_errors: FormErrors::new(),
        }
    }

    /// Nothing is fetched until an employee is chosen
    pub async fn mount(&mut self) -> ViewResult<()> {
        Ok(())
    }

    pub async fn apply(&mut self) -> ViewResult<()> {
        let validated = self.filter.to_range().and_then(|range| {
            self.filter
                .required_employee()
                .map(|id| (range, id.to_string()))
        });
        let (range, empleado_id) = validated.map_err(|errors| {
            self.filter_errors = errors.clone();
            ViewError::Invalid(errors)
        })?;
        self.filter_errors.clear();

        self.reports.load_payout(&empleado_id, range).await?;
        Ok(())
    }

    pub async fn reset(&mut self) -> ViewResult<()> {
        self.filter.clear();
        self.filter_errors.clear();
        self.reports.payout = None;
        self.mount().await
    }

    pub fn report(&self) -> Option<&PayoutBreakdown> {
        self.reports.payout.as_ref()
    }

    pub fn status(&self) -> &StoreStatus {
        &self.reports.status
    }

    pub fn rows(&self) -> Vec<PayoutRow> {
        self.report()
            .map(|r| {
                r.servicios
                    .iter()
                    .map(|s| PayoutRow {
                        fecha: format_date(s.fecha),
                        tipo_servicio: s.tipo_servicio.clone(),
                        precio: format_money(s.precio),
                        comision: format_money(s.comision),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Message to show instead of the table when the breakdown is empty
    pub fn empty_message(&self) -> Option<&'static str> {
        match self.report() {
            Some(r) if r.servicios.is_empty() => Some(EMPTY_PAYOUT_MESSAGE),
            _ => None,
        }
    }

    pub fn total_label(&self) -> Option<String> {
        self.report().map(|r| format_money_grouped(r.total))
    }
}
