//! Salon domain
//!
//! Shared by the REST service and the client:
//!
//! - **types**: Employee, ServiceType, RenderedService and report records
//! - **money**: Commission, profit and margin arithmetic
//! - **validate**: Field and range validation
//! - **error**: Domain error types

pub mod error;
pub mod money;
pub mod types;
pub mod validate;

pub use error::{entity, DomainError, DomainResult};
pub use money::{commission, margin_percent, profit, to_money, total, MAX_PRICE};
pub use types::{
    DateRange, Employee, IncomeReport, PayoutBreakdown, ProfitReport, RenderedService,
    ServiceDetail, ServiceFilter, ServiceType,
};
