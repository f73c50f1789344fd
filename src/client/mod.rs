//! Salon client
//!
//! Everything a front end needs to drive the REST API:
//!
//! - **http**: `SalonClient`, one method per endpoint
//! - **stores**: Per-resource state with loading and error flags
//! - **forms**: Field validation before any request is sent
//! - **display**: Money, date and percentage formatting
//! - **views**: Income, profit and payout report screens

pub mod display;
pub mod forms;
pub mod http;
pub mod stores;
pub mod views;

pub use http::{ClientError, ClientResult, SalonClient};
pub use stores::{EmployeeStore, ReportStore, ServiceStore, ServiceTypeStore, StoreStatus};
pub use views::{IncomeView, PayoutView, ProfitView, ViewError};

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use super::SalonClient;
    use crate::api::{build_router, AppState};
    use crate::config::ApiConfig;
    use crate::storage::SqliteRepository;

    /// Serve a fresh in-memory API on an ephemeral port
    pub async fn spawn_server() -> SalonClient {
        let repository = Arc::new(SqliteRepository::open_in_memory().unwrap());
        let router = build_router(AppState::new(repository, ApiConfig::default()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        SalonClient::new(format!("http://{}/api", addr)).unwrap()
    }
}
