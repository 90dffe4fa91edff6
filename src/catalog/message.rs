//! Messages for the catalog page.
//!
//! Lifecycle, user actions and async results all flow through this one type.

use crate::catalog::model::CatalogResponse;
use crate::client::{ClientError, OrderDraft};

#[derive(Debug)]
pub enum CatalogMsg {
    // === Lifecycle ===
    /// Page mounted, fetch the catalog
    Mount,

    // === User actions ===
    /// Show service `service` of category `category` in detail
    SelectService { category: usize, service: usize },
    /// Order button pressed for a service
    RequestOrder(String),
    /// Order dialog asked to close (cancel or after submit)
    CloseDialog,
    /// Order dialog confirmed
    SubmitOrder(OrderDraft),

    // === Async results ===
    /// Catalog fetch finished
    CatalogLoaded(Result<CatalogResponse, ClientError>),
}
