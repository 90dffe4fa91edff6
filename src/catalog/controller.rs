//! State of the catalog page, independent of how it is drawn.

use std::sync::Arc;

use tracing::{error, info};

use crate::catalog::model::{CatalogResponse, Service, ServiceCategory};
use crate::catalog::selection::SelectionState;
use crate::client::ClientError;
use crate::session::SessionProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Open,
}

/// Outcome of pressing an order button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRequest {
    /// Session present; the dialog is now open for this service.
    DialogOpened,
    /// No session; the caller notifies and redirects to the login page.
    LoginRequired,
}

/// What the order dialog is mounted with. Only exists while a session does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDialogProps {
    pub is_open: bool,
    pub service_id: Option<String>,
    pub customer_id: String,
}

pub struct CatalogController {
    load_state: LoadState,
    categories: Vec<ServiceCategory>,
    selection: SelectionState,
    dialog: DialogState,
    pending_service: Option<String>,
    session: Arc<dyn SessionProvider>,
}

impl CatalogController {
    pub fn new(session: Arc<dyn SessionProvider>) -> Self {
        Self {
            load_state: LoadState::Loading,
            categories: Vec::new(),
            selection: SelectionState::default(),
            dialog: DialogState::Closed,
            pending_service: None,
            session,
        }
    }

    /// Apply the result of the one catalog fetch.
    ///
    /// A failed fetch is only logged: the page ends up loaded and empty.
    pub fn finish_loading(&mut self, result: Result<CatalogResponse, ClientError>) {
        match result {
            Ok(response) => {
                info!(categories = response.data.len(), "Catalog loaded");
                self.selection = SelectionState::for_categories(response.data.len());
                self.categories = response.data;
            }
            Err(e) => error!("Error fetching catalog: {e}"),
        }
        self.load_state = LoadState::Loaded;
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn categories(&self) -> &[ServiceCategory] {
        &self.categories
    }

    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Show another service of one category. Bounds are the caller's business.
    pub fn select_service(&mut self, category: usize, service: usize) {
        self.selection.select(category, service);
    }

    /// The service shown in detail for a category, if any.
    pub fn detail(&self, category: usize) -> Option<&Service> {
        self.selection.resolve(&self.categories, category)
    }

    /// Gate an order on the session: open the dialog or ask for a login.
    pub fn request_order(&mut self, service_id: &str) -> OrderRequest {
        if self.session.current().is_none() {
            info!(service = service_id, "Order attempted without a session");
            return OrderRequest::LoginRequired;
        }

        self.pending_service = Some(service_id.to_string());
        self.dialog = DialogState::Open;
        OrderRequest::DialogOpened
    }

    pub fn close_dialog(&mut self) {
        self.dialog = DialogState::Closed;
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog == DialogState::Open
    }

    pub fn pending_service(&self) -> Option<&str> {
        self.pending_service.as_deref()
    }

    /// Find a loaded service by id.
    pub fn service(&self, service_id: &str) -> Option<&Service> {
        self.categories
            .iter()
            .flat_map(|category| category.services.iter())
            .find(|service| service.id == service_id)
    }

    /// Dialog props, or `None` when there is no session to mount it for.
    pub fn order_dialog_props(&self) -> Option<OrderDialogProps> {
        let session = self.session.current()?;
        Some(OrderDialogProps {
            is_open: self.is_dialog_open(),
            service_id: self.pending_service.clone(),
            customer_id: session.document_id,
        })
    }
}
