//! Commands for catalog operations.
//!
//! These perform the backend calls and report back through the page's
//! message channel or the app channel.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::AppMessage;
use crate::catalog::message::CatalogMsg;
use crate::client::{CatalogClient, OrderDraft};
use crate::commands::Command;
use crate::ui::ToastType;

/// Fetch the category/service catalog once.
pub struct FetchCatalogCmd {
    client: Arc<dyn CatalogClient>,
    tx: UnboundedSender<CatalogMsg>,
}

impl FetchCatalogCmd {
    pub fn new(client: Arc<dyn CatalogClient>, tx: UnboundedSender<CatalogMsg>) -> Self {
        Self { client, tx }
    }
}

#[async_trait]
impl Command for FetchCatalogCmd {
    fn name(&self) -> String {
        "Loading services".to_string()
    }

    async fn execute(self: Box<Self>, _app_tx: UnboundedSender<AppMessage>) -> color_eyre::Result<()> {
        let result = self.client.fetch_catalog().await;
        // The page may be gone by now; nobody to tell.
        let _ = self.tx.send(CatalogMsg::CatalogLoaded(result));
        Ok(())
    }
}

/// Post an order and confirm it with a toast.
pub struct SubmitOrderCmd {
    client: Arc<dyn CatalogClient>,
    draft: OrderDraft,
    service_name: String,
}

impl SubmitOrderCmd {
    pub fn new(client: Arc<dyn CatalogClient>, draft: OrderDraft, service_name: impl Into<String>) -> Self {
        Self {
            client,
            draft,
            service_name: service_name.into(),
        }
    }
}

#[async_trait]
impl Command for SubmitOrderCmd {
    fn name(&self) -> String {
        format!("Ordering {} x{}", self.service_name, self.draft.quantity)
    }

    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> color_eyre::Result<()> {
        self.client.submit_order(&self.draft).await?;
        app_tx.send(AppMessage::ShowToast {
            message: format!("Order placed: {} x{}", self.service_name, self.draft.quantity),
            toast_type: ToastType::Success,
        })?;
        Ok(())
    }
}
