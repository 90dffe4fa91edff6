//! Async commands pattern for side effects.
//!
//! Commands represent async operations that run outside the main event loop.
//! Screens return commands, and the App spawns them; failures are shown in
//! the error dialog.

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::app::{AppMessage, Route};
use crate::ui::ToastType;

/// Async commands that perform side effects.
#[async_trait]
pub trait Command: Send + 'static {
    /// Human-readable name for logging.
    fn name(&self) -> String;

    /// Execute the command.
    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> Result<()>;
}

/// Shows a toast. Fire and forget.
pub struct NotifyCmd {
    message: String,
    toast_type: ToastType,
}

impl NotifyCmd {
    pub fn new(message: impl Into<String>, toast_type: ToastType) -> Self {
        Self {
            message: message.into(),
            toast_type,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastType::Error)
    }
}

#[async_trait]
impl Command for NotifyCmd {
    fn name(&self) -> String {
        format!("Notify: {}", self.message)
    }

    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> Result<()> {
        app_tx.send(AppMessage::ShowToast {
            message: self.message,
            toast_type: self.toast_type,
        })?;
        Ok(())
    }
}

/// Navigates to another page after a delay.
///
/// Not cancellable: if the user moves elsewhere first, the jump still happens.
pub struct RedirectCmd {
    route: Route,
    delay: Duration,
}

impl RedirectCmd {
    pub const fn new(route: Route, delay: Duration) -> Self {
        Self { route, delay }
    }
}

#[async_trait]
impl Command for RedirectCmd {
    fn name(&self) -> String {
        format!("Redirect to {:?} in {:?}", self.route, self.delay)
    }

    async fn execute(self: Box<Self>, app_tx: UnboundedSender<AppMessage>) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        app_tx.send(AppMessage::Navigate(self.route))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_notify_sends_toast() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        Box::new(NotifyCmd::error("nope")).execute(tx).await.unwrap();

        match rx.recv().await {
            Some(AppMessage::ShowToast {
                message,
                toast_type,
            }) => {
                assert_eq!(message, "nope");
                assert_eq!(toast_type, ToastType::Error);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_redirect_waits_for_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let delay = Duration::from_millis(1200);
        let task = tokio::spawn(
            Box::new(RedirectCmd::new(Route::Authentication, delay)).execute(tx),
        );

        tokio::time::sleep(Duration::from_millis(1199)).await;
        assert!(rx.try_recv().is_err(), "redirect fired early");

        tokio::time::sleep(Duration::from_millis(2)).await;
        task.await.unwrap().unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(AppMessage::Navigate(Route::Authentication))
        ));
    }
}
