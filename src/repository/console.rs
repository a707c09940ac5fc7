//! Adapters that only report what the hosting platform would have done.

use crate::domain::navigation::NavigationTarget;
use crate::domain::toast::{Toast, ToastVariant};
use crate::repository::errors::RepositoryResult;
use crate::repository::{Navigator, Notifier};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, target: &NavigationTarget) -> RepositoryResult<()> {
        log::info!("Navigate to {}", serde_json::to_string(target)?);
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_toast(&self, toast: &Toast) {
        match toast.variant {
            ToastVariant::Error => log::error!("{}: {}", toast.title, toast.message),
            ToastVariant::Warning => log::warn!("{}: {}", toast.title, toast.message),
            ToastVariant::Info | ToastVariant::Success => {
                log::info!("{}: {}", toast.title, toast.message)
            }
        }
    }
}
