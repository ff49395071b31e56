use crate::error::AppError;
use crate::view::AlertView;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::LinuxNotifier;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WindowsNotifier;

const DISABLE_ENV_VAR: &str = "TASKLANE_DISABLE_NOTIFICATIONS";
const APP_NAME: &str = "tasklane";

/// Delivers an alert outside the terminal.
pub trait Notifier {
    fn notify(&self, alert: &AlertView) -> Result<(), AppError>;
}

pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _alert: &AlertView) -> Result<(), AppError> {
        Ok(())
    }
}

/// Picks the platform notifier unless notifications are switched off by config or
/// environment. Platforms without a backend get the no-op notifier.
pub fn notifier_from_env(enabled: bool) -> Result<Box<dyn Notifier>, AppError> {
    if !enabled || std::env::var(DISABLE_ENV_VAR).is_ok() {
        return Ok(Box::new(NoopNotifier));
    }

    match platform_notifier() {
        Ok(notifier) => Ok(notifier),
        Err(err) => match err {
            AppError::InvalidData(_) => Ok(Box::new(NoopNotifier)),
            other => Err(other),
        },
    }
}

pub fn alert_body(alert: &AlertView) -> String {
    match alert.list_name.as_deref() {
        Some(list) => format!("{} ({}) due {}", alert.name, list, alert.due),
        None => format!("{} due {}", alert.name, alert.due),
    }
}

#[cfg(target_os = "linux")]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(LinuxNotifier))
}

#[cfg(windows)]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Ok(Box::new(WindowsNotifier))
}

#[cfg(not(any(target_os = "linux", windows)))]
pub fn platform_notifier() -> Result<Box<dyn Notifier>, AppError> {
    Err(AppError::invalid_data(
        "notifications are not supported on this platform",
    ))
}
