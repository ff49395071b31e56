use crate::error::AppError;
use crate::notify::{APP_NAME, Notifier, alert_body};
use crate::view::AlertView;
use notify_rust::Notification;

pub struct LinuxNotifier;

impl Notifier for LinuxNotifier {
    fn notify(&self, alert: &AlertView) -> Result<(), AppError> {
        Notification::new()
            .appname(APP_NAME)
            .summary("Task due")
            .body(&alert_body(alert))
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
