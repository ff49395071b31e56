use crate::error::AppError;
use crate::notify::{APP_NAME, Notifier};
use crate::view::AlertView;
use tauri_winrt_notification::Toast;

pub struct WindowsNotifier;

impl Notifier for WindowsNotifier {
    fn notify(&self, alert: &AlertView) -> Result<(), AppError> {
        let detail = match alert.list_name.as_deref() {
            Some(list) => format!("{list} - due {}", alert.due),
            None => format!("due {}", alert.due),
        };
        Toast::new(Toast::POWERSHELL_APP_ID)
            .title(APP_NAME)
            .text1(&alert.name)
            .text2(&detail)
            .show()
            .map_err(|err| AppError::io(err.to_string()))?;
        Ok(())
    }
}
