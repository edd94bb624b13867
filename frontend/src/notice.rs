use gloo_console::{error, info};
use gloo_utils::window;

/// Blocking message to the user, used for both guidance and validation failures.
pub fn show_notice(message: &str) {
    info!(format!("Notice: {}", message));
    if let Err(err) = window().alert_with_message(message) {
        error!("Failed to show notice", err);
    }
}
