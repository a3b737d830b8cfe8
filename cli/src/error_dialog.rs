use lucent_core::LucentFatalError;
use native_dialog::{DialogBuilder, MessageLevel};

pub fn show_error(error: &LucentFatalError) {
    let message = match error {
        LucentFatalError::Error(msg) => msg.clone(),
        LucentFatalError::PlatformError(e) => format!("Lucent could not drive the display: {e}"),
        LucentFatalError::ConfigError(e) => format!("Lucent could not load its settings: {e}"),
    };

    let _ = DialogBuilder::message()
        .set_level(MessageLevel::Error)
        .set_title("Lucent Error")
        .set_text(&message)
        .alert()
        .show();
}
