use log::debug;

/// Where user-visible messages go.
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Blocking `window.alert`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserAlert;

impl Notifier for BrowserAlert {
    fn alert(&self, message: &str) {
        debug!("alert: {message}");
        gloo::dialogs::alert(message);
    }
}
