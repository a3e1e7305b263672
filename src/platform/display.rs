use tracing::{debug, info, warn};

/// Output surface the slideshow draws on.
///
/// Each call replaces whatever was on screen before.
pub trait Screen {
    fn show_image(&mut self, path: &str);
    fn show_text(&mut self, message: &str);
}

/// Screen that reports what would be drawn through the log.
#[derive(Debug, Default)]
pub struct LogScreen {
    current: Option<String>,
}

impl Screen for LogScreen {
    fn show_image(&mut self, path: &str) {
        if self.current.as_deref() == Some(path) {
            debug!(path, "image unchanged");
        } else {
            info!(path, "showing image");
        }
        self.current = Some(path.to_owned());
    }

    fn show_text(&mut self, message: &str) {
        warn!(message, "showing text");
        self.current = None;
    }
}
