use std::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    /// Nothing open yet. Shows the "Take Picture" button.
    Home,
    /// Live camera screen with the shutter button.
    Camera { ready: bool, capturing: bool },
    /// Captured photo with the "Classify Picture" button and result text.
    Preview {
        photo_uri: PathBuf,
        classifying: bool,
        result: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertView {
    pub title: String,
    pub message: String,
}

/// Everything a front end needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenView {
    pub page: Page,
    pub alert: Option<AlertView>,
}

pub trait DeviceDisplay: Send + Sync {
    /// Replace whatever is on screen with `view`.
    fn show(&mut self, view: &ScreenView) -> Result<(), Box<dyn Error + Send + Sync>>;
}
