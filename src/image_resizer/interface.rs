use std::fmt;
use std::path::Path;

/// A re-encoded JPEG at the requested resolution, held in memory.
#[derive(Clone, PartialEq)]
pub struct ResizedImage {
    pub width: u32,
    pub height: u32,
    pub base64: String,
}

impl fmt::Debug for ResizedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResizedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("base64", &format!("<{} chars>", self.base64.len()))
            .finish()
    }
}

pub trait ImageResizer {
    /// Output dimensions always equal `width` x `height`; aspect ratio is not kept.
    fn resize(
        &self,
        uri: &Path,
        width: u32,
        height: u32,
    ) -> Result<ResizedImage, Box<dyn std::error::Error + Send + Sync>>;
}
