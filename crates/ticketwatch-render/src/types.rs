/// What a single render produced. Lives only for the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderResult {
    pub html: String,
    /// Visible text of the document body. Empty when text extraction is off.
    pub text: String,
    /// Full-page PNG bytes, when screenshot capture is on.
    pub screenshot: Option<Vec<u8>>,
    /// Whether a consent banner was found and clicked.
    pub consent_dismissed: bool,
}
