use serde::Serialize;

/// The uploaded base resume. Immutable once produced by `upload`.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    /// Base64-encoded document bytes. Never echoed back to the browser.
    #[serde(skip_serializing)]
    pub data: String,
    pub size_bytes: usize,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size_bytes", &self.size_bytes)
            .finish_non_exhaustive()
    }
}
