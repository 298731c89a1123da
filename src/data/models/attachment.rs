use crate::services::errors::UploadError;
use crate::services::preview_service::PreviewRegistry;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ATTACHMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one attachment instance. Upload completions are matched by it,
/// so a replaced or removed attachment never receives another one's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentId(u64);

impl AttachmentId {
    fn next() -> Self {
        AttachmentId(NEXT_ATTACHMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "attachment#{}", self.0)
    }
}

/// A file chosen on the client and not yet persisted
#[derive(Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    #[serde(skip)]
    pub bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        ImageFile {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: Arc::from(bytes),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Preview handle issued for a local file. Released exactly once, when dropped.
pub struct OwnedPreview {
    uri: String,
    registry: Arc<dyn PreviewRegistry>,
}

impl OwnedPreview {
    pub fn issue(registry: &Arc<dyn PreviewRegistry>, file: &ImageFile) -> Self {
        OwnedPreview {
            uri: registry.issue(file),
            registry: Arc::clone(registry),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for OwnedPreview {
    fn drop(&mut self) {
        self.registry.release(&self.uri);
    }
}

impl std::fmt::Debug for OwnedPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("OwnedPreview").field(&self.uri).finish()
    }
}

#[derive(Debug)]
pub enum ImageSource {
    LocalFile { file: ImageFile, preview: OwnedPreview },
    RemoteUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadState {
    Uploading,
    Uploaded,
    Failed(String),
}

#[derive(Debug)]
pub struct ImageAttachment {
    id: AttachmentId,
    source: ImageSource,
    upload: UploadState,
}

impl ImageAttachment {
    /// Wraps a freshly selected file. Issues its preview and starts out uploading.
    pub fn local(file: ImageFile, previews: &Arc<dyn PreviewRegistry>) -> Self {
        let preview = OwnedPreview::issue(previews, &file);
        ImageAttachment {
            id: AttachmentId::next(),
            source: ImageSource::LocalFile { file, preview },
            upload: UploadState::Uploading,
        }
    }

    /// Wraps an image the backend already stores
    pub fn remote(url: impl Into<String>) -> Self {
        ImageAttachment {
            id: AttachmentId::next(),
            source: ImageSource::RemoteUrl(url.into()),
            upload: UploadState::Uploaded,
        }
    }

    pub fn id(&self) -> AttachmentId {
        self.id
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn preview_uri(&self) -> &str {
        match &self.source {
            ImageSource::LocalFile { preview, .. } => preview.uri(),
            ImageSource::RemoteUrl(url) => url,
        }
    }

    pub fn local_file(&self) -> Option<&ImageFile> {
        match &self.source {
            ImageSource::LocalFile { file, .. } => Some(file),
            ImageSource::RemoteUrl(_) => None,
        }
    }

    pub fn remote_url(&self) -> Option<&str> {
        match &self.source {
            ImageSource::LocalFile { .. } => None,
            ImageSource::RemoteUrl(url) => Some(url),
        }
    }

    pub fn upload_state(&self) -> &UploadState {
        &self.upload
    }

    pub fn is_uploading(&self) -> bool {
        self.upload == UploadState::Uploading
    }

    pub fn upload_failed(&self) -> bool {
        matches!(self.upload, UploadState::Failed(_))
    }

    /// Records the outcome of this attachment's upload. Only the upload flag changes.
    pub fn settle(&mut self, result: Result<(), UploadError>) {
        self.upload = match result {
            Ok(()) => UploadState::Uploaded,
            Err(e) => UploadState::Failed(e.to_string()),
        };
    }
}
