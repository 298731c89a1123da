use crate::data::models::attachment::ImageFile;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Issues and revokes local preview handles for picked files
pub trait PreviewRegistry: Send + Sync {
    fn issue(&self, file: &ImageFile) -> String;
    fn release(&self, uri: &str);
}

/// In-process registry handing out `blob:` style URIs
pub struct BlobPreviewRegistry {
    next: AtomicU64,
    live: Mutex<HashMap<String, String>>,
}

impl BlobPreviewRegistry {
    pub fn new() -> Self {
        BlobPreviewRegistry {
            next: AtomicU64::new(1),
            live: Mutex::new(HashMap::new()),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    pub fn is_live(&self, uri: &str) -> bool {
        self.live.lock().contains_key(uri)
    }
}

impl PreviewRegistry for BlobPreviewRegistry {
    fn issue(&self, file: &ImageFile) -> String {
        let uri = format!(
            "blob:arrow-admin/{}",
            self.next.fetch_add(1, Ordering::Relaxed)
        );
        self.live.lock().insert(uri.clone(), file.file_name.clone());
        tracing::debug!("Issued preview {} for {}", uri, file.file_name);
        uri
    }

    fn release(&self, uri: &str) {
        match self.live.lock().remove(uri) {
            Some(file_name) => tracing::debug!("Released preview {} for {}", uri, file_name),
            None => tracing::warn!("Preview {} released but not live", uri),
        }
    }
}

impl Default for BlobPreviewRegistry {
    fn default() -> Self {
        Self::new()
    }
}
