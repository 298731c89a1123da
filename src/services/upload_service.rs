use crate::config::WizardConfig;
use crate::data::models::attachment::ImageFile;
use crate::services::errors::UploadError;
use async_trait::async_trait;
use std::time::Duration;

/// Uploads one picked file. Each attachment gets its own call.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, file: &ImageFile) -> Result<(), UploadError>;
}

/// Stands in for a real upload endpoint: waits, then reports success.
/// The file itself still travels with the final submission.
pub struct SimulatedUploader {
    delay: Duration,
}

impl SimulatedUploader {
    pub fn new(delay: Duration) -> Self {
        SimulatedUploader { delay }
    }

    pub fn from_config(config: &WizardConfig) -> Self {
        Self::new(config.simulated_upload_delay)
    }
}

#[async_trait]
impl ImageUploader for SimulatedUploader {
    async fn upload(&self, file: &ImageFile) -> Result<(), UploadError> {
        if file.size() == 0 {
            return Err(UploadError::Rejected(format!("{} is empty", file.file_name)));
        }

        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

impl Default for SimulatedUploader {
    fn default() -> Self {
        Self::from_config(&WizardConfig::new())
    }
}
