use crate::data::models::product::{ProductId, ProductRecord};
use crate::data::models::submission::ProductSubmission;
use crate::data::repos::traits::repository::Repository;
use crate::services::errors::RepositoryError;
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// In-memory product store. Uploaded files are given a stable URL under `/uploads`.
pub struct ProductRepo {
    products: RwLock<BTreeMap<ProductId, ProductRecord>>,
    next_id: AtomicU64,
}

impl ProductRepo {
    pub fn new() -> Self {
        ProductRepo {
            products: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Stores a record as-is, replacing any record with the same id
    pub async fn insert(&self, record: ProductRecord) {
        self.products.write().await.insert(record.id.clone(), record);
    }

    pub async fn get_all(&self) -> Vec<ProductRecord> {
        self.products.read().await.values().cloned().collect()
    }

    fn build_record(
        id: ProductId,
        submission: ProductSubmission,
        created_at: Option<chrono::NaiveDateTime>,
    ) -> Result<ProductRecord, RepositoryError> {
        if submission.name.trim().is_empty() {
            return Err(RepositoryError::Validation("name must not be empty".to_string()));
        }

        let base_price = BigDecimal::from_str(submission.base_price.trim()).map_err(|_| {
            RepositoryError::Validation(format!(
                "basePrice '{}' is not a decimal",
                submission.base_price
            ))
        })?;

        let cover_image = match &submission.cover_image_upload {
            Some(file) => Some(format!("/uploads/{}/{}", id, file.file_name)),
            None => submission.existing_cover_image.clone(),
        };

        let mut images = submission.existing_images.clone();
        images.extend(
            submission
                .images_upload
                .iter()
                .map(|file| format!("/uploads/{}/{}", id, file.file_name)),
        );

        let now = chrono::Utc::now().naive_utc();

        Ok(ProductRecord {
            id,
            name: submission.name,
            base_price,
            quantity: submission.quantity,
            category_id: Some(submission.category_id),
            description: Some(submission.description),
            short_description: submission.short_description,
            tags: submission.tags,
            colors: submission.colors,
            sizes: submission.sizes,
            brand: submission.brand,
            warranty: submission.warranty,
            additional_info: submission.additional_info,
            is_public: Some(submission.is_public),
            cover_image,
            images,
            created_at: created_at.or(Some(now)),
            updated_at: Some(now),
        })
    }
}

#[async_trait]
impl Repository for ProductRepo {
    type Id = ProductId;
    type Item = ProductRecord;
    type NewItem = ProductSubmission;
    type UpdateForm = ProductSubmission;

    async fn get_by_id(&self, id: &Self::Id) -> Result<Self::Item, RepositoryError> {
        self.products
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn add(&self, item: Self::NewItem) -> Result<Self::Item, RepositoryError> {
        let id = ProductId(format!(
            "prod-{}",
            self.next_id.fetch_add(1, Ordering::Relaxed)
        ));

        let record = Self::build_record(id, item, None)?;
        self.insert(record.clone()).await;

        tracing::info!("Product {} created", record.id);
        Ok(record)
    }

    async fn update(
        &self,
        id: &Self::Id,
        item: Self::UpdateForm,
    ) -> Result<Self::Item, RepositoryError> {
        let mut products = self.products.write().await;

        let existing = products
            .get(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        let record = Self::build_record(id.clone(), item, existing.created_at)?;
        products.insert(id.clone(), record.clone());

        tracing::info!("Product {} updated", id);
        Ok(record)
    }
}

impl Default for ProductRepo {
    fn default() -> Self {
        Self::new()
    }
}
