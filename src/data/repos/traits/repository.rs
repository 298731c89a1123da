use crate::data::models::categories::Category;
use crate::data::models::product::{ProductId, ProductRecord};
use crate::data::models::submission::ProductSubmission;
use crate::services::errors::RepositoryError;
use async_trait::async_trait;

#[async_trait]
pub trait Repository: Send + Sync {
    type Id: Send + Sync;
    type Item: Send;
    type NewItem: Send;
    type UpdateForm: Send;

    async fn get_by_id(&self, id: &Self::Id) -> Result<Self::Item, RepositoryError>;

    async fn add(&self, item: Self::NewItem) -> Result<Self::Item, RepositoryError>;

    async fn update(
        &self,
        id: &Self::Id,
        item: Self::UpdateForm,
    ) -> Result<Self::Item, RepositoryError>;
}

/// The backend the product form reads from and writes to
pub trait ProductRepository:
    Repository<
        Id = ProductId,
        Item = ProductRecord,
        NewItem = ProductSubmission,
        UpdateForm = ProductSubmission,
    >
{
}

impl<T> ProductRepository for T where
    T: Repository<
            Id = ProductId,
            Item = ProductRecord,
            NewItem = ProductSubmission,
            UpdateForm = ProductSubmission,
        >
{
}

/// Read-only source for the category selector
#[async_trait]
pub trait CategoryProvider: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Category>, RepositoryError>;
}
