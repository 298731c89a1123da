use crate::data::models::categories::Category;
use crate::data::repos::traits::repository::CategoryProvider;
use crate::services::errors::RepositoryError;
use async_trait::async_trait;

/// Fixed category list kept in memory
pub struct CategoryRepo {
    categories: Vec<Category>,
}

impl CategoryRepo {
    pub fn new(categories: Vec<Category>) -> Self {
        CategoryRepo { categories }
    }
}

#[async_trait]
impl CategoryProvider for CategoryRepo {
    async fn get_all(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.categories.clone())
    }
}

impl Default for CategoryRepo {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
