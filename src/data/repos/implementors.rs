pub mod category_repo;
pub mod product_repo;
