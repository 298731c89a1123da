use crate::data::models::attachment::ImageFile;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;

/// The single payload handed to the product repository on create or update.
/// Only files picked on the client travel as uploads; images the backend
/// already stores are referenced by URL in the `existing_*` fields.
#[skip_serializing_none]
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSubmission {
    pub name: String,
    pub base_price: String,
    pub quantity: i32,
    pub category_id: String,
    pub description: String,
    pub short_description: Option<String>,
    pub tags: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub brand: Option<String>,
    pub warranty: Option<String>,
    pub additional_info: BTreeMap<String, String>,
    pub is_public: bool,
    pub cover_image_upload: Option<ImageFile>,
    pub images_upload: Vec<ImageFile>,
    pub existing_cover_image: Option<String>,
    pub existing_images: Vec<String>,
}
