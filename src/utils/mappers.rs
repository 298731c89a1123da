use crate::data::models::attachment::ImageAttachment;
use crate::data::models::draft::{DraftField, DraftProduct};
use crate::data::models::product::ProductRecord;
use crate::data::models::submission::ProductSubmission;
use crate::services::validation::{FieldErrors, parse_quantity};

impl From<ProductRecord> for DraftProduct {
    fn from(record: ProductRecord) -> Self {
        DraftProduct {
            name: record.name,
            base_price: record.base_price.to_string(),
            quantity: record.quantity.to_string(),
            category_id: record.category_id.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
            short_description: record.short_description.unwrap_or_default(),
            tags: record.tags,
            colors: record.colors,
            sizes: record.sizes,
            brand: record.brand.unwrap_or_default(),
            warranty: record.warranty.unwrap_or_default(),
            additional_info: record.additional_info,
            is_public: record.is_public.unwrap_or(true),
            cover_image: record.cover_image.map(ImageAttachment::remote),
            images: record.images.into_iter().map(ImageAttachment::remote).collect(),
        }
    }
}

impl TryFrom<&DraftProduct> for ProductSubmission {
    type Error = FieldErrors;

    fn try_from(draft: &DraftProduct) -> Result<Self, Self::Error> {
        let quantity = parse_quantity(&draft.quantity).ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.insert(
                DraftField::Quantity,
                "Quantity must be a non-negative whole number",
            );
            errors
        })?;

        Ok(ProductSubmission {
            name: draft.name.trim().to_string(),
            base_price: draft.base_price.trim().to_string(),
            quantity,
            category_id: draft.category_id.trim().to_string(),
            description: draft.description.trim().to_string(),
            short_description: non_blank(&draft.short_description),
            tags: draft.tags.clone(),
            colors: draft.colors.clone(),
            sizes: draft.sizes.clone(),
            brand: non_blank(&draft.brand),
            warranty: non_blank(&draft.warranty),
            additional_info: draft.additional_info.clone(),
            is_public: draft.is_public,
            cover_image_upload: draft
                .cover_image
                .as_ref()
                .and_then(|cover| cover.local_file().cloned()),
            images_upload: draft
                .images
                .iter()
                .filter_map(|image| image.local_file().cloned())
                .collect(),
            existing_cover_image: draft
                .cover_image
                .as_ref()
                .and_then(|cover| cover.remote_url().map(str::to_string)),
            existing_images: draft
                .images
                .iter()
                .filter_map(|image| image.remote_url().map(str::to_string))
                .collect(),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
