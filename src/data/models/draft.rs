use crate::data::models::attachment::ImageAttachment;
use crate::services::errors::UnknownFieldError;
use std::collections::BTreeMap;

/// The product being built or edited. Numeric fields stay as typed text until submission.
#[derive(Debug)]
pub struct DraftProduct {
    pub name: String,
    pub base_price: String,
    pub quantity: String,
    pub category_id: String,
    pub description: String,
    pub short_description: String,
    pub tags: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub brand: String,
    pub warranty: String,
    pub additional_info: BTreeMap<String, String>,
    pub is_public: bool,
    pub cover_image: Option<ImageAttachment>,
    pub images: Vec<ImageAttachment>,
}

impl Default for DraftProduct {
    fn default() -> Self {
        DraftProduct {
            name: String::new(),
            base_price: String::new(),
            quantity: String::new(),
            category_id: String::new(),
            description: String::new(),
            short_description: String::new(),
            tags: Vec::new(),
            colors: Vec::new(),
            sizes: Vec::new(),
            brand: String::new(),
            warranty: String::new(),
            additional_info: BTreeMap::new(),
            is_public: true,
            cover_image: None,
            images: Vec::new(),
        }
    }
}

/// Fields that carry validation rules, used as keys for field errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DraftField {
    Name,
    CategoryId,
    Description,
    BasePrice,
    Quantity,
    CoverImage,
}

impl DraftField {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::Name => "name",
            DraftField::CategoryId => "categoryId",
            DraftField::Description => "description",
            DraftField::BasePrice => "basePrice",
            DraftField::Quantity => "quantity",
            DraftField::CoverImage => "coverImage",
        }
    }
}

impl std::fmt::Display for DraftField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A plain assignment to one scalar field of the draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    BasePrice(String),
    Quantity(String),
    CategoryId(String),
    Description(String),
    ShortDescription(String),
    Brand(String),
    Warranty(String),
    IsPublic(bool),
}

impl FieldUpdate {
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldUpdate::Name(_) => "name",
            FieldUpdate::BasePrice(_) => "basePrice",
            FieldUpdate::Quantity(_) => "quantity",
            FieldUpdate::CategoryId(_) => "categoryId",
            FieldUpdate::Description(_) => "description",
            FieldUpdate::ShortDescription(_) => "shortDescription",
            FieldUpdate::Brand(_) => "brand",
            FieldUpdate::Warranty(_) => "warranty",
            FieldUpdate::IsPublic(_) => "isPublic",
        }
    }
}

/// Sequence fields entered as a comma separated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayField {
    Tags,
    Colors,
    Sizes,
}

impl ArrayField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrayField::Tags => "tags",
            ArrayField::Colors => "colors",
            ArrayField::Sizes => "sizes",
        }
    }
}

impl std::str::FromStr for ArrayField {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tags" => Ok(ArrayField::Tags),
            "colors" => Ok(ArrayField::Colors),
            "sizes" => Ok(ArrayField::Sizes),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

/// Splits a comma separated list and trims every element.
/// Blank input is an empty list, not a list holding one empty string.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(',').map(|item| item.trim().to_string()).collect()
}

impl DraftProduct {
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(value) => self.name = value,
            FieldUpdate::BasePrice(value) => self.base_price = value,
            FieldUpdate::Quantity(value) => self.quantity = value,
            FieldUpdate::CategoryId(value) => self.category_id = value,
            FieldUpdate::Description(value) => self.description = value,
            FieldUpdate::ShortDescription(value) => self.short_description = value,
            FieldUpdate::Brand(value) => self.brand = value,
            FieldUpdate::Warranty(value) => self.warranty = value,
            FieldUpdate::IsPublic(value) => self.is_public = value,
        }
    }

    pub fn array_field(&self, field: ArrayField) -> &[String] {
        match field {
            ArrayField::Tags => &self.tags,
            ArrayField::Colors => &self.colors,
            ArrayField::Sizes => &self.sizes,
        }
    }

    pub fn set_array_field(&mut self, field: ArrayField, raw: &str) {
        let values = split_comma_list(raw);
        match field {
            ArrayField::Tags => self.tags = values,
            ArrayField::Colors => self.colors = values,
            ArrayField::Sizes => self.sizes = values,
        }
    }

    /// An empty value removes the key instead of storing an empty string
    pub fn set_additional_info(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.additional_info.remove(key);
        } else {
            self.additional_info.insert(key.to_string(), value.to_string());
        }
    }

    pub fn attachments(&self) -> impl Iterator<Item = &ImageAttachment> {
        self.cover_image.iter().chain(self.images.iter())
    }

    pub fn attachments_mut(&mut self) -> impl Iterator<Item = &mut ImageAttachment> {
        self.cover_image.iter_mut().chain(self.images.iter_mut())
    }
}
