use crate::data::models::categories::Category;
use crate::data::models::draft::{DraftField, DraftProduct};
use crate::services::wizard_steps::WizardStep;
use bigdecimal::BigDecimal;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Field errors from the latest validation pass, keyed by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<DraftField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors(BTreeMap::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: DraftField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: DraftField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn insert(&mut self, field: DraftField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn merge(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (DraftField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Earliest step owning one of the failing fields
    pub fn first_step(&self) -> Option<WizardStep> {
        self.0.keys().map(|field| step_of(*field)).min()
    }
}

/// What validation may look at besides the draft itself
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    /// Categories loaded from the provider, if any were loaded
    pub categories: Option<&'a [Category]>,
    pub require_known_category: bool,
}

struct FieldRule {
    field: DraftField,
    check: fn(&DraftProduct, &ValidationContext<'_>) -> Option<&'static str>,
}

const BASIC_INFO_RULES: &[FieldRule] = &[
    FieldRule {
        field: DraftField::Name,
        check: check_name,
    },
    FieldRule {
        field: DraftField::CategoryId,
        check: check_category,
    },
    FieldRule {
        field: DraftField::Description,
        check: check_description,
    },
];

const DETAILS_RULES: &[FieldRule] = &[
    FieldRule {
        field: DraftField::BasePrice,
        check: check_base_price,
    },
    FieldRule {
        field: DraftField::Quantity,
        check: check_quantity,
    },
];

const IMAGES_RULES: &[FieldRule] = &[FieldRule {
    field: DraftField::CoverImage,
    check: check_cover_image,
}];

fn rules_for(step: WizardStep) -> &'static [FieldRule] {
    match step {
        WizardStep::BasicInfo => BASIC_INFO_RULES,
        WizardStep::Details => DETAILS_RULES,
        WizardStep::Images => IMAGES_RULES,
        WizardStep::Options => &[],
    }
}

/// The step whose rules own `field`
pub fn step_of(field: DraftField) -> WizardStep {
    match field {
        DraftField::Name | DraftField::CategoryId | DraftField::Description => {
            WizardStep::BasicInfo
        }
        DraftField::BasePrice | DraftField::Quantity => WizardStep::Details,
        DraftField::CoverImage => WizardStep::Images,
    }
}

pub fn validate_step(
    step: WizardStep,
    draft: &DraftProduct,
    context: &ValidationContext<'_>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for rule in rules_for(step) {
        if let Some(message) = (rule.check)(draft, context) {
            errors.insert(rule.field, message);
        }
    }
    errors
}

/// Runs every step's rules, regardless of which step is current
pub fn validate_all(draft: &DraftProduct, context: &ValidationContext<'_>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for step in WizardStep::ALL {
        errors.merge(validate_step(step, draft, context));
    }
    errors
}

fn check_name(draft: &DraftProduct, _: &ValidationContext<'_>) -> Option<&'static str> {
    draft
        .name
        .trim()
        .is_empty()
        .then_some("Product name is required")
}

fn check_category(draft: &DraftProduct, context: &ValidationContext<'_>) -> Option<&'static str> {
    let category_id = draft.category_id.trim();
    if category_id.is_empty() {
        return Some("Category is required");
    }

    match context.categories {
        Some(categories)
            if context.require_known_category
                && !categories.iter().any(|c| c.id == category_id) =>
        {
            Some("Selected category does not exist")
        }
        _ => None,
    }
}

fn check_description(draft: &DraftProduct, _: &ValidationContext<'_>) -> Option<&'static str> {
    draft
        .description
        .trim()
        .is_empty()
        .then_some("Description is required")
}

fn check_base_price(draft: &DraftProduct, _: &ValidationContext<'_>) -> Option<&'static str> {
    let raw = draft.base_price.trim();
    if raw.is_empty() {
        return Some("Base price is required");
    }

    match BigDecimal::from_str(raw) {
        Ok(price) if price >= BigDecimal::from(0) => None,
        _ => Some("Base price must be a non-negative number"),
    }
}

fn check_quantity(draft: &DraftProduct, _: &ValidationContext<'_>) -> Option<&'static str> {
    let raw = draft.quantity.trim();
    if raw.is_empty() {
        return Some("Quantity is required");
    }

    match parse_quantity(raw) {
        Some(_) => None,
        None if raw.parse::<u64>().is_ok() => Some("Quantity is too large"),
        None => Some("Quantity must be a non-negative whole number"),
    }
}

fn check_cover_image(draft: &DraftProduct, _: &ValidationContext<'_>) -> Option<&'static str> {
    match &draft.cover_image {
        None => Some("Cover image is required"),
        Some(cover) if cover.upload_failed() => {
            Some("Cover image upload failed, choose another file")
        }
        Some(_) => None,
    }
}

/// Parses a stock quantity, rejecting negatives
pub fn parse_quantity(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok().filter(|quantity| *quantity >= 0)
}
