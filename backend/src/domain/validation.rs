//! Form validation for product create/edit and stock adjustment input.
//!
//! Validation never touches a record store and never stops at the first
//! problem: every rule runs and all violations are returned together as a
//! [`ValidationErrors`] set.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Category, CategoryRef, ParseAdjustmentTypeError, Product};

/// Threshold pre-filled on a fresh product form.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Input field a violation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    /// Product name.
    Name,
    /// Product SKU.
    Sku,
    /// Product category.
    Category,
    /// Unit price.
    Price,
    /// Current stock level.
    CurrentStock,
    /// Low-stock threshold.
    LowStockThreshold,
    /// Adjustment direction.
    AdjustmentType,
    /// Adjustment quantity.
    Quantity,
    /// Adjustment reason.
    Reason,
}

impl FormField {
    /// Wire name of the field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Sku => "sku",
            Self::Category => "category",
            Self::Price => "price",
            Self::CurrentStock => "currentStock",
            Self::LowStockThreshold => "lowStockThreshold",
            Self::AdjustmentType => "type",
            Self::Quantity => "quantity",
            Self::Reason => "reason",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldViolation {
    /// A required text field is empty after trimming.
    #[error("{field} is required")]
    Required {
        /// Offending field.
        field: FormField,
    },
    /// Price is zero or negative.
    #[error("price must be greater than 0")]
    PriceNotPositive,
    /// A count field is negative.
    #[error("{field} cannot be negative")]
    Negative {
        /// Offending field.
        field: FormField,
    },
    /// A count field does not fit the stored range.
    #[error("{field} is too large")]
    TooLarge {
        /// Offending field.
        field: FormField,
    },
    /// Adjustment direction is neither `increase` nor `decrease`.
    #[error(transparent)]
    UnknownAdjustmentType(#[from] ParseAdjustmentTypeError),
    /// Adjustment quantity is missing, non-numeric, zero, or negative.
    #[error("quantity must be a positive whole number")]
    InvalidQuantity,
}

impl FieldViolation {
    /// Field the violation refers to.
    pub const fn field(&self) -> FormField {
        match self {
            Self::Required { field } | Self::Negative { field } | Self::TooLarge { field } => {
                *field
            }
            Self::PriceNotPositive => FormField::Price,
            Self::UnknownAdjustmentType(_) => FormField::AdjustmentType,
            Self::InvalidQuantity => FormField::Quantity,
        }
    }
}

/// Every violation found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    /// Empty set.
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a violation.
    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    /// Whether no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the violations in rule order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    /// Fields with at least one violation, in rule order.
    pub fn fields(&self) -> Vec<FormField> {
        self.0.iter().map(FieldViolation::field).collect()
    }

    /// Violation recorded for `field`, if any.
    pub fn for_field(&self, field: FormField) -> Option<&FieldViolation> {
        self.0.iter().find(|violation| violation.field() == field)
    }

    /// `Ok(value)` when empty, otherwise the collected set.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldViolation;
    type IntoIter = std::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Raw product form input as entered by a user.
///
/// Counts are signed so that negative input can be reported rather than
/// rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    /// Product name.
    pub name: String,
    /// SKU as typed.
    pub sku: String,
    /// Category name.
    pub category: String,
    /// Unit price.
    pub price: Decimal,
    /// Stock level.
    pub current_stock: i64,
    /// Low-stock threshold.
    pub low_stock_threshold: i64,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self::with_threshold(DEFAULT_LOW_STOCK_THRESHOLD)
    }
}

/// Edit form pre-filled from a stored product.
impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            sku: product.sku.clone(),
            category: product.category_name().to_owned(),
            price: product.price,
            current_stock: i64::from(product.current_stock),
            low_stock_threshold: i64::from(product.low_stock_threshold),
        }
    }
}

impl ProductForm {
    /// Blank form pre-filled with the given low-stock threshold.
    pub fn with_threshold(low_stock_threshold: u32) -> Self {
        Self {
            name: String::new(),
            sku: String::new(),
            category: String::new(),
            price: Decimal::ZERO,
            current_stock: 0,
            low_stock_threshold: i64::from(low_stock_threshold),
        }
    }

    /// Run every rule and collect all violations.
    ///
    /// # Examples
    /// ```
    /// use inventory::domain::{FormField, ProductForm};
    /// use rust_decimal::Decimal;
    ///
    /// let form = ProductForm {
    ///     name: String::new(),
    ///     sku: "A1".into(),
    ///     category: "Tools".into(),
    ///     price: Decimal::ZERO,
    ///     current_stock: -1,
    ///     low_stock_threshold: -1,
    /// };
    /// let errors = form.validate().unwrap_err();
    /// assert_eq!(
    ///     errors.fields(),
    ///     vec![
    ///         FormField::Name,
    ///         FormField::Price,
    ///         FormField::CurrentStock,
    ///         FormField::LowStockThreshold,
    ///     ],
    /// );
    /// ```
    pub fn validate(&self) -> Result<ValidProduct, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&self.name, FormField::Name, &mut errors);
        let sku = required_text(&self.sku, FormField::Sku, &mut errors);
        let category = required_text(&self.category, FormField::Category, &mut errors);
        if self.price <= Decimal::ZERO {
            errors.push(FieldViolation::PriceNotPositive);
        }
        let current_stock = count(self.current_stock, FormField::CurrentStock, &mut errors);
        let low_stock_threshold = count(
            self.low_stock_threshold,
            FormField::LowStockThreshold,
            &mut errors,
        );

        errors.into_result(|| ValidProduct {
            name: name.to_owned(),
            sku: sku.to_uppercase(),
            category: category.to_owned(),
            price: self.price,
            current_stock,
            low_stock_threshold,
        })
    }
}

fn required_text<'a>(value: &'a str, field: FormField, errors: &mut ValidationErrors) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldViolation::Required { field });
    }
    trimmed
}

fn count(value: i64, field: FormField, errors: &mut ValidationErrors) -> u32 {
    if value < 0 {
        errors.push(FieldViolation::Negative { field });
        return 0;
    }
    u32::try_from(value).unwrap_or_else(|_| {
        errors.push(FieldViolation::TooLarge { field });
        0
    })
}

/// Product form input that passed every rule.
///
/// Text fields are trimmed and the SKU is uppercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidProduct {
    /// Trimmed name.
    pub name: String,
    /// Trimmed, uppercased SKU.
    pub sku: String,
    /// Trimmed category name.
    pub category: String,
    /// Positive unit price.
    pub price: Decimal,
    /// Non-negative stock level.
    pub current_stock: u32,
    /// Non-negative threshold.
    pub low_stock_threshold: u32,
}

impl ValidProduct {
    /// Category reference resolved against the known categories.
    pub fn category_ref(&self, categories: &[Category]) -> CategoryRef {
        CategoryRef::resolve(&self.category, categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn valid_form() -> ProductForm {
        ProductForm {
            name: "  Claw Hammer ".to_owned(),
            sku: "ham-001".to_owned(),
            category: "Tools".to_owned(),
            price: Decimal::new(1999, 2),
            current_stock: 12,
            low_stock_threshold: 5,
        }
    }

    #[rstest]
    fn valid_form_is_normalised(valid_form: ProductForm) {
        let product = valid_form.validate().expect("valid form");
        assert_eq!(product.name, "Claw Hammer");
        assert_eq!(product.sku, "HAM-001");
        assert_eq!(product.current_stock, 12);
    }

    #[rstest]
    fn edit_form_is_prefilled_from_stored_product() {
        let stored = Product::from_draft(
            crate::domain::RecordId::new(4),
            crate::domain::ProductDraft {
                name: "Claw Hammer".to_owned(),
                sku: "HAM-001".to_owned(),
                category: CategoryRef::ByReference {
                    id: crate::domain::RecordId::new(2),
                    name: "Tools".to_owned(),
                },
                price: Decimal::new(1999, 2),
                current_stock: 12,
                low_stock_threshold: 3,
                last_updated: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
            },
        );

        let form = ProductForm::from(&stored);

        assert_eq!(form.category, "Tools");
        assert_eq!(form.low_stock_threshold, 3);
        let valid = form.validate().expect("stored product is valid");
        assert_eq!(valid.sku, stored.sku);
        assert_eq!(valid.current_stock, stored.current_stock);
    }

    #[rstest]
    fn collects_every_violation_in_one_pass() {
        let form = ProductForm {
            name: String::new(),
            sku: "A1".to_owned(),
            category: "Tools".to_owned(),
            price: Decimal::ZERO,
            current_stock: -1,
            low_stock_threshold: -1,
        };

        let errors = form.validate().expect_err("invalid form");

        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.fields(),
            vec![
                FormField::Name,
                FormField::Price,
                FormField::CurrentStock,
                FormField::LowStockThreshold,
            ]
        );
        assert!(errors.for_field(FormField::Sku).is_none());
        assert!(errors.for_field(FormField::Category).is_none());
    }

    #[rstest]
    #[case::blank_name("   ", "A1", "Tools", FormField::Name)]
    #[case::blank_sku("Hammer", "\t", "Tools", FormField::Sku)]
    #[case::blank_category("Hammer", "A1", "", FormField::Category)]
    fn whitespace_only_text_is_required(
        valid_form: ProductForm,
        #[case] name: &str,
        #[case] sku: &str,
        #[case] category: &str,
        #[case] expected: FormField,
    ) {
        let form = ProductForm {
            name: name.to_owned(),
            sku: sku.to_owned(),
            category: category.to_owned(),
            ..valid_form
        };
        let errors = form.validate().expect_err("missing text");
        assert_eq!(errors.fields(), vec![expected]);
    }

    #[rstest]
    fn negative_price_is_rejected(valid_form: ProductForm) {
        let form = ProductForm {
            price: Decimal::new(-5, 0),
            ..valid_form
        };
        let errors = form.validate().expect_err("negative price");
        assert_eq!(errors.for_field(FormField::Price), Some(&FieldViolation::PriceNotPositive));
    }

    #[rstest]
    fn zero_stock_and_threshold_are_allowed(valid_form: ProductForm) {
        let form = ProductForm {
            current_stock: 0,
            low_stock_threshold: 0,
            ..valid_form
        };
        assert!(form.validate().is_ok());
    }

    #[rstest]
    fn oversized_stock_is_reported(valid_form: ProductForm) {
        let form = ProductForm {
            current_stock: i64::from(u32::MAX) + 1,
            ..valid_form
        };
        let errors = form.validate().expect_err("too large");
        assert_eq!(
            errors.for_field(FormField::CurrentStock),
            Some(&FieldViolation::TooLarge {
                field: FormField::CurrentStock
            })
        );
    }

    #[rstest]
    fn default_form_uses_standard_threshold() {
        let form = ProductForm::default();
        assert_eq!(form.low_stock_threshold, 5);
        assert_eq!(form.price, Decimal::ZERO);
    }

    #[rstest]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.push(FieldViolation::Required {
            field: FormField::Name,
        });
        errors.push(FieldViolation::PriceNotPositive);
        assert_eq!(
            errors.to_string(),
            "name is required; price must be greater than 0"
        );
    }
}
