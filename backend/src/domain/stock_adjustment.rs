//! Stock adjustments: the audit record, the new-stock calculator, and
//! adjustment request validation.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{FieldViolation, FormField, Product, RecordId, StoredRecord, ValidationErrors};

/// Step used by quick adjustments.
pub const QUICK_ADJUST_STEP: NonZeroU32 = NonZeroU32::MIN;

/// Reasons offered when recording an adjustment by hand.
pub const STANDARD_REASONS: [&str; 7] = [
    "Received shipment",
    "Sale",
    "Damaged goods",
    "Return",
    "Inventory correction",
    "Transfer",
    "Other",
];

/// Direction of a stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    /// Stock goes up.
    Increase,
    /// Stock goes down, flooring at zero.
    Decrease,
}

impl AdjustmentType {
    /// Wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
        }
    }
}

impl fmt::Display for AdjustmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown adjustment type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown adjustment type: {input}")]
pub struct ParseAdjustmentTypeError {
    /// The unrecognised input.
    pub input: String,
}

impl FromStr for AdjustmentType {
    type Err = ParseAdjustmentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            _ => Err(ParseAdjustmentTypeError {
                input: s.to_owned(),
            }),
        }
    }
}

/// Stock level after applying `quantity` in direction `kind`.
///
/// Decreases floor at zero; increases saturate at `u32::MAX`.
///
/// # Examples
/// ```
/// use inventory::domain::{AdjustmentType, compute_new_stock};
///
/// assert_eq!(compute_new_stock(10, AdjustmentType::Increase, 5), 15);
/// assert_eq!(compute_new_stock(10, AdjustmentType::Decrease, 15), 0);
/// ```
pub const fn compute_new_stock(current_stock: u32, kind: AdjustmentType, quantity: u32) -> u32 {
    match kind {
        AdjustmentType::Increase => current_stock.saturating_add(quantity),
        AdjustmentType::Decrease => current_stock.saturating_sub(quantity),
    }
}

/// Preview of an adjustment before it is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPreview {
    /// Stock before the adjustment.
    pub current_stock: u32,
    /// Stock after the adjustment.
    pub new_stock: u32,
    /// Signed effective change, `new_stock - current_stock`.
    pub delta: i64,
}

impl StockPreview {
    /// Compute the preview for an adjustment.
    pub fn compute(current_stock: u32, kind: AdjustmentType, quantity: u32) -> Self {
        let new_stock = compute_new_stock(current_stock, kind, quantity);
        Self {
            current_stock,
            new_stock,
            delta: i64::from(new_stock) - i64::from(current_stock),
        }
    }

    /// Whether the adjustment leaves the stock unchanged.
    pub const fn is_noop(&self) -> bool {
        self.delta == 0
    }
}

/// Validated, non-empty adjustment reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AdjustmentReason(String);

impl AdjustmentReason {
    /// Validate a caller-supplied reason.
    pub fn new(reason: impl Into<String>) -> Result<Self, FieldViolation> {
        let reason = reason.into();
        if reason.trim().is_empty() {
            return Err(FieldViolation::Required {
                field: FormField::Reason,
            });
        }
        Ok(Self(reason))
    }

    /// Auto-generated reason used by quick adjustments.
    pub fn quick(kind: AdjustmentType, step: NonZeroU32) -> Self {
        Self(format!("Quick {kind} by {step}"))
    }

    /// Whether this is one of [`STANDARD_REASONS`].
    pub fn is_standard(&self) -> bool {
        STANDARD_REASONS.contains(&self.0.as_str())
    }

    /// Borrow the reason text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AdjustmentReason {
    type Error = FieldViolation;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AdjustmentReason> for String {
    fn from(value: AdjustmentReason) -> Self {
        value.0
    }
}

/// A validated request to adjust a product's stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentRequest {
    /// Direction.
    pub kind: AdjustmentType,
    /// Magnitude requested.
    pub quantity: NonZeroU32,
    /// Why the stock changed.
    pub reason: AdjustmentReason,
}

impl AdjustmentRequest {
    /// Validate raw user input.
    ///
    /// The quantity must parse as a positive whole number and the reason must
    /// be non-empty after trimming. Both rules always run.
    ///
    /// # Examples
    /// ```
    /// use inventory::domain::{AdjustmentRequest, AdjustmentType, FormField};
    ///
    /// let errors = AdjustmentRequest::parse(AdjustmentType::Decrease, "-3", " ").unwrap_err();
    /// assert_eq!(errors.fields(), vec![FormField::Quantity, FormField::Reason]);
    /// ```
    pub fn parse(kind: AdjustmentType, quantity: &str, reason: &str) -> Result<Self, ValidationErrors> {
        Self::collect(Ok(kind), quantity, reason)
    }

    /// Validate raw user input whose direction is still text.
    ///
    /// An unknown direction is reported alongside any quantity and reason
    /// violations.
    ///
    /// # Examples
    /// ```
    /// use inventory::domain::{AdjustmentRequest, FormField};
    ///
    /// let errors = AdjustmentRequest::parse_input("sideways", "0", "Sale").unwrap_err();
    /// assert_eq!(errors.fields(), vec![FormField::AdjustmentType, FormField::Quantity]);
    /// ```
    pub fn parse_input(kind: &str, quantity: &str, reason: &str) -> Result<Self, ValidationErrors> {
        Self::collect(kind.trim().parse(), quantity, reason)
    }

    fn collect(
        kind: Result<AdjustmentType, ParseAdjustmentTypeError>,
        quantity: &str,
        reason: &str,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let kind = kind
            .map_err(|err| errors.push(FieldViolation::from(err)))
            .ok();

        let quantity = quantity
            .trim()
            .parse::<u32>()
            .ok()
            .and_then(NonZeroU32::new);
        if quantity.is_none() {
            errors.push(FieldViolation::InvalidQuantity);
        }

        let reason = AdjustmentReason::new(reason)
            .map_err(|violation| errors.push(violation))
            .ok();

        match (kind, quantity, reason) {
            (Some(kind), Some(quantity), Some(reason)) if errors.is_empty() => Ok(Self {
                kind,
                quantity,
                reason,
            }),
            _ => Err(errors),
        }
    }

    /// Quick one-step adjustment with a generated reason.
    pub fn quick(kind: AdjustmentType) -> Self {
        Self {
            kind,
            quantity: QUICK_ADJUST_STEP,
            reason: AdjustmentReason::quick(kind, QUICK_ADJUST_STEP),
        }
    }

    /// Preview this request against a stock level.
    pub fn preview(&self, current_stock: u32) -> StockPreview {
        StockPreview::compute(current_stock, self.kind, self.quantity.get())
    }
}

/// Append-only audit record of a stock change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    /// Store-assigned identity.
    pub id: RecordId,
    /// Adjusted product.
    pub product_id: RecordId,
    /// Direction of the effective change.
    #[serde(rename = "type")]
    pub kind: AdjustmentType,
    /// Magnitude of the effective change; always positive.
    pub quantity: u32,
    /// Why the stock changed.
    pub reason: String,
    /// When the change was made.
    pub timestamp: DateTime<Utc>,
}

impl StockAdjustment {
    /// Build a stored adjustment from its draft and assigned identity.
    pub fn from_draft(id: RecordId, draft: StockAdjustmentDraft) -> Self {
        let StockAdjustmentDraft {
            product_id,
            kind,
            quantity,
            reason,
            timestamp,
            ..
        } = draft;
        Self {
            id,
            product_id,
            kind,
            quantity,
            reason,
            timestamp,
        }
    }

    /// Signed change this record describes.
    pub fn signed_quantity(&self) -> i64 {
        match self.kind {
            AdjustmentType::Increase => i64::from(self.quantity),
            AdjustmentType::Decrease => -i64::from(self.quantity),
        }
    }
}

impl StoredRecord for StockAdjustment {
    const ENTITY: &'static str = "stock adjustment";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Fields supplied when recording an adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentDraft {
    /// Adjusted product.
    pub product_id: RecordId,
    /// Name of the adjusted product, used to label the stored record.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub product_name: String,
    /// Direction.
    #[serde(rename = "type")]
    pub kind: AdjustmentType,
    /// Positive magnitude.
    pub quantity: u32,
    /// Reason text.
    pub reason: String,
    /// When the change was made.
    pub timestamp: DateTime<Utc>,
}

impl StockAdjustmentDraft {
    /// Describe the move of `product` from its current stock to `new_stock`.
    ///
    /// The direction is inferred by comparing the two levels and the quantity
    /// is their absolute difference. Returns `None` when nothing changed.
    pub fn for_transition(
        product: &Product,
        new_stock: u32,
        reason: &AdjustmentReason,
        timestamp: DateTime<Utc>,
    ) -> Option<Self> {
        let previous = product.current_stock;
        let kind = if new_stock > previous {
            AdjustmentType::Increase
        } else {
            AdjustmentType::Decrease
        };
        let quantity = new_stock.abs_diff(previous);
        (quantity > 0).then(|| Self {
            product_id: product.id,
            product_name: product.name.clone(),
            kind,
            quantity,
            reason: reason.as_str().to_owned(),
            timestamp,
        })
    }

    /// Label for the stored record.
    pub fn label(&self) -> String {
        if self.product_name.is_empty() {
            format!("Stock adjustment for product {}", self.product_id)
        } else {
            format!("Stock adjustment for {}", self.product_name)
        }
    }
}

/// Partial adjustment update; `None` leaves a field untouched.
///
/// Adjustments are append-only in normal operation; this exists for
/// administrative corrections of the reason text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustmentPatch {
    /// Replacement reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StockAdjustmentPatch {
    /// Merge the patch into `adjustment`.
    pub fn apply_to(self, adjustment: &mut StockAdjustment) {
        if let Some(reason) = self.reason {
            adjustment.reason = reason;
        }
    }
}
