//! Tests for the domain error payload.

use super::*;
use crate::domain::{FieldViolation, FormField};
use rstest::{fixture, rstest};

#[fixture]
fn validation_errors() -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.push(FieldViolation::Required {
        field: FormField::Name,
    });
    errors.push(FieldViolation::Negative {
        field: FormField::CurrentStock,
    });
    errors
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::NotFound, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_a_generic_message_for_blank_input() {
    let err = Error::new(ErrorCode::Conflict, "");
    assert_eq!(err.message(), "record changed concurrently");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
fn validation_failed_lists_every_field(validation_errors: ValidationErrors) {
    let err = Error::validation_failed(&validation_errors);

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    let details = err.details().expect("details");
    assert_eq!(details["fieldErrors"]["name"], "name is required");
    assert_eq!(
        details["fieldErrors"]["currentStock"],
        "currentStock cannot be negative"
    );
}

#[rstest]
fn serialises_with_snake_case_code() {
    let err = Error::remote_failure("SKU: already exists");
    let value = serde_json::to_value(&err).expect("serialise");
    assert_eq!(value["code"], "remote_failure");
    assert_eq!(value["message"], "SKU: already exists");
    assert!(value.get("details").is_none());
}

#[rstest]
fn deserialisation_rejects_blank_messages() {
    let payload = serde_json::json!({ "code": "not_found", "message": " " });
    let result: Result<Error, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}

#[rstest]
fn display_uses_the_message() {
    let err = Error::internal("boom").with_details(serde_json::json!({ "step": 2 }));
    assert_eq!(err.to_string(), "boom");
}
