//! Validator-set validation: structural checks on exported records.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::validator::ValidatorRecord;

/// Check the per-record invariants every exported validator must satisfy:
/// a non-empty address and non-negative power.
///
/// `index` is the record's position in its set, used for error reporting.
pub fn validate_validator_record(
    index: usize,
    record: &ValidatorRecord,
) -> Result<(), ValidationError> {
    if record.address.is_empty() {
        return Err(ValidationError::EmptyAddress(index));
    }

    if record.power < 0 {
        return Err(ValidationError::NegativePower {
            address: record.address.clone(),
            power: record.power,
        });
    }

    Ok(())
}

/// Validate a set of validator records.
///
/// This performs:
/// - Per-record checks ([`validate_validator_record`])
/// - Address uniqueness
/// - Total power overflow check
///
/// An empty slice is valid here; whether an empty set is acceptable is the
/// caller's decision.
pub fn validate_validator_records(records: &[ValidatorRecord]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut total: i64 = 0;

    for (i, record) in records.iter().enumerate() {
        validate_validator_record(i, record)?;

        // Address identifies exactly one validator
        if !seen.insert(&record.address) {
            return Err(ValidationError::DuplicateAddress(record.address.clone()));
        }

        total = total
            .checked_add(record.power)
            .ok_or(ValidationError::PowerOverflow)?;
    }

    Ok(())
}
