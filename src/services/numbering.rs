//! Sequential document/receipt numbering.
//!
//! Two counters exist: one per doctor (`doctors.receipt_serial`, stamped onto
//! appointments as `doc_no`) and one clinic-wide
//! (`clinic_settings.receipt_serial`, stamped onto payments as the receipt
//! number). Counters are monotone and issued values are never reused; only
//! the explicit reset operations set them back to 0.
//!
//! Allocation is a read-modify-write and must not race against itself for
//! the same owner, so the allocate functions only accept a
//! `DatabaseTransaction` and take an exclusive row lock. Callers allocate
//! inside the same transaction that inserts the record carrying the number.

use std::collections::HashSet;

use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QuerySelect, Set};

use crate::errors::internal::{InternalError, NumberingError};
use crate::types::db::{clinic_setting, doctor};

/// Primary key of the clinic settings singleton row
pub const CLINIC_SETTINGS_ID: i32 = 1;

/// Allocate the next document number for a doctor.
///
/// Returns the post-increment serial. A missing doctor row is an error;
/// callers must not substitute a default serial.
pub async fn allocate_doctor_serial(
    txn: &DatabaseTransaction,
    doctor_id: &str,
) -> Result<i64, InternalError> {
    let doc = doctor::Entity::find_by_id(doctor_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| InternalError::database("allocate_doctor_serial", e))?
        .ok_or_else(|| NumberingError::entity_unavailable(format!("doctor {}", doctor_id)))?;

    let next = doc.receipt_serial + 1;
    let mut active: doctor::ActiveModel = doc.into();
    active.receipt_serial = Set(next);
    active
        .update(txn)
        .await
        .map_err(|e| InternalError::database("allocate_doctor_serial", e))?;

    Ok(next)
}

/// Allocate the next clinic-wide receipt serial from the settings singleton.
pub async fn allocate_clinic_serial(txn: &DatabaseTransaction) -> Result<i64, InternalError> {
    let setting = clinic_setting::Entity::find_by_id(CLINIC_SETTINGS_ID)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(|e| InternalError::database("allocate_clinic_serial", e))?
        .ok_or_else(|| NumberingError::entity_unavailable("clinic settings"))?;

    let next = setting.receipt_serial + 1;
    let mut active: clinic_setting::ActiveModel = setting.into();
    active.receipt_serial = Set(next);
    active
        .update(txn)
        .await
        .map_err(|e| InternalError::database("allocate_clinic_serial", e))?;

    Ok(next)
}

/// Reset a doctor's document counter to 0. Administrative operation.
pub async fn reset_doctor_serial<C: ConnectionTrait>(
    conn: &C,
    doctor_id: &str,
) -> Result<(), InternalError> {
    let doc = doctor::Entity::find_by_id(doctor_id)
        .one(conn)
        .await
        .map_err(|e| InternalError::database("reset_doctor_serial", e))?
        .ok_or_else(|| NumberingError::entity_unavailable(format!("doctor {}", doctor_id)))?;

    let mut active: doctor::ActiveModel = doc.into();
    active.receipt_serial = Set(0);
    active
        .update(conn)
        .await
        .map_err(|e| InternalError::database("reset_doctor_serial", e))?;

    Ok(())
}

/// Reset the clinic-wide receipt counter to 0. Administrative operation.
pub async fn reset_clinic_serial<C: ConnectionTrait>(conn: &C) -> Result<(), InternalError> {
    let setting = clinic_setting::Entity::find_by_id(CLINIC_SETTINGS_ID)
        .one(conn)
        .await
        .map_err(|e| InternalError::database("reset_clinic_serial", e))?
        .ok_or_else(|| NumberingError::entity_unavailable("clinic settings"))?;

    let mut active: clinic_setting::ActiveModel = setting.into();
    active.receipt_serial = Set(0);
    active
        .update(conn)
        .await
        .map_err(|e| InternalError::database("reset_clinic_serial", e))?;

    Ok(())
}

/// Format a document/receipt code: prefix followed by the zero-padded serial.
///
/// Serials beyond 999 simply widen. Uniqueness of the formatted string holds
/// per owning entity between counter resets; prefixes themselves are assigned
/// uniquely by [`next_code_prefix`].
pub fn format_code(prefix: &str, serial: i64) -> String {
    format!("{}{:03}", prefix, serial)
}

/// Pick an unused receipt code prefix.
///
/// Prefers single letters A-Z, then falls back to letter+digit pairs
/// starting at digit 2 (A2, B2, ... Z2, A3, ...). Deterministic given the
/// used-set.
pub fn next_code_prefix(used: &HashSet<String>) -> String {
    for ch in 'A'..='Z' {
        let cand = ch.to_string();
        if !used.contains(&cand) {
            return cand;
        }
    }

    let mut n: u32 = 2;
    loop {
        for ch in 'A'..='Z' {
            let cand = format!("{}{}", ch, n);
            if !used.contains(&cand) {
                return cand;
            }
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_code_zero_pads_to_three_digits() {
        assert_eq!(format_code("A", 7), "A007");
        assert_eq!(format_code("B", 42), "B042");
        assert_eq!(format_code("C2", 3), "C2003");
    }

    #[test]
    fn test_format_code_widens_past_999() {
        assert_eq!(format_code("A", 1000), "A1000");
    }

    #[test]
    fn test_format_code_is_deterministic() {
        assert_eq!(format_code("A", 7), format_code("A", 7));
    }

    #[test]
    fn test_next_code_prefix_picks_first_free_letter() {
        let used: HashSet<String> = ["A", "B"].iter().map(|s| s.to_string()).collect();
        assert_eq!(next_code_prefix(&used), "C");
    }

    #[test]
    fn test_next_code_prefix_skips_gaps() {
        let used: HashSet<String> = ["A", "C"].iter().map(|s| s.to_string()).collect();
        assert_eq!(next_code_prefix(&used), "B");
    }

    #[test]
    fn test_next_code_prefix_falls_back_to_letter_digit() {
        let used: HashSet<String> = ('A'..='Z').map(|c| c.to_string()).collect();
        assert_eq!(next_code_prefix(&used), "A2");
    }

    #[test]
    fn test_next_code_prefix_iterates_digits_upward() {
        let mut used: HashSet<String> = ('A'..='Z').map(|c| c.to_string()).collect();
        for ch in 'A'..='Z' {
            used.insert(format!("{}2", ch));
        }
        assert_eq!(next_code_prefix(&used), "A3");
    }

    #[test]
    fn test_next_code_prefix_empty_set() {
        assert_eq!(next_code_prefix(&HashSet::new()), "A");
    }
}
