//! Job board records and their referential integrity rules.
//!
//! # Responsibility
//! - Give each entity a typed record with closed enumerations.
//! - Check row-level references (`parentID`, `postedByID`, `jobID`, `userID`).
//!
//! # Invariants
//! - Enumerated wire values are validated when a record is constructed.
//! - Deleting a referenced record is refused; nothing cascades.

pub mod integrity;
pub mod types;
