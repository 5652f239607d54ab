//! Sessions come from a CSV export of a time tracking application.
//!  - Every row is one session: category, free text duration, start time and notes.
//!  - Only `Category`, `Duration`, `Start` and `Notes` columns are required, others are ignored.
//!  - A missing column or an unreadable start time aborts loading.

pub mod entities;
pub mod source;
