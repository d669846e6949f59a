//! Recovering images lost to a destructive clean.
//!
//! The trick is generate-and-compare: destructively clean the backup to
//! reproduce what the legacy cleaner would have left behind, diff that
//! against the current document to isolate genuinely new conversation data,
//! then losslessly clean the backup and merge the new data on top. Each
//! half ([`diff`], [`merge`]) is a pure function composed by the caller.

pub mod delta;
pub mod merge;

pub use delta::diff;
pub use merge::merge;
