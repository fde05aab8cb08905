//! Mutation outcome types.
//!
//! Mutations never return `Err` for business failures: every operation
//! catches its own transport and rejection cases and reports a uniform
//! outcome, so callers react with a `match` instead of error handling.

use cartwheel_core::{LineOption, Product};

/// Outcome of an add operation, including the two-phase conflict flow.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The remote accepted the add; the snapshot reflects it.
    Completed,
    /// The add was rejected or the call failed; the snapshot was rolled
    /// back (or, after a confirmed conflict retry, left empty).
    Failed { message: String },
    /// The single-store-per-cart rule fired. The snapshot was rolled back;
    /// pass the conflict to [`crate::CartStore::resolve_conflict`] with the
    /// user's decision to continue.
    NeedsDecision(StoreConflict),
    /// The user declined to replace the existing cart. Not an error; the
    /// cart is unchanged.
    Cancelled,
}

/// Outcome of a remove or update operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Completed,
    Failed { message: String },
}

/// A detected single-store conflict, carrying everything needed to retry
/// the add once the user decides. The store keeps no hidden pending state;
/// this value is the only handle to the suspended operation.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConflict {
    pub message: String,
    pub(crate) pending: PendingAdd,
}

/// The add parameters suspended by a store conflict.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PendingAdd {
    pub(crate) product: Product,
    pub(crate) store_id: String,
    pub(crate) quantity: u32,
    pub(crate) option: Option<LineOption>,
}
