//! Advisory user-facing notification seam.
//!
//! The store announces outcomes (toast/alert material) through [`Notifier`];
//! the UI layer decides how to render them. Notices are advisory side
//! effects, never part of a mutation's return contract.

/// User-facing events emitted by the cart store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ItemAdded { product_id: i64 },
    ItemRemoved { product_id: i64 },
    QuantityUpdated { product_id: i64, quantity: u32 },
    CartCleared { server_acknowledged: bool },
    /// A mutation was rejected by the remote service.
    Rejected { message: String },
    /// The single-store-per-cart rule fired; the caller must decide whether
    /// to replace the existing cart.
    ConflictDetected { message: String },
    NetworkFailure { message: String },
}

/// Sink for [`Notice`]s. Dyn-safe so the store can hold any sink boxed.
pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Discards every notice; the default sink.
pub struct NopNotifier;

impl Notifier for NopNotifier {
    fn notify(&self, _notice: Notice) {}
}
