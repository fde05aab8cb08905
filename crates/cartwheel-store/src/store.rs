//! The cart store: a locally persisted cart reconciled against the
//! server-authoritative cart.
//!
//! Every mutation follows the same shape: capture the pre-mutation snapshot,
//! apply the change optimistically and persist it, then await the remote
//! call. Acceptance triggers a re-sync from the authoritative cart;
//! rejection or transport failure rolls back to exactly the captured
//! snapshot. Operations are assumed to be invoked sequentially (UI-driven);
//! nothing here issues concurrent remote calls.

use cartwheel_core::line::{CartLine, LineOption, Product};
use cartwheel_core::{normalize_cart, query, response};
use cartwheel_remote::types::AddItemRequest;
use rust_decimal::Decimal;

use crate::backend::CartBackend;
use crate::notify::{NopNotifier, Notice, Notifier};
use crate::outcome::{AddOutcome, MutationOutcome, PendingAdd, StoreConflict};
use crate::storage::SnapshotStorage;

/// Captured pre-mutation snapshot. Dropping it commits the mutation;
/// passing it to [`CartStore::rollback`] restores it.
struct Txn {
    prior: Vec<CartLine>,
}

/// Owner of the canonical cart snapshot.
///
/// Consumers read derived views ([`CartStore::lines`], totals, groupings)
/// and route every change through the mutation operations; lines are never
/// mutated in place by callers.
pub struct CartStore<B: CartBackend, S: SnapshotStorage> {
    backend: B,
    storage: S,
    notifier: Box<dyn Notifier>,
    lines: Vec<CartLine>,
    hydrated: bool,
}

impl<B: CartBackend, S: SnapshotStorage> CartStore<B, S> {
    pub fn new(backend: B, storage: S) -> Self {
        Self::with_notifier(backend, storage, Box::new(NopNotifier))
    }

    pub fn with_notifier(backend: B, storage: S, notifier: Box<dyn Notifier>) -> Self {
        Self {
            backend,
            storage,
            notifier,
            lines: Vec::new(),
            hydrated: false,
        }
    }

    /// Current snapshot, in display order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Loads the initial snapshot, once per store instance.
    ///
    /// Prefers the durable local snapshot; when that is absent or empty,
    /// falls back to a one-time fetch of the remote cart. Repeated calls are
    /// no-ops regardless of what the first call found, so a re-mounting UI
    /// tree cannot double-hydrate.
    pub async fn hydrate(&mut self) {
        if self.hydrated {
            tracing::debug!("cart already hydrated; skipping");
            return;
        }
        self.hydrated = true;

        if let Some(saved) = self.storage.load() {
            if !saved.is_empty() {
                tracing::debug!(lines = saved.len(), "hydrated cart from local snapshot");
                self.lines = saved;
                return;
            }
        }

        match self.backend.fetch_cart().await {
            Ok(payload) => {
                let lines = normalize_cart(&payload);
                if !lines.is_empty() {
                    tracing::debug!(lines = lines.len(), "hydrated cart from remote");
                    self.install(lines);
                }
            }
            Err(err) => {
                // Hydration failure must not fail the application; start empty.
                tracing::debug!(error = %err, "remote hydration failed; starting with empty cart");
            }
        }
    }

    /// Adds `quantity` of a product to the cart.
    ///
    /// A line with the same `(product.id, store_id, option)` identity is
    /// incremented in place; otherwise a new line is appended. The change is
    /// applied optimistically before the remote call and rolled back if the
    /// remote rejects it or the call fails. Acceptance triggers a full
    /// re-sync from the authoritative cart (which also picks up the
    /// remote-assigned line key).
    ///
    /// A single-store conflict surfaces as [`AddOutcome::NeedsDecision`];
    /// resume with [`CartStore::resolve_conflict`].
    pub async fn add_line(
        &mut self,
        product: Product,
        store_id: &str,
        quantity: u32,
        option: Option<LineOption>,
    ) -> AddOutcome {
        let quantity = quantity.max(1);
        let txn = self.begin();
        self.apply_add(&product, store_id, quantity, option);

        let request = add_request(&product, store_id, quantity, option);
        match self.backend.add_item(&request).await {
            Ok(resp) if response::is_success(&resp) => {
                self.resync().await;
                self.notifier.notify(Notice::ItemAdded {
                    product_id: product.id,
                });
                AddOutcome::Completed
            }
            Ok(resp) => {
                self.rollback(txn);
                let message = response::error_message(&resp);
                if response::is_store_conflict(&message) {
                    self.notifier.notify(Notice::ConflictDetected {
                        message: message.clone(),
                    });
                    AddOutcome::NeedsDecision(StoreConflict {
                        message,
                        pending: PendingAdd {
                            product,
                            store_id: store_id.to_owned(),
                            quantity,
                            option,
                        },
                    })
                } else {
                    self.notifier.notify(Notice::Rejected {
                        message: message.clone(),
                    });
                    AddOutcome::Failed { message }
                }
            }
            Err(err) => {
                self.rollback(txn);
                let message = err.to_string();
                self.notifier.notify(Notice::NetworkFailure {
                    message: message.clone(),
                });
                AddOutcome::Failed { message }
            }
        }
    }

    /// Phase 2 of the conflict flow: applies the user's decision to a
    /// [`StoreConflict`] returned by [`CartStore::add_line`].
    ///
    /// Declining leaves the cart unchanged and reports
    /// [`AddOutcome::Cancelled`]. Confirming empties the remote and local
    /// cart and retries the suspended add exactly once; on success the
    /// snapshot is exactly the single new line.
    pub async fn resolve_conflict(
        &mut self,
        conflict: StoreConflict,
        replace_cart: bool,
    ) -> AddOutcome {
        if !replace_cart {
            return AddOutcome::Cancelled;
        }

        if let Err(err) = self.backend.empty_cart().await {
            tracing::warn!(error = %err, "remote clear before conflict retry failed");
        }
        self.install(Vec::new());

        let PendingAdd {
            product,
            store_id,
            quantity,
            option,
        } = conflict.pending;
        let request = add_request(&product, &store_id, quantity, option);
        match self.backend.add_item(&request).await {
            Ok(resp) if response::is_success(&resp) => {
                let product_id = product.id;
                self.install(vec![CartLine {
                    product,
                    store_id,
                    quantity,
                    option,
                    key: None,
                }]);
                self.notifier.notify(Notice::ItemAdded { product_id });
                AddOutcome::Completed
            }
            Ok(resp) => {
                let message = response::error_message(&resp);
                self.notifier.notify(Notice::Rejected {
                    message: message.clone(),
                });
                AddOutcome::Failed { message }
            }
            Err(err) => {
                let message = err.to_string();
                self.notifier.notify(Notice::NetworkFailure {
                    message: message.clone(),
                });
                AddOutcome::Failed { message }
            }
        }
    }

    /// Removes the line matching `(product_id, store_id, option)`.
    ///
    /// The remote call uses the line's remote key, falling back to the
    /// product ID when no key is known (the remote may hold a line this
    /// session never saw confirmed).
    pub async fn remove_line(
        &mut self,
        product_id: i64,
        store_id: &str,
        option: Option<&LineOption>,
    ) -> MutationOutcome {
        let key = self
            .lines
            .iter()
            .find(|l| l.matches(product_id, store_id, option))
            .and_then(|l| l.key.clone())
            .unwrap_or_else(|| product_id.to_string());

        let txn = self.begin();
        self.lines
            .retain(|l| !l.matches(product_id, store_id, option));
        self.persist();

        match self.backend.remove_item(&key).await {
            Ok(resp) if response::is_success(&resp) => {
                self.notifier.notify(Notice::ItemRemoved { product_id });
                MutationOutcome::Completed
            }
            Ok(resp) => {
                self.rollback(txn);
                let message = response::error_message(&resp);
                self.notifier.notify(Notice::Rejected {
                    message: message.clone(),
                });
                MutationOutcome::Failed { message }
            }
            Err(err) => {
                self.rollback(txn);
                let message = err.to_string();
                self.notifier.notify(Notice::NetworkFailure {
                    message: message.clone(),
                });
                MutationOutcome::Failed { message }
            }
        }
    }

    /// Replaces the quantity of the line matching
    /// `(product_id, store_id, option)`.
    ///
    /// A requested quantity of zero or less removes the line instead. When
    /// the remote response carries the updated item list, the snapshot is
    /// re-normalized from it.
    pub async fn update_quantity(
        &mut self,
        product_id: i64,
        store_id: &str,
        quantity: i64,
        option: Option<&LineOption>,
    ) -> MutationOutcome {
        if quantity <= 0 {
            return self.remove_line(product_id, store_id, option).await;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        let Some(idx) = self
            .lines
            .iter()
            .position(|l| l.matches(product_id, store_id, option))
        else {
            return MutationOutcome::Failed {
                message: "item not in cart".to_owned(),
            };
        };
        let key = self.lines[idx]
            .key
            .clone()
            .unwrap_or_else(|| product_id.to_string());

        let txn = self.begin();
        self.lines[idx].quantity = quantity;
        self.persist();

        match self.backend.update_item(&key, quantity).await {
            Ok(resp) if response::is_success(&resp) => {
                let confirmed = normalize_cart(&resp);
                if !confirmed.is_empty() {
                    self.install(confirmed);
                }
                self.notifier.notify(Notice::QuantityUpdated {
                    product_id,
                    quantity,
                });
                MutationOutcome::Completed
            }
            Ok(resp) => {
                self.rollback(txn);
                let message = response::error_message(&resp);
                self.notifier.notify(Notice::Rejected {
                    message: message.clone(),
                });
                MutationOutcome::Failed { message }
            }
            Err(err) => {
                self.rollback(txn);
                let message = err.to_string();
                self.notifier.notify(Notice::NetworkFailure {
                    message: message.clone(),
                });
                MutationOutcome::Failed { message }
            }
        }
    }

    /// Empties the cart.
    ///
    /// The local snapshot is emptied unconditionally: after an explicit
    /// clear the cart must never retain items, even when the remote call
    /// fails. The return value is only the advisory server acknowledgement.
    pub async fn clear_cart(&mut self) -> bool {
        let acknowledged = match self.backend.empty_cart().await {
            Ok(resp) => response::is_success(&resp),
            Err(err) => {
                tracing::warn!(error = %err, "remote cart clear failed; clearing locally anyway");
                false
            }
        };
        self.install(Vec::new());
        self.notifier.notify(Notice::CartCleared {
            server_acknowledged: acknowledged,
        });
        acknowledged
    }

    // Derived read queries. Pure views over the current snapshot.

    #[must_use]
    pub fn total(&self) -> Decimal {
        query::total(&self.lines)
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        query::item_count(&self.lines)
    }

    #[must_use]
    pub fn lines_by_store(&self) -> Vec<(&str, Vec<&CartLine>)> {
        query::lines_by_store(&self.lines)
    }

    #[must_use]
    pub fn store_item_count(&self, store_id: &str) -> u64 {
        query::store_item_count(&self.lines, store_id)
    }

    #[must_use]
    pub fn quantity_for(&self, product_id: i64, store_id: &str) -> u32 {
        query::quantity_for(&self.lines, product_id, store_id)
    }

    // Internals.

    fn begin(&self) -> Txn {
        Txn {
            prior: self.lines.clone(),
        }
    }

    fn rollback(&mut self, txn: Txn) {
        self.lines = txn.prior;
        self.persist();
    }

    fn install(&mut self, lines: Vec<CartLine>) {
        self.lines = lines;
        self.persist();
    }

    fn persist(&mut self) {
        self.storage.save(&self.lines);
    }

    fn apply_add(
        &mut self,
        product: &Product,
        store_id: &str,
        quantity: u32,
        option: Option<LineOption>,
    ) {
        match self
            .lines
            .iter_mut()
            .find(|l| l.matches(product.id, store_id, option.as_ref()))
        {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine {
                product: product.clone(),
                store_id: store_id.to_owned(),
                quantity,
                option,
                key: None,
            }),
        }
        self.persist();
    }

    /// Replaces the snapshot with the freshly normalized remote cart.
    ///
    /// A failed fetch, or a payload that normalizes to nothing, keeps the
    /// optimistic snapshot; re-sync never downgrades a successful mutation
    /// into a lost cart.
    async fn resync(&mut self) {
        match self.backend.fetch_cart().await {
            Ok(payload) => {
                let confirmed = normalize_cart(&payload);
                if !confirmed.is_empty() {
                    self.install(confirmed);
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "cart re-sync failed; keeping optimistic snapshot");
            }
        }
    }
}

fn add_request(
    product: &Product,
    store_id: &str,
    quantity: u32,
    option: Option<LineOption>,
) -> AddItemRequest {
    let opts: Vec<LineOption> = option.into_iter().collect();
    AddItemRequest::new(product.id, store_id, quantity, &opts)
}
