//! Domain types for the cart: products, option selections, and cart lines.
//!
//! A cart snapshot is an ordered `Vec<CartLine>`; insertion order is
//! irrelevant for totals but preserved for display stability. Store IDs are
//! modeled as strings throughout so that numeric/string mismatches coming
//! from the remote service never break comparisons.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Normalized product descriptor carried by a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Authoritative unit price unless a discount is active.
    pub price: Decimal,
    pub image: String,
    #[serde(default)]
    pub has_discount: bool,
    #[serde(default)]
    pub special_price: Option<Decimal>,
    #[serde(default)]
    pub original_price: Option<Decimal>,
}

impl Product {
    /// Unit price used for totals: the special price when a discount is
    /// active and a special price is present, the regular price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        if self.has_discount {
            if let Some(special) = self.special_price {
                return special;
            }
        }
        self.price
    }
}

/// A single variant selection (e.g. size or color) on a cart line.
///
/// Two lines with the same product and store but different options are
/// distinct lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineOption {
    pub option_id: i64,
    pub value_id: i64,
}

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    /// Seller/store this line belongs to. The remote service enforces that
    /// all lines in a non-empty cart share exactly one store.
    pub store_id: String,
    /// Always >= 1; a mutation requesting a lower quantity removes the line.
    pub quantity: u32,
    #[serde(default)]
    pub option: Option<LineOption>,
    /// Remote-assigned line key used for remove/update calls; `None` until
    /// the remote cart confirms the line.
    #[serde(default)]
    pub key: Option<String>,
}

impl CartLine {
    /// Line identity: `(product.id, store_id, option)` compared by value,
    /// with absent options equal to absent options.
    #[must_use]
    pub fn matches(&self, product_id: i64, store_id: &str, option: Option<&LineOption>) -> bool {
        self.product.id == product_id
            && self.store_id == store_id
            && self.option.as_ref() == option
    }

    /// Extended price for this line (`effective_price × quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price() * Decimal::from(self.quantity)
    }
}
