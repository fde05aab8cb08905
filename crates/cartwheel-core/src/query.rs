//! Derived read queries over a cart snapshot.
//!
//! Pure functions with no side effects; the store delegates to these so the
//! arithmetic is testable against plain line vectors.

use rust_decimal::Decimal;

use crate::line::CartLine;

/// Cart total: sum of `effective_price × quantity` over all lines.
#[must_use]
pub fn total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}

/// Total number of items (sum of quantities).
#[must_use]
pub fn item_count(lines: &[CartLine]) -> u64 {
    lines.iter().map(|l| u64::from(l.quantity)).sum()
}

/// Groups lines by store, preserving first-encounter order of stores and
/// original order of lines within each group.
#[must_use]
pub fn lines_by_store(lines: &[CartLine]) -> Vec<(&str, Vec<&CartLine>)> {
    let mut groups: Vec<(&str, Vec<&CartLine>)> = Vec::new();
    for line in lines {
        match groups.iter_mut().find(|(id, _)| *id == line.store_id) {
            Some((_, group)) => group.push(line),
            None => groups.push((line.store_id.as_str(), vec![line])),
        }
    }
    groups
}

/// Sum of quantities for the given store.
#[must_use]
pub fn store_item_count(lines: &[CartLine], store_id: &str) -> u64 {
    lines
        .iter()
        .filter(|l| l.store_id == store_id)
        .map(|l| u64::from(l.quantity))
        .sum()
}

/// Quantity of the first line matching `(product_id, store_id)`, or 0.
#[must_use]
pub fn quantity_for(lines: &[CartLine], product_id: i64, store_id: &str) -> u32 {
    lines
        .iter()
        .find(|l| l.product.id == product_id && l.store_id == store_id)
        .map_or(0, |l| l.quantity)
}
