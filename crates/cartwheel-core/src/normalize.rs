//! Normalization of dynamic remote cart payloads into [`CartLine`]s.
//!
//! The remote service is not consistent about field names: the cart may
//! arrive under `data.products`, `data.items`, or as a bare array; product
//! fields may be nested under a `product` object or flattened; prices may be
//! raw numbers or currency-formatted strings. Every resolver below has an
//! explicit precedence order and a safe default so an unexpected shape
//! degrades to a smaller (possibly empty) cart instead of an error. Lines
//! whose product ID cannot be resolved at all are skipped.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::line::{CartLine, LineOption, Product};

/// Image used when the payload carries no usable image field.
const FALLBACK_IMAGE: &str = "/no-image.png";

/// Normalizes a full get-cart payload into cart lines.
///
/// Unwraps a `data` envelope if present, then looks for the line container
/// as `products`, then `items`, then a bare array, in that order.
#[must_use]
pub fn normalize_cart(payload: &Value) -> Vec<CartLine> {
    raw_lines(payload)
        .into_iter()
        .filter_map(normalize_line)
        .collect()
}

/// Extracts the raw line array from a cart payload, or an empty slice-alike
/// when no recognizable container exists.
fn raw_lines(payload: &Value) -> Vec<&Value> {
    let body = payload.get("data").unwrap_or(payload);
    let container = body
        .get("products")
        .and_then(Value::as_array)
        .or_else(|| body.get("items").and_then(Value::as_array))
        .or_else(|| body.as_array());
    container.map(|arr| arr.iter().collect()).unwrap_or_default()
}

/// Normalizes one raw server line into a [`CartLine`].
///
/// Returns `None` when no product ID can be resolved; every other field has
/// a default.
#[must_use]
pub fn normalize_line(raw: &Value) -> Option<CartLine> {
    let nested = raw.get("product").filter(|v| v.is_object());

    let product_id = nested
        .and_then(|p| p.get("id"))
        .and_then(as_i64)
        .or_else(|| raw.get("product_id").and_then(as_i64))
        .or_else(|| raw.get("productId").and_then(as_i64))?;

    let name = first_string(nested, raw, &["name", "title", "product_name"]).unwrap_or_default();
    let price = first_decimal(nested, raw, &["price"]).unwrap_or(Decimal::ZERO);

    let image = raw
        .get("thumb")
        .and_then(as_string)
        .or_else(|| raw.get("image").and_then(as_string))
        .or_else(|| nested.and_then(|p| p.get("image")).and_then(as_string))
        .or_else(|| nested.and_then(|p| p.get("thumb")).and_then(as_string))
        .unwrap_or_else(|| FALLBACK_IMAGE.to_owned());

    let has_discount = first_value(nested, raw, &["hasDiscount", "has_discount"])
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let special_price = first_decimal(nested, raw, &["specialPrice", "special_price"]);
    let original_price = first_decimal(nested, raw, &["originalPrice", "original_price"]);

    let quantity = resolve_quantity(raw);
    let option = resolve_option(raw);
    let store_id = resolve_store_id(raw);
    let key = raw
        .get("key")
        .and_then(as_string)
        .or_else(|| raw.get("cart_id").and_then(as_string));

    Some(CartLine {
        product: Product {
            id: product_id,
            name,
            price,
            image,
            has_discount,
            special_price,
            original_price,
        },
        store_id,
        quantity,
        option,
        key,
    })
}

/// Parses a currency-formatted price string, e.g. `"$1,234.50"` → `1234.50`.
///
/// Strips everything except digits, the decimal point, and a leading minus.
#[must_use]
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Quantity from `quantity`/`qty`/`count`, defaulting to 1 and coercing
/// anything that is not a valid positive number to 1.
fn resolve_quantity(raw: &Value) -> u32 {
    ["quantity", "qty", "count"]
        .iter()
        .find_map(|k| raw.get(*k))
        .and_then(as_i64)
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q >= 1)
        .unwrap_or(1)
}

/// Option selection from the `option`/`options` field.
///
/// Accepts either an array of option objects (first entry with both ID
/// fields wins) or a single-key mapping of option ID to value ID.
fn resolve_option(raw: &Value) -> Option<LineOption> {
    let field = raw.get("option").or_else(|| raw.get("options"))?;
    match field {
        Value::Array(entries) => entries.iter().find_map(|entry| {
            let option_id = entry.get("product_option_id").and_then(as_i64)?;
            let value_id = entry.get("product_option_value_id").and_then(as_i64)?;
            Some(LineOption { option_id, value_id })
        }),
        Value::Object(map) => map.iter().find_map(|(k, v)| {
            let option_id = k.trim().parse().ok()?;
            let value_id = as_i64(v)?;
            Some(LineOption { option_id, value_id })
        }),
        _ => None,
    }
}

/// Store ID from `store_id`/`storeId`, stringified, defaulting to `"1"`.
fn resolve_store_id(raw: &Value) -> String {
    raw.get("store_id")
        .or_else(|| raw.get("storeId"))
        .and_then(as_string)
        .unwrap_or_else(|| "1".to_owned())
}

/// Integer from a JSON number or a numeric string.
fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// String from a JSON string or number (numbers are stringified, which is
/// how numeric line keys and store IDs are carried).
fn as_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decimal from a raw JSON number or a currency-formatted string.
fn as_decimal(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => parse_money(s),
        _ => None,
    }
}

/// First non-null value for any of `keys`, preferring the nested product
/// object over the flat line fields.
fn first_value<'a>(nested: Option<&'a Value>, raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    nested
        .iter()
        .copied()
        .chain(std::iter::once(raw))
        .flat_map(|obj| keys.iter().filter_map(move |k| obj.get(*k)))
        .find(|v| !v.is_null())
}

fn first_string(nested: Option<&Value>, raw: &Value, keys: &[&str]) -> Option<String> {
    nested
        .iter()
        .copied()
        .chain(std::iter::once(raw))
        .flat_map(|obj| keys.iter().filter_map(move |k| obj.get(*k)))
        .find_map(as_string)
}

fn first_decimal(nested: Option<&Value>, raw: &Value, keys: &[&str]) -> Option<Decimal> {
    nested
        .iter()
        .copied()
        .chain(std::iter::once(raw))
        .flat_map(|obj| keys.iter().filter_map(move |k| obj.get(*k)))
        .find_map(as_decimal)
}
