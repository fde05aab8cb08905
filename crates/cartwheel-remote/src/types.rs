//! Request bodies for the remote cart service.
//!
//! The add endpoint expects variant selections flattened into a mapping of
//! `product_option_id → product_option_value_id` (stringified keys, numeric
//! values), not the option structs the cart carries internally.

use cartwheel_core::LineOption;
use serde::Serialize;
use serde_json::{Map, Value};

/// Body for the add-to-cart operation.
#[derive(Debug, Clone, Serialize)]
pub struct AddItemRequest {
    pub product_id: i64,
    pub quantity: u32,
    pub store_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option: Option<Map<String, Value>>,
}

impl AddItemRequest {
    /// Builds an add request, flattening the option selections into the wire
    /// mapping. Supports any number of option structs; the cart itself only
    /// ever sends zero or one.
    #[must_use]
    pub fn new(product_id: i64, store_id: &str, quantity: u32, options: &[LineOption]) -> Self {
        Self {
            product_id,
            quantity,
            store_id: store_id.to_owned(),
            option: flatten_options(options),
        }
    }
}

/// Body for the update-cart-line operation.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateItemRequest {
    pub key: String,
    pub quantity: u32,
}

/// Body for the remove-from-cart operation. `key` is the remote line key,
/// falling back to the product ID when the key is unknown.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveItemRequest {
    pub key: String,
}

fn flatten_options(options: &[LineOption]) -> Option<Map<String, Value>> {
    if options.is_empty() {
        return None;
    }
    let mut map = Map::new();
    for opt in options {
        map.insert(opt.option_id.to_string(), Value::from(opt.value_id));
    }
    Some(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_request_without_option_omits_field() {
        let req = AddItemRequest::new(42, "3", 2, &[]);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body,
            json!({ "product_id": 42, "quantity": 2, "store_id": "3" })
        );
    }

    #[test]
    fn add_request_flattens_single_option() {
        let req = AddItemRequest::new(
            42,
            "3",
            1,
            &[LineOption {
                option_id: 9,
                value_id: 33,
            }],
        );
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["option"], json!({ "9": 33 }));
    }

    #[test]
    fn add_request_flattens_multiple_options() {
        let req = AddItemRequest::new(
            1,
            "1",
            1,
            &[
                LineOption {
                    option_id: 9,
                    value_id: 33,
                },
                LineOption {
                    option_id: 10,
                    value_id: 7,
                },
            ],
        );
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["option"], json!({ "9": 33, "10": 7 }));
    }
}
