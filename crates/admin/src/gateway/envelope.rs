//! Response envelope normalization.
//!
//! The backend is inconsistent about nesting. List endpoints answer with any
//! of:
//!
//! ```text
//! { "success": true, "data": { "data": [..], "meta": {..} } }
//! { "success": true, "data": [..], "meta": {..} }
//! [..]
//! ```
//!
//! and single-entity endpoints with either `{ "data": entity }` or the bare
//! entity. `"success": false` is a rejection regardless of HTTP status.

use serde::de::DeserializeOwned;
use serde_json::Value;
use vendor_desk_core::listing::PageMeta;

use super::GatewayError;

/// One page of entities, with pagination metadata when the backend sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub meta: Option<PageMeta>,
}

impl<T> Listing<T> {
    /// Whether a later page exists according to the metadata.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.meta.is_some_and(|meta| meta.page < meta.total_pages)
    }
}

/// Server-provided message from an error envelope.
pub(crate) fn envelope_message(body: &Value) -> Option<String> {
    let field = body.get("message").or_else(|| body.get("error"))?;
    match field {
        Value::String(message) => Some(message.clone()),
        Value::Object(_) => field
            .get("message")
            .and_then(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}

/// Fail with [`GatewayError::Rejected`] on a `success: false` envelope.
pub(crate) fn ensure_success(body: &Value) -> Result<(), GatewayError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message =
            envelope_message(body).unwrap_or_else(|| "request was rejected".to_string());
        return Err(GatewayError::Rejected(message));
    }
    Ok(())
}

/// Unwrap a list response in any of the accepted shapes.
pub(crate) fn list<T: DeserializeOwned>(body: Value) -> Result<Listing<T>, GatewayError> {
    ensure_success(&body)?;

    let (items, meta) = match body {
        Value::Array(items) => (items, None),
        Value::Object(mut outer) => match outer.remove("data") {
            Some(Value::Array(items)) => (items, outer.remove("meta")),
            Some(Value::Object(mut inner)) => match inner.remove("data") {
                Some(Value::Array(items)) => {
                    (items, inner.remove("meta").or_else(|| outer.remove("meta")))
                }
                Some(Value::Null) | None => (vec![], None),
                Some(_) => return Err(shape_error("data.data is not a list")),
            },
            Some(Value::Null) => (vec![], None),
            Some(_) => return Err(shape_error("data is not a list")),
            None => return Err(shape_error("no data field")),
        },
        _ => return Err(shape_error("expected an object or a list")),
    };

    let items = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| GatewayError::Decode(e.to_string()))?;
    let meta = meta
        .filter(|m| !m.is_null())
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| GatewayError::Decode(format!("meta: {e}")))?;

    Ok(Listing { items, meta })
}

/// Unwrap a single-entity response.
pub(crate) fn entity<T: DeserializeOwned>(body: Value) -> Result<T, GatewayError> {
    ensure_success(&body)?;

    let payload = match body {
        Value::Object(mut outer) if outer.contains_key("data") => match outer.remove("data") {
            Some(Value::Null) | None => return Err(shape_error("data is empty")),
            Some(data) => data,
        },
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// Check a response whose body carries nothing but the success flag.
///
/// Empty and non-JSON bodies count as success; the HTTP status was already
/// checked.
pub(crate) fn acknowledgement(text: &str) -> Result<(), GatewayError> {
    if text.trim().is_empty() {
        return Ok(());
    }
    serde_json::from_str::<Value>(text).map_or(Ok(()), |body| ensure_success(&body))
}

fn shape_error(detail: &str) -> GatewayError {
    GatewayError::Decode(format!("unexpected envelope: {detail}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        id: u32,
    }

    fn ids(listing: &Listing<Row>) -> Vec<u32> {
        listing.items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_list_double_nested() {
        let body = json!({
            "success": true,
            "data": {
                "data": [{"id": 1}, {"id": 2}],
                "meta": {"page": 1, "limit": 2, "totalPages": 3, "totalItems": 5}
            }
        });
        let listing: Listing<Row> = list(body).unwrap();
        assert_eq!(ids(&listing), vec![1, 2]);
        assert_eq!(listing.meta.unwrap().total_items, 5);
        assert!(listing.has_more());
    }

    #[test]
    fn test_list_single_nested() {
        let body = json!({"success": true, "data": [{"id": 7}]});
        let listing: Listing<Row> = list(body).unwrap();
        assert_eq!(ids(&listing), vec![7]);
        assert_eq!(listing.meta, None);
        assert!(!listing.has_more());
    }

    #[test]
    fn test_list_bare_array() {
        let listing: Listing<Row> = list(json!([{"id": 3}])).unwrap();
        assert_eq!(ids(&listing), vec![3]);
    }

    #[test]
    fn test_list_null_data_is_empty() {
        let listing: Listing<Row> = list(json!({"success": true, "data": null})).unwrap();
        assert!(listing.items.is_empty());
    }

    #[test]
    fn test_list_rejected() {
        let body = json!({"success": false, "message": "vendor suspended"});
        let err = list::<Row>(body).unwrap_err();
        assert_eq!(err, GatewayError::Rejected("vendor suspended".to_string()));
    }

    #[test]
    fn test_list_wrong_shape() {
        assert!(matches!(
            list::<Row>(json!({"data": "nope"})),
            Err(GatewayError::Decode(_))
        ));
        assert!(matches!(
            list::<Row>(json!("text")),
            Err(GatewayError::Decode(_))
        ));
    }

    #[test]
    fn test_entity_wrapped_and_bare() {
        let wrapped: Row = entity(json!({"success": true, "data": {"id": 9}})).unwrap();
        assert_eq!(wrapped, Row { id: 9 });

        let bare: Row = entity(json!({"id": 4})).unwrap();
        assert_eq!(bare, Row { id: 4 });
    }

    #[test]
    fn test_entity_rejected_with_nested_error() {
        let body = json!({"success": false, "error": {"message": "not yours"}});
        assert_eq!(
            entity::<Row>(body),
            Err(GatewayError::Rejected("not yours".to_string()))
        );
    }

    #[test]
    fn test_acknowledgement() {
        assert!(acknowledgement("").is_ok());
        assert!(acknowledgement("OK").is_ok());
        assert!(acknowledgement(r#"{"success": true}"#).is_ok());
        assert_eq!(
            acknowledgement(r#"{"success": false}"#),
            Err(GatewayError::Rejected("request was rejected".to_string()))
        );
    }
}
