//! Normalization of raw backend rows into [`MenuItem`] values.
//!
//! The live source and the bundled fallback share one row shape:
//! `id, name, description, category, price, currency, is_available, image`,
//! where `price` may arrive as a JSON number or a numeric string.
//!
//! Policy: the whole batch aborts on the first invalid record. The original
//! frontend silently coerced bad prices through `parseFloat`, which can yield
//! a non-finite value; that is treated as a latent bug and not reproduced.

use chasha_core::MenuItem;
use serde_json::Value;

use crate::error::CatalogError;

/// Convert a raw JSON payload into normalized menu items.
///
/// Output length always equals input length; every output price is a finite
/// number >= 0.
///
/// # Errors
///
/// - [`CatalogError::MalformedInput`] when `raw` is not an array.
/// - [`CatalogError::InvalidRecord`] when any record is missing a required
///   field or its price does not parse to a finite non-negative number. The
///   first offending record aborts the batch.
pub fn normalize_items(raw: &Value) -> Result<Vec<MenuItem>, CatalogError> {
    let rows = raw.as_array().ok_or(CatalogError::MalformedInput)?;
    rows.iter().map(normalize_item).collect()
}

fn normalize_item(row: &Value) -> Result<MenuItem, CatalogError> {
    let id = require_string(row, "id")?;

    let item = MenuItem {
        name: require_field(row, &id, "name").and_then(|v| coerce_string(v, &id, "name"))?,
        description: require_field(row, &id, "description")
            .and_then(|v| coerce_string(v, &id, "description"))?,
        category: require_field(row, &id, "category")
            .and_then(|v| coerce_string(v, &id, "category"))?,
        price: require_field(row, &id, "price").and_then(|v| parse_price(v, &id))?,
        currency: require_field(row, &id, "currency")
            .and_then(|v| coerce_string(v, &id, "currency"))?,
        // Rows with no availability flag are treated as orderable.
        is_available: row.get("is_available").map_or(Ok(true), |v| {
            v.as_bool().ok_or_else(|| invalid(&id, "is_available is not a boolean"))
        })?,
        // Missing or null image means "use placeholder" at the presentation
        // boundary; pass an empty string through.
        image: match row.get("image") {
            None | Some(Value::Null) => String::new(),
            Some(v) => coerce_string(v, &id, "image")?,
        },
        id,
    };

    item.validate()
        .map_err(|e| invalid(&item.id, &e.to_string()))?;
    Ok(item)
}

/// The id is pulled first so later errors can name the offending record.
fn require_string(row: &Value, field: &str) -> Result<String, CatalogError> {
    match row.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(invalid("?", &format!("{field} is empty"))),
        // Some backends hand ids over as numbers; keep them opaque strings.
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(invalid("?", &format!("{field} is not a string"))),
        None => Err(invalid("?", &format!("missing required field {field}"))),
    }
}

fn require_field<'a>(row: &'a Value, id: &str, field: &str) -> Result<&'a Value, CatalogError> {
    row.get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| invalid(id, &format!("missing required field {field}")))
}

fn coerce_string(value: &Value, id: &str, field: &str) -> Result<String, CatalogError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(id, &format!("{field} is not a string")))
}

/// Accept the price as a JSON number or a numeric string ("12.50").
fn parse_price(value: &Value, id: &str) -> Result<f64, CatalogError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(p) if p.is_finite() && p >= 0.0 => Ok(p),
        Some(p) => Err(invalid(id, &format!("price {p} is not a finite non-negative number"))),
        None => Err(invalid(id, "price does not parse to a number")),
    }
}

fn invalid(id: &str, reason: &str) -> CatalogError {
    CatalogError::InvalidRecord {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}
