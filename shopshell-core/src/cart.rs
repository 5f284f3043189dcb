//! Per-user shopping cart as persisted in durable storage
//!
//! Stored carts may have been written by other page scripts, so each line is
//! read leniently and fields this module does not know about are written back
//! unchanged.
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Image used when a product is added without one.
pub const PLACEHOLDER_IMG: &str = "images/placeholder.jpg";

const TIMESTAMP: &str = "timestamp";

/// Product id exactly as the page supplied it. A string id and a numeric id
/// never match each other, so `"1"` and `1` are different products.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Value);

impl ProductId {
    /// Id for a JavaScript number. Integral values are stored without a
    /// fractional part; NaN and infinities have no JSON form and become null.
    #[must_use]
    pub fn from_number(n: f64) -> Self {
        const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
        if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
            #[allow(clippy::cast_possible_truncation)]
            return Self(Value::Number(Number::from(n as i64)));
        }
        Self(Number::from_f64(n).map_or(Value::Null, Value::Number))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null()
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(Value::String(id.to_string()))
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(Value::String(id))
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self(Value::Number(id.into()))
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

/// A single product line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(default, skip_serializing_if = "ProductId::is_null")]
    pub id: ProductId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Unit price; numeric text is converted, anything else reads as 0.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default = "placeholder_img", deserialize_with = "lenient_img")]
    pub img: String,
    /// Always at least 1: missing, zero, negative or non-numeric reads as 1.
    #[serde(default = "one", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    /// Every other stored field, including `timestamp`, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const fn one() -> u32 {
    1
}

fn placeholder_img() -> String {
    PLACEHOLDER_IMG.to_string()
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let raw = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(text) => parse_price_text(&text),
        _ => f64::NAN,
    };
    Ok(coerce_price(raw).unwrap_or(0.0))
}

fn lenient_img<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(img) if !img.is_empty() => img,
        _ => placeholder_img(),
    })
}

fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let quantity = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|q| q.fract() == 0.0 && *q > 0.0)
                .map(|q| q.min(f64::from(u32::MAX)) as u64)
        }),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(quantity
        .filter(|q| *q > 0)
        .map_or(1, |q| u32::try_from(q).unwrap_or(u32::MAX)))
}

impl CartLineItem {
    /// Quantity counted toward the badge.
    #[must_use]
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }

    /// Creation time text exactly as stored.
    #[must_use]
    pub fn timestamp(&self) -> Option<&str> {
        self.extra.get(TIMESTAMP).and_then(Value::as_str)
    }
}

/// Product details handed to add-to-cart before validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLineItem {
    pub id: ProductId,
    pub name: String,
    /// Raw numeric price; may be NaN or infinite when the caller passed garbage.
    pub price: f64,
    pub img: Option<String>,
}

impl NewLineItem {
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            img: None,
        }
    }

    #[must_use]
    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = Some(img.into());
        self
    }
}

/// Accept a price only when it is finite and non-negative.
#[must_use]
pub fn coerce_price(raw: f64) -> Option<f64> {
    (raw.is_finite() && raw >= 0.0).then_some(raw)
}

/// Convert textual price input to a number. Blank text is 0; text that is not
/// a number becomes NaN so that [`coerce_price`] rejects it.
#[must_use]
pub fn parse_price_text(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        0.0
    } else {
        text.parse().unwrap_or(f64::NAN)
    }
}

/// Ordered cart lines, one per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create a new empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse stored cart JSON. Missing data, invalid JSON or a value that is
    /// not an array yields an empty cart. Array entries that are not objects
    /// are skipped; every object becomes a line.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let parsed = raw.map(|json| serde_json::from_str::<Value>(json));
        let Some(Ok(Value::Array(entries))) = parsed else {
            return Self::default();
        };
        let items = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value(entry) {
                Ok(line) => Some(line),
                Err(err) => {
                    log::debug!("skipping cart entry that is not a line: {err}");
                    None
                }
            })
            .collect();
        Self { items }
    }

    /// Serialize for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a cart line by product id.
    #[must_use]
    pub fn find(&self, id: impl Into<ProductId>) -> Option<&CartLineItem> {
        let id = id.into();
        self.items.iter().find(|item| item.id == id)
    }

    /// Badge count: sum of effective quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |total, item| total.saturating_add(item.effective_quantity()))
    }

    /// Add one unit of `product`. An existing line with the same id gains one
    /// unit and keeps every other stored field; otherwise a new line is
    /// appended. The price must already be coerced.
    /// Returns the new quantity of that line.
    pub fn add(&mut self, product: NewLineItem, now: DateTime<Utc>) -> u32 {
        if let Some(line) = self.items.iter_mut().find(|item| item.id == product.id) {
            line.quantity = line.effective_quantity().saturating_add(1);
            return line.quantity;
        }
        let img = product
            .img
            .filter(|img| !img.is_empty())
            .unwrap_or_else(placeholder_img);
        let mut extra = Map::new();
        extra.insert(
            TIMESTAMP.to_string(),
            Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        self.items.push(CartLineItem {
            id: product.id,
            name: product.name,
            price: product.price,
            img,
            quantity: 1,
            extra,
        });
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn adding_same_id_increments_quantity() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(NewLineItem::new("p1", "Shirt", 19.99), at()), 1);
        assert_eq!(cart.add(NewLineItem::new("p1", "Shirt v2", 5.0), at()), 2);
        assert_eq!(cart.len(), 1);
        let line = cart.find("p1").unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.name, "Shirt");
        assert!((line.price - 19.99).abs() < f64::EPSILON);
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn missing_or_empty_image_uses_placeholder() {
        let mut cart = Cart::new();
        cart.add(NewLineItem::new("a", "A", 1.0), at());
        cart.add(NewLineItem::new("b", "B", 1.0).with_img(""), at());
        cart.add(NewLineItem::new("c", "C", 1.0).with_img("c.jpg"), at());
        let imgs: Vec<&str> = cart.items().iter().map(|i| i.img.as_str()).collect();
        assert_eq!(imgs, vec![PLACEHOLDER_IMG, PLACEHOLDER_IMG, "c.jpg"]);
    }

    #[test]
    fn malformed_json_parses_as_empty_cart() {
        assert!(Cart::parse(None).is_empty());
        assert!(Cart::parse(Some("")).is_empty());
        assert!(Cart::parse(Some("{\"id\":1}")).is_empty());
        assert!(Cart::parse(Some("[oops")).is_empty());
        assert!(Cart::parse(Some("\"[]\"")).is_empty());
    }

    #[test]
    fn stored_lines_fill_defaults_and_count_zero_as_one() {
        let cart = Cart::parse(Some(
            r#"[{"id":"p1","name":"Shirt","price":3,"quantity":0},{"id":"p2"},{"id":"p3","quantity":4}]"#,
        ));
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.items()[1].img, PLACEHOLDER_IMG);
        assert_eq!(cart.items()[1].quantity, 1);
        assert_eq!(cart.total_quantity(), 6);
    }

    #[test]
    fn json_uses_plain_array_layout() {
        let mut cart = Cart::new();
        cart.add(NewLineItem::new("p1", "Shirt", 19.99).with_img("s.jpg"), at());
        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        let line = &value[0];
        assert_eq!(line["id"], "p1");
        assert_eq!(line["name"], "Shirt");
        assert_eq!(line["price"], 19.99);
        assert_eq!(line["img"], "s.jpg");
        assert_eq!(line["quantity"], 1);
        assert_eq!(line["timestamp"], "2025-03-01T12:00:00.000Z");
    }

    #[test]
    fn loosely_typed_lines_still_count() {
        let cart = Cart::parse(Some(
            r#"[{"id":1,"price":"10","quantity":3},{"id":"p2","price":null,"quantity":"2"},{"id":"p3","price":-4,"quantity":-1}]"#,
        ));
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.total_quantity(), 6);
        assert!((cart.find(1_i64).unwrap().price - 10.0).abs() < f64::EPSILON);
        assert!(cart.find("p2").unwrap().price.abs() < f64::EPSILON);
        assert!(cart.find("p3").unwrap().price.abs() < f64::EPSILON);
        assert!(cart.find("1").is_none());
    }

    #[test]
    fn entries_that_are_not_objects_are_skipped() {
        let cart = Cart::parse(Some(r#"[7,"x",null,{"id":"p1","quantity":2}]"#));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert!(Cart::parse(Some("null")).is_empty());
    }

    #[test]
    fn unknown_fields_and_timestamp_text_survive_an_add() {
        let mut cart = Cart::parse(Some(
            r#"[{"id":"p1","name":"Shirt","price":5,"quantity":1,"size":"M","timestamp":"2025-01-01T00:00:00.000Z"}]"#,
        ));
        cart.add(NewLineItem::new("p1", "Shirt", 5.0), at());
        let line = cart.find("p1").unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.timestamp(), Some("2025-01-01T00:00:00.000Z"));

        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        assert_eq!(value[0]["size"], "M");
        assert_eq!(value[0]["timestamp"], "2025-01-01T00:00:00.000Z");
    }

    #[test]
    fn numeric_and_text_ids_are_distinct() {
        let mut cart = Cart::new();
        cart.add(NewLineItem::new(1_i64, "One", 1.0), at());
        cart.add(NewLineItem::new("1", "One as text", 1.0), at());
        cart.add(NewLineItem::new(ProductId::from_number(1.0), "One again", 1.0), at());
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.find(1_i64).unwrap().quantity, 2);
        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[1]["id"], "1");
    }

    #[test]
    fn price_coercion_rejects_non_finite_and_negative() {
        assert_eq!(coerce_price(19.99), Some(19.99));
        assert_eq!(coerce_price(0.0), Some(0.0));
        assert_eq!(coerce_price(f64::NAN), None);
        assert_eq!(coerce_price(f64::INFINITY), None);
        assert_eq!(coerce_price(-1.0), None);
    }

    #[test]
    fn price_text_follows_number_conversion() {
        assert!((parse_price_text(" 12.5 ") - 12.5).abs() < f64::EPSILON);
        assert!(parse_price_text("").abs() < f64::EPSILON);
        assert!(parse_price_text("free").is_nan());
    }
}
