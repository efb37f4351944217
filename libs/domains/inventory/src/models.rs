use chrono::{SecondsFormat, Utc};
use mongodb::bson::{Bson, Document, oid::ObjectId};
use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value};
use std::fmt;
use strum::{Display, EnumString};
use utoipa::ToSchema;

use crate::error::{InventoryError, InventoryResult};
use crate::schema::ProductSchema;
use crate::validation::{is_present, parse_date, parse_name, parse_quantity, parse_status};

/// Raw request body, keyed by the product type's wire names
pub type FieldBag = Map<String, Value>;

/// Stock status, stored and transmitted as its display label
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum ProductStatus {
    #[serde(rename = "Available")]
    #[strum(serialize = "Available")]
    Available,
    #[serde(rename = "Out of Stock")]
    #[strum(serialize = "Out of Stock")]
    OutOfStock,
}

/// Non-negative whole amount, kept as the digit text the caller sent
///
/// Persisted as that text, leading zeros included, so a record reads back
/// exactly as it was written. There is no upper bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity(String);

impl Quantity {
    /// Digit text only; anything else is not a quantity
    pub fn from_digits(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        let valid = !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit());
        valid.then_some(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the caller as supplied by the auth layer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

impl Session {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// The owner id, if the session carries a non-empty one
    pub fn owner(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }

    pub(crate) fn require_owner(&self) -> InventoryResult<&str> {
        self.owner().ok_or(InventoryError::Unauthorized)
    }
}

/// Current time in the stored timestamp format, e.g. `2024-01-01T08:30:00.000Z`
pub(crate) fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn field<'a>(fields: &'a FieldBag, key: &str) -> &'a Value {
    fields.get(key).unwrap_or(&Value::Null)
}

/// A key present with a non-null value
fn provided<'a>(fields: &'a FieldBag, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !value.is_null())
}

fn invalid(message: impl Into<String>) -> InventoryError {
    InventoryError::Validation(message.into())
}

/// Fully validated input for a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub primary: Quantity,
    pub secondary: Quantity,
    pub date: String,
    pub expiration: String,
    pub status: ProductStatus,
}

impl NewProduct {
    /// Presence of every field first, then each format in field order;
    /// the first failure is reported
    pub fn from_fields(schema: &ProductSchema, fields: &FieldBag) -> InventoryResult<Self> {
        if !schema
            .field_keys()
            .iter()
            .all(|key| is_present(fields.get(*key)))
        {
            return Err(invalid("Missing required fields"));
        }

        Ok(Self {
            name: parse_name(field(fields, schema.name_key))
                .ok_or_else(|| invalid(schema.invalid_name()))?,
            primary: parse_quantity(field(fields, schema.primary_key))
                .ok_or_else(|| invalid(format!("Invalid {}", schema.primary_key)))?,
            secondary: parse_quantity(field(fields, schema.secondary_key))
                .ok_or_else(|| invalid(format!("Invalid {}", schema.secondary_key)))?,
            date: parse_date(field(fields, "date")).ok_or_else(|| invalid("Invalid date"))?,
            expiration: parse_date(field(fields, "expiration"))
                .ok_or_else(|| invalid("Invalid expiration"))?,
            status: parse_status(field(fields, "status"))
                .ok_or_else(|| invalid("Invalid status"))?,
        })
    }

    /// Stored document; `createdAt` and `updatedAt` both get `now`
    pub fn into_document(
        self,
        schema: &ProductSchema,
        owner: &str,
        product_id: i64,
        now: &str,
    ) -> Document {
        let mut document = Document::new();
        document.insert("userId", owner);
        document.insert("productId", product_id);
        document.insert(schema.name_key, self.name);
        document.insert(schema.primary_key, self.primary.0);
        document.insert(schema.secondary_key, self.secondary.0);
        document.insert("date", self.date);
        document.insert("expiration", self.expiration);
        document.insert("status", self.status.to_string());
        document.insert("createdAt", now);
        document.insert("updatedAt", now);
        document
    }
}

/// Partial update; `None` leaves the stored value untouched
///
/// A field counts as provided when its key is present with a non-null
/// value, so `0` and `""` are real updates and get validated as such.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub primary: Option<Quantity>,
    pub secondary: Option<Quantity>,
    pub date: Option<String>,
    pub expiration: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductPatch {
    pub fn from_fields(schema: &ProductSchema, fields: &FieldBag) -> InventoryResult<Self> {
        if schema.field_keys().iter().all(|key| provided(fields, key).is_none()) {
            return Err(invalid("No fields provided to update"));
        }

        let name = provided(fields, schema.name_key)
            .map(|v| parse_name(v).ok_or_else(|| invalid(schema.invalid_name())))
            .transpose()?;
        let primary = provided(fields, schema.primary_key)
            .map(|v| {
                parse_quantity(v).ok_or_else(|| invalid(format!("Invalid {}", schema.primary_key)))
            })
            .transpose()?;
        let secondary = provided(fields, schema.secondary_key)
            .map(|v| {
                parse_quantity(v)
                    .ok_or_else(|| invalid(format!("Invalid {}", schema.secondary_key)))
            })
            .transpose()?;
        let date = provided(fields, "date")
            .map(|v| parse_date(v).ok_or_else(|| invalid("Invalid date")))
            .transpose()?;
        let expiration = provided(fields, "expiration")
            .map(|v| parse_date(v).ok_or_else(|| invalid("Invalid expiration")))
            .transpose()?;
        let status = provided(fields, "status")
            .map(|v| parse_status(v).ok_or_else(|| invalid("Invalid status")))
            .transpose()?;

        Ok(Self {
            name,
            primary,
            secondary,
            date,
            expiration,
            status,
        })
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `$set` body for the provided fields plus `updatedAt`
    pub fn to_set_document(&self, schema: &ProductSchema, now: &str) -> Document {
        let mut set = Document::new();
        if let Some(name) = &self.name {
            set.insert(schema.name_key, name.as_str());
        }
        if let Some(primary) = &self.primary {
            set.insert(schema.primary_key, primary.as_str());
        }
        if let Some(secondary) = &self.secondary {
            set.insert(schema.secondary_key, secondary.as_str());
        }
        if let Some(date) = &self.date {
            set.insert("date", date.as_str());
        }
        if let Some(expiration) = &self.expiration {
            set.insert("expiration", expiration.as_str());
        }
        if let Some(status) = self.status {
            set.insert("status", status.to_string());
        }
        set.insert("updatedAt", now);
        set
    }
}

/// Public projection of a stored record
///
/// Serialized with the product type's wire names, e.g.
/// `{"feedId": "...", "productId": 1, "feedName": "Corn", "kilogram": "50", ...}`.
/// Fields missing from an older document come out as `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub schema: &'static ProductSchema,
    pub id: String,
    pub product_id: Option<i64>,
    pub name: Option<String>,
    pub primary: Option<String>,
    pub secondary: Option<String>,
    pub date: Option<String>,
    pub expiration: Option<String>,
    pub status: Option<String>,
}

/// Text stored by this service or by older writers that kept numbers
fn stored_text(document: &Document, key: &str) -> Option<String> {
    match document.get(key)? {
        Bson::String(s) => Some(s.clone()),
        Bson::Int32(v) => Some(v.to_string()),
        Bson::Int64(v) => Some(v.to_string()),
        Bson::Double(v) => Some(v.to_string()),
        _ => None,
    }
}

fn stored_integer(document: &Document, key: &str) -> Option<i64> {
    match document.get(key)? {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

/// Hex form of an ObjectId, or the raw string for string ids
pub(crate) fn record_id(document: &Document) -> InventoryResult<String> {
    match document.get("_id") {
        Some(Bson::ObjectId(id)) => Ok(id.to_hex()),
        Some(Bson::String(id)) => Ok(id.clone()),
        other => Err(InventoryError::Internal(format!(
            "stored record has unusable _id: {other:?}"
        ))),
    }
}

/// Parses a caller-supplied record id; anything that is not an ObjectId
/// cannot name a stored record
pub(crate) fn parse_record_id(id: &str) -> Option<ObjectId> {
    ObjectId::parse_str(id.trim()).ok()
}

impl ProductView {
    pub fn from_document(
        schema: &'static ProductSchema,
        document: &Document,
    ) -> InventoryResult<Self> {
        Ok(Self {
            schema,
            id: record_id(document)?,
            product_id: stored_integer(document, "productId"),
            name: stored_text(document, schema.name_key),
            primary: stored_text(document, schema.primary_key),
            secondary: stored_text(document, schema.secondary_key),
            date: stored_text(document, "date"),
            expiration: stored_text(document, "expiration"),
            status: stored_text(document, "status"),
        })
    }
}

impl Serialize for ProductView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(8))?;
        map.serialize_entry(self.schema.id_key, &self.id)?;
        map.serialize_entry("productId", &self.product_id)?;
        map.serialize_entry(self.schema.name_key, &self.name)?;
        map.serialize_entry(self.schema.primary_key, &self.primary)?;
        map.serialize_entry(self.schema.secondary_key, &self.secondary)?;
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("expiration", &self.expiration)?;
        map.serialize_entry("status", &self.status)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FEED, VACCINE};
    use mongodb::bson::doc;
    use serde_json::json;

    fn bag(value: Value) -> FieldBag {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn corn() -> FieldBag {
        bag(json!({
            "feedName": "Corn",
            "kilogram": "50",
            "sack": "10",
            "date": "2024-01-01",
            "expiration": "2025-01-01",
            "status": "Available"
        }))
    }

    #[test]
    fn test_product_status_labels() {
        assert_eq!(ProductStatus::OutOfStock.to_string(), "Out of Stock");
        assert_eq!(
            serde_json::to_value(ProductStatus::Available).unwrap(),
            json!("Available")
        );
        assert_eq!(
            "Out of Stock".parse::<ProductStatus>().unwrap(),
            ProductStatus::OutOfStock
        );
    }

    #[test]
    fn test_session_owner_ignores_empty_id() {
        assert_eq!(Session::for_user("u1").owner(), Some("u1"));
        assert_eq!(Session::for_user("").owner(), None);
        assert_eq!(Session::anonymous().owner(), None);
        assert_eq!(
            Session::for_user("").require_owner(),
            Err(InventoryError::Unauthorized)
        );
    }

    #[test]
    fn test_new_product_from_valid_fields() {
        let product = NewProduct::from_fields(&FEED, &corn()).unwrap();
        assert_eq!(product.name, "Corn");
        assert_eq!(product.primary.as_str(), "50");
        assert_eq!(product.secondary.as_str(), "10");
        assert_eq!(product.status, ProductStatus::Available);
    }

    #[test]
    fn test_new_product_missing_field_wins_over_format() {
        let mut fields = corn();
        fields.insert("feedName".into(), json!("Corn!!"));
        fields.remove("status");

        let err = NewProduct::from_fields(&FEED, &fields).unwrap_err();
        assert_eq!(err, InventoryError::Validation("Missing required fields".into()));
    }

    #[test]
    fn test_new_product_reports_first_invalid_field() {
        let mut fields = corn();
        fields.insert("sack".into(), json!("-1"));
        fields.insert("date".into(), json!("yesterday"));

        let err = NewProduct::from_fields(&FEED, &fields).unwrap_err();
        assert_eq!(err, InventoryError::Validation("Invalid sack".into()));
    }

    #[test]
    fn test_new_product_uses_schema_field_names() {
        let err = NewProduct::from_fields(&VACCINE, &corn()).unwrap_err();
        assert_eq!(err, InventoryError::Validation("Missing required fields".into()));
    }

    #[test]
    fn test_into_document_stores_quantities_as_strings() {
        let document = NewProduct::from_fields(&FEED, &corn())
            .unwrap()
            .into_document(&FEED, "u1", 7, "2024-01-01T00:00:00.000Z");

        assert_eq!(document.get_str("userId").unwrap(), "u1");
        assert_eq!(document.get_i64("productId").unwrap(), 7);
        assert_eq!(document.get_str("kilogram").unwrap(), "50");
        assert_eq!(document.get_str("status").unwrap(), "Available");
        assert_eq!(
            document.get_str("createdAt").unwrap(),
            document.get_str("updatedAt").unwrap()
        );
    }

    #[test]
    fn test_into_document_keeps_quantity_text() {
        let mut fields = corn();
        fields.insert("kilogram".into(), json!("050"));
        fields.insert("sack".into(), json!("123456789012345678901234"));

        let document = NewProduct::from_fields(&FEED, &fields)
            .unwrap()
            .into_document(&FEED, "u1", 1, "2024-01-01T00:00:00.000Z");

        assert_eq!(document.get_str("kilogram").unwrap(), "050");
        assert_eq!(document.get_str("sack").unwrap(), "123456789012345678901234");
    }

    #[test]
    fn test_quantity_from_digits() {
        assert_eq!(Quantity::from_digits("007").unwrap().to_string(), "007");
        assert!(Quantity::from_digits("").is_none());
        assert!(Quantity::from_digits("1e3").is_none());
        assert!(Quantity::from_digits("٣").is_none());
    }

    #[test]
    fn test_patch_requires_a_field() {
        let fields = bag(json!({"sack": null, "unrelated": "x"}));
        let err = ProductPatch::from_fields(&FEED, &fields).unwrap_err();
        assert_eq!(err, InventoryError::Validation("No fields provided to update".into()));
    }

    #[test]
    fn test_patch_accepts_zero() {
        let patch = ProductPatch::from_fields(&FEED, &bag(json!({"sack": 0}))).unwrap();
        assert_eq!(patch.secondary.as_ref().map(Quantity::as_str), Some("0"));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_validates_provided_fields() {
        let err = ProductPatch::from_fields(&VACCINE, &bag(json!({"status": "Pending"})))
            .unwrap_err();
        assert_eq!(err, InventoryError::Validation("Invalid status".into()));

        let err =
            ProductPatch::from_fields(&VACCINE, &bag(json!({"vaccineName": ""}))).unwrap_err();
        assert_eq!(err, InventoryError::Validation("Invalid vaccine name".into()));
    }

    #[test]
    fn test_patch_set_document() {
        let patch =
            ProductPatch::from_fields(&FEED, &bag(json!({"kilogram": "75", "status": "Out of Stock"})))
                .unwrap();
        let set = patch.to_set_document(&FEED, "2024-02-01T00:00:00.000Z");

        assert_eq!(
            set,
            doc! {
                "kilogram": "75",
                "status": "Out of Stock",
                "updatedAt": "2024-02-01T00:00:00.000Z"
            }
        );
    }

    #[test]
    fn test_view_serializes_with_wire_names() {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "productId": 1,
            "feedName": "Corn",
            "kilogram": "50",
            "sack": "10",
            "date": "2024-01-01",
            "expiration": "2025-01-01",
            "status": "Available",
        };

        let view = ProductView::from_document(&FEED, &document).unwrap();
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({
                "feedId": id.to_hex(),
                "productId": 1,
                "feedName": "Corn",
                "kilogram": "50",
                "sack": "10",
                "date": "2024-01-01",
                "expiration": "2025-01-01",
                "status": "Available"
            })
        );
    }

    #[test]
    fn test_view_tolerates_legacy_numbers_and_gaps() {
        let document = doc! { "_id": ObjectId::new(), "bottle": 3, "milliliter": 250.0 };
        let view = ProductView::from_document(&VACCINE, &document).unwrap();

        assert_eq!(view.secondary.as_deref(), Some("3"));
        assert_eq!(view.primary.as_deref(), Some("250"));
        assert!(view.name.is_none());
        assert!(view.product_id.is_none());
    }

    #[test]
    fn test_view_rejects_document_without_id() {
        let err = ProductView::from_document(&FEED, &doc! { "feedName": "Corn" }).unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_parse_record_id() {
        let id = ObjectId::new();
        assert_eq!(parse_record_id(&id.to_hex()), Some(id));
        assert!(parse_record_id("not-an-object-id").is_none());
    }

    #[test]
    fn test_timestamp_format() {
        let now = timestamp_now();
        assert!(now.ends_with('Z'));
        assert_eq!(now.len(), "2024-01-01T00:00:00.000Z".len());
    }
}
