//! Per-product-type descriptors
//!
//! Feed and vaccine records share one shape and differ only in collection
//! and field names. The service is written once against [`ProductSchema`].

use mongodb::bson::{Document, doc};

#[derive(Debug, PartialEq, Eq)]
pub struct ProductSchema {
    pub collection: &'static str,
    /// Lower-case noun used in messages: `feed`, `vaccine`
    pub label: &'static str,
    /// Key carrying the hex record id in the public projection
    pub id_key: &'static str,
    pub name_key: &'static str,
    /// Measured amount: kilograms of feed, milliliters of vaccine
    pub primary_key: &'static str,
    /// Container count: sacks of feed, bottles of vaccine
    pub secondary_key: &'static str,
}

pub static FEED: ProductSchema = ProductSchema {
    collection: "feed",
    label: "feed",
    id_key: "feedId",
    name_key: "feedName",
    primary_key: "kilogram",
    secondary_key: "sack",
};

pub static VACCINE: ProductSchema = ProductSchema {
    collection: "vaccine",
    label: "vaccine",
    id_key: "vaccineId",
    name_key: "vaccineName",
    primary_key: "milliliter",
    secondary_key: "bottle",
};

/// Product operations, used to pick the fallback error message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl ProductSchema {
    /// Caller-editable keys in validation order
    pub fn field_keys(&self) -> [&'static str; 6] {
        [
            self.name_key,
            self.primary_key,
            self.secondary_key,
            "date",
            "expiration",
            "status",
        ]
    }

    /// Inclusion projection for the public view
    pub fn projection(&self) -> Document {
        let mut projection = doc! { "_id": 1, "productId": 1 };
        for key in self.field_keys() {
            projection.insert(key, 1);
        }
        projection
    }

    pub fn id_required(&self) -> String {
        format!("{} ID is required", self.label)
    }

    pub fn not_found(&self) -> String {
        format!("{} not found", self.label)
    }

    pub fn invalid_name(&self) -> String {
        format!("Invalid {} name", self.label)
    }

    /// Message returned when an operation fails for reasons the caller can't fix
    pub fn fallback_error(&self, operation: Operation) -> String {
        match operation {
            Operation::Create => format!("Error on creating {}", self.label),
            Operation::Get => format!("Error on getting {}", self.label),
            Operation::List => format!("Error on getting {}s", self.label),
            Operation::Update => format!("Error on updating {}", self.label),
            Operation::Delete => format!("Error on deleting {}", self.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_includes_view_fields_only() {
        let projection = VACCINE.projection();
        let keys: Vec<_> = projection.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "_id",
                "productId",
                "vaccineName",
                "milliliter",
                "bottle",
                "date",
                "expiration",
                "status"
            ]
        );
    }

    #[test]
    fn test_messages_use_label() {
        assert_eq!(FEED.id_required(), "feed ID is required");
        assert_eq!(VACCINE.not_found(), "vaccine not found");
        assert_eq!(FEED.invalid_name(), "Invalid feed name");
        assert_eq!(FEED.fallback_error(Operation::List), "Error on getting feeds");
        assert_eq!(
            VACCINE.fallback_error(Operation::Delete),
            "Error on deleting vaccine"
        );
    }
}
