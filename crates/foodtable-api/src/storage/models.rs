// Document and result types shared by the storage backends
// Decision: Documents stay loosely typed (JSON objects); only the fields we
// query on are named here
// Decision: Result shapes mirror the MongoDB driver's insert/delete results

use serde::{Deserialize, Serialize};

/// A schema-flexible document as exchanged with clients
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Document identifier field
pub const ID_FIELD: &str = "_id";

/// Collection names in the `foodTable` database
pub mod collections {
    pub const USERS: &str = "users";
    pub const FOODS: &str = "myFoods";
    pub const ORDERS: &str = "orders";
    pub const GALLERY: &str = "gallery";
}

/// Field names the gateway filters or sorts on
pub mod fields {
    /// Owner email on a food item
    pub const FOOD_OWNER: &str = "userEmail";
    /// Display name of a food item
    pub const FOOD_NAME: &str = "foodName";
    /// Number of times a food item has been ordered
    pub const ORDER_COUNT: &str = "orderCount";
    /// Food item referenced by an order (stored as the hex id string)
    pub const ORDER_FOOD_ID: &str = "foodId";
    /// Buyer email on an order
    pub const ORDER_BUYER: &str = "buyerEmail";
}

/// Number of food items returned by the top-selling query
pub const TOP_SELLING_LIMIT: usize = 6;

/// Result of inserting a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOneResult {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOneResult {
    pub fn new(inserted_id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

/// Result of deleting at most one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteResult {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Result of updating at most one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateResult {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }
}

/// Remove a client-supplied identifier so the store assigns one
pub fn strip_id(mut doc: Document) -> Document {
    doc.remove(ID_FIELD);
    doc
}
