// In-memory storage implementation for dev mode
// Decision: Use parking_lot for thread-safe access
// Decision: IDs are freshly generated ObjectId hex strings, same format as MongoDB
//
// This implementation mirrors the MongoDB backend's behaviour with in-memory
// vectors, allowing the API to run (and be tested) without a database.
// Insertion order is preserved so unsorted listings are stable.

use anyhow::{anyhow, bail, Result};
use bson::oid::ObjectId;
use parking_lot::RwLock;
use regex::RegexBuilder;
use serde_json::Value;
use std::cmp::Ordering;

use super::models::*;

/// In-memory database for dev mode
/// All data is stored in memory and lost on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<Vec<Document>>,
    foods: RwLock<Vec<Document>>,
    orders: RwLock<Vec<Document>>,
    gallery: RwLock<Vec<Document>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, user: Document) -> Result<InsertOneResult> {
        Ok(insert(&self.users, user))
    }

    // ============================================
    // Food items
    // ============================================

    pub async fn create_food(&self, food: Document) -> Result<InsertOneResult> {
        Ok(insert(&self.foods, food))
    }

    pub async fn list_foods(&self) -> Result<Vec<Document>> {
        Ok(self.foods.read().clone())
    }

    pub async fn top_selling_foods(&self, limit: usize) -> Result<Vec<Document>> {
        let mut foods = self.foods.read().clone();
        // Stable sort keeps insertion order among equal counts
        foods.sort_by(|a, b| cmp_order_count(b, a));
        foods.truncate(limit);
        Ok(foods)
    }

    pub async fn get_food(&self, id: &str) -> Result<Option<Document>> {
        Ok(find_one_by(&self.foods, ID_FIELD, id))
    }

    pub async fn list_foods_by_owner(&self, email: &str) -> Result<Vec<Document>> {
        Ok(find_by(&self.foods, fields::FOOD_OWNER, email))
    }

    pub async fn search_foods(&self, name: Option<&str>) -> Result<Vec<Document>> {
        let Some(name) = name else {
            return self.list_foods().await;
        };

        let pattern = RegexBuilder::new(&regex::escape(name))
            .case_insensitive(true)
            .build()?;

        Ok(self
            .foods
            .read()
            .iter()
            .filter(|food| {
                food.get(fields::FOOD_NAME)
                    .and_then(Value::as_str)
                    .is_some_and(|food_name| pattern.is_match(food_name))
            })
            .cloned()
            .collect())
    }

    pub async fn increment_order_count(&self, id: &str) -> Result<UpdateResult> {
        // Read-modify-write under the write lock so concurrent increments are not lost
        let mut foods = self.foods.write();
        let Some(food) = foods.iter_mut().find(|food| field_equals(food, ID_FIELD, id)) else {
            return Ok(UpdateResult::new(0, 0));
        };

        let next = match food.get(fields::ORDER_COUNT) {
            None => Value::from(1),
            Some(Value::Number(count)) => match count.as_i64() {
                Some(count) => Value::from(
                    count
                        .checked_add(1)
                        .ok_or_else(|| anyhow!("orderCount overflow on food {}", id))?,
                ),
                None => Value::from(count.as_f64().unwrap_or_default() + 1.0),
            },
            Some(other) => bail!(
                "Cannot apply $inc to a value of non-numeric type: {}",
                other
            ),
        };
        food.insert(fields::ORDER_COUNT.to_string(), next);

        Ok(UpdateResult::new(1, 1))
    }

    // ============================================
    // Orders
    // ============================================

    pub async fn create_order(&self, order: Document) -> Result<InsertOneResult> {
        Ok(insert(&self.orders, order))
    }

    pub async fn delete_order(&self, id: &str) -> Result<DeleteResult> {
        let mut orders = self.orders.write();
        match orders.iter().position(|order| field_equals(order, ID_FIELD, id)) {
            Some(index) => {
                orders.remove(index);
                Ok(DeleteResult::new(1))
            }
            None => Ok(DeleteResult::new(0)),
        }
    }

    pub async fn list_orders_by_buyer(&self, email: &str) -> Result<Vec<Document>> {
        Ok(find_by(&self.orders, fields::ORDER_BUYER, email))
    }

    pub async fn find_order_by_food(&self, food_id: &str) -> Result<Option<Document>> {
        Ok(find_one_by(&self.orders, fields::ORDER_FOOD_ID, food_id))
    }

    // ============================================
    // Gallery
    // ============================================

    pub async fn create_gallery_entry(&self, entry: Document) -> Result<InsertOneResult> {
        Ok(insert(&self.gallery, entry))
    }

    pub async fn list_gallery(&self) -> Result<Vec<Document>> {
        Ok(self.gallery.read().clone())
    }
}

fn insert(collection: &RwLock<Vec<Document>>, doc: Document) -> InsertOneResult {
    let id = ObjectId::new().to_hex();
    let mut doc = strip_id(doc);
    doc.insert(ID_FIELD.to_string(), Value::String(id.clone()));
    collection.write().push(doc);
    InsertOneResult::new(id)
}

fn field_equals(doc: &Document, field: &str, value: &str) -> bool {
    doc.get(field).and_then(Value::as_str) == Some(value)
}

fn find_by(collection: &RwLock<Vec<Document>>, field: &str, value: &str) -> Vec<Document> {
    collection
        .read()
        .iter()
        .filter(|doc| field_equals(doc, field, value))
        .cloned()
        .collect()
}

fn find_one_by(collection: &RwLock<Vec<Document>>, field: &str, value: &str) -> Option<Document> {
    collection
        .read()
        .iter()
        .find(|doc| field_equals(doc, field, value))
        .cloned()
}

/// Missing or non-numeric counts sort below every number
fn cmp_order_count(a: &Document, b: &Document) -> Ordering {
    let count = |doc: &Document| doc.get(fields::ORDER_COUNT).and_then(Value::as_f64);
    match (count(a), count(b)) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}
