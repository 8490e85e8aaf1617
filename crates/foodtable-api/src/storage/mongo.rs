//! MongoDB storage backend
//!
//! Documents are stored as raw BSON documents and converted to and from the
//! loosely typed JSON documents the API exchanges. ObjectIds are exposed as
//! their hex strings.

use anyhow::{anyhow, Context, Result};
use bson::{doc, oid::ObjectId, Bson, Document as BsonDocument};
use futures::TryStreamExt;
use mongodb::{
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database,
};
use serde_json::Value;
use std::time::Duration;
use tracing::info;

use super::models::*;

/// MongoDB database handle
///
/// Cheap to clone; the driver pools connections internally and is safe for
/// concurrent use, so one handle is shared by every request.
#[derive(Clone)]
pub struct MongoDatabase {
    client: Client,
    db: Database,
}

impl MongoDatabase {
    /// Connect, pin the Stable API v1 and verify the deployment with a ping
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self> {
        info!(db = %db_name, "Connecting to MongoDB");

        let mut options = ClientOptions::parse(uri)
            .await
            .context("Invalid MongoDB connection string")?;
        options.server_api = Some(
            ServerApi::builder()
                .version(ServerApiVersion::V1)
                .strict(true)
                .deprecation_errors(true)
                .build(),
        );
        // Avoid hanging on an unreachable deployment
        options.server_selection_timeout = Some(Duration::from_secs(3));
        options.connect_timeout = Some(Duration::from_secs(3));

        let client = Client::with_options(options).context("Failed to create MongoDB client")?;
        let db = client.database(db_name);

        db.run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;

        info!(db = %db_name, "Connected to MongoDB");

        Ok(Self { client, db })
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.db.collection(name)
    }

    /// Close pooled connections once in-flight operations finish
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, user: Document) -> Result<InsertOneResult> {
        self.insert_one(collections::USERS, user).await
    }

    // ============================================
    // Food items
    // ============================================

    pub async fn create_food(&self, food: Document) -> Result<InsertOneResult> {
        self.insert_one(collections::FOODS, food).await
    }

    pub async fn list_foods(&self) -> Result<Vec<Document>> {
        self.find_many(collections::FOODS, doc! {}).await
    }

    pub async fn top_selling_foods(&self, limit: usize) -> Result<Vec<Document>> {
        let cursor = self
            .collection(collections::FOODS)
            .find(doc! {})
            .sort(doc! { fields::ORDER_COUNT: -1 })
            .limit(i64::try_from(limit)?)
            .await?;

        collect(cursor).await
    }

    pub async fn get_food(&self, id: &str) -> Result<Option<Document>> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };
        self.find_one(collections::FOODS, filter).await
    }

    pub async fn list_foods_by_owner(&self, email: &str) -> Result<Vec<Document>> {
        self.find_many(collections::FOODS, doc! { fields::FOOD_OWNER: email })
            .await
    }

    pub async fn search_foods(&self, name: Option<&str>) -> Result<Vec<Document>> {
        let filter = match name {
            Some(name) => doc! {
                fields::FOOD_NAME: { "$regex": regex::escape(name), "$options": "i" }
            },
            None => doc! {},
        };
        self.find_many(collections::FOODS, filter).await
    }

    pub async fn increment_order_count(&self, id: &str) -> Result<UpdateResult> {
        let Some(filter) = id_filter(id) else {
            return Ok(UpdateResult::new(0, 0));
        };

        let result = self
            .collection(collections::FOODS)
            .update_one(filter, doc! { "$inc": { fields::ORDER_COUNT: 1 } })
            .await?;

        Ok(UpdateResult::new(result.matched_count, result.modified_count))
    }

    // ============================================
    // Orders
    // ============================================

    pub async fn create_order(&self, order: Document) -> Result<InsertOneResult> {
        self.insert_one(collections::ORDERS, order).await
    }

    pub async fn delete_order(&self, id: &str) -> Result<DeleteResult> {
        let Some(filter) = id_filter(id) else {
            return Ok(DeleteResult::new(0));
        };

        let result = self
            .collection(collections::ORDERS)
            .delete_one(filter)
            .await?;

        Ok(DeleteResult::new(result.deleted_count))
    }

    pub async fn list_orders_by_buyer(&self, email: &str) -> Result<Vec<Document>> {
        self.find_many(collections::ORDERS, doc! { fields::ORDER_BUYER: email })
            .await
    }

    pub async fn find_order_by_food(&self, food_id: &str) -> Result<Option<Document>> {
        self.find_one(collections::ORDERS, doc! { fields::ORDER_FOOD_ID: food_id })
            .await
    }

    // ============================================
    // Gallery
    // ============================================

    pub async fn create_gallery_entry(&self, entry: Document) -> Result<InsertOneResult> {
        self.insert_one(collections::GALLERY, entry).await
    }

    pub async fn list_gallery(&self) -> Result<Vec<Document>> {
        self.find_many(collections::GALLERY, doc! {}).await
    }

    // ============================================
    // Collection helpers
    // ============================================

    async fn insert_one(&self, collection: &str, doc: Document) -> Result<InsertOneResult> {
        let bson_doc = json_to_bson(strip_id(doc))?;
        let result = self.collection(collection).insert_one(bson_doc).await?;

        let inserted_id = match result.inserted_id {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => return Err(anyhow!("Unexpected inserted id: {}", other)),
        };

        Ok(InsertOneResult::new(inserted_id))
    }

    async fn find_one(&self, collection: &str, filter: BsonDocument) -> Result<Option<Document>> {
        let found = self.collection(collection).find_one(filter).await?;
        Ok(found.map(bson_to_json))
    }

    async fn find_many(&self, collection: &str, filter: BsonDocument) -> Result<Vec<Document>> {
        let cursor = self.collection(collection).find(filter).await?;
        collect(cursor).await
    }
}

async fn collect(cursor: mongodb::Cursor<BsonDocument>) -> Result<Vec<Document>> {
    let docs: Vec<BsonDocument> = cursor.try_collect().await?;
    Ok(docs.into_iter().map(bson_to_json).collect())
}

/// Filter on `_id`; `None` when the id is not a valid ObjectId and so cannot match
fn id_filter(id: &str) -> Option<BsonDocument> {
    ObjectId::parse_str(id)
        .ok()
        .map(|oid| doc! { ID_FIELD: oid })
}

fn json_to_bson(doc: Document) -> Result<BsonDocument> {
    bson::to_document(&doc).context("Document is not representable as BSON")
}

fn bson_to_json(doc: BsonDocument) -> Document {
    doc.into_iter()
        .map(|(key, value)| (key, bson_value_to_json(value)))
        .collect()
}

fn bson_value_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or(Value::Null),
        Bson::Document(doc) => Value::Object(bson_to_json(doc)),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_value_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
