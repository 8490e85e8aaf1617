// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either MongoDB (production) or in-memory (dev mode) storage. Every method is
// exactly one store operation.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use super::memory::InMemoryDatabase;
use super::models::*;
use super::mongo::MongoDatabase;

/// Where documents are stored, resolved from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Mongo { uri: String, db_name: String },
    InMemory,
}

/// Default Atlas cluster host used when only credentials are configured
const DEFAULT_MONGODB_HOST: &str = "cluster0.dmwxvyo.mongodb.net";
const DEFAULT_DB_NAME: &str = "foodTable";

impl StorageConfig {
    /// Load storage configuration from environment variables
    ///
    /// `MONGODB_URI` wins; otherwise `DB_USER`/`DB_PASS` (and optional
    /// `MONGODB_HOST`) build an Atlas SRV URI. With neither, dev mode.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let db_name = var("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string());

        if let Some(uri) = var("MONGODB_URI") {
            return Self::Mongo { uri, db_name };
        }

        match (var("DB_USER"), var("DB_PASS")) {
            (Some(user), Some(pass)) => {
                let host = var("MONGODB_HOST").unwrap_or_else(|| DEFAULT_MONGODB_HOST.to_string());
                let uri = format!(
                    "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=Cluster0",
                    user, pass, host
                );
                Self::Mongo { uri, db_name }
            }
            _ => Self::InMemory,
        }
    }
}

/// Storage backend that can be either MongoDB or in-memory
#[derive(Clone)]
pub enum StorageBackend {
    /// MongoDB database (production)
    Mongo(MongoDatabase),
    /// In-memory database (dev mode)
    InMemory(Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Open the configured backend
    pub async fn connect(config: &StorageConfig) -> Result<Self> {
        match config {
            StorageConfig::Mongo { uri, db_name } => Self::mongo(uri, db_name).await,
            StorageConfig::InMemory => {
                warn!("No MongoDB configured, using in-memory storage (data is lost on restart)");
                Ok(Self::in_memory())
            }
        }
    }

    /// Create a MongoDB storage backend from a connection string
    pub async fn mongo(uri: &str, db_name: &str) -> Result<Self> {
        let db = MongoDatabase::connect(uri, db_name).await?;
        Ok(Self::Mongo(db))
    }

    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(Arc::new(InMemoryDatabase::new()))
    }

    /// Check if this is dev mode (in-memory)
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// Release the store connection on process exit
    pub async fn shutdown(&self) {
        match self {
            Self::Mongo(db) => {
                db.shutdown().await;
                info!("MongoDB connection closed");
            }
            Self::InMemory(_) => {}
        }
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, user: Document) -> Result<InsertOneResult> {
        match self {
            Self::Mongo(db) => db.create_user(user).await,
            Self::InMemory(db) => db.create_user(user).await,
        }
    }

    // ============================================
    // Food items
    // ============================================

    pub async fn create_food(&self, food: Document) -> Result<InsertOneResult> {
        match self {
            Self::Mongo(db) => db.create_food(food).await,
            Self::InMemory(db) => db.create_food(food).await,
        }
    }

    pub async fn list_foods(&self) -> Result<Vec<Document>> {
        match self {
            Self::Mongo(db) => db.list_foods().await,
            Self::InMemory(db) => db.list_foods().await,
        }
    }

    pub async fn top_selling_foods(&self, limit: usize) -> Result<Vec<Document>> {
        match self {
            Self::Mongo(db) => db.top_selling_foods(limit).await,
            Self::InMemory(db) => db.top_selling_foods(limit).await,
        }
    }

    pub async fn get_food(&self, id: &str) -> Result<Option<Document>> {
        match self {
            Self::Mongo(db) => db.get_food(id).await,
            Self::InMemory(db) => db.get_food(id).await,
        }
    }

    pub async fn list_foods_by_owner(&self, email: &str) -> Result<Vec<Document>> {
        match self {
            Self::Mongo(db) => db.list_foods_by_owner(email).await,
            Self::InMemory(db) => db.list_foods_by_owner(email).await,
        }
    }

    pub async fn search_foods(&self, name: Option<&str>) -> Result<Vec<Document>> {
        match self {
            Self::Mongo(db) => db.search_foods(name).await,
            Self::InMemory(db) => db.search_foods(name).await,
        }
    }

    pub async fn increment_order_count(&self, id: &str) -> Result<UpdateResult> {
        match self {
            Self::Mongo(db) => db.increment_order_count(id).await,
            Self::InMemory(db) => db.increment_order_count(id).await,
        }
    }

    // ============================================
    // Orders
    // ============================================

    pub async fn create_order(&self, order: Document) -> Result<InsertOneResult> {
        match self {
            Self::Mongo(db) => db.create_order(order).await,
            Self::InMemory(db) => db.create_order(order).await,
        }
    }

    pub async fn delete_order(&self, id: &str) -> Result<DeleteResult> {
        match self {
            Self::Mongo(db) => db.delete_order(id).await,
            Self::InMemory(db) => db.delete_order(id).await,
        }
    }

    pub async fn list_orders_by_buyer(&self, email: &str) -> Result<Vec<Document>> {
        match self {
            Self::Mongo(db) => db.list_orders_by_buyer(email).await,
            Self::InMemory(db) => db.list_orders_by_buyer(email).await,
        }
    }

    pub async fn find_order_by_food(&self, food_id: &str) -> Result<Option<Document>> {
        match self {
            Self::Mongo(db) => db.find_order_by_food(food_id).await,
            Self::InMemory(db) => db.find_order_by_food(food_id).await,
        }
    }

    // ============================================
    // Gallery
    // ============================================

    pub async fn create_gallery_entry(&self, entry: Document) -> Result<InsertOneResult> {
        match self {
            Self::Mongo(db) => db.create_gallery_entry(entry).await,
            Self::InMemory(db) => db.create_gallery_entry(entry).await,
        }
    }

    pub async fn list_gallery(&self) -> Result<Vec<Document>> {
        match self {
            Self::Mongo(db) => db.list_gallery().await,
            Self::InMemory(db) => db.list_gallery().await,
        }
    }
}
