use crate::config::MongoConfig;
use crate::models::{Category, CategoryChanges};
use crate::services::store::{duplicate_name_error, CategoryStore};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::time::Duration;

const CATEGORIES_COLLECTION: &str = "categories";
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(config: &MongoConfig) -> Result<Self, AppError> {
        tracing::info!(uri = %config.uri, "Connecting to MongoDB");
        let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
            tracing::error!("Invalid MongoDB URI {}: {}", config.uri, e);
            AppError::from(e)
        })?;
        options.app_name = Some("category-service".to_string());
        options.server_selection_timeout =
            Some(Duration::from_secs(config.server_selection_timeout_secs));

        let client = MongoClient::with_options(options).map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", config.uri, e);
            AppError::from(e)
        })?;
        let db = client.database(&config.database);
        tracing::info!(database = %config.database, "MongoDB client ready");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for category-service");

        let name_index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("name_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.categories()
            .create_index(name_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create unique name index on categories: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on categories.name");

        Ok(())
    }

    pub fn categories(&self) -> Collection<Category> {
        self.db.collection(CATEGORIES_COLLECTION)
    }

    pub fn client(&self) -> &MongoClient {
        &self.client
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the connection pool once in-flight operations finish.
    pub async fn shutdown(self) {
        tracing::info!("Closing MongoDB client");
        self.client.shutdown().await;
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

#[async_trait]
impl CategoryStore for MongoDb {
    async fn insert(&self, category: Category) -> Result<Category, AppError> {
        self.categories()
            .insert_one(&category, None)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    duplicate_name_error(&category.name)
                } else {
                    tracing::error!(name = %category.name, "Failed to insert category: {}", e);
                    AppError::from(e)
                }
            })?;
        Ok(category)
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let cursor = self.categories().find(None, None).await.map_err(|e| {
            tracing::error!("Failed to query categories: {}", e);
            AppError::from(e)
        })?;
        let categories: Vec<Category> = cursor.try_collect().await.map_err(|e| {
            tracing::error!("Failed to read categories cursor: {}", e);
            AppError::from(e)
        })?;
        Ok(categories)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Category>, AppError> {
        self.categories()
            .find_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| {
                tracing::error!(category_id = %id, "Failed to fetch category: {}", e);
                AppError::from(e)
            })
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        self.categories()
            .find_one(doc! { "name": name }, None)
            .await
            .map_err(|e| {
                tracing::error!(name = %name, "Failed to fetch category by name: {}", e);
                AppError::from(e)
            })
    }

    async fn update(
        &self,
        id: &ObjectId,
        changes: CategoryChanges,
    ) -> Result<Option<Category>, AppError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.categories()
            .find_one_and_update(doc! { "_id": *id }, changes.to_update_document(), options)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    duplicate_name_error(changes.name.as_deref().unwrap_or_default())
                } else {
                    tracing::error!(category_id = %id, "Failed to update category: {}", e);
                    AppError::from(e)
                }
            })
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self
            .categories()
            .delete_one(doc! { "_id": *id }, None)
            .await
            .map_err(|e| {
                tracing::error!(category_id = %id, "Failed to delete category: {}", e);
                AppError::from(e)
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }
}
