//! MongoDB tag store.

use crate::error::Result;
use crate::traits::TagStore;
use domain::{MongoConfig, TagDocument};
use futures::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::options::{ClientOptions, ServerAddress};
use mongodb::{Client, Collection};
use tracing::{debug, info, instrument};

/// Tag store backed by a MongoDB collection of `{id, name, movieId}` documents
#[derive(Clone)]
pub struct MongoTagStore {
    collection: Collection<TagDocument>,
}

impl MongoTagStore {
    /// Build a client for the configured host. The driver connects lazily,
    /// so an unreachable server surfaces on the first query.
    pub fn connect(config: &MongoConfig) -> Result<Self> {
        info!(
            "Connecting to MongoDB at {}:{} ({}.{})",
            config.host, config.port, config.database, config.collection
        );

        let options = ClientOptions::builder()
            .hosts(vec![ServerAddress::Tcp {
                host: config.host.clone(),
                port: Some(config.port),
            }])
            .build();
        let client = Client::with_options(options)?;

        Ok(Self::from_client(&client, &config.database, &config.collection))
    }

    pub fn from_client(client: &Client, database: &str, collection: &str) -> Self {
        Self {
            collection: client.database(database).collection(collection),
        }
    }

    async fn find(&self, filter: Document) -> Result<Vec<TagDocument>> {
        let cursor = self.collection.find(filter).await?;
        let documents: Vec<TagDocument> = cursor.try_collect().await?;
        Ok(documents)
    }
}

/// `{"movieId": {"$in": [...]}}`
pub fn movie_ids_filter(movie_ids: &[String]) -> Document {
    doc! { "movieId": { "$in": movie_ids.to_vec() } }
}

impl TagStore for MongoTagStore {
    #[instrument(skip(self))]
    async fn find_by_movie_ids(&self, movie_ids: &[String]) -> Result<Vec<TagDocument>> {
        if movie_ids.is_empty() {
            return Ok(Vec::new());
        }

        let documents = self.find(movie_ids_filter(movie_ids)).await?;
        debug!("Matched {} tag documents", documents.len());
        Ok(documents)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<TagDocument>> {
        let documents = self.find(doc! {}).await?;
        debug!("Read {} tag documents", documents.len());
        Ok(documents)
    }
}
