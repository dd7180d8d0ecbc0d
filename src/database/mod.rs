mod mongo_store;
pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::*;

use mongodb::{bson::Document, Client, Collection, Database};
use std::error::Error;
use std::time::Duration;

pub const USERS: &str = "users";
pub const SERVICES: &str = "services";
pub const BOOKINGS: &str = "bookings";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("servora-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the routes query on.
    ///
    /// `users(email)` is unique: the atomic user upsert relies on it.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create users(email) index: {}", e),
        }

        let services = self.collection::<Document>(SERVICES);
        let provider_index = IndexModel::builder()
            .keys(doc! { "providerEmail": 1 })
            .build();

        match services.create_index(provider_index).await {
            Ok(_) => log::info!("   ✅ Index created: services(providerEmail)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let bookings = self.collection::<Document>(BOOKINGS);
        for field in ["userEmail", "providerEmail"] {
            let mut keys = Document::new();
            keys.insert(field, 1);
            keys.insert("created_at", -1);

            let index = IndexModel::builder().keys(keys).build();

            match bookings.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: bookings({}, created_at)", field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();

        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db = MongoDB::new(&uri, "servoraDB_test").await;
        assert!(db.is_ok());
    }
}
