use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Client, Database, IndexModel,
};

use crate::config::AppConfig;
use crate::errors::Result;

pub async fn get_db_client(config: &AppConfig) -> Result<Database> {
    let client = Client::with_uri_str(&config.database_url).await?;
    let db = client.database(&config.database_name);

    // Verify database is reachable by listing collections
    match db.list_collection_names().await {
        Ok(collections) => {
            tracing::info!("✅ Connected to database: {}", config.database_name);
            tracing::debug!("📂 Collections found: {:?}", collections);
        }
        Err(e) => {
            tracing::warn!(
                "❌ Database '{}' may not exist or is inaccessible: {}",
                config.database_name,
                e
            );
        }
    }

    Ok(db)
}

/// Unique keys behind the upsert-by-identity writes. Failure is logged, not
/// fatal: older data may already hold duplicates.
pub async fn ensure_indexes(db: &Database) {
    let unique = |field: &str| {
        let mut keys = Document::new();
        keys.insert(field, 1);
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };

    let indexes = [
        ("fixtures", unique("matchId")),
        ("heroes", unique("name")),
        ("logos", unique("teamName")),
        ("admins", unique("username")),
    ];

    for (collection, index) in indexes {
        match db
            .collection::<Document>(collection)
            .create_index(index)
            .await
        {
            Ok(_) => tracing::debug!("index ready on {}", collection),
            Err(e) => tracing::warn!("could not create index on {}: {}", collection, e),
        }
    }

    let by_match = IndexModel::builder()
        .keys(doc! { "matchId": 1, "gameNumber": 1 })
        .build();
    if let Err(e) = db
        .collection::<Document>("player_stats")
        .create_index(by_match)
        .await
    {
        tracing::warn!("could not create index on player_stats: {}", e);
    }
}
