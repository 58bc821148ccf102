// Explicit "current document" pointers for schedules and standings.

use chrono::Utc;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Collection, Database,
};
use serde::de::DeserializeOwned;

use crate::errors::Result;
use crate::models::version::{CurrentVersion, VersionedKind};

pub const VERSIONS_COLLECTION: &str = "current_versions";

fn pointers(db: &Database) -> Collection<CurrentVersion> {
    db.collection(VERSIONS_COLLECTION)
}

pub async fn set_current(db: &Database, kind: VersionedKind, target: ObjectId) -> Result<()> {
    let pointer = CurrentVersion {
        kind: kind.key().to_string(),
        target,
        updated_at: Utc::now(),
    };
    pointers(db)
        .replace_one(doc! { "_id": kind.key() }, pointer)
        .upsert(true)
        .await?;
    tracing::debug!("current {} is now {}", kind.key(), target);
    Ok(())
}

pub async fn current_target(db: &Database, kind: VersionedKind) -> Result<Option<ObjectId>> {
    let pointer = pointers(db).find_one(doc! { "_id": kind.key() }).await?;
    Ok(pointer.map(|p| p.target))
}

/// The document the pointer names. Collections written before pointers
/// existed fall back to their newest document.
pub async fn load_current<T>(db: &Database, kind: VersionedKind) -> Result<Option<T>>
where
    T: DeserializeOwned + Send + Sync,
{
    let collection: Collection<T> = db.collection(kind.collection());
    if let Some(target) = current_target(db, kind).await? {
        if let Some(found) = collection.find_one(doc! { "_id": target }).await? {
            return Ok(Some(found));
        }
        tracing::warn!("current {} pointer names missing document {}", kind.key(), target);
    }
    let newest = collection.find_one(doc! {}).sort(doc! { "_id": -1 }).await?;
    Ok(newest)
}

/// Moves the pointer off a deleted document, onto the newest survivor.
pub async fn repoint_after_delete(db: &Database, kind: VersionedKind, deleted: ObjectId) -> Result<()> {
    if current_target(db, kind).await? != Some(deleted) {
        return Ok(());
    }

    let collection: Collection<mongodb::bson::Document> = db.collection(kind.collection());
    let newest = collection
        .find_one(doc! {})
        .sort(doc! { "_id": -1 })
        .projection(doc! { "_id": 1 })
        .await?;

    match newest.and_then(|d| d.get_object_id("_id").ok()) {
        Some(next) => set_current(db, kind, next).await,
        None => {
            pointers(db).delete_one(doc! { "_id": kind.key() }).await?;
            tracing::info!("no {} documents left, pointer cleared", kind.key());
            Ok(())
        }
    }
}
