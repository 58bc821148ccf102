use mongodb::bson::oid::ObjectId;

use crate::errors::{AppError, Result};

pub(crate) mod auth;
pub(crate) mod fixtures;
pub(crate) mod heroes;
pub(crate) mod logos;
pub(crate) mod player_stats;
pub(crate) mod players;
pub(crate) mod predictions;
pub(crate) mod schedules;
pub(crate) mod table;

pub(crate) fn parse_id(id: &str, what: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| {
        tracing::debug!("failed to parse {} id '{}': {:?}", what, id, e);
        AppError::invalid_data(format!("Invalid {} ID format", what))
    })
}
