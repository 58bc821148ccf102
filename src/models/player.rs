use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Roster entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub grade: String,
    pub team: String,
    #[serde(default)]
    pub in_game_name: String,
    #[serde(default)]
    pub open_id: String,
    #[serde(rename = "previousIGNs", default)]
    pub previous_igns: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Player {
    /// Applies a new in-game name, remembering the old one if it changed.
    pub fn rename_in_game(&mut self, new_ign: &str) {
        let new_ign = new_ign.trim();
        if new_ign == self.in_game_name {
            return;
        }
        if !self.in_game_name.is_empty() && !self.previous_igns.contains(&self.in_game_name) {
            self.previous_igns.push(self.in_game_name.clone());
        }
        self.in_game_name = new_ign.to_string();
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayer {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub grade: String,
    #[validate(length(min = 1, message = "team is required"))]
    pub team: String,
    #[serde(default)]
    pub in_game_name: String,
    #[serde(default)]
    pub open_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayer {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub team: Option<String>,
    pub in_game_name: Option<String>,
    pub open_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerQuery {
    pub team: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(ign: &str) -> Player {
        Player {
            id: None,
            name: "Somchai".to_string(),
            grade: "M.5".to_string(),
            team: "Alpha".to_string(),
            in_game_name: ign.to_string(),
            open_id: String::new(),
            previous_igns: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn rename_keeps_history_once() {
        let mut p = player("Shadow");
        p.rename_in_game("Blade");
        p.rename_in_game("Shadow");
        p.rename_in_game("Blade");
        assert_eq!(p.in_game_name, "Blade");
        assert_eq!(p.previous_igns, vec!["Shadow".to_string(), "Blade".to_string()]);
    }

    #[test]
    fn rename_to_same_name_is_noop() {
        let mut p = player("Shadow");
        p.rename_in_game(" Shadow ");
        assert!(p.previous_igns.is_empty());
    }

    #[test]
    fn previous_igns_uses_legacy_field_name() {
        let json = serde_json::to_value(player("Shadow")).unwrap();
        assert!(json.get("previousIGNs").is_some());
        assert!(json.get("inGameName").is_some());
    }
}
