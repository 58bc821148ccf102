use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub image_url: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveHero {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub image_url: String,
}

impl SaveHero {
    /// Explicit name wins; otherwise the file name without its extension.
    pub fn resolved_name(&self) -> Option<String> {
        let name = match (&self.name, &self.file_name) {
            (Some(name), _) if !name.trim().is_empty() => name.trim().to_string(),
            (_, Some(file)) => hero_name_from_file(file),
            _ => return None,
        };
        (!name.is_empty()).then_some(name)
    }
}

/// `"heroes/Ryoma.png"` -> `"Ryoma"`.
pub fn hero_name_from_file(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let stem = match base.rfind('.') {
        Some(0) | None => base,
        Some(idx) => &base[..idx],
    };
    stem.trim().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLogo {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub team_name: String,
    pub logo_url: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTeamLogo {
    pub team_name: String,
    pub logo_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_name_strips_directory_and_extension() {
        assert_eq!(hero_name_from_file("uploads/heroes/Ryoma.png"), "Ryoma");
        assert_eq!(hero_name_from_file("Tel'Annas.final.webp"), "Tel'Annas.final");
        assert_eq!(hero_name_from_file("Zata"), "Zata");
    }

    #[test]
    fn explicit_name_beats_file_name() {
        let save = SaveHero {
            name: Some(" Violet ".to_string()),
            file_name: Some("Ryoma.png".to_string()),
            image_url: "https://cdn/violet.png".to_string(),
        };
        assert_eq!(save.resolved_name().as_deref(), Some("Violet"));
    }

    #[test]
    fn blank_name_falls_back_to_file() {
        let save = SaveHero {
            name: Some("  ".to_string()),
            file_name: Some("Ryoma.png".to_string()),
            image_url: String::new(),
        };
        assert_eq!(save.resolved_name().as_deref(), Some("Ryoma"));

        let nothing = SaveHero { name: None, file_name: None, image_url: String::new() };
        assert!(nothing.resolved_name().is_none());
    }
}
