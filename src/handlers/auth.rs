use axum::{extract::State, response::Json};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use mongodb::bson::doc;
use mongodb::{Collection, Database};
use validator::Validate;

use crate::config::AppConfig;
use crate::dtos::auth_dtos::{LoginRequest, LoginResponse};
use crate::errors::{AppError, Result};
use crate::extract::AppJson;
use crate::models::admin::{Admin, Claims, ADMIN_ROLE};
use crate::state::AppState;

pub const TOKEN_TTL_SECONDS: i64 = 86400;

fn admins(db: &Database) -> Collection<Admin> {
    db.collection("admins")
}

// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    payload.validate()?;

    let admin = admins(&state.db)
        .find_one(doc! { "username": &payload.username })
        .await?
        .ok_or_else(|| {
            tracing::warn!("login attempt for unknown admin {}", payload.username);
            AppError::AuthError
        })?;

    if !verify(&payload.password, &admin.password_hash)? {
        tracing::warn!("bad password for admin {}", payload.username);
        return Err(AppError::AuthError);
    }

    let sub = admin.id.map(|id| id.to_hex()).unwrap_or_default();
    let token = issue_token(&sub, &admin.username, &state.config.jwt_secret)?;

    tracing::info!("✅ Admin {} logged in", admin.username);
    Ok(Json(LoginResponse {
        token,
        username: admin.username,
        expires_in: TOKEN_TTL_SECONDS,
    }))
}

pub fn issue_token(sub: &str, username: &str, secret: &str) -> Result<String> {
    let claims = Claims {
        sub: sub.to_string(),
        username: username.to_string(),
        role: ADMIN_ROLE.to_string(),
        exp: (Utc::now().timestamp() + TOKEN_TTL_SECONDS) as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

/// Creates the admin named in the config if it does not exist yet.
pub async fn bootstrap_admin(db: &Database, config: &AppConfig) -> Result<()> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        tracing::debug!("no bootstrap admin configured");
        return Ok(());
    };

    let collection = admins(db);
    if collection.find_one(doc! { "username": username }).await?.is_some() {
        return Ok(());
    }

    let admin = Admin {
        id: None,
        username: username.clone(),
        password_hash: hash(password, DEFAULT_COST)?,
        created_at: Utc::now(),
    };
    collection.insert_one(&admin).await?;
    tracing::info!("👤 Created bootstrap admin {}", username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::verify_token;

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let token = issue_token("abc", "root", "s3cret").unwrap();
        let claims = verify_token(&token, "s3cret").unwrap();
        assert_eq!(claims.username, "root");
        assert_eq!(claims.role, ADMIN_ROLE);
        assert!(verify_token(&token, "other").is_err());
    }
}
