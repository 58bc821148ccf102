use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};

use crate::errors::AppError;
use crate::models::admin::{Claims, ADMIN_ROLE};
use crate::state::AppState;

/// Lets reads through and requires an admin bearer token for every write.
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !state.config.require_admin_auth || is_read_only(request.method()) {
        return Ok(next.run(request).await);
    }

    let token = headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or(AppError::AuthError)?;

    let claims = verify_token(token, &state.config.jwt_secret)?;
    if claims.role != ADMIN_ROLE {
        tracing::warn!("token for {} lacks admin role", claims.username);
        return Err(AppError::AuthError);
    }

    // Insert claims into request extensions
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

fn is_read_only(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::new(Algorithm::HS256))
        .map_err(|e| {
            tracing::debug!("rejected token: {}", e);
            AppError::AuthError
        })?;
    Ok(token_data.claims)
}
