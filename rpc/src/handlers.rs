//! Request handlers and wire types.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use linkgate_types::{Timestamp, VerificationRecord};
use linkgate_verification::{
    RevokeOutcome, RevokeRequest, VerificationChallenge, VerificationEngine, VerificationError,
    VerifyRequest,
};

use crate::RpcError;

/// Methods served on `/verify`, as advertised in `Allow`.
pub const VERIFY_ALLOW: &str = "GET, POST, DELETE";

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<VerificationEngine>,
    /// Whether `DELETE /verify` demands a signed body.
    pub require_signed_revocation: bool,
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct DomainQuery {
    pub domain: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChallengeQuery {
    pub domain: Option<String>,
    /// `verify` (default) or `revoke`.
    pub purpose: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub verified: bool,
    pub domain: String,
    pub address: String,
    pub verified_at: Timestamp,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub domain: String,
    pub address: String,
    pub verified: bool,
    pub verified_at: Timestamp,
}

impl From<VerificationRecord> for StatusResponse {
    fn from(r: VerificationRecord) -> Self {
        Self {
            domain: r.domain.as_str().to_string(),
            address: r.address.as_str().to_string(),
            verified: r.verified,
            verified_at: r.verified_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RevokeResponse {
    pub success: bool,
    pub domain: String,
    pub verified: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub crypto_ready: bool,
    pub nonces: usize,
}

fn require_domain(domain: Option<String>) -> Result<String, RpcError> {
    match domain {
        Some(d) if !d.is_empty() => Ok(d),
        _ => Err(VerificationError::MissingFields(vec!["domain"]).into()),
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// `POST /verify`
pub async fn post_verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, RpcError> {
    let Json(request) = body.map_err(|e| RpcError::InvalidBody(e.body_text()))?;
    let record = state.engine.verify(request).await?;
    Ok(Json(VerifyResponse {
        success: true,
        verified: record.verified,
        domain: record.domain.as_str().to_string(),
        address: record.address.as_str().to_string(),
        verified_at: record.verified_at,
    }))
}

/// `GET /verify?domain=`
pub async fn get_verify(
    State(state): State<AppState>,
    query: Result<Query<DomainQuery>, QueryRejection>,
) -> Result<Json<StatusResponse>, RpcError> {
    let Query(query) = query.map_err(|e| RpcError::InvalidBody(e.body_text()))?;
    let domain = require_domain(query.domain)?;
    let record = state.engine.query(&domain)?;
    Ok(Json(record.into()))
}

/// `DELETE /verify?domain=`
///
/// With signed revocation enabled the body must carry the revocation proof.
pub async fn delete_verify(
    State(state): State<AppState>,
    query: Result<Query<DomainQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<RevokeResponse>, RpcError> {
    let Query(query) = query.map_err(|e| RpcError::InvalidBody(e.body_text()))?;
    let (domain, outcome) = if state.require_signed_revocation {
        let mut request: RevokeRequest = if body.is_empty() {
            RevokeRequest::default()
        } else {
            serde_json::from_slice(&body).map_err(|e| RpcError::InvalidBody(e.to_string()))?
        };
        if query.domain.as_deref().is_some_and(|d| !d.is_empty()) {
            request.domain = query.domain;
        }
        let raw = request.domain.clone().unwrap_or_default();
        let outcome = state.engine.revoke_signed(request).await?;
        (raw, outcome)
    } else {
        let domain = require_domain(query.domain)?;
        let outcome = state.engine.revoke(&domain)?;
        (domain, outcome)
    };

    let domain = linkgate_types::Domain::sanitize(&domain)
        .map(|d| d.as_str().to_string())
        .unwrap_or(domain);
    match outcome {
        RevokeOutcome::Removed => Ok(Json(RevokeResponse {
            success: true,
            domain,
            verified: false,
        })),
        RevokeOutcome::NotFound => Err(VerificationError::NotFound(domain).into()),
    }
}

/// Any other method on `/verify`.
pub async fn verify_method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, VERIFY_ALLOW)],
        Json(serde_json::json!({ "error": "method not allowed" })),
    )
        .into_response()
}

/// `GET /challenge?domain=[&purpose=revoke]`
pub async fn get_challenge(
    State(state): State<AppState>,
    query: Result<Query<ChallengeQuery>, QueryRejection>,
) -> Result<Json<VerificationChallenge>, RpcError> {
    let Query(query) = query.map_err(|e| RpcError::InvalidBody(e.body_text()))?;
    let domain = require_domain(query.domain)?;
    let challenge = match query.purpose.as_deref() {
        None | Some("verify") => state.engine.issue_challenge(&domain)?,
        Some("revoke") => state.engine.issue_revocation_challenge(&domain)?,
        Some(other) => {
            return Err(RpcError::InvalidBody(format!(
                "unknown challenge purpose {other:?}, expected \"verify\" or \"revoke\""
            )))
        }
    };
    Ok(Json(challenge))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        crypto_ready: state.engine.crypto_ready(),
        nonces: state.engine.nonces().len(),
    })
}
