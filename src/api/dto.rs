//! Data Transfer Objects
//!
//! Request and response bodies of the plant API.

use serde::{Deserialize, Serialize};

use crate::model::PlantId;

/// Body of `/auth/login` and `/auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful `/auth/login` response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// Generic `{ "msg": ... }` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub msg: Option<String>,
}

/// `/api/me` response; extra fields are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub email: String,
}

/// Body of `POST /api/plants`
#[derive(Debug, Clone, Serialize)]
pub struct NewPlant {
    pub name: String,
    /// Explicit identifier, e.g. matching a sensor's configured id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_id: Option<PlantId>,
}

/// Body of `POST /api/plants/{id}/water`
#[derive(Debug, Clone, Copy, Serialize)]
pub struct WaterRequest {
    pub duration_ms: u64,
}

/// Acknowledgement of a queued water command
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WaterAck {
    #[serde(default)]
    pub status: Option<String>,
}
