//! Plant API Client
//!
//! Typed calls against the backend. Status codes are interpreted here; the
//! controller only ever sees [`ApiError`] kinds.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::dto::{
    Credentials, LoginResponse, MessageResponse, NewPlant, UserProfile, WaterAck, WaterRequest,
};
use super::error::{extract_server_message, ApiError, ApiResult};
use super::transport::{ApiRequest, Method, Transport};
use crate::model::{Measurement, Plant, PlantId};

/// Client for the plant-watering REST API
pub struct PlantApi<T> {
    transport: T,
}

impl<T: Transport> PlantApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `POST /auth/login`, returning the bearer token
    pub async fn login(&self, credentials: &Credentials) -> ApiResult<String> {
        let request = ApiRequest::new(Method::Post, "/auth/login").json(to_body(credentials)?);
        let response: LoginResponse = decode(self.call(request).await?)?;
        Ok(response.access_token)
    }

    /// `POST /auth/register`, returning the server's confirmation text if any
    pub async fn register(&self, credentials: &Credentials) -> ApiResult<Option<String>> {
        let request = ApiRequest::new(Method::Post, "/auth/register").json(to_body(credentials)?);
        let body = self.call(request).await?;
        let response: MessageResponse = match body {
            Some(body) => serde_json::from_value(body).unwrap_or_default(),
            None => MessageResponse::default(),
        };
        Ok(response.msg)
    }

    /// `GET /api/me`
    pub async fn me(&self, token: &str) -> ApiResult<UserProfile> {
        let request = ApiRequest::new(Method::Get, "/api/me").bearer(token);
        decode(self.call(request).await?)
    }

    /// `GET /api/plants`
    pub async fn list_plants(&self, token: &str) -> ApiResult<Vec<Plant>> {
        let request = ApiRequest::new(Method::Get, "/api/plants").bearer(token);
        decode(self.call(request).await?)
    }

    /// `POST /api/plants`, returning the created plant when the server echoes it
    pub async fn create_plant(&self, token: &str, plant: &NewPlant) -> ApiResult<Option<Plant>> {
        let request = ApiRequest::new(Method::Post, "/api/plants")
            .bearer(token)
            .json(to_body(plant)?);
        let body = self.call(request).await?;
        Ok(body.and_then(|b| serde_json::from_value(b).ok()))
    }

    /// `DELETE /api/plants/{id}`
    pub async fn delete_plant(&self, token: &str, plant: PlantId) -> ApiResult<()> {
        let request = ApiRequest::new(Method::Delete, format!("/api/plants/{}", plant)).bearer(token);
        self.call(request).await?;
        Ok(())
    }

    /// `GET /api/measurements/{id}`, in server order (newest first)
    pub async fn measurements(&self, token: &str, plant: PlantId) -> ApiResult<Vec<Measurement>> {
        let request =
            ApiRequest::new(Method::Get, format!("/api/measurements/{}", plant)).bearer(token);
        decode(self.call(request).await?)
    }

    /// `POST /api/plants/{id}/water`
    pub async fn water(&self, token: &str, plant: PlantId, duration_ms: u64) -> ApiResult<WaterAck> {
        let request = ApiRequest::new(Method::Post, format!("/api/plants/{}/water", plant))
            .bearer(token)
            .json(to_body(&WaterRequest { duration_ms })?);
        let body = self.call(request).await?;
        Ok(body
            .and_then(|b| serde_json::from_value(b).ok())
            .unwrap_or_default())
    }

    /// Send a request and map the status code to an [`ApiError`] kind
    async fn call(&self, request: ApiRequest) -> ApiResult<Option<Value>> {
        let authenticated = request.bearer.is_some();
        let method = request.method;
        let path = request.path.clone();

        let response = self.transport.send(request).await?;
        debug!(method = method.as_str(), path = %path, status = response.status, "api response");

        if response.status == 401 && authenticated {
            return Err(ApiError::Unauthorized);
        }

        if !response.is_success() {
            return Err(ApiError::Server {
                status: response.status,
                message: extract_server_message(response.body.as_ref()),
            });
        }

        Ok(response.body)
    }
}

fn to_body<S: serde::Serialize>(value: &S) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<D: DeserializeOwned>(body: Option<Value>) -> ApiResult<D> {
    let body = body.ok_or_else(|| ApiError::Decode("empty response body".to_string()))?;
    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TransportError;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[tokio::test]
    async fn test_login_returns_token() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/auth/login", 200, json!({"access_token": "T"}));
        let api = PlantApi::new(transport);

        let token = api.login(&Credentials::new("a@b.com", "x")).await.unwrap();
        assert_eq!(token, "T");

        let sent = api.transport().requests();
        assert_eq!(sent[0].body, Some(json!({"email": "a@b.com", "password": "x"})));
        assert_eq!(sent[0].bearer, None);
    }

    #[tokio::test]
    async fn test_login_401_is_a_server_error_not_expiry() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/auth/login", 401, json!({"msg": "Bad email or password"}));
        let api = PlantApi::new(transport);

        let err = api.login(&Credentials::new("a@b.com", "x")).await.unwrap_err();
        assert_eq!(err.server_message(), Some("Bad email or password"));
    }

    #[tokio::test]
    async fn test_authenticated_401_is_unauthorized() {
        let transport = ScriptedTransport::new()
            .respond(Method::Get, "/api/plants", 401, json!({"msg": "Token has expired"}));
        let api = PlantApi::new(transport);

        let err = api.list_plants("T").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(api.transport().requests()[0].bearer.as_deref(), Some("T"));
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let transport = ScriptedTransport::new().respond_empty(Method::Delete, "/api/plants/4", 204);
        let api = PlantApi::new(transport);

        api.delete_plant("T", 4).await.unwrap();
    }

    #[tokio::test]
    async fn test_water_sends_duration() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/api/plants/2/water", 202, json!({"status": "queued"}));
        let api = PlantApi::new(transport);

        let ack = api.water("T", 2, 5000).await.unwrap();
        assert_eq!(ack.status.as_deref(), Some("queued"));
        assert_eq!(
            api.transport().requests()[0].body,
            Some(json!({"duration_ms": 5000}))
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_network_error() {
        let transport = ScriptedTransport::new().fail(
            Method::Get,
            "/api/measurements/1",
            TransportError::Network("connection refused".to_string()),
        );
        let api = PlantApi::new(transport);

        let err = api.measurements("T", 1).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_malformed_plants_is_decode_error() {
        let transport = ScriptedTransport::new()
            .respond(Method::Get, "/api/plants", 200, json!({"plants": []}));
        let api = PlantApi::new(transport);

        let err = api.list_plants("T").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_create_plant_error_text() {
        let transport = ScriptedTransport::new()
            .respond(Method::Post, "/api/plants", 400, json!({"error": "Name is required"}));
        let api = PlantApi::new(transport);

        let plant = NewPlant {
            name: String::new(),
            plant_id: None,
        };
        let err = api.create_plant("T", &plant).await.unwrap_err();
        assert_eq!(err.user_message("Failed to add plant."), "Name is required");
    }
}
