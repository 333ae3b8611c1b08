//! Plant API
//!
//! Client side of the plant-watering backend.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /auth/register` - Create an account
//! - `POST /auth/login` - Exchange credentials for a bearer token
//!
//! ## Plants (bearer)
//! - `GET /api/me` - Current user
//! - `GET /api/plants` - List plants
//! - `POST /api/plants` - Add a plant
//! - `DELETE /api/plants/:id` - Delete a plant
//! - `GET /api/measurements/:id` - Measurement history, newest first
//! - `POST /api/plants/:id/water` - Queue a timed watering

pub mod client;
pub mod dto;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod http;
pub mod transport;

pub use client::PlantApi;
pub use dto::{Credentials, NewPlant, UserProfile, WaterAck};
pub use error::{extract_server_message, ApiError, ApiResult, NETWORK_ERROR_MESSAGE};
#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpTransport;
pub use transport::{join_url, parse_body, ApiRequest, ApiResponse, Method, Transport, TransportError};
