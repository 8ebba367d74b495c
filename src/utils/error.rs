//! The `error` module defines the error type shared by the relay paths and
//! the HTTP layer.
//!
//! Clients only ever see a status code: every variant maps to a bare 500.
//! Details go to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::broker::BrokerError;
use crate::broker::message::DecodeError;
use crate::persistence::StoreError;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("provisioning failed: {0}")]
    Provisioning(#[source] BrokerError),
    #[error("publish failed: {0}")]
    Publish(#[source] BrokerError),
    #[error("push delivery could not be decoded: {0}")]
    Decode(#[from] DecodeError),
    #[error("envelope encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
    }
}
