//! Error types for the preview service.
//!
//! Errors are rendered as minimal HTML pages rather than JSON, since the
//! consumers are browsers and link-preview crawlers. Error responses always
//! carry cache-busting headers so a transient failure is never served stale.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};

use crate::routes::headers::no_store_headers;

/// Preview service error type.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// No content key was supplied with the request.
    #[error("missing content key")]
    MissingKey,

    /// The store returned zero rows for the resolved filter.
    #[error("not found: {kind} '{key}'")]
    NotFound {
        /// Human-readable entity kind label.
        kind: &'static str,
        /// The requested key.
        key: String,
    },

    /// The store responded with a non-success status.
    #[error("upstream store returned status {status}")]
    Upstream {
        /// The store's HTTP status code, mirrored back to the client.
        status: u16,
    },

    /// A store row did not match the expected field projection.
    #[error("malformed store row: {0}")]
    Decode(#[source] serde_json::Error),

    /// Internal server error (transport, rendering, etc.).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<reqwest::Error> for PreviewError {
    fn from(err: reqwest::Error) -> Self {
        Self::Internal(anyhow::anyhow!("store request failed: {err}"))
    }
}

impl PreviewError {
    /// HTTP status for this error. Upstream failures mirror the store's code
    /// when it is a valid status, falling back to 502.
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingKey => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Upstream { status } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::Decode(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (title, message) = match &self {
            Self::MissingKey => (
                "Falta el identificador",
                "No content key was supplied. Use /novedades/{id-or-slug} or ?id=.".to_string(),
            ),
            Self::NotFound { kind, key } => {
                tracing::debug!(kind, key = %key, "content not found");
                (
                    "No encontrado",
                    format!("The requested {kind} was not found."),
                )
            }
            Self::Upstream { status } => {
                tracing::error!(upstream_status = status, "content store request failed");
                (
                    "Servicio no disponible",
                    "The content service is temporarily unavailable. Please try again later."
                        .to_string(),
                )
            }
            Self::Decode(err) => {
                tracing::error!(error = %err, "store row failed projection decode");
                (
                    "Error interno",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    "Error interno",
                    "An internal error occurred. Please try again later.".to_string(),
                )
            }
        };

        let markup = html! {
            (DOCTYPE)
            html lang="es" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    title { (title) }
                    meta name="robots" content="noindex";
                    style { (maud::PreEscaped(crate::render::components::ERROR_CSS)) }
                }
                body {
                    main class="error-page" {
                        h1 { (title) }
                        p { (message) }
                        a href="/" { "Volver al inicio" }
                    }
                }
            }
        };

        (status, no_store_headers(), markup).into_response()
    }
}
