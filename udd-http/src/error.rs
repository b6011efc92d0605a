use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("{0}")]
    Resource(#[from] udd_resource::Error),

    #[error("Database error: {0}")]
    Store(#[from] udd_store_db::Error),

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Worker thread failed: {0}")]
    Blocking(#[from] actix_web::error::BlockingError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration: {reason}")]
    Invalid { reason: String },
}

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Server startup failed: {reason}")]
    Startup { reason: String },

    #[error("Failed to render metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Extension trait for adding context to IO errors
pub trait IoErrorContext<T> {
    fn io_context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> IoErrorContext<T> for std::result::Result<T, std::io::Error> {
    fn io_context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ApiError::Io {
            context: context.into(),
            source: e,
        })
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        use udd_resource::Error as E;
        match self {
            ApiError::Resource(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Resource(E::UnknownFilter { .. } | E::InvalidPrimaryKey { .. }) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (level, message) = self.log_record();
        log::log!(level, "{message}");
        HttpResponse::build(self.status_code())
            .insert_header(ContentType(mime::TEXT_PLAIN_UTF_8))
            .body(self.to_string())
    }
}

impl ApiError {
    /// Level and line logged when this error reaches the request boundary.
    fn log_record(&self) -> (log::Level, String) {
        use udd_resource::Error as E;
        match self {
            ApiError::Resource(e @ E::CorruptedDatabase { .. }) => {
                (log::Level::Error, e.to_string())
            }
            ApiError::Resource(e) if e.is_fatal() => (
                log::Level::Error,
                format!("Declared schema does not match the database: {e}"),
            ),
            _ if self.status_code().is_server_error() => {
                (log::Level::Error, format!("Request failed: {self}"))
            }
            _ => (log::Level::Debug, format!("Request rejected: {self}")),
        }
    }
}
