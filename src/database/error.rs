use std::fmt::{self, Display};

use warp::reject::{Reject, Rejection};

/// Error surfaced to the client. Rendered as `{"detail": ...}` JSON by the
/// rejection handler.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub code: u16,
    pub info: Option<String>,
}

impl Reject for ApiError {}

#[derive(Debug, Clone, Copy)]
pub enum RequestError {
    InvalidRequest,
    Unauthorized,
    NotFound,
    InternalServerError,
}

impl RequestError {
    pub fn new(self, info: &str) -> ApiError {
        ApiError {
            code: self.code(),
            info: Some(info.to_string()),
        }
    }

    pub fn default(self) -> ApiError {
        ApiError {
            code: self.code(),
            info: None,
        }
    }

    fn code(self) -> u16 {
        match self {
            RequestError::InvalidRequest => 400,
            RequestError::Unauthorized => 401,
            RequestError::NotFound => 404,
            RequestError::InternalServerError => 500,
        }
    }
}

pub struct QueryError {
    info: String,
}

impl QueryError {
    pub fn new(info: String) -> Self {
        Self { info }
    }
}

impl From<sqlx::Error> for QueryError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::Configuration(e) => Self::new(format!("{e}")),
            sqlx::Error::Database(e) => Self::new(format!("{e}")),
            sqlx::Error::Io(e) => Self::new(format!("{e}")),
            sqlx::Error::Tls(e) => Self::new(format!("{e}")),
            sqlx::Error::Protocol(e) => Self::new(format!("{e}")),
            sqlx::Error::RowNotFound => Self::new(format!("RowNotFound")),
            sqlx::Error::TypeNotFound { type_name } => {
                Self::new(format!("Type not found: {type_name}"))
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => {
                Self::new(format!("Column index out of bounds {index} ({len})"))
            }
            sqlx::Error::ColumnNotFound(e) => Self::new(format!("{e}")),
            sqlx::Error::ColumnDecode { index, source } => {
                Self::new(format!("Column decode {index} ({source})"))
            }
            sqlx::Error::Decode(e) => Self::new(format!("{e}")),
            sqlx::Error::AnyDriverError(e) => Self::new(format!("{e}")),
            sqlx::Error::PoolTimedOut => Self::new(format!("Pool timed out")),
            sqlx::Error::PoolClosed => Self::new(format!("Pool closed")),
            sqlx::Error::WorkerCrashed => Self::new(format!("Worker crashed")),
            sqlx::Error::Migrate(e) => Self::new(format!("{e}")),
            _ => Self::new(format!("Unknown error")),
        }
    }
}

impl Into<ApiError> for QueryError {
    fn into(self) -> ApiError {
        ApiError {
            code: 500,
            info: Some(self.info),
        }
    }
}

#[derive(Debug)]
pub struct TypeError {
    info: String,
}

impl TypeError {
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_string(),
        }
    }
}

impl From<TypeError> for ApiError {
    fn from(value: TypeError) -> Self {
        RequestError::InvalidRequest.new(&value.info)
    }
}

impl Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.info)
    }
}

impl std::error::Error for TypeError {}

impl From<TypeError> for Rejection {
    fn from(value: TypeError) -> Self {
        warp::reject::custom(ApiError::from(value))
    }
}
