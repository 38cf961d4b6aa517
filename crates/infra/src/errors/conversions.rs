//! Error newtype that keeps conversions on the infrastructure side and can
//! be converted back into the domain error.

use learnarc_domain::LearnArcError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Infrastructure error wrapper around the domain error.
#[derive(Debug)]
pub struct InfraError(pub LearnArcError);

impl From<InfraError> for LearnArcError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LearnArcError> for InfraError {
    fn from(value: LearnArcError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoLearnArcError {
    fn into_learnarc(self) -> LearnArcError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → LearnArcError */
/* -------------------------------------------------------------------------- */

impl IntoLearnArcError for SqlError {
    fn into_learnarc(self) -> LearnArcError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        LearnArcError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        LearnArcError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        LearnArcError::Database("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        LearnArcError::Database("foreign key constraint violation".into())
                    }
                    _ => LearnArcError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => LearnArcError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                LearnArcError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                LearnArcError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                LearnArcError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidQuery => LearnArcError::Database("invalid SQL query".into()),
            other => LearnArcError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_learnarc())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → LearnArcError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(LearnArcError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LearnArcError */
/* -------------------------------------------------------------------------- */

impl IntoLearnArcError for HttpError {
    fn into_learnarc(self) -> LearnArcError {
        if self.is_timeout() {
            return LearnArcError::Network("http request timed out".into());
        }
        if self.is_connect() {
            return LearnArcError::Network(format!("connection failed: {self}"));
        }
        if self.is_decode() {
            return LearnArcError::Provider(format!("failed to decode response body: {self}"));
        }
        LearnArcError::Network(format!("http error: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_learnarc())
    }
}
