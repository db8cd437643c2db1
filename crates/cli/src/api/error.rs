use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine_core::error::SyncError;
use serde_json::{Value, json};
use tracing::error;

/// A `SyncError` on its way out as a JSON response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: SyncError,
}

impl ApiError {
    pub fn status_code(error: &SyncError) -> StatusCode {
        match error {
            SyncError::UnsupportedTable { .. }
            | SyncError::MalformedRequest(_)
            | SyncError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            SyncError::Storage(_) | SyncError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// For routes addressing a table by path, an unknown name is a 404.
    pub fn table_route(error: SyncError) -> Self {
        match error {
            SyncError::UnsupportedTable { .. } => Self {
                status: StatusCode::NOT_FOUND,
                error,
            },
            other => other.into(),
        }
    }

    /// A body axum refused to buffer, such as one over the size limit.
    pub fn body_rejected(rejection: BytesRejection) -> Self {
        Self {
            status: rejection.status(),
            error: SyncError::MalformedRequest(rejection.body_text()),
        }
    }

    fn body(&self) -> Value {
        let mut body = json!({
            "success": false,
            "error": self.error.to_string(),
        });

        match &self.error {
            SyncError::UnsupportedTable { supported, .. } => {
                body["supported_tables"] = json!(supported);
            }
            SyncError::ValidationFailed(report) => {
                body["validation_errors"] = json!(report.validation_errors);
                body["total_errors"] = json!(report.total_errors);
                body["sample_data"] = json!(report.sample_data);
            }
            _ => {}
        }

        body
    }
}

impl From<SyncError> for ApiError {
    fn from(error: SyncError) -> Self {
        Self {
            status: Self::status_code(&error),
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(error = %self.error, "Request failed");
        }
        (self.status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::error::ValidationReport;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::status_code(&SyncError::MalformedRequest("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::status_code(&SyncError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let unknown = SyncError::UnsupportedTable {
            table: "nope".into(),
            supported: vec!["acc_users".into()],
        };
        assert_eq!(ApiError::status_code(&unknown), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::table_route(unknown).status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_body_carries_diagnostics() {
        let err = ApiError::from(SyncError::ValidationFailed(ValidationReport {
            validation_errors: Vec::new(),
            total_errors: 7,
            sample_data: vec![json!({"code": ""})],
        }));

        let body = err.body();
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"], json!("Data validation failed"));
        assert_eq!(body["total_errors"], json!(7));
        assert_eq!(body["sample_data"], json!([{"code": ""}]));
    }
}
