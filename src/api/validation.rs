use actix_web::HttpResponse;
use serde::Serialize;

/// Body of every failed request
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: None,
        }
    }
}

fn bad_request(message: &str, fields: Option<serde_json::Value>) -> actix_web::Error {
    let error_response = ErrorResponse {
        message: message.to_string(),
        fields,
    };
    actix_web::error::InternalError::from_response(
        "",
        HttpResponse::BadRequest().json(error_response),
    )
    .into()
}

/// Creates a configured JsonConfig with standardized error handling for the entire project
pub fn json_config() -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default().error_handler(|err, _req| match err {
        actix_web_validator::Error::Validate(validation_errors) => {
            let mut fields = serde_json::Map::new();
            for (field, errors) in validation_errors.field_errors() {
                let messages: Vec<String> = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Validation error in field: {}", field))
                    })
                    .collect();
                fields.insert(field.to_string(), serde_json::json!({ "errors": messages }));
            }
            bad_request("Validation failed", Some(serde_json::Value::Object(fields)))
        }
        actix_web_validator::Error::Deserialize(de_err) => {
            let err_string = de_err.to_string();

            let message = if err_string.contains("EOF while parsing") {
                "Request body is empty. Expected JSON payload"
            } else if err_string.contains("missing field") {
                "Missing required field"
            } else {
                "Invalid JSON format"
            };
            bad_request(message, None)
        }
        _ => bad_request("Validation failed", None),
    })
}

/// Query strings that fail to deserialize get the same JSON error body
pub fn query_config() -> actix_web::web::QueryConfig {
    actix_web::web::QueryConfig::default().error_handler(|err, _req| {
        bad_request("Invalid query parameters", Some(serde_json::json!({ "query": err.to_string() })))
    })
}

/// Non-numeric record identifiers in the path
pub fn path_config() -> actix_web::web::PathConfig {
    actix_web::web::PathConfig::default()
        .error_handler(|_err, _req| bad_request("Invalid identifier in path", None))
}
