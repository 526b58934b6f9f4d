use actix_web::HttpResponse;
use anyhow::{Context, Result, ensure};
use log::error;
use reqwest::Response;
use serde::Serialize;
use switch_control_core::{ChannelConfig, DeviceStatus, ServoStatus, WifiConfig};

/// Trait for converting service results into HTTP responses
pub trait ServiceResultResponse {
    fn into_response(self) -> HttpResponse;
}

impl ServiceResultResponse for () {
    fn into_response(self) -> HttpResponse {
        HttpResponse::NoContent().finish()
    }
}

fn json_response<T: Serialize>(value: &T, name: &str) -> HttpResponse {
    match serde_json::to_string(value) {
        Ok(json) => HttpResponse::Ok()
            .content_type("application/json")
            .body(json),
        Err(e) => {
            error!("failed to serialize {name}: {e:#}");
            HttpResponse::InternalServerError().body("failed to serialize response")
        }
    }
}

impl ServiceResultResponse for ChannelConfig {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "ChannelConfig")
    }
}

impl ServiceResultResponse for Vec<ChannelConfig> {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "channel configs")
    }
}

impl ServiceResultResponse for Vec<ServoStatus> {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "servo status")
    }
}

impl ServiceResultResponse for WifiConfig {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "WifiConfig")
    }
}

impl ServiceResultResponse for DeviceStatus {
    fn into_response(self) -> HttpResponse {
        json_response(&self, "DeviceStatus")
    }
}

/// Handle Result and convert the data to a Response
///
/// Errors are logged and answered with `500 Internal Server Error`.
///
/// # Arguments
/// * `result` - The Result to handle
/// * `operation` - Context message describing the operation
pub fn handle_service_result<T>(result: Result<T>, operation: &str) -> HttpResponse
where
    T: ServiceResultResponse,
{
    match result {
        Ok(data) => data.into_response(),
        Err(e) => {
            error!("{operation} failed: {e:#}");
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

/// Handle HTTP response by checking status and extracting body
///
/// # Arguments
/// * `res` - The HTTP response to handle
/// * `context_msg` - Context message describing the request (e.g., "switch request")
///
/// # Returns
/// * `Ok(String)` - The response body if the status is successful
/// * `Err` - If the status is not successful or reading the body fails
pub async fn handle_http_response(res: Response, context_msg: &str) -> Result<String> {
    let status = res.status();
    let body = res.text().await.context("failed to read response body")?;

    ensure!(
        status.is_success(),
        "{context_msg} failed with status {status} and body: {body}"
    );

    Ok(body)
}
