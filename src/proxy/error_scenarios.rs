//! Canned upstream failures the proxy can inject instead of forwarding.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorScenario {
    pub name: &'static str,
    pub status: u16,
    pub title: &'static str,
    pub detail: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
    /// Held before responding
    pub delay_ms: u64,
}

pub static ERROR_SCENARIOS: &[ErrorScenario] = &[
    ErrorScenario {
        name: "server-error",
        status: 500,
        title: "Internal Server Error",
        detail: "The backend encountered an unexpected condition",
        retry_after_secs: None,
        delay_ms: 0,
    },
    ErrorScenario {
        name: "not-found",
        status: 404,
        title: "Not Found",
        detail: "The requested resource does not exist",
        retry_after_secs: None,
        delay_ms: 0,
    },
    ErrorScenario {
        name: "validation-error",
        status: 400,
        title: "Bad Request",
        detail: "One or more request parameters failed validation",
        retry_after_secs: None,
        delay_ms: 0,
    },
    ErrorScenario {
        name: "unauthorized",
        status: 401,
        title: "Unauthorized",
        detail: "Authentication is required to access this resource",
        retry_after_secs: None,
        delay_ms: 0,
    },
    ErrorScenario {
        name: "rate-limit",
        status: 429,
        title: "Too Many Requests",
        detail: "Request rate limit exceeded",
        retry_after_secs: Some(60),
        delay_ms: 0,
    },
    ErrorScenario {
        name: "service-unavailable",
        status: 503,
        title: "Service Unavailable",
        detail: "The backend is temporarily unavailable",
        retry_after_secs: Some(30),
        delay_ms: 0,
    },
    ErrorScenario {
        name: "timeout",
        status: 504,
        title: "Gateway Timeout",
        detail: "The backend did not respond in time",
        retry_after_secs: None,
        delay_ms: 5_000,
    },
];

pub fn find(name: &str) -> Option<&'static ErrorScenario> {
    ERROR_SCENARIOS.iter().find(|s| s.name == name)
}

impl ErrorScenario {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// RFC 7807 problem document for a request to `instance`
    pub fn problem(&self, instance: &str) -> serde_json::Value {
        json!({
            "type": format!("/__proxy/errors/{}", self.name),
            "title": self.title,
            "status": self.status,
            "detail": self.detail,
            "instance": instance,
        })
    }

    pub async fn respond(&self, instance: &str) -> Response {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }

        let mut response = (
            self.status_code(),
            [(header::CONTENT_TYPE, PROBLEM_CONTENT_TYPE)],
            self.problem(instance).to_string(),
        )
            .into_response();

        if let Some(secs) = self.retry_after_secs {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }

        response
    }
}
