//! Request logging middleware
#![allow(dead_code)] // Used as middleware

use super::config::ServerConfig;
use axum::extract::State;
use axum::{
    body::Body,
    http::{header::HeaderMap, Request, Response},
    middleware::Next,
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{error, info};

#[derive(PartialEq, PartialOrd, Clone, Debug, clap::ValueEnum)]
pub enum RequestsLoggingLevel {
    None,
    Path,
    Headers,
    Full,
}

impl Default for RequestsLoggingLevel {
    fn default() -> Self {
        Self::Path
    }
}

impl std::fmt::Display for RequestsLoggingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

const MAX_LOGGABLE_BODY_LENGTH: usize = 1024;

enum ContentLengthParseResult {
    Ok(usize),
    No(&'static str),
}

fn parse_content_length(headers: &HeaderMap) -> ContentLengthParseResult {
    let value = match headers.get("content-length") {
        Some(x) => x,
        None => return ContentLengthParseResult::No("Content-length not set."),
    };

    let str_value = match value.to_str() {
        Ok(x) => x,
        Err(_) => {
            return ContentLengthParseResult::No("Could not get Content-length string value.")
        }
    };

    match str_value.parse::<usize>() {
        Ok(x) => ContentLengthParseResult::Ok(x),
        Err(_) => ContentLengthParseResult::No("Could not parse Content-length numeric value."),
    }
}

pub async fn log_requests(
    State(config): State<ServerConfig>,
    request: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    let level = config.requests_logging_level.clone();

    let start = Instant::now();

    let method = request.method().to_string();
    let uri = request.uri().to_string();

    if level > RequestsLoggingLevel::None {
        info!(">>> {} {}", method, uri);
    }

    if level >= RequestsLoggingLevel::Headers {
        info!("  Req Headers:");
        for header in request.headers().iter() {
            info!("    {:?}: {:?}", header.0, header.1);
        }
    }

    let mut response = next.run(request).await;

    if level >= RequestsLoggingLevel::Headers {
        info!("  Resp Headers:");
        for header in response.headers().iter() {
            info!("    {:?}: {:?}", header.0, header.1);
        }
    }

    if level >= RequestsLoggingLevel::Full {
        match parse_content_length(response.headers()) {
            ContentLengthParseResult::No(reason) => info!("  Resp Body: {}", reason),
            ContentLengthParseResult::Ok(size) => {
                if size < MAX_LOGGABLE_BODY_LENGTH {
                    let (parts, body) = response.into_parts();
                    let bytes = match axum::body::to_bytes(body, size).await {
                        Ok(bytes) => bytes,
                        Err(err) => {
                            error!("Failed to read response body: {:?}", err);
                            return Response::builder()
                                .status(500)
                                .body(axum::body::Body::from("Internal Server Error"))
                                .unwrap();
                        }
                    };
                    info!("  Resp Body:\n{}", String::from_utf8_lossy(&bytes));
                    response = Response::from_parts(parts, Body::from(bytes))
                } else {
                    info!("  Resp Body: Too big to log ({} bytes)", size);
                }
            }
        }
    }

    let status = response.status().as_u16();
    let duration = start.elapsed();

    if level > RequestsLoggingLevel::None {
        info!("<<< {} ({}ms)", status, duration.as_millis());
    }

    response
}
