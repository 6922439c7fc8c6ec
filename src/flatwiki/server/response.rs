//! HTTP replies and their mapping onto tiny_http responses.

use crate::error::WikiError;
use anyhow::{anyhow, Result};
use tiny_http::{Header, Request, Response, StatusCode};

const HTML: &str = "text/html; charset=utf-8";
const PLAIN: &str = "text/plain; charset=utf-8";

/// Outcome of one request, before it is written to the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Html(String),
    /// 302 to the given location.
    Redirect(String),
    /// Plain-text error with a status code.
    Error(u16, String),
}

impl Reply {
    pub fn not_found() -> Self {
        Reply::Error(404, "not found".to_string())
    }

    /// Map a failed operation to a reply. Server-side failures are logged
    /// and reported without detail.
    pub fn from_error(err: &WikiError) -> Self {
        match err {
            WikiError::InvalidRequest(msg) => Reply::Error(400, msg.clone()),
            err if err.is_not_found() => Reply::not_found(),
            err => {
                log::error!("request failed: {}", err);
                Reply::Error(500, "internal error".to_string())
            }
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Reply::Html(_) => 200,
            Reply::Redirect(_) => 302,
            Reply::Error(code, _) => *code,
        }
    }

    pub fn send(self, request: Request) -> Result<()> {
        let status = StatusCode(self.status());
        let response = match self {
            Reply::Html(body) => Response::from_string(body).with_header(header("Content-Type", HTML)?),
            Reply::Redirect(location) => Response::from_string(String::new())
                .with_header(header("Location", &location)?),
            Reply::Error(_, message) => {
                Response::from_string(message).with_header(header("Content-Type", PLAIN)?)
            }
        };
        request.respond(response.with_status_code(status))?;
        Ok(())
    }
}

fn header(field: &str, value: &str) -> Result<Header> {
    Header::from_bytes(field.as_bytes(), value.as_bytes())
        .map_err(|_| anyhow!("invalid header {}: {:?}", field, value))
}
