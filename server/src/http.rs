//! A deliberately small HTTP/1.1 codec: enough to parse one JSON request
//! per connection and write one JSON response back, `Connection: close`.

use std::fmt;
use std::io;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

/// Request bodies beyond this size are rejected before reading them.
const MAX_BODY_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Options => "OPTIONS",
        })
    }
}

/// One parsed request. Only the headers the routes care about are kept.
#[derive(Debug)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub origin: Option<String>,
    pub body: Vec<u8>,
}

/// Reads one request off the stream.
///
/// Returns `Ok(None)` on a connection closed before sending anything.
/// Malformed requests surface as `io::ErrorKind::InvalidData` so the caller
/// can answer 400 instead of dropping the connection.
pub async fn read_request<R>(rx: &mut BufReader<R>) -> io::Result<Option<Request>>
where
    R: AsyncRead + Unpin,
{
    let mut line = String::new();
    if rx.read_line(&mut line).await? == 0 {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let method = match parts.next() {
        Some("GET") => Method::Get,
        Some("POST") => Method::Post,
        Some("OPTIONS") => Method::Options,
        other => return Err(invalid(format!("unsupported method {other:?}"))),
    };
    let path = parts
        .next()
        .ok_or_else(|| invalid("missing request target".to_string()))?
        .to_string();

    let mut content_length = 0;
    let mut origin = None;
    loop {
        let mut header = String::new();
        if rx.read_line(&mut header).await? == 0 {
            return Err(invalid("connection closed inside headers".to_string()));
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        let Some((name, value)) = header.split_once(':') else {
            continue;
        };
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            content_length = value
                .parse()
                .map_err(|_| invalid(format!("bad content-length {value:?}")))?;
        } else if name.eq_ignore_ascii_case("origin") {
            origin = Some(value.to_string());
        }
    }

    if content_length > MAX_BODY_SIZE {
        return Err(invalid(format!("body of {content_length} bytes is too large")));
    }
    let mut body = vec![0; content_length];
    rx.read_exact(&mut body).await?;

    Ok(Some(Request {
        method,
        path,
        origin,
        body,
    }))
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// A response about to be written: status code plus JSON body.
#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    /// A JSON response from any serializable payload.
    pub fn json<T: Serialize>(status: u16, payload: &T) -> Self {
        match serde_json::to_vec(payload) {
            Ok(body) => Self { status, body },
            Err(e) => Self::detail(500, &format!("response serialization failed: {e}")),
        }
    }

    /// An error response shaped `{"detail": ...}`.
    pub fn detail(status: u16, detail: &str) -> Self {
        Self::json(status, &serde_json::json!({ "detail": detail }))
    }

    /// An empty 204, used for CORS preflight.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: Vec::new(),
        }
    }
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Writes the response and closes the exchange. `allow_origin` adds the
/// CORS headers for an origin the settings accepted; `process_time` is the
/// request's wall-clock duration in seconds.
pub async fn write_response<W>(
    tx: &mut W,
    response: &Response,
    allow_origin: Option<&str>,
    process_time: f64,
) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut head = format!(
        "HTTP/1.1 {} {}\r\n\
         content-type: application/json\r\n\
         content-length: {}\r\n\
         connection: close\r\n\
         x-process-time: {process_time:.6}\r\n",
        response.status,
        reason(response.status),
        response.body.len(),
    );
    if let Some(origin) = allow_origin {
        head.push_str(&format!(
            "access-control-allow-origin: {origin}\r\n\
             access-control-allow-credentials: true\r\n\
             access-control-allow-methods: *\r\n\
             access-control-allow-headers: *\r\n"
        ));
    }
    head.push_str("\r\n");

    tx.write_all(head.as_bytes()).await?;
    tx.write_all(&response.body).await?;
    tx.flush().await
}
