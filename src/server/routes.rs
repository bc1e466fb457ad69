use std::io::Cursor;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use tiny_http::{Header, Method, Request, Response, StatusCode};
use tracing::debug;

use crate::server::broadcast::Broadcaster;
use crate::server::sse::{write_frame, KEEPALIVE, STREAM_HEAD};

const VIEWER_HTML: &str = include_str!("assets/viewer.html");

/// Idle time after which an event stream gets a keep-alive comment.
pub const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn content_type(value: &str) -> Header {
    Header::from_bytes(&b"Content-Type"[..], value.as_bytes()).expect("static header is valid")
}

pub fn html_response(body: &str) -> Response<Cursor<Vec<u8>>> {
    let bytes = body.as_bytes().to_vec();
    let len = bytes.len();
    Response::new(
        StatusCode(200),
        vec![content_type("text/html; charset=utf-8")],
        Cursor::new(bytes),
        Some(len),
        None,
    )
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    let body = b"404 Not Found".to_vec();
    let len = body.len();
    Response::new(
        StatusCode(404),
        vec![content_type("text/plain")],
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn unavailable() -> Response<Cursor<Vec<u8>>> {
    let body = b"503 Service Unavailable".to_vec();
    let len = body.len();
    Response::new(
        StatusCode(503),
        vec![content_type("text/plain")],
        Cursor::new(body),
        Some(len),
        None,
    )
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Routes one request. The event stream takes ownership of the request and
/// blocks for as long as the viewer stays connected.
pub fn dispatch(request: Request, broadcaster: Arc<Broadcaster>) {
    let method = request.method().clone();
    let path = request.url().split('?').next().unwrap_or("").to_owned();

    if method == Method::Get && path == "/events" {
        stream_events(request, &broadcaster);
        return;
    }

    let response = match (method, path.as_str()) {
        (Method::Get, "/") | (Method::Get, "/index.html") => html_response(VIEWER_HTML),
        _ => not_found(),
    };
    let _ = request.respond(response);
}

/// `GET /events`: replays the retained frames, then forwards every frame
/// the broadcaster hands this subscriber until the viewer goes away.
fn stream_events(request: Request, broadcaster: &Broadcaster) {
    let peer = request.remote_addr().copied();
    let mut writer = request.into_writer();
    if write_frame(&mut writer, STREAM_HEAD).is_err() {
        return;
    }

    let rx = broadcaster.subscribe();
    debug!(?peer, "viewer connected");

    loop {
        let frame = match rx.recv_timeout(KEEPALIVE_INTERVAL) {
            Ok(frame) => frame,
            Err(RecvTimeoutError::Timeout) => Arc::from(KEEPALIVE),
            Err(RecvTimeoutError::Disconnected) => return,
        };
        if write_frame(&mut writer, &frame).is_err() {
            debug!(?peer, "viewer disconnected");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_subscribes_to_event_stream() {
        assert!(VIEWER_HTML.contains("new EventSource('/events')"));
        assert!(VIEWER_HTML.contains("'update'"));
        assert!(VIEWER_HTML.contains("'done'"));
    }

    #[test]
    fn test_not_found_status() {
        assert_eq!(not_found().status_code(), StatusCode(404));
        assert_eq!(html_response("<p>").status_code(), StatusCode(200));
        assert_eq!(unavailable().status_code(), StatusCode(503));
    }
}
