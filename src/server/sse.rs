use std::io::Write;

// ---------------------------------------------------------------------------
// SSE framing
// ---------------------------------------------------------------------------

/// Status line and headers of an event stream. tiny_http cannot stream a
/// response body, so the handler writes these to the raw connection itself.
pub const STREAM_HEAD: &str = "HTTP/1.1 200 OK\r\n\
                               Content-Type: text/event-stream\r\n\
                               Cache-Control: no-cache\r\n\
                               Connection: keep-alive\r\n\
                               X-Accel-Buffering: no\r\n\
                               \r\n";

/// Formats a named SSE event with a JSON data payload.
///
/// Output format (per SSE spec):
/// ```text
/// event: <name>\n
/// data: <json>\n
/// \n
/// ```
pub fn format_sse_event(event_name: &str, json_data: &str) -> String {
    format!("event: {}\ndata: {}\n\n", event_name, json_data)
}

/// Keep-alive SSE comment. EventSource clients ignore lines starting with
/// `:`, but the traffic stops idle connections from timing out.
pub const KEEPALIVE: &str = ": ping\n\n";

/// Writes all bytes and flushes, so each frame leaves immediately.
pub fn write_frame<W: Write>(writer: &mut W, frame: &str) -> std::io::Result<()> {
    writer.write_all(frame.as_bytes())?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_format() {
        assert_eq!(format_sse_event("update", "{\"a\":1}"), "event: update\ndata: {\"a\":1}\n\n");
    }

    #[test]
    fn test_stream_head_ends_headers() {
        assert!(STREAM_HEAD.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(STREAM_HEAD.contains("Content-Type: text/event-stream\r\n"));
        assert!(STREAM_HEAD.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_write_frame() {
        let mut out = Vec::new();
        write_frame(&mut out, KEEPALIVE).unwrap();
        assert_eq!(out, b": ping\n\n");
    }
}
