//! Browser delivery for live training runs.
//!
//! A synchronous tiny_http server serves the viewer page and an SSE stream.
//! The accept loop runs on its own thread and every request gets a thread,
//! so a long-lived event stream never stalls page loads or training.

pub mod broadcast;
pub mod routes;
pub mod sse;

pub use broadcast::{Broadcaster, Frame, Subscription, DEFAULT_QUEUE_CAPACITY};

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tiny_http::Server;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Requests served at once. Every open event stream holds a slot until its
/// viewer disconnects; requests beyond the limit get a 503.
pub const MAX_CONNECTIONS: usize = 64;

/// Counts request threads in flight.
#[derive(Clone)]
struct ConnectionLimit {
    active: Arc<AtomicUsize>,
    max: usize,
}

/// Held by a request thread; frees its slot on drop.
struct ConnectionSlot(Arc<AtomicUsize>);

impl ConnectionLimit {
    fn new(max: usize) -> ConnectionLimit {
        ConnectionLimit { active: Arc::new(AtomicUsize::new(0)), max }
    }

    fn acquire(&self) -> Option<ConnectionSlot> {
        self.active
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < self.max).then(|| n + 1))
            .ok()
            .map(|_| ConnectionSlot(self.active.clone()))
    }
}

impl Drop for ConnectionSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

pub struct LiveServer {
    server: Arc<Server>,
    broadcaster: Arc<Broadcaster>,
    addr: SocketAddr,
    accept: JoinHandle<()>,
}

impl LiveServer {
    /// Binds `0.0.0.0:port` (0 picks a free port) and starts accepting.
    pub fn start(port: u16) -> Result<LiveServer> {
        let server = Server::http(("0.0.0.0", port)).map_err(|e| Error::Server(e.to_string()))?;
        let addr = server
            .server_addr()
            .to_ip()
            .ok_or_else(|| Error::Server("listener has no IP address".into()))?;
        let server = Arc::new(server);
        let broadcaster = Arc::new(Broadcaster::default());

        let accept = {
            let server = server.clone();
            let broadcaster = broadcaster.clone();
            let limit = ConnectionLimit::new(MAX_CONNECTIONS);
            thread::Builder::new()
                .name("live-accept".into())
                .spawn(move || {
                    for request in server.incoming_requests() {
                        let slot = match limit.acquire() {
                            Some(slot) => slot,
                            None => {
                                warn!(max = MAX_CONNECTIONS, "connection limit reached, request refused");
                                let _ = request.respond(routes::unavailable());
                                continue;
                            }
                        };
                        let broadcaster = broadcaster.clone();
                        thread::spawn(move || {
                            let _slot = slot;
                            routes::dispatch(request, broadcaster);
                        });
                    }
                })?
        };

        info!(%addr, "live server listening");
        Ok(LiveServer { server, broadcaster, addr, accept })
    }

    pub fn broadcaster(&self) -> Arc<Broadcaster> {
        self.broadcaster.clone()
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Browser URL of the viewer.
    pub fn url(&self) -> String {
        format!("http://localhost:{}", self.addr.port())
    }

    /// Blocks until the accept loop ends, which is normally never.
    pub fn join(self) -> Result<()> {
        self.accept
            .join()
            .map_err(|_| Error::Server("accept loop panicked".into()))
    }

    /// Stops accepting and waits for the accept loop to exit. Streams that
    /// are already open keep their threads until the viewer disconnects.
    pub fn shutdown(self) -> Result<()> {
        self.server.unblock();
        self.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_limit_refuses_past_max_and_frees_on_drop() {
        let limit = ConnectionLimit::new(2);
        let a = limit.acquire().unwrap();
        let _b = limit.acquire().unwrap();
        assert!(limit.acquire().is_none());

        drop(a);
        assert!(limit.acquire().is_some());
        assert_eq!(limit.active.load(Ordering::Acquire), 1);
    }
}
