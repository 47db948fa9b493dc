// Connection handling module
// Serves one accepted TCP connection and writes access log entries

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Body, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, Version};
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::AppState;
use crate::handler;
use crate::logger::{self, AccessLogEntry};

/// Accept a connection unless `max_connections` is reached, then serve it
/// on its own task.
///
/// `shutdown` flips to `true` when the server stops accepting; open
/// connections then finish their current request and close.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    shutdown: &watch::Receiver<bool>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_connection_rejected(prev_count, max_conn);
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        shutdown.clone(),
    );
}

/// How long a connection asked to close may linger without a running request
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Request activity on one connection
#[derive(Debug)]
struct Activity {
    in_flight: AtomicUsize,
    last_active: Mutex<Instant>,
}

impl Activity {
    fn new() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            last_active: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_active.lock() {
            *last = Instant::now();
        }
    }

    fn begin(self: &Arc<Self>) -> InFlight {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.touch();
        InFlight(Arc::clone(self))
    }

    /// When the last request finished, or `None` while one is running
    fn idle_since(&self) -> Option<Instant> {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            return None;
        }
        Some(match self.last_active.lock() {
            Ok(last) => *last,
            Err(poisoned) => *poisoned.into_inner(),
        })
    }

    /// Resolve once no request has run for `limit`
    async fn idle_for(&self, limit: Duration) {
        loop {
            match self.idle_since() {
                Some(since) if since.elapsed() >= limit => return,
                Some(since) => tokio::time::sleep_until(since + limit).await,
                None => tokio::time::sleep(limit).await,
            }
        }
    }
}

/// Marks one request as running until dropped
struct InFlight(Arc<Activity>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.touch();
        self.0.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Serve the connection with HTTP/1.1 and release the counter slot when done.
///
/// Request headers must arrive within `read_timeout`; a keep-alive connection
/// with no request running for `keep_alive_timeout` is closed. A request that
/// reached the handler is always allowed to finish.
///
/// `tokio::spawn` places the task on any of the runtime's worker threads.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let idle_limit = Duration::from_secs(performance.keep_alive_timeout);
        let keep_alive = performance.keep_alive_timeout > 0;

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .header_read_timeout(Duration::from_secs(performance.read_timeout))
            .keep_alive(keep_alive);

        let activity = Arc::new(Activity::new());
        let service_state = Arc::clone(&state);
        let service_activity = Arc::clone(&activity);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                serve_request(
                    req,
                    peer_addr,
                    Arc::clone(&service_state),
                    service_activity.begin(),
                )
            }),
        );
        tokio::pin!(conn);

        // Set once a graceful close was requested; a connection still idle
        // at this deadline is dropped
        let mut close_deadline: Option<Instant> = None;
        let served = loop {
            tokio::select! {
                result = conn.as_mut() => break Some(result),
                _ = shutdown.changed(), if close_deadline.is_none() => {
                    conn.as_mut().graceful_shutdown();
                    close_deadline = Some(Instant::now() + CLOSE_GRACE);
                }
                () = activity.idle_for(idle_limit), if keep_alive && close_deadline.is_none() => {
                    logger::log_debug(&format!("[Connection] Closing idle connection from {peer_addr}"));
                    conn.as_mut().graceful_shutdown();
                    close_deadline = Some(Instant::now() + CLOSE_GRACE);
                }
                () = tokio::time::sleep_until(close_deadline.unwrap_or_else(Instant::now)), if close_deadline.is_some() => {
                    if activity.idle_since().is_some() {
                        break None;
                    }
                    close_deadline = Some(Instant::now() + CLOSE_GRACE);
                }
            }
        };

        if let Some(Err(err)) = served {
            logger::log_connection_error(&err);
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Run the request handler and record the exchange in the access log
async fn serve_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    _in_flight: InFlight,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = std::time::Instant::now();
    let entry = state
        .access_log_enabled()
        .then(|| access_entry(&req, peer_addr));

    let response = handler::handle_request(req, Arc::clone(&state)).await?;

    if let Some(mut entry) = entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time = started.elapsed();
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }
    Ok(response)
}

fn access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let uri = req.uri();
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    let header = |name: hyper::header::HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        target.to_string(),
    );
    entry.http_version = version_label(req.version()).to_string();
    entry.origin = header(hyper::header::ORIGIN);
    entry.user_agent = header(hyper::header::USER_AGENT);
    entry
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_entry_from_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/ai-tools?debug=1")
            .version(Version::HTTP_10)
            .header("Origin", "https://studio.example.com")
            .header("User-Agent", "curl/8.5.0")
            .body(())
            .unwrap();

        let entry = access_entry(&req, "10.1.2.3:55000".parse().unwrap());
        assert_eq!(entry.remote_addr, "10.1.2.3:55000");
        assert_eq!(entry.method, "POST");
        assert_eq!(entry.path, "/api/ai-tools?debug=1");
        assert_eq!(entry.http_version, "1.0");
        assert_eq!(entry.origin.as_deref(), Some("https://studio.example.com"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.5.0"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_activity_idle_only_without_requests() {
        let activity = Arc::new(Activity::new());
        assert!(activity.idle_since().is_some());

        let guard = activity.begin();
        assert!(activity.idle_since().is_none());
        let second = activity.begin();
        drop(guard);
        assert!(activity.idle_since().is_none());
        drop(second);
        assert!(activity.idle_since().is_some());
    }

    #[tokio::test]
    async fn test_idle_for_waits_out_running_request() {
        let activity = Arc::new(Activity::new());
        let guard = activity.begin();
        let started = Instant::now();

        let release = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            drop(guard);
        });

        activity.idle_for(Duration::from_millis(100)).await;
        // 300ms running plus 100ms idle
        assert!(started.elapsed() >= Duration::from_millis(400));
        release.await.unwrap();
    }

    #[test]
    fn test_access_entry_without_headers() {
        let req = Request::builder().uri("/healthz").body(()).unwrap();
        let entry = access_entry(&req, "127.0.0.1:1".parse().unwrap());
        assert_eq!(entry.method, "GET");
        assert_eq!(entry.http_version, "1.1");
        assert!(entry.origin.is_none());
        assert!(entry.user_agent.is_none());
    }
}
