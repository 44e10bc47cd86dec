//! Loopback HTTP server serving canned responses, for tests only.

use std::io::Cursor;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tiny_http::{Header, Response, Server};

/// Canned reply for one route.
#[derive(Debug, Clone)]
pub enum Reply {
    Html(String),
    Redirect(String),
    Status(u16),
}

/// A 200 HTML response with the given body.
pub fn ok(body: &str) -> Reply {
    Reply::Html(body.to_string())
}

/// A 301 response pointing at `location`.
pub fn redirect(location: &str) -> Reply {
    Reply::Redirect(location.to_string())
}

/// An empty response with the given status code.
pub fn status(code: u16) -> Reply {
    Reply::Status(code)
}

/// Running server; stopped when dropped.
pub struct TestServer {
    base: String,
    shutdown: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl TestServer {
    /// Base URL, e.g. `http://127.0.0.1:4242`.
    pub fn base(&self) -> &str {
        &self.base
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Serve `routes` keyed by request path. A route also matches requests
/// carrying a query string. Unknown paths get a 404.
pub fn serve(routes: Vec<(&str, Reply)>) -> TestServer {
    let server = Server::http("127.0.0.1:0").expect("start tiny_http server");
    let base = format!("http://{}", server.server_addr());
    let routes: Vec<(String, Reply)> = routes
        .into_iter()
        .map(|(path, reply)| (path.to_string(), reply))
        .collect();

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            let request = match server.recv_timeout(Duration::from_millis(50)) {
                Ok(Some(req)) => req,
                Ok(None) => continue,
                Err(_) => break,
            };

            let path = request.url().split('?').next().unwrap_or(request.url());
            let reply = routes
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, r)| r.clone())
                .unwrap_or(Reply::Status(404));
            let _ = request.respond(respond_with(reply));
        }
    });

    TestServer {
        base,
        shutdown: shutdown_tx,
        handle: Some(handle),
    }
}

fn respond_with(reply: Reply) -> Response<Cursor<Vec<u8>>> {
    match reply {
        Reply::Html(body) => Response::from_string(body).with_header(
            Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..])
                .expect("static header"),
        ),
        Reply::Redirect(location) => Response::from_string("")
            .with_status_code(301)
            .with_header(
                Header::from_bytes(&b"Location"[..], location.as_bytes())
                    .expect("location header"),
            ),
        Reply::Status(code) => Response::from_string("").with_status_code(code),
    }
}
