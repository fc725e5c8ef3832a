//! Cucumber test runner for the step-definition suites.
//!
//! Orchestrates two suites, one per world:
//! - `HttpWorld`: exchange steps against a local stub server, registered
//!   as the named client `stub` in a before-hook
//! - `FileWorld`: filesystem assertion steps against a scratch file the
//!   harness creates up front
//!
//! The runner executes feature files sequentially:
//! ```text
//! tests/features/http_client.feature -> HttpWorld context
//! tests/features/file_checks.feature -> FileWorld context
//! ```

use std::{fs, io::Read, net::SocketAddr, thread};

use cucumber::World as _;
use futures::FutureExt as _;
use stepwire::{ClientConfig, FileWorld, HttpWorld};

const SCRATCH_DIR: &str = "target/bdd-scratch";
const SCRATCH_FILE: &str = "target/bdd-scratch/probe.txt";

/// Start a stub HTTP server echoing request details as JSON.
///
/// Every request is answered with status 200, `Content-Type:
/// application/json`, and a body of the form
/// `{"status":"ok","method":"GET","path":"/info"}` so scenarios can assert
/// on what the server saw.
fn start_stub_server() -> SocketAddr {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind stub server");
    let addr = match server.server_addr() {
        tiny_http::ListenAddr::IP(addr) => addr,
        other => panic!("unexpected stub listen address: {other:?}"),
    };

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            let payload = serde_json::json!({
                "status": "ok",
                "method": request.method().to_string(),
                "path": request.url(),
            });
            let header = tiny_http::Header::from_bytes(
                &b"Content-Type"[..],
                &b"application/json"[..],
            )
            .expect("static header");
            let response =
                tiny_http::Response::from_string(payload.to_string()).with_header(header);
            let _ = request.respond(response);
        }
    });
    addr
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let addr = start_stub_server();
    let base = format!("http://{addr}");

    HttpWorld::cucumber()
        .before(move |_feature, _rule, _scenario, world| {
            let config = ClientConfig::for_base_url(&base).expect("stub base url");
            async move {
                world.register_client("stub", config);
            }
            .boxed_local()
        })
        .run_and_exit("tests/features/http_client.feature")
        .await;

    fs::create_dir_all(SCRATCH_DIR).expect("create scratch dir");
    fs::write(SCRATCH_FILE, "probe contents\n").expect("write scratch file");
    FileWorld::run("tests/features/file_checks.feature").await;
}
