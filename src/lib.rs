//! Step-definition glue binding Gherkin scenario text to HTTP exchange and
//! filesystem assertion actions.
//!
//! The crate exposes two cucumber worlds. [`HttpWorld`] accumulates a
//! pending request and a pending response expectation across steps, then
//! freezes each into a single action dispatched through the
//! [`ActionRunner`] seam against a registered or default endpoint.
//! [`FileWorld`] checks filesystem predicates on a declared path. A
//! harness-less cucumber test binary wires feature files to the worlds:
//!
//! ```no_run
//! use cucumber::World as _;
//! use stepwire::{FileWorld, HttpWorld};
//!
//! #[tokio::main]
//! async fn main() {
//!     HttpWorld::run("tests/features/http_client.feature").await;
//!     FileWorld::run("tests/features/file_checks.feature").await;
//! }
//! ```

pub mod client;
pub mod error;
pub mod exchange;
pub mod file;
pub mod raw;
pub mod runner;
mod steps;
pub mod table;
pub mod world;

pub use client::{ClientConfig, ClientRegistry, HttpEndpoint};
pub use error::{StepError, StepResult};
pub use exchange::{HttpExchange, HttpMethod, ReceiveExpectation, SendRequest};
pub use runner::{ActionRunner, ExchangeRunner};
pub use world::{FileWorld, HttpWorld};
