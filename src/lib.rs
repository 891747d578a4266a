// Library root
// -----------
// REST helper used by the integration tests of the media server. The
// binary (`main.rs`) wraps it in an interactive menu for manual runs.
//
// Module responsibilities:
// - `config`: server URL and credentials, from a home-dir file and env.
// - `error`: the `RestError` type returned by every call.
// - `rest`: `RestHelper`, one method per REST endpoint.
// - `logging`: tracing subscriber setup for the binary.
// - `ui`: terminal menu flows that delegate to `rest`.
pub mod config;
pub mod error;
pub mod logging;
pub mod rest;
pub mod ui;

pub use config::{effective_base_url, RestConfig};
pub use error::{RestError, Result};
pub use rest::{BroadcastSummary, RestHelper};
