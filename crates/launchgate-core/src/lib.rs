//! Launch gate decision engine.
//!
//! On launch the gate fetches a small remote document and decides whether to
//! interrupt the user with an alert, an optional update prompt, or a required
//! update prompt:
//! - Configuration model and the JSON document parser.
//! - Version comparison strategies.
//! - Dismissal memory over pluggable key-value stores.
//! - The pure decision function and the `LaunchGate` orchestrator that drives
//!   fetch, parse, decide and present.

mod decision;
mod error;
mod fetch;
mod gate;
mod memory;
mod model;
mod parse;
mod traits;
mod version;

/// Gate decision and the function that produces it.
pub use decision::{Decision, decide};
pub use error::{FetchError, GateError, ParseError, PresentError, StoreError};
/// HTTP adapter for the fetch collaborator.
pub use fetch::HttpFetcher;
/// Check-cycle orchestrator.
pub use gate::{CheckOutcome, Collaborators, GateOptions, LaunchGate};
/// Dismissal memory and its backing stores.
pub use memory::{DismissalMemory, InMemoryStore, JsonFileStore, KeyValueStore};
pub use model::{
    ALERT_REMEMBER_KEY, AlertSpec, Configuration, RememberableItem, UPDATE_REMEMBER_KEY,
    UpdateSpec,
};
/// JSON adapter for the parse collaborator.
pub use parse::JsonConfigParser;
pub use traits::{ConfigParser, Fetcher, Presenter, Prompt, UserAction};
pub use url::Url;
pub use version::{VersionComparison, is_older};
