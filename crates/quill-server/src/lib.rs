//! Quill Server — configuration loading and service wiring for the
//! `quill` binary.

pub mod app;
pub mod settings;

pub use app::App;
pub use settings::{ServerConfig, load};

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str =
    "quill=info,quill_server=info,quill_auth=info,quill_content=info,quill_db=info";
