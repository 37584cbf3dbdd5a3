//! CLI command handlers. Each command is in its own file.

mod checksum;
mod evict;
mod get;
mod inspect;

pub use checksum::print_sha256;
pub use evict::run_evict;
pub use get::{default_output, run_get};
pub use inspect::{run_key, run_path};
