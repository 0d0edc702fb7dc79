pub mod cli;
pub mod host;
pub mod render;
pub mod repl;

pub use cli::{CatalogFormat, Cli, Commands};
pub use host::{DirExportSink, MemoryClipboard};
