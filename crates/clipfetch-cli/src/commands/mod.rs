//! Command implementations for the clipfetch CLI

mod actions;
mod browse;
mod completions;
mod download;
mod search;

pub use browse::execute as browse;
pub use completions::generate as generate_completions;
pub use download::DownloadSink;
pub use search::execute as search;
