// Infrastructure implementations for rmlog.

pub mod concurrency;
pub mod config;
pub mod fs;
pub mod go_parser;
pub mod printer;
pub mod project_loader;

pub use config::Config;
pub use go_parser::GoParser;
pub use printer::GoPrinter;
pub use project_loader::ProjectLoader;
