pub mod client;
pub mod core;
pub mod invocation;
pub mod models;
pub mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use client::GitClient;
pub use self::core::{CommandExecutor, CommandRunner};
pub use models::{LogRecord, StatusRecord};
pub use parser::{parse_log, parse_status};
