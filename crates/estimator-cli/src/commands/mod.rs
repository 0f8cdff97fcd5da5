//! Command implementations.

pub mod chunks;
pub mod config;
pub mod process;

pub use self::chunks::execute_chunks;
pub use self::config::execute_config;
pub use self::process::execute_process;
