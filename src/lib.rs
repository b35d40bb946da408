#[macro_use]
mod logging;

pub mod error;
pub mod history;
pub mod log_sink;
pub mod panel;
pub mod port;
pub mod settings;
pub mod terminal;
pub mod transform;

#[cfg(feature = "desktop")]
mod desktop;

pub use error::{ConnectionError, EncodeError, LogError, SettingsError, TerminalError};
pub use logging::{init_file_logging, stop_file_logging};
pub use terminal::{ConnectionState, Terminal, TerminalSnapshot};

#[cfg(feature = "desktop")]
pub use desktop::run;
