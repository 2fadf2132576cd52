#![warn(clippy::pedantic)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the ssolink library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod activity;
pub mod actions;
pub mod browser;
pub mod client;
pub mod constants;
pub mod error;
pub mod handler;
pub mod models;
pub mod session;
pub mod storage;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use activity::ActivityMonitor;
pub use browser::{BrokerFrame, Browser, Environment};
pub use client::{Session, SsoClient};
pub use error::SsoError;
pub use models::{
    Action, ActionPayload, CheckAuthenticationOptions, ClientConfig, InitializeOptions,
    LogoutOptions, ResponseMessage, Tokens, User,
};
pub use storage::{KeyValueStorage, MemoryStorage};
pub use utils::callbacks::{FunctionCallbacks, ResponseCallback};
pub use utils::logging::LogLevel;
