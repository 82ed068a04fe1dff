//! Common utilities and shared types for snapfeed.
//!
//! This crate provides foundational components used across all snapfeed crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Tokens**: JWT issuance and verification via [`TokenIssuer`]
//! - **Storage**: File storage backends for uploaded images
//!
//! # Example
//!
//! ```no_run
//! use snapfeed_common::{AppResult, Config, TokenIssuer};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let tokens = TokenIssuer::new(&config.auth);
//!     let token = tokens.issue(1, "alice")?;
//!     println!("Issued token: {token}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;
pub mod token;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{
    LocalStorage, StorageBackend, StorageCategory, StoredFile, generate_storage_key,
};
pub use token::{Claims, TokenIssuer};
