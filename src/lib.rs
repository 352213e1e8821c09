//! # notas
//!
//! Client for a remote collection of grade records (class, student, grade).
//! It lists, creates, updates and deletes grades through a REST API and keeps
//! a rendered list that is rebuilt from the server after every change.
//!
//! ```rust,no_run
//! use notas::config::ConnectionConfig;
//! use notas::sync::GradeSync;
//! use notas::utils::api::HttpGradesApi;
//! use notas::utils::prompt::TerminalPrompter;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConnectionConfig::fixed("http://localhost:5000/grades");
//!     let mut sync = GradeSync::new(HttpGradesApi::new()?, config, TerminalPrompter::default());
//!     let _ = sync.refresh().await;
//!     print!("{}", sync.list());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod sync;
pub mod utils;
