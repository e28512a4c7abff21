//! modbroom bulk-deletes a WordPress site's pending ("hold") comments through the
//! [WP REST API](https://developer.wordpress.org/rest-api/reference/comments/), fanning
//! deletions out to a bounded set of concurrent workers.
//!
//! ```no_run
//! use modbroom::{Client, SweepConfig, Sweeper};
//!
//! # async fn f() -> Result<(), Box<dyn std::error::Error>> {
//! // Credentials are an administrator account or application password
//! let client = Client::new("https://blog.example", "admin", "hunter2");
//!
//! // Sweep the moderation queue with default settings (trash, not permanent)
//! let report = Sweeper::new(client, SweepConfig::default()).run().await?;
//!
//! println!("{} deleted, {} failed", report.succeeded, report.failed);
//! # Ok(())
//! # }
//! ```
//!
//! Deletion is idempotent: a comment that is already gone (HTTP 410) counts as
//! success, so re-running after partial failures is always safe.

#![deny(elided_lifetimes_in_paths)]
#![warn(clippy::pedantic, missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod client;
mod comment;
mod error;
mod retry;
mod sweep;

pub use crate::client::Client;
pub use crate::comment::{Comment, CommentId};
pub use crate::error::Error;
pub use crate::retry::RetryPolicy;
pub use crate::sweep::{DeleteOutcome, SweepConfig, SweepReport, Sweeper};
