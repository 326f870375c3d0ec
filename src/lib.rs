//! # relcheck
//!
//! A library for checking whether running software is up to date with the
//! latest GitHub release of its repository.
//!
//! ## Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use relcheck::{UpdateChecker, UpdateCheckerConfig, UpdateStatus};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UpdateCheckerConfig::new("https://github.com/owner/repo")
//!         .timeout(Duration::from_secs(5))
//!         .max_attempts(3);
//!
//!     let checker = UpdateChecker::new(config)?;
//!     let result = checker.check_for_updates(env!("CARGO_PKG_VERSION")).await;
//!
//!     println!("{}", result.message);
//!     if result.status == UpdateStatus::Outdated {
//!         if let Some(release) = result.release_info {
//!             println!("Get it at {}", release.html_url);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

mod checker;
mod display;
mod error;
mod fetcher;
mod resolver;
mod types;
mod version;

pub use checker::{check_for_updates, UpdateChecker};
pub use display::{format_release_date, report, DisplayColor, ReportLine};
pub use error::{Result, UpdateCheckError};
pub use fetcher::ReleaseFetcher;
pub use resolver::{resolve, resolve_with_base};
pub use types::{ReleaseInfo, UpdateCheckerConfig, UpdateStatus, VersionComparison, DEFAULT_BODY_LIMIT};
pub use version::{compare, normalize, FALLBACK_VERSION};
