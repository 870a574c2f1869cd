//! State synchronization across memory, query string, and storage.
//!
//! A [`Synchronizer`] owns one typed state object (a page's filter state)
//! and keeps two derived surfaces consistent with it: the address bar's
//! query string and an optional, expiring persisted snapshot. At startup it
//! reconciles the three sources with the precedence URL > storage > defaults.
//!
//! # Architecture
//!
//! - **QueryMap**: order-preserving query-string codec
//! - **Codec**: per-field value/string transformers (built-in or custom)
//! - **Navigator**: the read-query / replace-query seam to the host router
//! - **Synchronizer**: the state owner and reconciliation logic
//!
//! Persistence goes through the `SnapshotStore` trait from
//! `statelink-storage`; hosts with asynchronous storage adapt it to the
//! synchronous contract before construction.
//!
//! # Example
//!
//! ```
//! use statelink_sync::{MemoryNavigator, SyncConfig, Synchronizer};
//! use statelink_types::StateObject;
//!
//! let config = SyncConfig::new(
//!     StateObject::new()
//!         .with("page", 1)
//!         .with("season", "current")
//!         .with("solo", false),
//! )
//! .url_fields(["page", "season", "solo"]);
//!
//! let navigator = MemoryNavigator::with_query("page=3&solo=1");
//! let mut sync = Synchronizer::new(config, navigator).unwrap();
//!
//! let state = sync.initialize().unwrap();
//! assert_eq!(state.get("page").unwrap().as_number(), Some(3.0));
//! assert_eq!(state.get("solo").unwrap().as_bool(), Some(true));
//! ```

mod codec;
mod config;
mod error;
mod navigator;
mod query;
mod synchronizer;

pub use codec::{Codec, FieldCodec};
pub use config::SyncConfig;
pub use error::{SyncError, SyncResult};
pub use navigator::{MemoryNavigator, Navigator};
pub use query::QueryMap;
pub use synchronizer::Synchronizer;
