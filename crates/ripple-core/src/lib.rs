//! Ripple CI Core
//!
//! Domain types, port traits, and the policy logic that sits on top of them:
//! the snapshot cache manager and the test details read model.
//! Storage and HTTP live in other crates and only talk to this one
//! through the traits in [`ports`].

pub mod build;
pub mod clock;
pub mod error;
pub mod gc;
pub mod ids;
pub mod ports;
pub mod project;
pub mod snapshot;
pub mod test_case;
pub mod test_details;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{Error, Result};
pub use gc::{GcConfig, SnapshotCacheManager};
pub use ids::*;
pub use test_details::TestDetailsService;
