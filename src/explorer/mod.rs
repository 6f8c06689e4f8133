//! Related-artist graph exploration.
//!
//! The [`Explorer`] drives a session against any [`CatalogApi`](crate::catalog::CatalogApi):
//! seed artists come from featured collections, then each frontier artist is
//! expanded through its related artists until nothing new turns up.
//!
//! # Architecture
//!
//! ```text
//! Explorer
//!   ├── Registry          (artists recorded, in discovery order)
//!   ├── Frontier          (ids waiting for expansion, each admitted once)
//!   ├── PendingBatches    (seed ids waiting for detail lookups)
//!   ├── CooldownSchedule  (pause every N requests)
//!   └── Shutdown          (Ctrl-C or caller-driven cancellation)
//! ```

pub mod batch;
pub mod budget;
pub mod engine;
pub mod frontier;
pub mod registry;
pub mod shutdown;

pub use batch::PendingBatches;
pub use budget::CooldownSchedule;
pub use engine::{
    Explorer, ExplorerConfig, ExplorerEvent, ExplorerState, FailurePolicy, SessionSummary,
};
pub use frontier::Frontier;
pub use registry::{ArtistStore, Registry};
pub use shutdown::{Shutdown, ShutdownTrigger};
