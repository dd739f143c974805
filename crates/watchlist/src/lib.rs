//! Watchlist store and schedule curation.
//!
//! The [`WatchlistStore`] owns the ordered list of watch items for one
//! session; everything else sees read-only snapshots. The
//! [`schedule`] module turns a snapshot plus a time budget into an
//! exact best-fit viewing schedule.

pub mod item;
pub mod schedule;
pub mod store;

pub use item::{WatchItem, WatchlistFile, WatchlistFileItem};
pub use schedule::{ScheduleRequest, ScheduleResult, curate};
pub use store::WatchlistStore;
