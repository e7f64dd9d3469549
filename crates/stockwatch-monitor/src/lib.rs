// SPDX-FileCopyrightText: 2026 Stockwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stock monitoring core.
//!
//! - [`tracker`]: last-known stock per item and transition classification
//! - [`scheduler`]: deferred message deletion
//! - [`summary`]: target scraping and the aggregate summary
//! - [`render`]: notification content
//! - [`lifecycle`]: when notifications are sent, edited and deleted
//! - [`driver`]: the check loop tying it together
//! - [`shutdown`]: signal-driven cancellation

pub mod driver;
pub mod lifecycle;
pub mod render;
pub mod scheduler;
pub mod shutdown;
pub mod summary;
pub mod tracker;

pub use driver::{CycleReport, Monitor};
pub use lifecycle::{LifecycleManager, Timings};
pub use render::{Notice, Renderer};
pub use scheduler::{DeferredDelete, DeferredScheduler, DeleteKind};
pub use summary::{Summary, SummaryBlock, SummaryBuilder, TargetScrape, brand_of};
pub use tracker::{ItemTracker, TrackedItem, Transition};
