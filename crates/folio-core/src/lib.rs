//! Core runtime pieces for Folio.
//!
//! Folio models the interactive parts of a website as headless state machines
//! running on a single cooperative event loop. This crate holds the pieces
//! they share:
//!
//! - **Signals**: slot lists for publishing state changes
//! - **Timers**: one-shot/repeating timers, debouncing and throttling against
//!   a host-supplied clock
//! - **Frame scheduling**: idempotent "run before next paint" requests
//! - **Logging**: `tracing` targets and helpers
//!
//! # Debounce Example
//!
//! ```
//! use folio_core::Debouncer;
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut settle = Debouncer::new(Duration::from_millis(180));
//!
//! settle.trigger(start);
//! settle.trigger(start + Duration::from_millis(50));
//! assert!(!settle.poll(start + Duration::from_millis(200)));
//! assert!(settle.poll(start + Duration::from_millis(230)));
//! ```

mod error;
pub mod logging;
mod scheduler;
pub mod signal;
mod timer;

pub use error::{FolioError, Result, SignalError, TimerError};
pub use logging::PerfSpan;
pub use scheduler::{FrameRequest, FrameScheduler};
pub use signal::{ConnectionGuard, ConnectionId, Signal};
pub use timer::{Debouncer, Throttle, TimerId, TimerKind, TimerManager};
