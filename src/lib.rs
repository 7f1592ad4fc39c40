//! Lesson Scheduler - Availability-driven private lesson scheduler
//!
//! This library assigns private-lesson time slots to students from a
//! teacher's open windows and each student's submitted availability, using
//! min-cost-flow optimization.
//!
//! # Algorithm Overview
//!
//! The engine works in 5 phases:
//! 1. **Slot Grid**: Collapse availability rows into per-day teacher slots
//!    and per-student acceptance sets
//! 2. **Candidates**: Enumerate which students can start at which slots,
//!    validating contiguous blocks for multi-slot lessons
//! 3. **Flow Network**: Build the layered source/day/slot/student/sink
//!    graph with day-opening costs and quadratic gap penalties
//! 4. **Min-Cost Flow**: Successive shortest paths with potentials,
//!    rewiring day throughput and blocked slots on every augmentation
//! 5. **Extraction**: Resolve saturated edges into a deterministic,
//!    conflict-free lesson list
//!
//! # Example
//!
//! ```no_run
//! use lesson_scheduler::scheduler::generate_for_schedule;
//! use lesson_scheduler::store::JsonScheduleStore;
//! use lesson_scheduler::types::{ScheduleId, SolverOptions};
//! use std::path::Path;
//!
//! let store = JsonScheduleStore::load_dir(Path::new("./data/demo")).unwrap();
//! let result =
//!     generate_for_schedule(&store, ScheduleId(1), &SolverOptions::default(), true).unwrap();
//! println!("Scheduled {} students", result.scheduled_count);
//! ```

pub mod error;
pub mod reporter;
pub mod scheduler;
pub mod store;
pub mod types;
pub mod validator;

pub use error::{Result, SchedulerError};
