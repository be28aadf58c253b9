// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Thread synchronization primitives for embedding in a host runtime.
//!
//! - [`EventFlag`]: manual-reset event with broadcast wake and timed waits.
//! - [`BinaryLock`]: single-permit semaphore lock with timed acquisition and
//!   release-without-acquire detection.
//! - [`Condition`] and [`InterruptibleEvent`]: a condition variable and an
//!   event built from binary locks, whose waits end when a signal arrives.
//!
//! Timeouts are given in seconds and turned into an absolute [`Deadline`]
//! before any lock is touched. Timing out is a normal `false` result, never an
//! error.
//!
//! The native backend (feature `native`, default) uses POSIX
//! `pthread_mutex_t`, `pthread_cond_t` and `sem_t`. The `portable` feature,
//! or a target without unnamed POSIX semaphores, selects parking_lot instead.

pub mod clock;
pub mod error;
pub mod sync;

pub use clock::{Clock, Deadline, IntoTimeout, SystemClock, TIMEOUT_MAX, compute_deadline};
pub use error::{Error, Operation, Resource, Result};
pub use sync::{BinaryLock, BinaryLockGuard, Condition, EventFlag, InterruptibleEvent};
