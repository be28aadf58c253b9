// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Blocking synchronization primitives.

pub mod condition;
pub mod event;
pub mod interruptible;
pub mod lock;
pub mod semaphore;

pub use condition::Condition;
pub use event::EventFlag;
pub use interruptible::InterruptibleEvent;
pub use lock::{BinaryLock, BinaryLockGuard};
pub use semaphore::{DefaultSemaphore, ParkingSemaphore, RawSemaphore};
#[cfg(hostsync_backend = "native")]
pub use semaphore::PosixSemaphore;
