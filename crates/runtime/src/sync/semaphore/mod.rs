// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Counting semaphores holding the permit of a [`BinaryLock`](crate::sync::BinaryLock).

use crate::{clock::Deadline, error::Result};

mod parking;
#[cfg(hostsync_backend = "native")]
mod posix;

pub use parking::ParkingSemaphore;
#[cfg(hostsync_backend = "native")]
pub use posix::PosixSemaphore;

cfg_if::cfg_if! {
	if #[cfg(hostsync_backend = "native")] {
		pub type DefaultSemaphore = PosixSemaphore;

		pub(crate) fn binary_semaphore() -> Result<DefaultSemaphore> {
			PosixSemaphore::new(1)
		}
	} else {
		pub type DefaultSemaphore = ParkingSemaphore;

		pub(crate) fn binary_semaphore() -> Result<DefaultSemaphore> {
			Ok(ParkingSemaphore::new(1))
		}
	}
}

/// A counting semaphore.
pub trait RawSemaphore: Send + Sync {
	/// Takes one permit, blocking until one is available or `deadline` passes.
	///
	/// Returns `Ok(false)` when the deadline elapsed or the wait was
	/// interrupted by a signal. Any other failure is an error.
	fn wait(&self, deadline: Option<&Deadline>) -> Result<bool>;

	/// Returns one permit, waking a blocked waiter if there is one.
	fn post(&self) -> Result<()>;
}
