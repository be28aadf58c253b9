// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Binary lock over a single-permit semaphore.

use std::{
	fmt,
	sync::atomic::{AtomicBool, Ordering},
};

use tracing::{trace, warn};

use crate::{
	clock::{Clock, Deadline, IntoTimeout, SystemClock, compute_deadline},
	error::{Error, Result},
	sync::semaphore::{DefaultSemaphore, RawSemaphore, binary_semaphore},
};

/// A non-reentrant lock whose single permit lives in a semaphore.
///
/// The semaphore alone provides mutual exclusion. The lock also keeps an
/// advisory `locked` flag used to reject a `release` without a matching
/// `acquire`. The flag is cleared with a compare-and-swap, so two racing
/// releases cannot both succeed, but it is not tied to the semaphore: right
/// after a successful semaphore wait, and right before the flag is stored,
/// another thread still sees the lock as not held.
///
/// Any thread may release the lock, not only the one that acquired it.
pub struct BinaryLock<S: RawSemaphore = DefaultSemaphore, C: Clock = SystemClock> {
	sem: S,
	locked: AtomicBool,
	clock: C,
}

impl BinaryLock {
	/// Creates an unlocked lock measuring timeouts with the system clock.
	pub fn new() -> Result<Self> {
		Self::with_clock(SystemClock)
	}
}

impl<C: Clock> BinaryLock<DefaultSemaphore, C> {
	/// Creates an unlocked lock measuring timeouts with `clock`.
	pub fn with_clock(clock: C) -> Result<Self> {
		Ok(Self::with_semaphore(binary_semaphore()?, clock))
	}
}

impl<S: RawSemaphore, C: Clock> BinaryLock<S, C> {
	/// Builds a lock over `sem`, which is expected to hold exactly one permit.
	pub fn with_semaphore(sem: S, clock: C) -> Self {
		Self {
			sem,
			locked: AtomicBool::new(false),
			clock,
		}
	}

	/// Whether this lock believes its permit is currently held.
	#[inline]
	pub fn is_locked(&self) -> bool {
		self.locked.load(Ordering::Acquire)
	}

	#[inline]
	pub(crate) fn clock(&self) -> &C {
		&self.clock
	}

	/// Blocks until the permit is taken.
	///
	/// Returns `false` only if the wait was interrupted by a signal.
	pub fn acquire(&self) -> Result<bool> {
		self.acquire_until(None)
	}

	/// Blocks until the permit is taken or `timeout` seconds elapse.
	///
	/// Returns `false` when the timeout elapsed or the wait was interrupted.
	/// The timeout is validated before the semaphore is touched.
	pub fn acquire_timeout(&self, timeout: impl IntoTimeout) -> Result<bool> {
		let deadline = compute_deadline(&self.clock, timeout)?;
		self.acquire_until(Some(&deadline))
	}

	pub(crate) fn acquire_until(&self, deadline: Option<&Deadline>) -> Result<bool> {
		trace!(?deadline, "lock acquire");
		let acquired = self.sem.wait(deadline)?;
		if acquired {
			self.locked.store(true, Ordering::Release);
		}
		trace!(acquired, "lock acquire returned");
		Ok(acquired)
	}

	/// Hands the permit back.
	///
	/// Fails with [`Error::ReleaseUnlocked`] if the lock is not held. If the
	/// semaphore refuses the permit the lock stays held.
	pub fn release(&self) -> Result<()> {
		if self.locked.compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire).is_err() {
			return Err(Error::ReleaseUnlocked);
		}

		if let Err(err) = self.sem.post() {
			self.locked.store(true, Ordering::Release);
			return Err(err);
		}

		trace!("lock released");
		Ok(())
	}

	/// Acquires the lock and returns a guard releasing it on drop.
	///
	/// `None` means the wait was interrupted.
	pub fn lock(&self) -> Result<Option<BinaryLockGuard<'_, S, C>>> {
		Ok(self.acquire()?.then(|| BinaryLockGuard::new(self)))
	}

	/// Like [`lock`](Self::lock), giving up after `timeout` seconds.
	pub fn lock_timeout(&self, timeout: impl IntoTimeout) -> Result<Option<BinaryLockGuard<'_, S, C>>> {
		Ok(self.acquire_timeout(timeout)?.then(|| BinaryLockGuard::new(self)))
	}
}

impl<S: RawSemaphore, C: Clock> fmt::Debug for BinaryLock<S, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BinaryLock").field("locked", &self.is_locked()).finish()
	}
}

/// Holds the permit of a [`BinaryLock`] until dropped.
#[must_use = "if unused the lock is released immediately"]
pub struct BinaryLockGuard<'a, S: RawSemaphore = DefaultSemaphore, C: Clock = SystemClock> {
	lock: &'a BinaryLock<S, C>,
	released: bool,
}

impl<'a, S: RawSemaphore, C: Clock> BinaryLockGuard<'a, S, C> {
	fn new(lock: &'a BinaryLock<S, C>) -> Self {
		Self {
			lock,
			released: false,
		}
	}

	/// Releases the permit now, reporting a failure instead of logging it.
	pub fn unlock(mut self) -> Result<()> {
		self.released = true;
		self.lock.release()
	}
}

impl<S: RawSemaphore, C: Clock> Drop for BinaryLockGuard<'_, S, C> {
	fn drop(&mut self) {
		if self.released {
			return;
		}
		if let Err(err) = self.lock.release() {
			warn!(error = %err, "binary lock guard failed to release");
		}
	}
}
