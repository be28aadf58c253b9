// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Condition variable assembled from binary locks.
//!
//! Each waiter parks on a private [`BinaryLock`] whose permit it already holds,
//! and a notifier hands that permit back. Because the waiter blocks in a
//! semaphore wait, a signal delivered to its thread ends the wait early.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
	clock::{Clock, Deadline, IntoTimeout, SystemClock, compute_deadline},
	error::{Error, Result},
	sync::{lock::BinaryLock, semaphore::DefaultSemaphore},
};

type Waiter<C> = Arc<BinaryLock<DefaultSemaphore, C>>;

/// Condition variable whose waits can be cut short by signals.
pub struct Condition<C: Clock + Clone = SystemClock> {
	lock: BinaryLock<DefaultSemaphore, C>,
	waiters: Mutex<Vec<Waiter<C>>>,
}

impl Condition {
	/// Creates a condition measuring timeouts with the system clock.
	pub fn new() -> Result<Self> {
		Self::with_clock(SystemClock)
	}
}

impl<C: Clock + Clone> Condition<C> {
	/// Creates a condition measuring timeouts with `clock`.
	pub fn with_clock(clock: C) -> Result<Self> {
		Ok(Self {
			lock: BinaryLock::with_clock(clock)?,
			waiters: Mutex::new(Vec::new()),
		})
	}

	/// Acquires the outer lock.
	pub fn acquire(&self) -> Result<bool> {
		self.lock.acquire()
	}

	/// Acquires the outer lock, giving up after `timeout` seconds.
	pub fn acquire_timeout(&self, timeout: impl IntoTimeout) -> Result<bool> {
		self.lock.acquire_timeout(timeout)
	}

	/// Releases the outer lock.
	pub fn release(&self) -> Result<()> {
		self.lock.release()
	}

	/// Whether the outer lock is held by anyone.
	///
	/// Probes the lock with a zero timeout; the caller cannot tell whether it is
	/// the holder.
	pub fn is_owned(&self) -> Result<bool> {
		if self.lock.acquire_timeout(0)? {
			self.lock.release()?;
			return Ok(false);
		}
		Ok(true)
	}

	/// Number of threads currently parked in a wait.
	pub fn waiter_count(&self) -> usize {
		self.waiters.lock().len()
	}

	/// Releases the outer lock, waits for a notification, and reacquires the
	/// outer lock. Returns whether this waiter was notified.
	pub fn wait(&self) -> Result<bool> {
		self.wait_until(None)
	}

	/// Like [`wait`](Self::wait), giving up after `timeout` seconds.
	pub fn wait_timeout(&self, timeout: impl IntoTimeout) -> Result<bool> {
		let deadline = compute_deadline(self.lock.clock(), timeout)?;
		self.wait_until(Some(&deadline))
	}

	pub(crate) fn wait_until(&self, deadline: Option<&Deadline>) -> Result<bool> {
		if !self.is_owned()? {
			return Err(Error::NotOwned);
		}

		let waiter = Arc::new(BinaryLock::with_clock(self.lock.clock().clone())?);
		if !waiter.acquire()? {
			return Err(Error::WaiterUnavailable);
		}
		self.waiters.lock().push(Arc::clone(&waiter));

		if let Err(err) = self.lock.release() {
			self.discard(&waiter);
			return Err(err);
		}

		trace!(?deadline, "condition wait");
		let notified = waiter.acquire_until(deadline);
		let reacquired = self.reacquire();

		if !matches!(notified, Ok(true)) {
			self.discard(&waiter);
		}
		trace!(notified = matches!(notified, Ok(true)), "condition wait returned");

		reacquired?;
		notified
	}

	/// The caller entered the wait holding the outer lock and must leave it
	/// holding the lock again, so an interrupted acquire is repeated.
	fn reacquire(&self) -> Result<()> {
		while !self.lock.acquire()? {
			debug!("condition lock reacquire interrupted");
		}
		Ok(())
	}

	/// Wakes every parked waiter. The outer lock must be held.
	pub fn notify_all(&self) -> Result<()> {
		if !self.is_owned()? {
			return Err(Error::NotOwned);
		}

		loop {
			let Some(waiter) = self.waiters.lock().pop() else {
				return Ok(());
			};
			if let Err(err) = waiter.release() {
				self.waiters.lock().push(waiter);
				return Err(err);
			}
		}
	}

	fn discard(&self, waiter: &Waiter<C>) {
		self.waiters.lock().retain(|w| !Arc::ptr_eq(w, waiter));
	}
}

impl<C: Clock + Clone> fmt::Debug for Condition<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Condition")
			.field("lock", &self.lock)
			.field("waiters", &self.waiter_count())
			.finish()
	}
}
