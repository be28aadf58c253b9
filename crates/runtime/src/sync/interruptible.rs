// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Event whose waiters can be interrupted by signals.
//!
//! Waiters park in a [`Condition`], i.e. in a semaphore wait, which the OS
//! cuts short when a signal arrives. A plain condition variable wait would be
//! restarted instead, leaving the thread deaf to the signal until set.

use std::{
	fmt,
	sync::atomic::{AtomicBool, Ordering},
};

use tracing::debug;

use crate::{
	clock::{Clock, Deadline, IntoTimeout, SystemClock, compute_deadline},
	error::Result,
	sync::condition::Condition,
};

/// Boolean event whose waits end early when the thread receives a signal.
pub struct InterruptibleEvent<C: Clock + Clone = SystemClock> {
	cond: Condition<C>,
	flag: AtomicBool,
	clock: C,
}

impl InterruptibleEvent {
	/// Creates a cleared event measuring timeouts with the system clock.
	pub fn new() -> Result<Self> {
		Self::with_clock(SystemClock)
	}
}

impl<C: Clock + Clone> InterruptibleEvent<C> {
	/// Creates a cleared event measuring timeouts with `clock`.
	pub fn with_clock(clock: C) -> Result<Self> {
		Ok(Self {
			cond: Condition::with_clock(clock.clone())?,
			flag: AtomicBool::new(false),
			clock,
		})
	}

	#[inline]
	pub fn is_set(&self) -> bool {
		self.flag.load(Ordering::Acquire)
	}

	/// Sets the flag and wakes all waiters.
	pub fn set(&self) -> Result<()> {
		self.locked(|| {
			self.flag.store(true, Ordering::Release);
			self.cond.notify_all()
		})
	}

	pub fn clear(&self) -> Result<()> {
		self.locked(|| {
			self.flag.store(false, Ordering::Release);
			Ok(())
		})
	}

	/// Returns `true` at once if the flag is set, otherwise waits and returns
	/// whether this waiter was woken by [`set`](Self::set).
	///
	/// `false` without a timeout means the wait was interrupted by a signal.
	pub fn wait(&self) -> Result<bool> {
		self.wait_until(None)
	}

	/// Like [`wait`](Self::wait), giving up after `timeout` seconds.
	pub fn wait_timeout(&self, timeout: impl IntoTimeout) -> Result<bool> {
		let deadline = compute_deadline(&self.clock, timeout)?;
		self.wait_until(Some(&deadline))
	}

	fn wait_until(&self, deadline: Option<&Deadline>) -> Result<bool> {
		self.locked(|| {
			if self.flag.load(Ordering::Acquire) {
				return Ok(true);
			}
			self.cond.wait_until(deadline)
		})
	}

	/// Replaces the internal condition with a fresh one, keeping the flag.
	///
	/// Call in the child process after `fork`: waiters registered by threads
	/// of the parent do not exist there, and the lock may have been held by one
	/// of them.
	pub fn reinit_after_fork(&mut self) -> Result<()> {
		self.cond = Condition::with_clock(self.clock.clone())?;
		debug!(flag = self.is_set(), "interruptible event reinitialised after fork");
		Ok(())
	}

	fn locked<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
		while !self.cond.acquire()? {
			debug!("interruptible event lock acquire interrupted");
		}
		let result = f();
		let released = self.cond.release();
		let value = result?;
		released?;
		Ok(value)
	}
}

impl<C: Clock + Clone> fmt::Debug for InterruptibleEvent<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InterruptibleEvent").field("flag", &self.is_set()).finish()
	}
}
