// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Manual-reset event flag.

use std::fmt;

use tracing::{debug, trace};

use crate::{
	clock::{Clock, Deadline, IntoTimeout, SystemClock, compute_deadline},
	error::Result,
};

#[cfg(hostsync_backend = "native")]
mod native;
#[cfg(hostsync_backend = "portable")]
mod portable;

cfg_if::cfg_if! {
	if #[cfg(hostsync_backend = "native")] {
		type EventInner = native::EventInner;
	} else {
		type EventInner = portable::EventInner;
	}
}

/// A boolean flag threads can block on until it is set.
///
/// [`set`](Self::set) wakes every thread blocked in a wait. A wait blocks at
/// most once and then reports the flag as it is at that moment: a spurious
/// wakeup, or a `set` immediately undone by a `clear`, returns `false` without
/// waiting again.
pub struct EventFlag<C: Clock = SystemClock> {
	inner: EventInner,
	clock: C,
}

impl EventFlag {
	/// Creates a cleared event flag measuring timeouts with the system clock.
	pub fn new() -> Result<Self> {
		Self::with_clock(SystemClock)
	}
}

impl<C: Clock> EventFlag<C> {
	/// Creates a cleared event flag measuring timeouts with `clock`.
	pub fn with_clock(clock: C) -> Result<Self> {
		let inner = EventInner::new()?;
		debug!("event flag created");
		Ok(Self {
			inner,
			clock,
		})
	}

	/// Returns the current flag without taking the internal lock.
	///
	/// The value may already be stale when a concurrent `set` or `clear` is in
	/// flight.
	#[inline]
	pub fn is_set(&self) -> bool {
		self.inner.is_set()
	}

	/// Sets the flag and wakes all waiting threads.
	pub fn set(&self) {
		self.inner.set();
	}

	/// Clears the flag.
	pub fn clear(&self) {
		self.inner.clear();
	}

	/// Blocks until woken, unless the flag is already set. Returns the flag
	/// value after the wait.
	pub fn wait(&self) -> bool {
		self.wait_until(None)
	}

	/// Blocks until woken or `timeout` seconds elapse, unless the flag is
	/// already set. Returns the flag value after the wait; timing out is not
	/// an error.
	///
	/// The timeout is validated before the internal lock is taken.
	pub fn wait_timeout(&self, timeout: impl IntoTimeout) -> Result<bool> {
		let deadline = compute_deadline(&self.clock, timeout)?;
		Ok(self.wait_until(Some(&deadline)))
	}

	fn wait_until(&self, deadline: Option<&Deadline>) -> bool {
		trace!(?deadline, "event wait");
		let (flag, timed_out) = self.inner.wait(deadline);
		trace!(flag, timed_out, "event wait returned");
		flag
	}
}

impl<C: Clock> fmt::Debug for EventFlag<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventFlag").field("flag", &self.is_set()).finish()
	}
}
