// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Absolute wall-clock deadlines for timed waits.
//!
//! Every timed operation converts its relative timeout into a [`Deadline`]
//! once, before touching any lock or semaphore. Interrupted waits that resume
//! against the same deadline therefore never extend the effective timeout.

use std::{
	sync::Arc,
	time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::error::{Error, Result};

pub(crate) const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Largest accepted timeout in seconds.
pub const TIMEOUT_MAX: f64 = u32::MAX as f64;

/// Source of wall-clock time.
///
/// Implementations must track the realtime clock. Deadlines are only computed
/// from the clock; the blocking waits measure them against `CLOCK_REALTIME`
/// (native) or [`SystemTime`] (portable), so a clock running ahead or behind
/// shifts every timeout by its offset.
pub trait Clock: Send + Sync {
	/// Current time as an offset from the Unix epoch.
	fn now(&self) -> Result<Duration>;
}

/// Reads `CLOCK_REALTIME`, the clock `pthread_cond_timedwait` and
/// `sem_timedwait` measure deadlines against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> Result<Duration> {
		SystemTime::now().duration_since(UNIX_EPOCH).map_err(|e| Error::Clock {
			reason: e.to_string(),
		})
	}
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
	fn now(&self) -> Result<Duration> {
		(**self).now()
	}
}

/// An absolute point in wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Deadline {
	secs: i64,
	nanos: u32,
}

impl Deadline {
	/// Seconds since the Unix epoch.
	#[inline]
	pub fn secs(&self) -> i64 {
		self.secs
	}

	/// Sub-second part, always below one second.
	#[inline]
	pub fn nanos(&self) -> u32 {
		self.nanos
	}

	/// Time left until the deadline according to the system wall clock, zero
	/// once it has passed. The clock the deadline was computed with is not
	/// consulted.
	pub fn remaining(&self) -> Duration {
		let target = Duration::new(self.secs.max(0) as u64, self.nanos);
		match SystemTime::now().duration_since(UNIX_EPOCH) {
			Ok(now) => target.saturating_sub(now),
			Err(_) => target,
		}
	}

	#[cfg(hostsync_backend = "native")]
	pub(crate) fn to_timespec(&self) -> libc::timespec {
		libc::timespec {
			tv_sec: libc::time_t::try_from(self.secs).unwrap_or(libc::time_t::MAX),
			tv_nsec: self.nanos as libc::c_long,
		}
	}
}

/// Relative timeout accepted by the timed operations.
///
/// Conversion fails with [`Error::InvalidTimeout`] when the value is not a
/// finite real number.
pub trait IntoTimeout {
	fn into_seconds(self) -> Result<f64>;
}

impl IntoTimeout for f64 {
	fn into_seconds(self) -> Result<f64> {
		if self.is_nan() {
			return Err(Error::invalid_timeout("NaN"));
		}
		if self.is_infinite() {
			return Err(Error::invalid_timeout(format!("{self} is not finite")));
		}
		Ok(self)
	}
}

impl IntoTimeout for f32 {
	fn into_seconds(self) -> Result<f64> {
		f64::from(self).into_seconds()
	}
}

macro_rules! impl_into_timeout_int {
	($($t:ty),*) => {
		$(
			impl IntoTimeout for $t {
				#[inline]
				fn into_seconds(self) -> Result<f64> {
					Ok(self as f64)
				}
			}
		)*
	};
}

impl_into_timeout_int!(i32, i64, u32, u64, usize);

impl IntoTimeout for Duration {
	fn into_seconds(self) -> Result<f64> {
		Ok(self.as_secs_f64())
	}
}

impl IntoTimeout for &str {
	fn into_seconds(self) -> Result<f64> {
		let seconds: f64 =
			self.trim().parse().map_err(|_| Error::invalid_timeout(format!("{self:?} is not a number")))?;
		seconds.into_seconds()
	}
}

impl IntoTimeout for String {
	fn into_seconds(self) -> Result<f64> {
		self.as_str().into_seconds()
	}
}

/// Turns a relative timeout into an absolute deadline.
///
/// The timeout is validated before the clock is read. Negative timeouts are
/// clamped to zero, so the deadline is "now".
pub fn compute_deadline<C: Clock + ?Sized>(clock: &C, timeout: impl IntoTimeout) -> Result<Deadline> {
	let seconds = timeout.into_seconds()?.max(0.0);
	if seconds > TIMEOUT_MAX {
		return Err(Error::invalid_timeout(format!("{seconds} exceeds the maximum of {TIMEOUT_MAX}")));
	}

	let now = clock.now()?;

	let whole = seconds.trunc();
	let mut nanos = now.subsec_nanos() + ((seconds - whole) * f64::from(NANOS_PER_SEC)) as u32;
	let mut secs = i64::try_from(now.as_secs())
		.ok()
		.and_then(|s| s.checked_add(whole as i64))
		.ok_or_else(|| Error::Clock {
			reason: format!("{}s since epoch is out of range", now.as_secs()),
		})?;

	if nanos >= NANOS_PER_SEC {
		secs += 1;
		nanos -= NANOS_PER_SEC;
	}

	Ok(Deadline {
		secs,
		nanos,
	})
}
