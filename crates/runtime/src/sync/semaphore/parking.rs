// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Semaphore built from a parking_lot mutex and condvar.

use std::io;

use parking_lot::{Condvar, Mutex};

use super::RawSemaphore;
use crate::{
	clock::Deadline,
	error::{Error, Operation, Result},
};

/// Portable counting semaphore.
///
/// Unlike the POSIX semaphore a wait is never cut short by a signal; only the
/// deadline ends it.
#[derive(Debug)]
pub struct ParkingSemaphore {
	permits: Mutex<u32>,
	available: Condvar,
}

impl ParkingSemaphore {
	pub fn new(permits: u32) -> Self {
		Self {
			permits: Mutex::new(permits),
			available: Condvar::new(),
		}
	}

	/// Number of permits that could be taken right now.
	pub fn available_permits(&self) -> u32 {
		*self.permits.lock()
	}
}

impl RawSemaphore for ParkingSemaphore {
	fn wait(&self, deadline: Option<&Deadline>) -> Result<bool> {
		let mut permits = self.permits.lock();
		while *permits == 0 {
			match deadline {
				None => self.available.wait(&mut permits),
				Some(deadline) => {
					let remaining = deadline.remaining();
					if remaining.is_zero() {
						return Ok(false);
					}
					self.available.wait_for(&mut permits, remaining);
				}
			}
		}
		*permits -= 1;
		Ok(true)
	}

	fn post(&self) -> Result<()> {
		let mut permits = self.permits.lock();
		*permits = permits
			.checked_add(1)
			.ok_or_else(|| Error::os(Operation::Release, io::Error::other("maximum permit count exceeded")))?;
		self.available.notify_one();
		Ok(())
	}
}
