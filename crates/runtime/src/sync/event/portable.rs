// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Event flag backed by parking_lot, for targets without the POSIX backend.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Condvar, Mutex};

use crate::{clock::Deadline, error::Result};

pub(super) struct EventInner {
	guard: Mutex<()>,
	wakeup: Condvar,
	flag: AtomicBool,
}

impl EventInner {
	pub(super) fn new() -> Result<Self> {
		Ok(Self {
			guard: Mutex::new(()),
			wakeup: Condvar::new(),
			flag: AtomicBool::new(false),
		})
	}

	#[inline]
	pub(super) fn is_set(&self) -> bool {
		self.flag.load(Ordering::Relaxed)
	}

	pub(super) fn set(&self) {
		let _guard = self.guard.lock();
		self.flag.store(true, Ordering::Relaxed);
		self.wakeup.notify_all();
	}

	pub(super) fn clear(&self) {
		let _guard = self.guard.lock();
		self.flag.store(false, Ordering::Relaxed);
	}

	pub(super) fn wait(&self, deadline: Option<&Deadline>) -> (bool, bool) {
		let mut guard = self.guard.lock();
		let mut timed_out = false;
		if !self.flag.load(Ordering::Relaxed) {
			match deadline {
				None => self.wakeup.wait(&mut guard),
				Some(deadline) => {
					timed_out = self.wakeup.wait_for(&mut guard, deadline.remaining()).timed_out();
				}
			}
		}
		(self.flag.load(Ordering::Relaxed), timed_out)
	}
}
