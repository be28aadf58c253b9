// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Unnamed, process-private POSIX semaphore.

use std::{cell::UnsafeCell, io, mem};

use tracing::{debug, warn};

use super::RawSemaphore;
use crate::{
	clock::Deadline,
	error::{Error, Operation, Resource, Result},
};

/// A `sem_t` initialised with `sem_init(sem, 0, permits)`.
///
/// `sem_timedwait` returns on signal delivery, so a blocked waiter gives up
/// with `Ok(false)` when its thread is interrupted.
pub struct PosixSemaphore {
	sem: Box<UnsafeCell<libc::sem_t>>,
}

// SAFETY: sem_t is designed to be shared between threads of a process.
unsafe impl Send for PosixSemaphore {}
unsafe impl Sync for PosixSemaphore {}

impl PosixSemaphore {
	pub fn new(permits: u32) -> Result<Self> {
		// SAFETY: sem_t is plain data; sem_init overwrites it.
		let sem = Box::new(UnsafeCell::new(unsafe { mem::zeroed::<libc::sem_t>() }));
		// SAFETY: the pointer is valid and stays put while boxed.
		let rc = unsafe { libc::sem_init(sem.get(), 0, permits as libc::c_uint) };
		if rc == -1 {
			return Err(Error::init(Resource::Semaphore, io::Error::last_os_error()));
		}
		Ok(Self {
			sem,
		})
	}
}

impl RawSemaphore for PosixSemaphore {
	fn wait(&self, deadline: Option<&Deadline>) -> Result<bool> {
		// SAFETY: initialised in `new`, destroyed only in `drop`.
		let rc = unsafe {
			match deadline {
				None => libc::sem_wait(self.sem.get()),
				Some(deadline) => {
					let ts = deadline.to_timespec();
					libc::sem_timedwait(self.sem.get(), &ts)
				}
			}
		};
		if rc == 0 {
			return Ok(true);
		}

		let err = io::Error::last_os_error();
		match err.raw_os_error() {
			Some(libc::ETIMEDOUT) => Ok(false),
			Some(libc::EINTR) => {
				debug!("semaphore wait interrupted by signal");
				Ok(false)
			}
			_ => Err(Error::os(Operation::Acquire, err)),
		}
	}

	fn post(&self) -> Result<()> {
		// SAFETY: initialised in `new`, destroyed only in `drop`.
		if unsafe { libc::sem_post(self.sem.get()) } == -1 {
			return Err(Error::os(Operation::Release, io::Error::last_os_error()));
		}
		Ok(())
	}
}

impl Drop for PosixSemaphore {
	fn drop(&mut self) {
		// SAFETY: waiters borrow the semaphore, so none are left.
		if unsafe { libc::sem_destroy(self.sem.get()) } == -1 {
			warn!(error = %io::Error::last_os_error(), "sem_destroy failed");
		}
	}
}
