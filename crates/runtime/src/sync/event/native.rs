// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! POSIX event flag backed by `pthread_mutex_t` and `pthread_cond_t`.

use std::{
	cell::UnsafeCell,
	io, ptr,
	sync::atomic::{AtomicBool, Ordering},
};

use tracing::warn;

use crate::{
	clock::Deadline,
	error::{Error, Resource, Result},
};

/// Boxed so the mutex never moves after `pthread_mutex_init`.
struct RawMutex(Box<UnsafeCell<libc::pthread_mutex_t>>);

// SAFETY: pthread mutexes are designed to be shared between threads.
unsafe impl Send for RawMutex {}
unsafe impl Sync for RawMutex {}

impl RawMutex {
	fn new() -> Result<Self> {
		let mutex = Box::new(UnsafeCell::new(libc::PTHREAD_MUTEX_INITIALIZER));
		// SAFETY: the pointer is valid and the mutex is not in use yet.
		let rc = unsafe { libc::pthread_mutex_init(mutex.get(), ptr::null()) };
		if rc != 0 {
			return Err(Error::init(Resource::Mutex, io::Error::from_raw_os_error(rc)));
		}
		Ok(Self(mutex))
	}

	fn lock(&self) -> RawMutexGuard<'_> {
		// SAFETY: initialised in `new`, destroyed only in `drop`.
		let rc = unsafe { libc::pthread_mutex_lock(self.0.get()) };
		debug_assert_eq!(rc, 0, "pthread_mutex_lock failed");
		RawMutexGuard {
			mutex: self,
		}
	}
}

impl Drop for RawMutex {
	fn drop(&mut self) {
		// SAFETY: no guard can outlive the mutex, so it is unlocked here.
		let rc = unsafe { libc::pthread_mutex_destroy(self.0.get()) };
		if rc != 0 {
			warn!(error = %io::Error::from_raw_os_error(rc), "pthread_mutex_destroy failed");
		}
	}
}

struct RawMutexGuard<'a> {
	mutex: &'a RawMutex,
}

impl Drop for RawMutexGuard<'_> {
	fn drop(&mut self) {
		// SAFETY: the guard proves this thread holds the mutex.
		let rc = unsafe { libc::pthread_mutex_unlock(self.mutex.0.get()) };
		debug_assert_eq!(rc, 0, "pthread_mutex_unlock failed");
	}
}

struct RawCond(Box<UnsafeCell<libc::pthread_cond_t>>);

// SAFETY: pthread condition variables are designed to be shared between threads.
unsafe impl Send for RawCond {}
unsafe impl Sync for RawCond {}

impl RawCond {
	fn new() -> Result<Self> {
		let cond = Box::new(UnsafeCell::new(libc::PTHREAD_COND_INITIALIZER));
		// SAFETY: the pointer is valid and the condition is not in use yet.
		let rc = unsafe { libc::pthread_cond_init(cond.get(), ptr::null()) };
		if rc != 0 {
			return Err(Error::init(Resource::Condition, io::Error::from_raw_os_error(rc)));
		}
		Ok(Self(cond))
	}

	/// Blocks once. Returns true when the wait timed out.
	fn wait(&self, guard: &RawMutexGuard<'_>, deadline: Option<&Deadline>) -> bool {
		let cond = self.0.get();
		let mutex = guard.mutex.0.get();
		// SAFETY: `guard` proves the mutex is held by this thread and both
		// handles stay initialised for the duration of the call.
		let rc = unsafe {
			match deadline {
				None => libc::pthread_cond_wait(cond, mutex),
				Some(deadline) => {
					let ts = deadline.to_timespec();
					libc::pthread_cond_timedwait(cond, mutex, &ts)
				}
			}
		};
		rc == libc::ETIMEDOUT
	}

	fn broadcast(&self) {
		// SAFETY: initialised in `new`.
		let rc = unsafe { libc::pthread_cond_broadcast(self.0.get()) };
		debug_assert_eq!(rc, 0, "pthread_cond_broadcast failed");
	}
}

impl Drop for RawCond {
	fn drop(&mut self) {
		// SAFETY: waiters borrow the owning event, so none are left.
		let rc = unsafe { libc::pthread_cond_destroy(self.0.get()) };
		if rc != 0 {
			warn!(error = %io::Error::from_raw_os_error(rc), "pthread_cond_destroy failed");
		}
	}
}

pub(super) struct EventInner {
	guard: RawMutex,
	wakeup: RawCond,
	flag: AtomicBool,
}

impl EventInner {
	pub(super) fn new() -> Result<Self> {
		// A failing condition init drops `guard`, which destroys the mutex.
		let guard = RawMutex::new()?;
		let wakeup = RawCond::new()?;
		Ok(Self {
			guard,
			wakeup,
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
		self.wakeup.broadcast();
	}

	pub(super) fn clear(&self) {
		let _guard = self.guard.lock();
		self.flag.store(false, Ordering::Relaxed);
	}

	/// Returns the flag value observed after at most one wait, and whether
	/// that wait timed out.
	pub(super) fn wait(&self, deadline: Option<&Deadline>) -> (bool, bool) {
		let guard = self.guard.lock();
		let mut timed_out = false;
		if !self.flag.load(Ordering::Relaxed) {
			timed_out = self.wakeup.wait(&guard, deadline);
		}
		let flag = self.flag.load(Ordering::Relaxed);
		drop(guard);
		(flag, timed_out)
	}
}
