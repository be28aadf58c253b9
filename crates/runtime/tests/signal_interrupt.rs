// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Blocked waits receiving a signal on the native backend.

#![cfg(all(unix, not(target_vendor = "apple"), feature = "native", not(feature = "portable")))]

use std::{
	os::unix::thread::JoinHandleExt,
	ptr,
	sync::{Arc, Once},
	thread::{self, JoinHandle},
	time::{Duration, Instant},
};

use hostsync_runtime::{BinaryLock, EventFlag, InterruptibleEvent};
use hostsync_testing::init_test_tracing;

extern "C" fn ignore_signal(_: libc::c_int) {}

/// Installs a no-op `SIGUSR1` handler without `SA_RESTART`.
fn install_handler() {
	static INSTALL: Once = Once::new();
	INSTALL.call_once(|| {
		// SAFETY: the action is fully initialised before `sigaction` reads it.
		let rc = unsafe {
			let mut action: libc::sigaction = std::mem::zeroed();
			action.sa_sigaction = ignore_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
			action.sa_flags = 0;
			libc::sigemptyset(&mut action.sa_mask);
			libc::sigaction(libc::SIGUSR1, &action, ptr::null_mut())
		};
		assert_eq!(rc, 0, "cannot install SIGUSR1 handler");
	});
}

/// Signals the thread every 50ms until it finishes.
///
/// A signal that lands before the thread blocks is simply absorbed by the
/// handler; the next one catches it inside the wait.
fn interrupt_until_finished<T>(handle: &JoinHandle<T>) {
	thread::sleep(Duration::from_millis(200));
	let start = Instant::now();
	while !handle.is_finished() {
		assert!(start.elapsed() < Duration::from_secs(5), "blocked thread ignored SIGUSR1");
		// SAFETY: the thread has not been joined, so its pthread handle is valid.
		unsafe { libc::pthread_kill(handle.as_pthread_t(), libc::SIGUSR1) };
		thread::sleep(Duration::from_millis(50));
	}
}

#[test]
fn test_timed_acquire_interrupted() {
	init_test_tracing();
	install_handler();

	let lock = Arc::new(BinaryLock::new().unwrap());
	assert!(lock.acquire().unwrap());

	let contender = {
		let lock = Arc::clone(&lock);
		thread::spawn(move || {
			let start = Instant::now();
			let got = lock.acquire_timeout(10.0);
			(got, start.elapsed())
		})
	};

	interrupt_until_finished(&contender);
	let (got, elapsed) = contender.join().unwrap();
	assert!(!got.unwrap());
	assert!(elapsed < Duration::from_secs(6), "returned after {elapsed:?}");

	// the interrupted wait did not take or drop the permit
	assert!(lock.is_locked());
	lock.release().unwrap();
	assert!(lock.acquire_timeout(0).unwrap());
}

#[test]
fn test_untimed_acquire_interrupted() {
	init_test_tracing();
	install_handler();

	let lock = Arc::new(BinaryLock::new().unwrap());
	assert!(lock.acquire().unwrap());

	let contender = {
		let lock = Arc::clone(&lock);
		thread::spawn(move || lock.acquire())
	};

	interrupt_until_finished(&contender);
	assert!(!contender.join().unwrap().unwrap());

	lock.release().unwrap();
	assert!(!lock.is_locked());
}

#[test]
fn test_interruptible_event_wait_interrupted() {
	init_test_tracing();
	install_handler();

	let event = Arc::new(InterruptibleEvent::new().unwrap());
	let waiter = {
		let event = Arc::clone(&event);
		thread::spawn(move || event.wait())
	};

	interrupt_until_finished(&waiter);
	assert!(!waiter.join().unwrap().unwrap());

	// the waiter left the internal lock free
	event.set().unwrap();
	assert!(event.wait_timeout(0).unwrap());
}

#[test]
fn test_event_flag_wait_reports_flag_despite_signal() {
	init_test_tracing();
	install_handler();

	let event = Arc::new(EventFlag::new().unwrap());
	let waiter = {
		let event = Arc::clone(&event);
		thread::spawn(move || event.wait_timeout(1.0))
	};

	interrupt_until_finished(&waiter);
	assert!(!waiter.join().unwrap().unwrap());

	event.set();
	let waiter = {
		let event = Arc::clone(&event);
		thread::spawn(move || event.wait_timeout(1.0))
	};
	interrupt_until_finished(&waiter);
	assert!(waiter.join().unwrap().unwrap());
}
