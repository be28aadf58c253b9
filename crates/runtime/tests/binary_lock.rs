// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Cross-thread behaviour of the binary lock.

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	},
	thread,
	time::{Duration, Instant},
};

use hostsync_runtime::{BinaryLock, Error};
use hostsync_testing::{init_test_tracing, util::bounded::run_within};

#[test]
fn test_first_acquire_succeeds() {
	let lock = BinaryLock::new().unwrap();
	assert!(lock.acquire().unwrap());
	assert!(lock.is_locked());
}

#[test]
fn test_second_acquire_blocks_until_release() {
	init_test_tracing();

	let lock = Arc::new(BinaryLock::new().unwrap());
	assert!(lock.acquire().unwrap());

	let acquired = Arc::new(AtomicBool::new(false));
	let contender = {
		let lock = Arc::clone(&lock);
		let acquired = Arc::clone(&acquired);
		thread::spawn(move || {
			let got = lock.acquire().unwrap();
			acquired.store(true, Ordering::SeqCst);
			got
		})
	};

	thread::sleep(Duration::from_millis(100));
	assert!(!acquired.load(Ordering::SeqCst), "second acquire must block while held");

	lock.release().unwrap();
	let got = run_within(Duration::from_secs(5), "release should let the contender in", move || {
		contender.join().unwrap()
	});
	assert!(got);
	assert!(acquired.load(Ordering::SeqCst));
}

#[test]
fn test_timed_acquire_on_held_lock_returns_false() {
	let lock = Arc::new(BinaryLock::new().unwrap());
	assert!(lock.acquire().unwrap());

	let contender = {
		let lock = Arc::clone(&lock);
		thread::spawn(move || {
			let start = Instant::now();
			let got = lock.acquire_timeout(0.05);
			(got, start.elapsed())
		})
	};

	let (got, elapsed) = contender.join().unwrap();
	assert!(!got.unwrap());
	assert!(elapsed >= Duration::from_millis(40), "gave up after {elapsed:?}");
	lock.release().unwrap();
}

#[test]
fn test_release_unlocked_does_not_add_a_permit() {
	let lock = Arc::new(BinaryLock::new().unwrap());
	assert!(matches!(lock.release(), Err(Error::ReleaseUnlocked)));

	let other = {
		let lock = Arc::clone(&lock);
		thread::spawn(move || {
			let first = lock.acquire_timeout(1.0).unwrap();
			let second = lock.acquire_timeout(0.05).unwrap();
			(first, second)
		})
	};

	assert_eq!(other.join().unwrap(), (true, false));
}

#[test]
fn test_round_trip_leaves_lock_acquirable() {
	let lock = Arc::new(BinaryLock::new().unwrap());
	assert!(lock.acquire().unwrap());
	lock.release().unwrap();
	assert!(!lock.is_locked());

	let other = {
		let lock = Arc::clone(&lock);
		thread::spawn(move || {
			let got = lock.acquire_timeout(1.0).unwrap();
			lock.release().unwrap();
			got
		})
	};
	assert!(other.join().unwrap());

	assert!(lock.acquire_timeout(0).unwrap());
}

#[test]
fn test_non_numeric_timeout_does_not_block_or_mutate() {
	let lock = BinaryLock::new().unwrap();
	assert!(lock.acquire().unwrap());

	let start = Instant::now();
	assert!(matches!(lock.acquire_timeout("forever"), Err(Error::InvalidTimeout { .. })));
	assert!(matches!(lock.acquire_timeout(f64::INFINITY), Err(Error::InvalidTimeout { .. })));
	assert!(start.elapsed() < Duration::from_secs(1));

	assert!(lock.is_locked());
	lock.release().unwrap();
	assert!(lock.acquire_timeout(0).unwrap());
}

#[test]
fn test_negative_timeout_behaves_like_zero() {
	let lock = BinaryLock::new().unwrap();
	assert!(lock.acquire_timeout(-1).unwrap());
	assert!(!lock.acquire_timeout(-1).unwrap());
	assert!(!lock.acquire_timeout(0).unwrap());
}

#[test]
fn test_mutual_exclusion_under_contention() {
	init_test_tracing();

	let lock = Arc::new(BinaryLock::new().unwrap());
	let inside = Arc::new(AtomicBool::new(false));

	let handles: Vec<_> = (0..4)
		.map(|_| {
			let lock = Arc::clone(&lock);
			let inside = Arc::clone(&inside);
			thread::spawn(move || {
				for _ in 0..200 {
					let guard = lock.lock().unwrap().unwrap();
					assert!(!inside.swap(true, Ordering::SeqCst), "two holders at once");
					inside.store(false, Ordering::SeqCst);
					guard.unlock().unwrap();
				}
			})
		})
		.collect();

	run_within(Duration::from_secs(30), "contended lock should make progress", move || {
		for handle in handles {
			handle.join().unwrap();
		}
	});
	assert!(!lock.is_locked());
}
