// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Run blocking test code with an upper bound on its duration.

use std::{thread, time::Duration};

use crossbeam_channel::{RecvTimeoutError, bounded};

/// Run `f` on a helper thread and return its result.
///
/// # Panics
/// Panics with `message` if `f` has not returned within `limit`, and re-raises
/// a panic from `f`. A thread that overruns is left running.
pub fn run_within<T, F>(limit: Duration, message: &str, f: F) -> T
where
	T: Send + 'static,
	F: FnOnce() -> T + Send + 'static,
{
	let (tx, rx) = bounded(1);
	let handle = thread::Builder::new()
		.name("bounded-test".to_string())
		.spawn(move || {
			let _ = tx.send(f());
		})
		.expect("failed to spawn bounded test thread");

	match rx.recv_timeout(limit) {
		Ok(value) => {
			let _ = handle.join();
			value
		}
		Err(RecvTimeoutError::Timeout) => panic!("Did not finish within {:?}: {}", limit, message),
		Err(RecvTimeoutError::Disconnected) => match handle.join() {
			Err(payload) => std::panic::resume_unwind(payload),
			Ok(()) => unreachable!("sender dropped without sending"),
		},
	}
}
