// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Selects the synchronization backend.
//!
//! Emits `hostsync_backend = "native"` when the `native` feature is enabled on a
//! target with unnamed POSIX semaphores, and `hostsync_backend = "portable"`
//! otherwise. The `portable` feature always wins.

use std::env;

fn main() {
	println!("cargo::rustc-check-cfg=cfg(hostsync_backend, values(\"native\", \"portable\"))");
	println!("cargo::rerun-if-changed=build.rs");

	let native = env::var_os("CARGO_FEATURE_NATIVE").is_some();
	let portable = env::var_os("CARGO_FEATURE_PORTABLE").is_some();
	let unix = env::var("CARGO_CFG_TARGET_FAMILY").map(|f| f.split(',').any(|f| f == "unix")).unwrap_or(false);
	// macOS and iOS declare sem_init but always fail it with ENOSYS
	let apple = env::var("CARGO_CFG_TARGET_VENDOR").map(|v| v == "apple").unwrap_or(false);

	if native && !portable && unix && !apple {
		println!("cargo::rustc-cfg=hostsync_backend=\"native\"");
	} else {
		println!("cargo::rustc-cfg=hostsync_backend=\"portable\"");
	}
}
