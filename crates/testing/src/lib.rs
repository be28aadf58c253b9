// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! Test support for the hostsync crates.

mod tracing;
pub mod util;

pub use tracing::init_test_tracing;
