// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::{
	fmt,
	fmt::{Display, Formatter},
	io,
};

/// Native sub-resource a primitive is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
	Mutex,
	Condition,
	Semaphore,
}

impl Display for Resource {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Resource::Mutex => f.write_str("mutex"),
			Resource::Condition => f.write_str("condition"),
			Resource::Semaphore => f.write_str("semaphore"),
		}
	}
}

/// Blocking operation that reported an OS failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
	Acquire,
	Release,
}

impl Display for Operation {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Operation::Acquire => f.write_str("acquire"),
			Operation::Release => f.write_str("release"),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("cannot init {resource}: {source}")]
	Init {
		resource: Resource,
		#[source]
		source: io::Error,
	},

	#[error("'timeout' is not a valid float: {reason}")]
	InvalidTimeout {
		reason: String,
	},

	#[error("cannot read system clock: {reason}")]
	Clock {
		reason: String,
	},

	#[error("cannot {op}: {source}")]
	Os {
		op: Operation,
		#[source]
		source: io::Error,
	},

	#[error("release unlocked lock")]
	ReleaseUnlocked,

	#[error("cannot wait on un-acquired lock")]
	NotOwned,

	#[error("cannot acquire waiter lock")]
	WaiterUnavailable,
}

impl Error {
	#[cfg_attr(hostsync_backend = "portable", allow(dead_code))]
	pub(crate) fn init(resource: Resource, source: io::Error) -> Self {
		Error::Init {
			resource,
			source,
		}
	}

	pub(crate) fn os(op: Operation, source: io::Error) -> Self {
		Error::Os {
			op,
			source,
		}
	}

	pub(crate) fn invalid_timeout(reason: impl Into<String>) -> Self {
		Error::InvalidTimeout {
			reason: reason.into(),
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;
