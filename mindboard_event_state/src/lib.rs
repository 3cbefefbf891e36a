// Copyright 2026 the Mindboard Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mindboard Event State: small state machines for pointer-driven editing.
//!
//! Everything here runs on a virtual clock. Callers pass timestamps in
//! milliseconds and nothing reads the wall clock, so behavior is reproducible
//! under test.
//!
//! - [`gesture`]: turns pointer down/move/up into a drag with a movement
//!   threshold, cumulative offsets, speed tracking and long-press arming.
//! - [`scheduler`]: keyed last-write-wins timers for debounces and delayed
//!   cleanup.
//! - [`rate_limit`]: per-key minimum interval plus a capped attempt count per
//!   window.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod gesture;
pub mod rate_limit;
pub mod scheduler;
