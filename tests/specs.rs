// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs for the `lp` binary.
//!
//! Only paths that finish before any device is contacted are covered here;
//! device interaction is exercised against fakes in the engine crate.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli"]
mod cli {
    mod help;
}

#[path = "specs/push"]
mod push {
    mod options;
    mod preconditions;
}
