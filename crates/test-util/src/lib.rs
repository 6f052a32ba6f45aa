// SPDX-FileCopyrightText: OpenTalk GmbH <mail@opentalk.eu>
//
// SPDX-License-Identifier: EUPL-1.2

//! Test utility functions for the scheduler workflows and the database layer
pub use pretty_assertions::assert_eq;

pub use memory::MemoryStorage;

pub mod memory;

#[cfg(feature = "database")]
pub mod database;
