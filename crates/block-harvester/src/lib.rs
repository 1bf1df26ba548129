// Copyright 2025-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod cli;

mod bisect;
mod date;
mod encoder;
mod error;
mod harvest;
mod probe;
mod progress;

pub use bisect::*;
pub use date::*;
pub use encoder::*;
pub use error::*;
pub use harvest::*;
pub use probe::*;
pub use progress::*;
