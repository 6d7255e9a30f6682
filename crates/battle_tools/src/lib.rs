//! # Battle Tools
//!
//! Command-line front end for `battle_core`:
//! - Army generation from a RON roster
//! - Full battle runs with a JSON strike log
//! - Single path queries on an empty or obstructed board
//!
//! Commands write JSON to any [`std::io::Write`] so they can be driven from
//! tests as well as from the binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod commands;
pub mod error;
