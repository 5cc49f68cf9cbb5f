//! The Ignition crate gets a companion tool connected to a running game.
//!
//! It provides the non-blocking pieces that an interactive application needs in
//! order to check for newer releases of itself, launch the game with RCON
//! enabled, and confirm that RCON works before handing over a connected client.
//! All network work happens on a Tokio runtime, and is polled from the
//! interactive loop without ever blocking it.
//!



//		Global configuration

//	Customisations of the standard linting configuration
#![allow(clippy::multiple_crate_versions, reason = "Cannot resolve all these")]



//		Modules

pub mod bootstrap;
pub mod commandline;
pub mod handshake;
pub mod releases;
pub mod setup;
pub mod task;
pub mod version;

#[cfg(test)]
#[path = "tests/common.rs"]
mod common;

#[cfg(test)]
#[path = "tests/mocks.rs"]
mod mocks;



//		Packages
