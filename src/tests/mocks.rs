//! Test doubles for the traits that the crate consumes.
//!
//! Traits with plain synchronous methods are mocked with `mockall` where they
//! are defined. The traits here return futures, so they get hand-written
//! doubles that script their results and count how often they are called.
//!

//		Modules

#[path = "mocks/feed.rs"]
pub(crate) mod feed;

#[path = "mocks/process.rs"]
pub(crate) mod process;

#[path = "mocks/protocol.rs"]
pub(crate) mod protocol;
