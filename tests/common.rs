//! Common shared functionality for integration tests.

//		Modules

pub(crate) mod feed;
