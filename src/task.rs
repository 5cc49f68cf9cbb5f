//! This module provides a pollable handle for background computations.
//!
//! The [`AsyncTask`] type is the bridge between an interactive loop, which must
//! never block, and work that has to happen elsewhere, such as network I/O. The
//! interactive loop starts a computation, and then polls for its result once
//! per tick. The computation runs on a Tokio runtime, and hands its result back
//! over a single-use channel, which is the only point of contact between the
//! two threads.
//!

//		Modules

#[cfg(test)]
#[path = "tests/task.rs"]
mod tests;



//		Packages

use core::{
	any::Any,
	fmt::{Display, self},
	future::Future,
	panic::AssertUnwindSafe,
};
use flume::{Receiver, TryRecvError};
use futures_util::FutureExt as _;
use rubedo::sugar::s;
use std::error::Error;
use tokio::runtime::Handle;



//		Enums

//		TaskError																
/// Errors that can occur while running a background computation.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum TaskError {
	/// The computation ended without delivering a result. This happens when
	/// the runtime is shut down while the computation is still in progress.
	Abandoned,

	/// The computation panicked. The panic message is included where one was
	/// available.
	Panicked(String),
}

//󰭅		Display																	
impl Display for TaskError {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::Abandoned          => write!(f, "Background task ended without delivering a result"),
			Self::Panicked(ref msg)  => write!(f, "Background task panicked: {msg}"),
		}
	}
}

//󰭅		Error																	
impl Error for TaskError {}



//		Structs

//		AsyncTask																
/// A handle to at most one background computation.
///
/// Only one computation can be outstanding at any time. Calling [`start()`](Self::start())
/// while a computation is outstanding does nothing, and calling [`poll()`](Self::poll())
/// never waits. Once the result has been collected by [`poll()`](Self::poll()),
/// the handle is free to start another computation.
///
/// Dropping the handle does not cancel the computation. It will run to
/// completion, and its result will be discarded.
///
#[derive(Debug)]
pub struct AsyncTask<T> {
	//		Private properties													
	/// The runtime that background computations are spawned onto.
	runtime:  Handle,

	/// The receiving side of the handoff channel for the outstanding
	/// computation, if there is one.
	receiver: Option<Receiver<Result<T, TaskError>>>,
}

//󰭅		AsyncTask																
impl<T: Send + 'static> AsyncTask<T> {
	//			Constructors													

	//		new																	
	/// Creates a new, idle task handle.
	///
	/// # Parameters
	///
	/// * `runtime` - The runtime to run background computations on.
	///
	#[must_use]
	pub const fn new(runtime: Handle) -> Self {
		Self {
			runtime,
			receiver: None,
		}
	}

	//			Public methods													

	//		start																
	/// Starts an asynchronous computation, if none is outstanding.
	///
	/// The factory is only called if the computation is going to be started,
	/// so it is safe to put side effects such as counting attempts into it. The
	/// future it returns must own everything it needs.
	///
	/// Returns `true` if the computation was started, or `false` if another
	/// computation was already outstanding.
	///
	/// # Parameters
	///
	/// * `factory` - A function that creates the future to run.
	///
	pub fn start<F, Fut>(&mut self, factory: F) -> bool
	where
		F:   FnOnce() -> Fut,
		Fut: Future<Output = T> + Send + 'static,
	{
		if self.receiver.is_some() {
			return false;
		}
		let (sender, receiver) = flume::bounded(1);
		let future             = factory();
		drop(self.runtime.spawn(async move {
			let outcome  = AssertUnwindSafe(future).catch_unwind().await.map_err(panic_error);
			//	The handle may have been dropped, in which case nobody is listening
			let _ignored = sender.send(outcome);
		}));
		self.receiver = Some(receiver);
		true
	}

	//		poll																
	/// Collects the result of the outstanding computation, without waiting.
	///
	/// Returns [`None`] if there is no outstanding computation, or if it has
	/// not finished yet. Otherwise the result is returned, exactly once, and the
	/// handle becomes idle.
	///
	/// # Errors
	///
	/// The returned result carries:
	///
	/// * [`TaskError::Abandoned`]
	/// * [`TaskError::Panicked`]
	///
	pub fn poll(&mut self) -> Option<Result<T, TaskError>> {
		let receiver = self.receiver.as_ref()?;
		let outcome  = match receiver.try_recv() {
			Ok(outcome)                     => outcome,
			Err(TryRecvError::Empty)        => return None,
			Err(TryRecvError::Disconnected) => Err(TaskError::Abandoned),
		};
		self.receiver = None;
		Some(outcome)
	}

	//		is_pending															
	/// Whether a computation has been started and its result not yet collected.
	#[must_use]
	pub const fn is_pending(&self) -> bool {
		self.receiver.is_some()
	}

	//		is_ready															
	/// Whether the next call to [`poll()`](Self::poll()) will return a result.
	#[must_use]
	pub fn is_ready(&self) -> bool {
		self.receiver.as_ref().is_some_and(|receiver| !receiver.is_empty() || receiver.is_disconnected())
	}

	//																			
}



//		Functions

//		panic_error																
/// Converts a caught panic payload into a [`TaskError`].
fn panic_error(payload: Box<dyn Any + Send>) -> TaskError {
	let message = payload.downcast_ref::<&str>().map(|msg| s!(*msg))
		.or_else(|| payload.downcast_ref::<String>().cloned())
		.unwrap_or_else(|| s!("unknown panic"))
	;
	TaskError::Panicked(message)
}
