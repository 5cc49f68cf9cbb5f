//! This module provides a process inspector with controllable results.

//		Packages

use crate::setup::ProcessInspector;
use core::{
	future::Future,
	sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};
use parking_lot::Mutex;
use std::sync::Arc;



//		Structs

//		FakeInspector															
/// A process inspector that reports whatever the test tells it to.
///
/// Clones share the same state, so a test can change what is reported after
/// handing the inspector over.
///
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeInspector {
	/// Whether the game is reported as running.
	running: Arc<AtomicBool>,

	/// The command lines reported, one per game process.
	lines:   Arc<Mutex<Vec<String>>>,

	/// How many times the command lines have been requested.
	scans:   Arc<AtomicUsize>,
}

//󰭅		FakeInspector															
impl FakeInspector {
	//		with_lines															
	pub(crate) fn with_lines(lines: &[&str]) -> Self {
		let inspector = Self::default();
		inspector.set_lines(lines);
		inspector
	}

	//		set_lines															
	/// Sets the reported command lines. The game is reported as running if
	/// there are any.
	pub(crate) fn set_lines(&self, lines: &[&str]) {
		*self.lines.lock() = lines.iter().map(|&line| line.to_owned()).collect();
		self.running.store(!lines.is_empty(), Ordering::SeqCst);
	}

	//		set_running															
	pub(crate) fn set_running(&self, running: bool) {
		self.running.store(running, Ordering::SeqCst);
	}

	//		scans																
	pub(crate) fn scans(&self) -> usize {
		self.scans.load(Ordering::SeqCst)
	}
}

//󰭅		ProcessInspector														
impl ProcessInspector for FakeInspector {
	//		is_running															
	fn is_running(&self) -> bool {
		self.running.load(Ordering::SeqCst)
	}

	//		command_lines														
	fn command_lines(&self) -> impl Future<Output = Vec<String>> + Send + 'static {
		let _     = self.scans.fetch_add(1, Ordering::SeqCst);
		let lines = self.lines.lock().clone();
		async move { lines }
	}
}
