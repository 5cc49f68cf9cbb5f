//! This module provides a protocol client that plays back scripted outcomes.

//		Packages

use crate::handshake::{ProtocolClient, ProtocolError, SessionAddress};
use core::{
	future::Future,
	sync::atomic::{AtomicUsize, Ordering},
};
use parking_lot::Mutex;
use std::{
	collections::VecDeque,
	sync::Arc,
};



//		Constants

/// The response given once the script has run out.
pub(crate) const PROBE_RESPONSE: &str = "RCON connection successful.";



//		Structs

//		ScriptedClient															
/// A protocol client whose responses are scripted in advance.
///
/// Each command takes the next outcome from the script. Once the script is
/// exhausted, every command succeeds with [`PROBE_RESPONSE`]. Clones share the
/// same script and records, so a test can keep a clone to inspect after the
/// original has been handed over.
///
#[derive(Clone, Debug, Default)]
pub(crate) struct ScriptedClient {
	/// The outcomes still to be returned.
	script:   Arc<Mutex<VecDeque<Result<String, ProtocolError>>>>,

	/// How many commands have been sent.
	sent:     Arc<AtomicUsize>,

	/// The commands that were sent, with their reliability flags.
	commands: Arc<Mutex<Vec<(String, bool)>>>,

	/// The address most recently set.
	address:  Arc<Mutex<Option<SessionAddress>>>,

	/// Whether sending a command should panic.
	panics:   bool,
}

//󰭅		ScriptedClient															
impl ScriptedClient {
	//		new																	
	pub(crate) fn new<I>(script: I) -> Self
	where
		I: IntoIterator<Item = Result<String, ProtocolError>>,
	{
		Self {
			script: Arc::new(Mutex::new(script.into_iter().collect())),
			..Default::default()
		}
	}

	//		panicking															
	pub(crate) fn panicking() -> Self {
		Self {
			panics: true,
			..Default::default()
		}
	}

	//		push																
	pub(crate) fn push(&self, outcome: Result<String, ProtocolError>) {
		self.script.lock().push_back(outcome);
	}

	//		sent																
	pub(crate) fn sent(&self) -> usize {
		self.sent.load(Ordering::SeqCst)
	}

	//		commands															
	pub(crate) fn commands(&self) -> Vec<(String, bool)> {
		self.commands.lock().clone()
	}

	//		address																
	pub(crate) fn address(&self) -> Option<SessionAddress> {
		self.address.lock().clone()
	}

	//		shares_state_with													
	pub(crate) fn shares_state_with(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.sent, &other.sent)
	}
}

//󰭅		ProtocolClient															
impl ProtocolClient for ScriptedClient {
	//		set_address															
	fn set_address(&mut self, address: SessionAddress) {
		*self.address.lock() = Some(address);
	}

	//		send_command														
	fn send_command(&self, command: &str, reliable: bool) -> impl Future<Output = Result<String, ProtocolError>> + Send + 'static {
		let _      = self.sent.fetch_add(1, Ordering::SeqCst);
		self.commands.lock().push((command.to_owned(), reliable));
		let next   = self.script.lock().pop_front();
		let panics = self.panics;
		async move {
			assert!(!panics, "Socket exploded");
			next.unwrap_or_else(|| Ok(PROBE_RESPONSE.to_owned()))
		}
	}
}
