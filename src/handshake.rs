//! This module provides the retrying RCON handshake.
//!
//! A freshly launched game takes a while before it accepts RCON connections,
//! and a while longer before it accepts commands. The [`HandshakeController`]
//! repeatedly sends a harmless probe command until one round-trip succeeds,
//! classifying each failure along the way so that a meaningful status can be
//! shown to the user.
//!
//! The protocol itself is not implemented here. It is provided through the
//! [`ProtocolClient`] trait.
//!

//		Modules

#[cfg(test)]
#[path = "tests/handshake.rs"]
mod tests;



//		Packages

use crate::task::{AsyncTask, TaskError};
use core::{
	fmt::{Display, self},
	future::Future,
};
use std::error::Error;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};



//		Constants

/// The command sent to check that the connection works. It has no effect on
/// the game other than echoing the text to the console.
pub const PROBE_COMMAND: &str = "echo RCON connection successful.";

/// The status message shown while the first probe is outstanding.
pub const CONNECTING_MESSAGE: &str = "Connecting...";



//		Enums

//		ProtocolErrorKind														
/// The kinds of error that a [`ProtocolClient`] reports.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ProtocolErrorKind {
	/// The server rejected the password.
	BadPassword,

	/// The connection to the server could not be established.
	ConnectFailed,

	/// The command could not be sent over the connection.
	SendFailed,

	/// Any other protocol failure.
	Other,
}

//		HandshakeError															
/// The classified reasons for a probe failing.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum HandshakeError {
	/// The password was rejected. The credentials are generated together with
	/// the game launch, so this indicates something has gone badly wrong, and
	/// retrying will not help.
	BadCredentials,

	/// The game is not yet accepting connections.
	EndpointNotAcceptingConnections,

	/// The game accepted the connection, but not yet the command.
	CommandSendFailed,

	/// The protocol client reported some other failure.
	OtherProtocolError(String),

	/// The probe failed in a way the protocol client did not report, such as
	/// a panic.
	UnknownError(String),
}

//󰭅		HandshakeError															
impl HandshakeError {
	//		is_retryable														
	/// Whether sending another probe could succeed.
	#[must_use]
	pub const fn is_retryable(&self) -> bool {
		!matches!(*self, Self::BadCredentials)
	}

	//		color																
	/// The colour to show this error in.
	#[must_use]
	pub const fn color(&self) -> Color {
		match *self {
			Self::BadCredentials                  => Color::RED,
			Self::EndpointNotAcceptingConnections => Color::LIGHT_YELLOW,
			Self::CommandSendFailed               => Color::LIGHT_YELLOW,
			Self::OtherProtocolError(_)           => Color::YELLOW,
			Self::UnknownError(_)                 => Color::RED,
		}
	}

	//		status																
	/// The status line to show for this error.
	#[must_use]
	pub fn status(&self) -> Status {
		Status::new(self.to_string(), self.color())
	}
}

//󰭅		Display																	
impl Display for HandshakeError {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::BadCredentials                  => write!(f, "Bad rcon password, this should never happen!"),
			Self::EndpointNotAcceptingConnections => write!(f, "Game not yet accepting RCON connections. Retrying..."),
			Self::CommandSendFailed               => write!(f, "Game not yet accepting RCON commands..."),
			Self::OtherProtocolError(ref msg)     => write!(f, "Unexpected error: {msg}"),
			Self::UnknownError(ref msg)           => write!(f, "RCON connection unsuccessful: {msg}"),
		}
	}
}

//󰭅		Error																	
impl Error for HandshakeError {}

//󰭅		From<ProtocolError>														
impl From<ProtocolError> for HandshakeError {
	//		from																
	fn from(err: ProtocolError) -> Self {
		match err.kind {
			ProtocolErrorKind::BadPassword   => Self::BadCredentials,
			ProtocolErrorKind::ConnectFailed => Self::EndpointNotAcceptingConnections,
			ProtocolErrorKind::SendFailed    => Self::CommandSendFailed,
			ProtocolErrorKind::Other         => Self::OtherProtocolError(err.message),
		}
	}
}

//󰭅		From<TaskError>															
impl From<TaskError> for HandshakeError {
	//		from																
	fn from(err: TaskError) -> Self {
		Self::UnknownError(err.to_string())
	}
}

//		HandshakeState															
/// The progress of a handshake.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum HandshakeState {
	/// No probe has been sent yet.
	#[default]
	NotStarted,

	/// A probe has been sent and its outcome is awaited.
	InFlight,

	/// A probe succeeded. No further probes will be sent.
	Succeeded,

	/// The last probe failed. Another will be sent on the next tick, unless the
	/// error is not retryable.
	Retrying(HandshakeError),
}



//		Structs

//		Color																	
/// An RGBA colour, with each channel in the range `0.0..=1.0`.
#[expect(clippy::exhaustive_structs, reason = "Plain data")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	//		Public properties													
	/// The red channel.
	pub r: f32,

	/// The green channel.
	pub g: f32,

	/// The blue channel.
	pub b: f32,

	/// The alpha channel.
	pub a: f32,
}

//󰭅		Color																	
impl Color {
	/// Used for success.
	pub const GREEN:        Self = Self::new(0.0, 1.0, 0.0, 1.0);

	/// Used for transient failures that are expected while the game starts.
	pub const LIGHT_YELLOW: Self = Self::new(1.0, 1.0, 0.5, 1.0);

	/// Used for failures that should not happen.
	pub const RED:          Self = Self::new(1.0, 0.0, 0.0, 1.0);

	/// Used for text with no particular meaning.
	pub const WHITE:        Self = Self::new(1.0, 1.0, 1.0, 1.0);

	/// Used for unexpected protocol failures.
	pub const YELLOW:       Self = Self::new(1.0, 1.0, 0.0, 1.0);

	//		new																	
	/// Creates a colour from its channels.
	#[must_use]
	pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
		Self { r, g, b, a }
	}
}

//		Status																	
/// A coloured status line describing the state of a handshake.
#[expect(clippy::exhaustive_structs, reason = "Plain data")]
#[derive(Clone, Debug, PartialEq)]
pub struct Status {
	//		Public properties													
	/// The text to show.
	pub message: String,

	/// The colour to show the text in.
	pub color:   Color,
}

//󰭅		Status																	
impl Status {
	//		new																	
	/// Creates a status line.
	///
	/// # Parameters
	///
	/// * `message` - The text to show.
	/// * `color`   - The colour to show the text in.
	///
	pub fn new<S: Into<String>>(message: S, color: Color) -> Self {
		Self {
			message: message.into(),
			color,
		}
	}

	//		connecting															
	/// The status shown before any probe has completed.
	#[must_use]
	pub fn connecting() -> Self {
		Self::new(CONNECTING_MESSAGE, Color::WHITE)
	}
}

//		ProtocolError															
/// An error reported by a [`ProtocolClient`].
#[expect(clippy::exhaustive_structs, reason = "Plain data")]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProtocolError {
	//		Public properties													
	/// What went wrong.
	pub kind:    ProtocolErrorKind,

	/// A description of the failure, as reported by the client.
	pub message: String,
}

//󰭅		ProtocolError															
impl ProtocolError {
	//		new																	
	/// Creates a protocol error.
	///
	/// # Parameters
	///
	/// * `kind`    - What went wrong.
	/// * `message` - A description of the failure.
	///
	pub fn new<S: Into<String>>(kind: ProtocolErrorKind, message: S) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}
}

//󰭅		Display																	
impl Display for ProtocolError {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.message)
	}
}

//󰭅		Error																	
impl Error for ProtocolError {}

//		SessionAddress															
/// Where and how to connect to the game over RCON.
#[expect(clippy::exhaustive_structs, reason = "Plain data")]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionAddress {
	//		Public properties													
	/// The host to connect to.
	pub host:     String,

	/// The port to connect to.
	pub port:     u16,

	/// The RCON password.
	pub password: String,
}

//󰭅		Display																	
impl Display for SessionAddress {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.host, self.port)
	}
}

//		HandshakeController														
/// Drives probes against the game until one succeeds.
///
/// Call [`tick()`](Self::tick()) once per iteration of the interactive loop.
/// Each tick either sends a probe, collects the outcome of the outstanding
/// probe, or does nothing while the probe is still running. At most one probe
/// is outstanding at any time, and a failed probe is followed by a fresh one on
/// the next tick.
///
/// A rejected password halts the handshake, since retrying cannot fix it.
/// Only [`retry()`](Self::retry()) resumes probing after that.
///
#[derive(Debug)]
pub struct HandshakeController<C> {
	//		Private properties													
	/// The protocol client. This is handed over by [`take_client()`](Self::take_client())
	/// once the handshake has succeeded.
	client:   Option<C>,

	/// The address the client connects to.
	address:  SessionAddress,

	/// The outstanding probe, if any.
	task:     AsyncTask<Result<String, ProtocolError>>,

	/// The progress of the handshake.
	state:    HandshakeState,

	/// The status line to display.
	status:   Status,

	/// How many probes have been sent.
	attempts: usize,
}

//󰭅		HandshakeController														
impl<C: ProtocolClient> HandshakeController<C> {
	//			Constructors													

	//		new																	
	/// Creates a controller for the given client and address.
	///
	/// The address is applied to the client immediately. No probe is sent
	/// until the first tick.
	///
	/// # Parameters
	///
	/// * `client`  - The protocol client to probe with.
	/// * `address` - Where to connect to.
	/// * `runtime` - The runtime that probes are run on.
	///
	#[must_use]
	pub fn new(mut client: C, address: SessionAddress, runtime: Handle) -> Self {
		client.set_address(address.clone());
		Self {
			client:   Some(client),
			address,
			task:     AsyncTask::new(runtime),
			state:    HandshakeState::NotStarted,
			status:   Status::connecting(),
			attempts: 0,
		}
	}

	//			Public methods													

	//		tick																
	/// Advances the handshake.
	///
	/// Returns `true` once the handshake has succeeded.
	///
	pub fn tick(&mut self) -> bool {
		match self.state {
			HandshakeState::Succeeded                                       => return true,
			HandshakeState::InFlight                                        => self.collect(),
			HandshakeState::Retrying(ref err) if !err.is_retryable()        => {},
			HandshakeState::NotStarted | HandshakeState::Retrying(_)        => self.probe(),
		}
		self.is_succeeded()
	}

	//		retry																
	/// Resumes probing after a failure that is not retried automatically.
	///
	/// Returns `true` if the handshake was halted and will now probe again on
	/// the next tick.
	///
	pub fn retry(&mut self) -> bool {
		match self.state {
			HandshakeState::Retrying(ref err) if !err.is_retryable() => {
				info!("Retrying RCON handshake with {} after: {err}", self.address);
				self.state = HandshakeState::NotStarted;
				true
			},
			HandshakeState::NotStarted
			| HandshakeState::InFlight
			| HandshakeState::Succeeded
			| HandshakeState::Retrying(_)                          => false,
		}
	}

	//		take_client															
	/// Hands over the protocol client, once the handshake has succeeded.
	///
	/// Returns [`None`] if the handshake has not succeeded, or if the client
	/// has already been taken.
	///
	pub fn take_client(&mut self) -> Option<C> {
		if self.is_succeeded() { self.client.take() } else { None }
	}

	//			Accessors														

	//		state																
	/// The progress of the handshake.
	#[must_use]
	pub const fn state(&self) -> &HandshakeState {
		&self.state
	}

	//		status																
	/// The status line to display.
	#[must_use]
	pub const fn status(&self) -> &Status {
		&self.status
	}

	//		address																
	/// The address being connected to.
	#[must_use]
	pub const fn address(&self) -> &SessionAddress {
		&self.address
	}

	//		attempts															
	/// How many probes have been sent.
	#[must_use]
	pub const fn attempts(&self) -> usize {
		self.attempts
	}

	//		is_succeeded														
	/// Whether the handshake has succeeded.
	#[must_use]
	pub const fn is_succeeded(&self) -> bool {
		matches!(self.state, HandshakeState::Succeeded)
	}

	//		is_ready															
	/// Whether the outstanding probe has finished, so that the next tick will
	/// collect its outcome.
	#[must_use]
	pub fn is_ready(&self) -> bool {
		self.task.is_ready()
	}

	//			Private methods													

	//		probe																
	/// Sends a probe.
	fn probe(&mut self) {
		let Some(client) = self.client.as_ref() else {
			return;
		};
		if self.task.start(|| client.send_command(PROBE_COMMAND, false)) {
			self.attempts = self.attempts.saturating_add(1);
			debug!("Sending RCON probe {} to {}", self.attempts, self.address);
			self.state = HandshakeState::InFlight;
		}
	}

	//		collect																
	/// Collects the outcome of the outstanding probe, if it has finished.
	fn collect(&mut self) {
		let Some(outcome) = self.task.poll() else {
			return;
		};
		let err = match outcome {
			Ok(Ok(response)) => {
				info!("RCON handshake with {} succeeded after {} attempts", self.address, self.attempts);
				self.status = Status::new(response, Color::GREEN);
				self.state  = HandshakeState::Succeeded;
				return;
			},
			Ok(Err(err))     => {
				debug!("RCON probe to {} failed: {err}", self.address);
				HandshakeError::from(err)
			},
			Err(err)         => {
				warn!("RCON probe to {} failed unexpectedly: {err}", self.address);
				HandshakeError::from(err)
			},
		};
		self.status = err.status();
		self.state  = HandshakeState::Retrying(err);
	}

	//																			
}



//		Traits

//§		ProtocolClient															
/// A client for the game's RCON protocol.
pub trait ProtocolClient: Send + Sync + 'static {
	//		set_address															
	/// Sets where the client connects to.
	fn set_address(&mut self, address: SessionAddress);

	//		send_command														
	/// Sends a command and returns the server's response.
	///
	/// The returned future must not borrow from the client, as it is run in
	/// the background.
	///
	/// # Parameters
	///
	/// * `command`  - The command to send.
	/// * `reliable` - Whether the client should retry sending internally.
	///
	/// # Errors
	///
	/// Returns a [`ProtocolError`] if the command could not be sent, or if the
	/// server rejected it.
	///
	fn send_command(&self, command: &str, reliable: bool) -> impl Future<Output = Result<String, ProtocolError>> + Send + 'static;
}
