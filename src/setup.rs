//! This module provides the flow that gets the game running with RCON enabled.
//!
//! The game must be launched with a command line that enables RCON, and the
//! companion tool needs to know the credentials on that command line. The
//! [`SetupFlow`] watches the running game's command line, offers to launch the
//! game with freshly generated credentials when it is not running, and then
//! confirms that RCON actually works before handing over a connected client.
//!
//! Finding processes and opening URLs are platform concerns, and are provided
//! through the [`ProcessInspector`] and [`Launcher`] traits.
//!

//		Modules

#[cfg(test)]
#[path = "tests/setup.rs"]
mod tests;



//		Packages

use crate::{
	bootstrap::BootstrapConfig,
	commandline::CommandLine,
	handshake::{HandshakeController, ProtocolClient, SessionAddress, Status},
	task::AsyncTask,
};
use core::{
	future::Future,
	time::Duration,
};
use rubedo::sugar::s;
use std::time::Instant;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};



//		Enums

//		SetupStage																
/// Where the setup flow has got to.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum SetupStage {
	/// The game is not running, and needs to be launched.
	AwaitingLaunch {
		/// Whether the running processes have been checked at least once. Until
		/// then, it is not known whether the game is running.
		scanned: bool,
	},

	/// More than one instance of the game is running.
	MultipleInstances,

	/// The game is running, but was not launched with the command line needed
	/// for RCON.
	InvalidArguments,

	/// The game is running with RCON enabled, and the connection is being
	/// checked.
	Connecting {
		/// Where the connection is being made to.
		address: SessionAddress,

		/// The current status of the connection.
		status:  Status,
	},

	/// The connection has been confirmed.
	Ready,
}



//		Structs

//		Config																	
/// The configuration options for the setup flow.
#[expect(clippy::exhaustive_structs, reason = "Provided for configuration")]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
	//		Public properties													
	/// How often to check the game's command line.
	pub refresh_interval: Duration,

	/// The host to connect to. The game only accepts RCON connections from the
	/// local machine.
	pub host:             String,
}

//󰭅		Default																	
impl Default for Config {
	//		default																
	fn default() -> Self {
		Self {
			refresh_interval: Duration::from_secs(1),
			host:             s!("127.0.0.1"),
		}
	}
}

//		SetupFlow																
/// Drives the game from "not running" to "connected over RCON".
///
/// Call [`tick()`](Self::tick()) once per iteration of the interactive loop,
/// and show the user whatever [`SetupStage`] it returns. The game's command
/// line is checked in the background at the configured interval, and once it
/// carries usable RCON settings, a [`HandshakeController`] is started against
/// them. If the game is closed or its command line changes, the handshake is
/// discarded.
///
/// The credentials used by [`launch()`](Self::launch()) are generated when the
/// flow is created.
///
#[derive(Debug)]
pub struct SetupFlow<P, L, C> {
	//		Private properties													
	/// The configuration for the flow.
	config:             Config,

	/// The credentials to launch the game with.
	bootstrap:          BootstrapConfig,

	/// Finds the game's command line.
	inspector:          P,

	/// Launches the game.
	launcher:           L,

	/// The runtime that background work is run on.
	runtime:            Handle,

	/// The outstanding command line scan, if any.
	scan:               AsyncTask<Vec<String>>,

	/// When the most recent scan was started.
	last_scan:          Option<Instant>,

	/// Whether at least one scan has completed.
	scanned:            bool,

	/// The parsed command line of the game, if exactly one instance was found.
	command_line:       Option<CommandLine>,

	/// Whether more than one instance of the game was found.
	multiple_instances: bool,

	/// The handshake against the game, once its command line allows one.
	handshake:          Option<HandshakeController<C>>,

	/// The address whose connected client has been handed over by
	/// [`commit()`](Self::commit()). The flow stays ready for as long as the
	/// game keeps running with these settings.
	committed:          Option<SessionAddress>,
}

//󰭅		SetupFlow																
impl<P, L, C> SetupFlow<P, L, C>
where
	P: ProcessInspector,
	L: Launcher,
	C: ProtocolClient + Default,
{
	//			Constructors													

	//		new																	
	/// Creates a setup flow with freshly generated launch credentials.
	///
	/// # Parameters
	///
	/// * `config`    - The configuration for the flow.
	/// * `inspector` - Finds the game's command line.
	/// * `launcher`  - Launches the game.
	/// * `runtime`   - The runtime that background work is run on.
	///
	#[must_use]
	pub fn new(config: Config, inspector: P, launcher: L, runtime: Handle) -> Self {
		Self::with_bootstrap(config, BootstrapConfig::generate(), inspector, launcher, runtime)
	}

	//		with_bootstrap														
	/// Creates a setup flow with the given launch credentials.
	///
	/// # Parameters
	///
	/// * `config`    - The configuration for the flow.
	/// * `bootstrap` - The credentials to launch the game with.
	/// * `inspector` - Finds the game's command line.
	/// * `launcher`  - Launches the game.
	/// * `runtime`   - The runtime that background work is run on.
	///
	#[must_use]
	pub fn with_bootstrap(
		config:    Config,
		bootstrap: BootstrapConfig,
		inspector: P,
		launcher:  L,
		runtime:   Handle,
	) -> Self {
		Self {
			config,
			bootstrap,
			inspector,
			launcher,
			scan:               AsyncTask::new(runtime.clone()),
			runtime,
			last_scan:          None,
			scanned:            false,
			command_line:       None,
			multiple_instances: false,
			handshake:          None,
			committed:          None,
		}
	}

	//			Public methods													

	//		tick																
	/// Advances the flow.
	///
	/// # Parameters
	///
	/// * `now` - The current time, used to schedule command line checks.
	///
	pub fn tick(&mut self, now: Instant) -> SetupStage {
		self.refresh(now);
		if self.multiple_instances {
			self.reset();
			return SetupStage::MultipleInstances;
		}
		let Some(settings) = self.command_line.as_ref().map(|cli| self.address_for(cli)) else {
			self.reset();
			return SetupStage::AwaitingLaunch { scanned: self.scanned };
		};
		let Some(address) = settings else {
			self.reset();
			return SetupStage::InvalidArguments;
		};
		if let Some(committed) = self.committed.as_ref() {
			if *committed == address {
				return SetupStage::Ready;
			}
			info!("Game RCON settings changed after the connection was handed over");
			self.committed = None;
		}
		if self.handshake.as_ref().is_some_and(|handshake| handshake.address() != &address) {
			info!("Game RCON settings changed, restarting handshake");
			self.handshake = None;
		}
		let handshake = self.handshake.get_or_insert_with(|| {
			info!("Connecting to game at {address}");
			HandshakeController::new(C::default(), address.clone(), self.runtime.clone())
		});
		if handshake.tick() {
			SetupStage::Ready
		} else {
			SetupStage::Connecting { address, status: handshake.status().clone() }
		}
	}

	//		launch																
	/// Launches the game with the generated credentials.
	///
	/// This is only possible once the running processes have been checked, and
	/// no instance of the game was found.
	///
	/// Returns `true` if the game was launched.
	///
	pub fn launch(&self) -> bool {
		if !self.can_launch() {
			return false;
		}
		info!("Launching game with RCON on port {}", self.bootstrap.port);
		self.launcher.open_url(&self.bootstrap.launch_url());
		true
	}

	//		commit																
	/// Hands over the connected protocol client.
	///
	/// Returns [`None`] unless the connection has been confirmed. Once the
	/// client has been handed over, the flow no longer holds a handshake, and
	/// stays [`Ready`](SetupStage::Ready) without connecting again until the
	/// game's RCON settings change or the game is closed.
	///
	pub fn commit(&mut self) -> Option<C> {
		let handshake  = self.handshake.as_mut()?;
		let client     = handshake.take_client()?;
		self.committed = Some(handshake.address().clone());
		self.handshake = None;
		Some(client)
	}

	//			Accessors														

	//		can_launch															
	/// Whether [`launch()`](Self::launch()) would launch the game.
	#[must_use]
	pub const fn can_launch(&self) -> bool {
		self.scanned && !self.multiple_instances && self.command_line.is_none()
	}

	//		is_valid															
	/// Whether the game is running with a command line that allows RCON.
	#[must_use]
	pub fn is_valid(&self) -> bool {
		self.inspector.is_running()
			&& !self.multiple_instances
			&& self.command_line.as_ref().is_some_and(CommandLine::is_populated)
	}

	//		is_ready															
	/// Whether a background result is waiting to be collected by the next
	/// tick.
	#[must_use]
	pub fn is_ready(&self) -> bool {
		self.scan.is_ready() || self.handshake.as_ref().is_some_and(HandshakeController::is_ready)
	}

	//		bootstrap															
	/// The credentials that the game is launched with.
	#[must_use]
	pub const fn bootstrap(&self) -> &BootstrapConfig {
		&self.bootstrap
	}

	//		command_line														
	/// The game's parsed command line, if exactly one instance is running.
	#[must_use]
	pub const fn command_line(&self) -> Option<&CommandLine> {
		self.command_line.as_ref()
	}

	//			Private methods													

	//		refresh																
	/// Collects the outcome of the outstanding scan, and starts a new one when
	/// it is due.
	fn refresh(&mut self, now: Instant) {
		if let Some(outcome) = self.scan.poll() {
			match outcome {
				Ok(lines) => self.apply(&lines),
				Err(err)  => warn!("Failed to read game command line: {err}"),
			}
			self.scanned = true;
		}
		if self.scan.is_pending() {
			return;
		}
		let due = !self.scanned || self.last_scan.is_none_or(|last| now.saturating_duration_since(last) >= self.config.refresh_interval);
		if due && self.scan.start(|| self.inspector.command_lines()) {
			self.last_scan = Some(now);
		}
	}

	//		reset																
	/// Forgets any connection to the game, whether in progress or handed over.
	fn reset(&mut self) {
		self.handshake = None;
		self.committed = None;
	}

	//		apply																
	/// Applies the command lines found by a scan.
	fn apply(&mut self, lines: &[String]) {
		self.multiple_instances = lines.len() > 1;
		if self.multiple_instances {
			debug!("Found {} instances of the game", lines.len());
			return;
		}
		let command_line = lines.first().map(|line| CommandLine::parse_str(line));
		if command_line != self.command_line {
			debug!("Game command line changed");
		}
		self.command_line = command_line;
	}

	//		address_for															
	/// The address to connect to for a command line, if it allows RCON.
	fn address_for(&self, cli: &CommandLine) -> Option<SessionAddress> {
		if !cli.is_populated() {
			return None;
		}
		Some(SessionAddress {
			host:     self.config.host.clone(),
			port:     cli.rcon_port?,
			password: cli.rcon_password.clone(),
		})
	}

	//																			
}



//		Traits

//§		ProcessInspector														
/// Finds the running game.
pub trait ProcessInspector: Send + Sync + 'static {
	//		is_running															
	/// Whether the game is currently running.
	fn is_running(&self) -> bool;

	//		command_lines														
	/// Finds the command line of every running instance of the game.
	///
	/// The returned future must not borrow from the inspector, as it is run in
	/// the background.
	///
	fn command_lines(&self) -> impl Future<Output = Vec<String>> + Send + 'static;
}

//§		Launcher																
/// Opens URLs with the operating system.
#[cfg_attr(test, mockall::automock)]
pub trait Launcher {
	//		open_url															
	/// Opens the given URL. This does not wait for anything to happen.
	fn open_url(&self, url: &str);
}
