//! This module provides generation of fresh RCON credentials.
//!
//! Every time the game is launched from the setup flow it is given a newly
//! generated password and port, which are passed on its command line. Nothing
//! is reused between launches.
//!
//! The source of randomness is injectable, so that tests can use a fixed seed.
//!

//		Modules

#[cfg(test)]
#[path = "tests/bootstrap.rs"]
mod tests;



//		Packages

use crate::handshake::SessionAddress;
use core::ops::RangeInclusive;
use rand::{
	Rng,
	SeedableRng as _,
	distributions::Alphanumeric,
	rngs::StdRng,
};



//		Constants

/// The Steam application ID of the game.
pub const GAME_APP_ID: u32 = 440;

/// The length of generated passwords.
pub const PASSWORD_LENGTH: usize = 16;

/// The range that generated ports are drawn from. Some routers mishandle high
/// port numbers, so keeping to this range adds another layer of protection.
pub const PORT_RANGE: RangeInclusive<u16> = 40_000..=65_535;



//		Structs

//		BootstrapConfig															
/// The credentials to launch the game with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BootstrapConfig {
	//		Public properties													
	/// The RCON password. This is [`PASSWORD_LENGTH`] characters long, and only
	/// contains ASCII letters and digits.
	pub password: String,

	/// The RCON port, within [`PORT_RANGE`].
	pub port:     u16,
}

//󰭅		BootstrapConfig															
impl BootstrapConfig {
	//			Constructors													

	//		generate															
	/// Generates a new set of credentials.
	///
	/// A fresh random number generator is seeded from the operating system for
	/// every call.
	///
	#[must_use]
	pub fn generate() -> Self {
		Self::generate_with(&mut StdRng::from_entropy())
	}

	//		generate_with														
	/// Generates a new set of credentials from the given source of randomness.
	///
	/// # Parameters
	///
	/// * `rng` - The random number generator to use.
	///
	pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
		Self {
			password: generate_password(rng, PASSWORD_LENGTH),
			port:     generate_port(rng),
		}
	}

	//			Public methods													

	//		launch_url															
	/// The URL that launches the game with these credentials.
	///
	/// The game is bound to all interfaces, but only accepts RCON connections
	/// from the local machine. Each setting is aliased away after being applied,
	/// so that it cannot be changed from the game console.
	///
	#[must_use]
	pub fn launch_url(&self) -> String {
		format!(
			"steam://run/{GAME_APP_ID}// \
			-usercon \
			+ip 0.0.0.0 +alias ip \
			+sv_rcon_whitelist_address 127.0.0.1 +alias sv_rcon_whitelist_address \
			+rcon_password {} +alias rcon_password \
			+hostport {} +alias hostport \
			+net_start \
			+con_timestamp 1 +alias con_timestamp \
			-condebug \
			-conclearlog",
			self.password,
			self.port,
		)
	}

	//		address																
	/// The address to connect to the game with, once it has been launched.
	///
	/// # Parameters
	///
	/// * `host` - The host the game is running on.
	///
	#[must_use]
	pub fn address(&self, host: &str) -> SessionAddress {
		SessionAddress {
			host:     host.to_owned(),
			port:     self.port,
			password: self.password.clone(),
		}
	}
}



//		Functions

//		generate_password														
/// Generates a random password of ASCII letters and digits.
///
/// # Parameters
///
/// * `rng`    - The random number generator to use.
/// * `length` - The number of characters to generate.
///
pub fn generate_password<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
	(0..length).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

//		generate_port															
/// Generates a random port within [`PORT_RANGE`].
///
/// # Parameters
///
/// * `rng` - The random number generator to use.
///
pub fn generate_port<R: Rng + ?Sized>(rng: &mut R) -> u16 {
	rng.gen_range(PORT_RANGE)
}
