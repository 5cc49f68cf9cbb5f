#![allow(non_snake_case)]

//		Packages

use super::*;
use crate::commandline::CommandLine;
use rand::{RngCore, SeedableRng as _};
use rubedo::sugar::s;
use std::collections::HashSet;



//		Common

//		seeded																	
fn seeded(seed: u64) -> StdRng {
	StdRng::seed_from_u64(seed)
}



//		Tests

//		BootstrapConfig															
#[cfg(test)]
mod bootstrap_config {
	use super::*;

	//		generate															
	#[test]
	fn generate() {
		for _ in 0..20 {
			let config = BootstrapConfig::generate();
			assert_eq!(config.password.len(), PASSWORD_LENGTH);
			assert!(config.password.chars().all(|ch| ch.is_ascii_alphanumeric()), "Password should be alphanumeric");
			assert!(PORT_RANGE.contains(&config.port), "Port {} should be in range", config.port);
		}
	}
	#[test]
	fn generate__not_reused() {
		let passwords: HashSet<_> = (0..10).map(|_| BootstrapConfig::generate().password).collect();
		assert_eq!(passwords.len(), 10);
	}

	//		generate_with														
	#[test]
	fn generate_with__deterministic() {
		let first  = BootstrapConfig::generate_with(&mut seeded(1234));
		let second = BootstrapConfig::generate_with(&mut seeded(1234));
		assert_eq!(first, second);
		assert_ne!(first, BootstrapConfig::generate_with(&mut seeded(4321)));
	}
	#[test]
	fn generate_with__dyn_rng() {
		let mut rng                   = seeded(7);
		let dynamic: &mut dyn RngCore = &mut rng;
		let config                    = BootstrapConfig::generate_with(dynamic);
		assert_eq!(config.password.len(), PASSWORD_LENGTH);
	}

	//		launch_url															
	#[test]
	fn launch_url() {
		let config = BootstrapConfig {
			password: s!("aB3dE5gH7jK9mN1p"),
			port:     40434,
		};
		assert_eq!(config.launch_url(), concat!(
			"steam://run/440// -usercon",
			" +ip 0.0.0.0 +alias ip",
			" +sv_rcon_whitelist_address 127.0.0.1 +alias sv_rcon_whitelist_address",
			" +rcon_password aB3dE5gH7jK9mN1p +alias rcon_password",
			" +hostport 40434 +alias hostport",
			" +net_start",
			" +con_timestamp 1 +alias con_timestamp",
			" -condebug",
			" -conclearlog",
		));
	}
	#[test]
	fn launch_url__parses_as_command_line() {
		let config = BootstrapConfig::generate_with(&mut seeded(99));
		let cli    = CommandLine::parse_str(&config.launch_url());
		assert!(cli.is_populated(), "The launch URL should carry every setting");
		assert_eq!(cli.ip,            "0.0.0.0");
		assert_eq!(cli.rcon_password, config.password);
		assert_eq!(cli.rcon_port,     Some(config.port));
	}

	//		address																
	#[test]
	fn address() {
		let config  = BootstrapConfig::generate_with(&mut seeded(5));
		let address = config.address("127.0.0.1");
		assert_eq!(address, SessionAddress {
			host:     s!("127.0.0.1"),
			port:     config.port,
			password: config.password,
		});
	}
}

//		generate_password														
#[cfg(test)]
mod passwords {
	use super::*;

	//		generate_password													
	#[test]
	fn generate_password__length() {
		let mut rng = seeded(42);
		for length in [0, 1, 16, 64] {
			assert_eq!(generate_password(&mut rng, length).len(), length);
		}
	}
	#[test]
	fn generate_password__palette() {
		let mut rng = seeded(42);
		for _ in 0..100 {
			let password = generate_password(&mut rng, PASSWORD_LENGTH);
			assert!(password.chars().all(|ch| ch.is_ascii_alphanumeric()), "Unexpected character in {password:?}");
		}
	}
	#[test]
	fn generate_password__uses_whole_palette() {
		let mut rng = seeded(3);
		let seen: HashSet<char> = generate_password(&mut rng, 10_000).chars().collect();
		assert_eq!(seen.len(), 62);
	}
}

//		generate_port															
#[cfg(test)]
mod ports {
	use super::*;

	//		generate_port														
	#[test]
	fn generate_port__range() {
		let mut rng = seeded(42);
		for _ in 0..10_000 {
			let port = generate_port(&mut rng);
			assert!((40_000..=65_535).contains(&port), "Port {port} out of range");
		}
	}
	#[test]
	fn generate_port__spread() {
		let mut rng         = seeded(11);
		let ports: Vec<u16> = (0..10_000).map(|_| generate_port(&mut rng)).collect();
		assert!(ports.iter().any(|&port| port < 41_000), "Low end of the range should be reached");
		assert!(ports.iter().any(|&port| port > 64_500), "High end of the range should be reached");
	}
}
