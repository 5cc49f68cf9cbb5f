//! This module provides parsing of the game's command line.
//!
//! When the game has been launched with RCON enabled, its command line carries
//! everything needed to connect to it: the address to bind to, the RCON
//! password, and the port. The [`CommandLine`] type extracts those from the
//! command line of a running game process.
//!

//		Modules

#[cfg(test)]
#[path = "tests/commandline.rs"]
mod tests;



//		Packages

use core::mem;



//		Structs

//		CommandLine																
/// The RCON-related settings found on a game command line.
#[expect(clippy::exhaustive_structs, reason = "Plain data")]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandLine {
	//		Public properties													
	/// The address given by `+ip`.
	pub ip:            String,

	/// The password given by `+rcon_password`.
	pub rcon_password: String,

	/// The port given by `+hostport`.
	pub rcon_port:     Option<u16>,

	/// Whether `-usercon` was given.
	pub use_rcon:      bool,
}

//󰭅		CommandLine																
impl CommandLine {
	//		parse																
	/// Extracts the RCON settings from a sequence of arguments.
	///
	/// The `+ip`, `+rcon_password`, and `+hostport` flags take the following
	/// argument as their value, and the first occurrence of each wins. A flag
	/// at the very end, with no value after it, is ignored. If the value of
	/// `+hostport` is not a valid port, the flag is ignored and the value is
	/// treated as an argument in its own right. Unrecognised arguments are
	/// skipped.
	///
	/// # Parameters
	///
	/// * `args` - The arguments, in order.
	///
	pub fn parse<I, S>(args: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut cli  = Self::default();
		let mut args = args.into_iter().peekable();
		while let Some(arg) = args.next() {
			match arg.as_ref() {
				"+ip"            if cli.ip.is_empty()            => {
					if let Some(value) = args.next() {
						value.as_ref().clone_into(&mut cli.ip);
					}
				},
				"+rcon_password" if cli.rcon_password.is_empty() => {
					if let Some(value) = args.next() {
						value.as_ref().clone_into(&mut cli.rcon_password);
					}
				},
				"+hostport"      if cli.rcon_port.is_none()      => {
					if let Some(port) = args.peek().and_then(|value| value.as_ref().parse::<u16>().ok()) {
						cli.rcon_port = Some(port);
						drop(args.next());
					}
				},
				"-usercon"                                       => cli.use_rcon = true,
				_                                                => {},
			}
		}
		cli
	}

	//		parse_str															
	/// Extracts the RCON settings from a full command line string.
	///
	/// The string is split into arguments with [`split_args()`] and then
	/// parsed with [`parse()`](Self::parse()).
	///
	/// # Parameters
	///
	/// * `cmdline` - The command line.
	///
	#[must_use]
	pub fn parse_str(cmdline: &str) -> Self {
		Self::parse(split_args(cmdline))
	}

	//		is_populated														
	/// Whether the command line has everything needed to connect over RCON.
	#[must_use]
	pub fn is_populated(&self) -> bool {
		self.use_rcon
			&& !self.ip.is_empty()
			&& !self.rcon_password.is_empty()
			&& self.rcon_port.is_some()
	}
}



//		Functions

//		split_args																
/// Splits a command line string into arguments.
///
/// Arguments are separated by whitespace. Double quotes group text containing
/// whitespace into one argument, and are removed. A backslash before a double
/// quote produces a literal double quote.
///
/// # Parameters
///
/// * `cmdline` - The command line.
///
#[must_use]
pub fn split_args(cmdline: &str) -> Vec<String> {
	let mut args    = vec![];
	let mut current = String::new();
	let mut quoted  = false;
	let mut started = false;
	let mut chars   = cmdline.chars().peekable();
	while let Some(ch) = chars.next() {
		match ch {
			'\\' if chars.peek() == Some(&'"') => {
				current.push('"');
				drop(chars.next());
				started = true;
			},
			'"'                                => {
				quoted  = !quoted;
				started = true;
			},
			ch if ch.is_whitespace() && !quoted => {
				if started {
					args.push(mem::take(&mut current));
					started = false;
				}
			},
			ch                                 => {
				current.push(ch);
				started = true;
			},
		}
	}
	if started {
		args.push(current);
	}
	args
}
