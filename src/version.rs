//! This module provides the version type used to compare releases.
//!
//! Release tags in the wild are not always strict [SemVer](https://semver.org/).
//! Tags are commonly prefixed with `v`, may omit the minor or patch numbers,
//! and some projects append a fourth build-revision number, e.g. `1.2.3.417`.
//! The [`AppVersion`] type accepts all of these forms, and provides a strict
//! total order over them, so that release tags can be compared against the
//! version of the running application.
//!

//		Modules

#[cfg(test)]
#[path = "tests/version.rs"]
mod tests;



//		Packages

use core::{
	cmp::Ordering,
	fmt::{Display, self},
	str::FromStr,
};
use rubedo::sugar::s;
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::error::Error;



//		Enums

//		VersionError															
/// Errors that can occur when parsing a version.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum VersionError {
	/// The version string was empty, or only contained a `v` prefix.
	Empty,

	/// The version string could not be interpreted as a version number.
	Invalid(String),
}

//󰭅		Display																	
impl Display for VersionError {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::Empty                => write!(f,   "Version string is empty"),
			Self::Invalid(ref version) => write!(f, r#"Invalid version string "{version}""#),
		}
	}
}

//󰭅		Error																	
impl Error for VersionError {}



//		Structs

//		AppVersion																
/// A release or application version.
///
/// This wraps a [SemVer](https://semver.org/) [`Version`] and adds an optional
/// fourth build-revision number. Ordering compares the major, minor, patch, and
/// revision numbers numerically, and then applies SemVer prerelease precedence,
/// so that `1.2.0-beta.2` sorts before `1.2.0`. Build metadata is discarded
/// when parsing, as it does not take part in precedence.
///
/// A revision of zero is equivalent to no revision at all, so `1.2.3` and
/// `1.2.3.0` compare equal.
///
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct AppVersion {
	//		Private properties													
	/// The SemVer core of the version, without build metadata.
	semver:   Version,

	/// The fourth component, used by projects that number individual builds.
	revision: u64,
}

//󰭅		AppVersion																
impl AppVersion {
	//			Constructors													

	//		new																	
	/// Creates a new version from major, minor, and patch numbers.
	#[must_use]
	pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
		Self {
			semver:   Version::new(major, minor, patch),
			revision: 0,
		}
	}

	//		with_revision														
	/// Returns the same version with the given build revision.
	#[must_use]
	pub fn with_revision(mut self, revision: u64) -> Self {
		self.revision = revision;
		self
	}

	//			Public methods													

	//		major																
	/// The major version number.
	#[must_use]
	pub const fn major(&self) -> u64 {
		self.semver.major
	}

	//		minor																
	/// The minor version number.
	#[must_use]
	pub const fn minor(&self) -> u64 {
		self.semver.minor
	}

	//		patch																
	/// The patch version number.
	#[must_use]
	pub const fn patch(&self) -> u64 {
		self.semver.patch
	}

	//		revision															
	/// The build revision number, or zero if the version did not have one.
	#[must_use]
	pub const fn revision(&self) -> u64 {
		self.revision
	}

	//		is_prerelease														
	/// Whether the version carries a prerelease suffix, such as `-beta.1`.
	#[must_use]
	pub fn is_prerelease(&self) -> bool {
		!self.semver.pre.is_empty()
	}

	//		as_semver															
	/// The SemVer core of the version. The revision is not represented.
	#[must_use]
	pub const fn as_semver(&self) -> &Version {
		&self.semver
	}

	//																			
}

//󰭅		Display																	
impl Display for AppVersion {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}.{}", self.semver.major, self.semver.minor, self.semver.patch)?;
		if self.revision != 0 {
			write!(f, ".{}", self.revision)?;
		}
		if !self.semver.pre.is_empty() {
			write!(f, "-{}", self.semver.pre)?;
		}
		Ok(())
	}
}

//󰭅		FromStr																	
impl FromStr for AppVersion {
	type Err = VersionError;

	//		from_str															
	/// Parses a version from a release tag.
	///
	/// Leading and trailing whitespace and a leading `v` or `V` are ignored.
	/// Between one and four dot-separated numbers are accepted, with missing
	/// numbers treated as zero, optionally followed by a SemVer prerelease
	/// (`-rc.1`) and/or build metadata (`+sha.abc`).
	///
	/// # Errors
	///
	/// * [`VersionError::Empty`]
	/// * [`VersionError::Invalid`]
	///
	fn from_str(tag: &str) -> Result<Self, Self::Err> {
		let trimmed  = tag.trim();
		let stripped = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);
		if stripped.is_empty() {
			return Err(VersionError::Empty);
		}
		let (core, suffix) = stripped.split_at(stripped.find(['-', '+']).unwrap_or(stripped.len()));
		let mut numbers    = [0_u64; 4];
		for (index, part) in core.split('.').enumerate() {
			let slot = numbers.get_mut(index).ok_or_else(|| VersionError::Invalid(s!(tag)))?;
			*slot    = part.parse().map_err(|_err| VersionError::Invalid(s!(tag)))?;
		}
		let pre = match suffix.strip_prefix('-') {
			Some(rest) => rest.split_once('+').map_or(rest, |(pre, _build)| pre),
			None       => "",
		};
		let [major, minor, patch, revision] = numbers;
		Ok(Self {
			semver: Version {
				major,
				minor,
				patch,
				pre:   Prerelease::new(pre).map_err(|_err| VersionError::Invalid(s!(tag)))?,
				build: BuildMetadata::EMPTY,
			},
			revision,
		})
	}
}

//󰭅		Ord																		
impl Ord for AppVersion {
	//		cmp																	
	fn cmp(&self, other: &Self) -> Ordering {
		self.semver.major.cmp(&other.semver.major)
			.then(self.semver.minor.cmp(&other.semver.minor))
			.then(self.semver.patch.cmp(&other.semver.patch))
			.then(self.revision.cmp(&other.revision))
			.then_with(|| self.semver.pre.cmp(&other.semver.pre))
	}
}

//󰭅		PartialOrd																
impl PartialOrd for AppVersion {
	//		partial_cmp															
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

//󰭅		From<Version>															
impl From<Version> for AppVersion {
	//		from																
	fn from(mut version: Version) -> Self {
		version.build = BuildMetadata::EMPTY;
		Self {
			semver:   version,
			revision: 0,
		}
	}
}

//󰭅		Serialize																
impl Serialize for AppVersion {
	//		serialize															
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

//󰭅		Deserialize																
impl<'de> Deserialize<'de> for AppVersion {
	//		deserialize															
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		String::deserialize(deserializer)?.parse().map_err(D::Error::custom)
	}
}
