//! This module provides release discovery against a GitHub-style release feed.
//!
//! The feed is a JSON array of releases, newest first. It is fetched through a
//! [`FeedSource`], and then scanned by [`resolve()`] to find the newest stable
//! release and the newest preview release that are newer than the running
//! application. The [`VersionResolver`] wraps all of this in an [`AsyncTask`],
//! so that it can be driven from an interactive loop without blocking.
//!

//		Modules

#[cfg(test)]
#[path = "tests/releases.rs"]
mod tests;



//		Packages

use crate::{
	task::AsyncTask,
	version::AppVersion,
};
use core::{
	fmt::{Display, self},
	future::Future,
};
use reqwest::{
	Client,
	Url,
	header::{ACCEPT, USER_AGENT},
};
use rubedo::sugar::s;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::{
	error::Error,
	sync::Arc,
	vec::IntoIter,
};
use tokio::runtime::Handle;
use tracing::{debug, error, info, warn};



//		Constants

/// The base URL of the GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com/";

/// The `User-Agent` sent with feed requests. GitHub rejects requests that do
/// not have one.
pub const FEED_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));



//		Enums

//		Channel																	
/// The release channel that a release was published to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Channel {
	/// A regular release.
	Stable,

	/// A prerelease, offered to users who opt into previews.
	Preview,
}

//		FeedError																
/// Errors that can occur when reading a release feed.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum FeedError {
	/// The response was valid JSON, but contained no releases.
	EmptyFeed,

	/// The response body was empty. Feed sources return an empty body when the
	/// request failed.
	EmptyResponse,

	/// The response body could not be parsed as JSON.
	InvalidJson(String),

	/// A release in the feed did not have the expected structure.
	InvalidRelease(String),

	/// The feed URL could not be constructed.
	InvalidUrl(String),

	/// The response was valid JSON, but was not an array of releases.
	NotAnArray,
}

//󰭅		Display																	
impl Display for FeedError {
	//		fmt																	
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match *self {
			Self::EmptyFeed               => write!(f, "Response JSON was empty"),
			Self::EmptyResponse           => write!(f, "Response body was empty"),
			Self::InvalidJson(ref msg)    => write!(f, "Failed to parse JSON: {msg}"),
			Self::InvalidRelease(ref msg) => write!(f, "Invalid release in feed: {msg}"),
			Self::InvalidUrl(ref msg)     => write!(f, "Invalid feed URL: {msg}"),
			Self::NotAnArray              => write!(f, "Response JSON was not an array"),
		}
	}
}

//󰭅		Error																	
impl Error for FeedError {}



//		Structs

//		Config																	
/// The configuration options for the version resolver.
#[expect(clippy::exhaustive_structs, reason = "Provided for configuration")]
#[derive(Clone, Debug)]
pub struct Config {
	//		Public properties													
	/// The version of the running application. Only releases newer than this
	/// are offered.
	pub version: AppVersion,

	/// The URL of the release feed, usually obtained from [`releases_url()`].
	pub feed:    Url,
}

//		ReleaseEntry															
/// A release read from the feed.
#[expect(clippy::exhaustive_structs, reason = "Plain data")]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReleaseEntry {
	//		Public properties													
	/// The version the release was tagged with.
	pub version: AppVersion,

	/// The URL of the release page.
	pub url:     String,

	/// The channel the release was published to.
	pub channel: Channel,
}

//		VersionResolution														
/// The outcome of one pass over the release feed.
///
/// If [`failed`](Self::failed) is set, neither release is present. Otherwise
/// each release that is present is newer than the running version.
///
#[expect(clippy::exhaustive_structs, reason = "Plain data")]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VersionResolution {
	//		Public properties													
	/// The newest stable release, if one is newer than the running version.
	pub stable:  Option<ReleaseEntry>,

	/// The newest preview release, if one was found before the scan ended.
	pub preview: Option<ReleaseEntry>,

	/// Whether the feed could not be fetched or read.
	pub failed:  bool,
}

//󰭅		VersionResolution														
impl VersionResolution {
	//		failure																
	/// A failed resolution, with no releases.
	#[must_use]
	pub const fn failure() -> Self {
		Self {
			stable:  None,
			preview: None,
			failed:  true,
		}
	}

	//		is_update_available													
	/// Whether any newer release was found.
	#[must_use]
	pub const fn is_update_available(&self) -> bool {
		self.stable.is_some() || self.preview.is_some()
	}
}

//		GitHubRelease															
/// A release as it appears on the wire.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct GitHubRelease {
	//		Private properties													
	/// The release ID. Only used for logging.
	#[serde(default)]
	id:         Option<u64>,

	/// The tag name, which holds the version.
	tag_name:   String,

	/// The URL of the release page.
	html_url:   String,

	/// Whether the release is a prerelease.
	prerelease: bool,
}

//		ReleaseFeed																
/// A lazily-decoded sequence of releases.
///
/// The feed body is validated when the feed is created, but individual
/// releases are only decoded as the iterator reaches them. A release that is
/// missing required fields yields a [`FeedError::InvalidRelease`], whereas a
/// release whose tag is not a valid version is logged and skipped.
///
#[derive(Debug)]
pub struct ReleaseFeed {
	//		Private properties													
	/// The undecoded releases that remain.
	releases: IntoIter<JsonValue>,
}

//󰭅		ReleaseFeed																
impl ReleaseFeed {
	//		parse																
	/// Validates a feed response body.
	///
	/// # Parameters
	///
	/// * `body` - The response body returned by the feed source.
	///
	/// # Errors
	///
	/// * [`FeedError::EmptyFeed`]
	/// * [`FeedError::EmptyResponse`]
	/// * [`FeedError::InvalidJson`]
	/// * [`FeedError::NotAnArray`]
	///
	pub fn parse(body: &str) -> Result<Self, FeedError> {
		if body.trim().is_empty() {
			return Err(FeedError::EmptyResponse);
		}
		let json: JsonValue = serde_json::from_str(body).map_err(|err| FeedError::InvalidJson(err.to_string()))?;
		let is_empty        = match json {
			JsonValue::Null                                                => true,
			JsonValue::Array(ref releases)                                 => releases.is_empty(),
			JsonValue::Object(ref fields)                                  => fields.is_empty(),
			JsonValue::Bool(_) | JsonValue::Number(_) | JsonValue::String(_) => false,
		};
		if is_empty {
			return Err(FeedError::EmptyFeed);
		}
		let JsonValue::Array(releases) = json else {
			return Err(FeedError::NotAnArray);
		};
		Ok(Self {
			releases: releases.into_iter(),
		})
	}
}

//󰭅		Iterator																
impl Iterator for ReleaseFeed {
	type Item = Result<ReleaseEntry, FeedError>;

	//		next																
	fn next(&mut self) -> Option<Self::Item> {
		for value in self.releases.by_ref() {
			let release = match serde_json::from_value::<GitHubRelease>(value) {
				Ok(release) => release,
				Err(err)    => return Some(Err(FeedError::InvalidRelease(err.to_string()))),
			};
			match release.tag_name.parse::<AppVersion>() {
				Ok(version) => return Some(Ok(ReleaseEntry {
					version,
					url:     release.html_url,
					channel: if release.prerelease { Channel::Preview } else { Channel::Stable },
				})),
				Err(err)    => {
					let id = release.id.map_or_else(|| s!("?"), |id| id.to_string());
					warn!("Release id {id} has invalid tag_name version {:?}: {err}", release.tag_name);
				},
			}
		}
		None
	}
}

//		HttpFeed																
/// A [`FeedSource`] that fetches the feed over HTTP.
#[derive(Clone, Debug, Default)]
pub struct HttpFeed {
	//		Private properties													
	/// The HTTP client used for requests.
	client: Client,
}

//󰭅		HttpFeed																
impl HttpFeed {
	//		new																	
	/// Creates a feed source with a default HTTP client.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	//		with_client															
	/// Creates a feed source that uses the given HTTP client.
	#[must_use]
	pub const fn with_client(client: Client) -> Self {
		Self {
			client,
		}
	}
}

//󰭅		FeedSource																
impl FeedSource for HttpFeed {
	//		fetch																
	async fn fetch(&self, url: &Url) -> String {
		let response = match self.client
			.get(url.clone())
			.header(USER_AGENT, FEED_USER_AGENT)
			.header(ACCEPT,     "application/vnd.github+json")
			.send()
			.await
		{
			Ok(response) => response,
			Err(err)     => {
				error!("HTTP request to {url} failed: {err}");
				return String::new();
			},
		};
		let status = response.status();
		if !status.is_success() {
			error!("HTTP status code {status} received when calling {url}");
			return String::new();
		}
		response.text().await.unwrap_or_else(|err| {
			error!("Invalid HTTP body received from {url}: {err}");
			String::new()
		})
	}
}

//		VersionResolver															
/// A non-blocking check for newer releases.
///
/// Call [`start()`](Self::start()) to begin a check, and then call
/// [`poll()`](Self::poll()) once per tick until it returns the resolution. Each
/// check is a single pass: a failed check is not retried, and it is up to the
/// caller to start another one later if desired.
///
#[derive(Debug)]
pub struct VersionResolver<F> {
	//		Private properties													
	/// The configuration for the resolver.
	config: Config,

	/// The source of the release feed. This is shared with the background
	/// task while a check is in progress.
	feed:   Arc<F>,

	/// The outstanding check, if any.
	task:   AsyncTask<VersionResolution>,
}

//󰭅		VersionResolver															
impl<F: FeedSource> VersionResolver<F> {
	//			Constructors													

	//		new																	
	/// Creates a new, idle version resolver.
	///
	/// # Parameters
	///
	/// * `config`  - The configuration for the resolver.
	/// * `feed`    - The source to fetch the release feed from.
	/// * `runtime` - The runtime that checks are run on.
	///
	#[must_use]
	pub fn new(config: Config, feed: F, runtime: Handle) -> Self {
		Self {
			config,
			feed: Arc::new(feed),
			task: AsyncTask::new(runtime),
		}
	}

	//			Public methods													

	//		start																
	/// Starts a check, unless one is already in progress.
	///
	/// Returns `true` if a check was started.
	///
	pub fn start(&mut self) -> bool {
		self.task.start(|| {
			let feed    = Arc::clone(&self.feed);
			let url     = self.config.feed.clone();
			let current = self.config.version.clone();
			info!("Checking for new versions newer than {current}");
			async move { check_for_new_version(&*feed, &url, &current).await }
		})
	}

	//		poll																
	/// Collects the result of the check, without waiting.
	///
	/// Returns [`None`] until the check has finished. A check that could not
	/// complete is reported as a [failed](VersionResolution::failure())
	/// resolution.
	///
	pub fn poll(&mut self) -> Option<VersionResolution> {
		self.task.poll().map(|outcome| outcome.unwrap_or_else(|err| {
			error!("Version check failed: {err}");
			VersionResolution::failure()
		}))
	}

	//		is_pending															
	/// Whether a check is in progress or waiting to be collected.
	#[must_use]
	pub const fn is_pending(&self) -> bool {
		self.task.is_pending()
	}

	//		is_ready															
	/// Whether the next call to [`poll()`](Self::poll()) will return a result.
	#[must_use]
	pub fn is_ready(&self) -> bool {
		self.task.is_ready()
	}

	//		current_version														
	/// The version of the running application.
	#[must_use]
	pub const fn current_version(&self) -> &AppVersion {
		&self.config.version
	}

	//																			
}



//		Traits

//§		FeedSource																
/// A source of release feed bodies.
pub trait FeedSource: Send + Sync + 'static {
	//		fetch																
	/// Fetches the feed body from the given URL.
	///
	/// Failures are reported by returning an empty string, which the resolver
	/// treats as a failed check.
	///
	fn fetch(&self, url: &Url) -> impl Future<Output = String> + Send;
}



//		Functions

//		releases_url															
/// Builds the URL of the release feed for a GitHub repository.
///
/// # Parameters
///
/// * `owner` - The owner of the repository.
/// * `repo`  - The name of the repository.
///
/// # Errors
///
/// * [`FeedError::InvalidUrl`]
///
pub fn releases_url(owner: &str, repo: &str) -> Result<Url, FeedError> {
	let endpoint = format!("repos/{owner}/{repo}/releases");
	Url::parse(GITHUB_API_URL)
		.and_then(|base| base.join(&endpoint))
		.map_err(|err| FeedError::InvalidUrl(format!("{endpoint}: {err}")))
}

//		resolve																	
/// Scans releases, newest first, for releases newer than the current version.
///
/// The scan stops at the first release that is not newer than the current
/// version, as everything after it is older still. The first preview release
/// found is kept, and the scan carries on looking for a stable release. The
/// first stable release found ends the scan, even if no preview release has
/// been found yet.
///
/// An error from the feed makes the whole resolution fail.
///
/// # Parameters
///
/// * `releases` - The releases, newest first.
/// * `current`  - The version of the running application.
///
pub fn resolve<I>(releases: I, current: &AppVersion) -> VersionResolution
where
	I: IntoIterator<Item = Result<ReleaseEntry, FeedError>>,
{
	let mut resolution = VersionResolution::default();
	for release in releases {
		let release = match release {
			Ok(release) => release,
			Err(err)    => {
				error!("Failed to read release feed: {err}");
				return VersionResolution::failure();
			},
		};
		debug!("Found release: version = {}, url = {}", release.version, release.url);
		if release.version <= *current {
			debug!("Release {} is not newer than {current}, stopping", release.version);
			break;
		}
		match release.channel {
			Channel::Preview => {
				if resolution.preview.is_none() {
					resolution.preview = Some(release);
				}
			},
			Channel::Stable  => {
				resolution.stable = Some(release);
				break;
			},
		}
	}
	resolution
}

//		resolve_body															
/// Parses a feed body and resolves it against the current version.
///
/// Any problem with the body is logged, and results in a failed resolution.
///
/// # Parameters
///
/// * `body`    - The feed response body.
/// * `current` - The version of the running application.
///
#[must_use]
pub fn resolve_body(body: &str, current: &AppVersion) -> VersionResolution {
	match ReleaseFeed::parse(body) {
		Ok(feed) => resolve(feed, current),
		Err(err) => {
			error!("Failed to check for new versions: {err}");
			VersionResolution::failure()
		},
	}
}

//		check_for_new_version													
/// Fetches the feed and resolves it against the current version.
///
/// # Parameters
///
/// * `feed`    - The source to fetch the feed from.
/// * `url`     - The URL of the feed.
/// * `current` - The version of the running application.
///
pub async fn check_for_new_version<F>(feed: &F, url: &Url, current: &AppVersion) -> VersionResolution
where
	F: FeedSource + ?Sized,
{
	let body       = feed.fetch(url).await;
	let resolution = resolve_body(&body, current);
	if !resolution.failed {
		match (&resolution.stable, &resolution.preview) {
			(Some(stable), _)     => info!("New stable version {} available", stable.version),
			(None, Some(preview)) => info!("New preview version {} available", preview.version),
			(None, None)          => info!("The current version {current} is the latest available"),
		}
	}
	resolution
}
