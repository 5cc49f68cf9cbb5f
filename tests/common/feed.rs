//! Common shared release feed functionality for tests.

//		Packages

use reqwest::Url;
use serde_json::{Value as JsonValue, json};
use wiremock::MockServer;



//		Constants

/// The path that the test feed is served from.
pub(crate) const FEED_PATH: &str = "/repos/example/app/releases";



//		Functions

//		release																	
/// Creates a release as it would appear in a GitHub feed.
///
/// # Parameters
///
/// * `id`         - The release ID.
/// * `tag`        - The tag name, which holds the version.
/// * `prerelease` - Whether the release is a prerelease.
///
pub(crate) fn release(id: u64, tag: &str, prerelease: bool) -> JsonValue {
	json!({
		"id":         id,
		"tag_name":   tag,
		"name":       format!("Release {tag}"),
		"html_url":   format!("https://github.com/example/app/releases/tag/{tag}"),
		"draft":      false,
		"prerelease": prerelease,
		"assets":     [],
	})
}

//		feed_url																
/// The URL of the test feed on the given server.
///
/// # Parameters
///
/// * `server` - The mock server serving the feed.
///
pub(crate) fn feed_url(server: &MockServer) -> Url {
	Url::parse(&format!("{}{FEED_PATH}", server.uri())).unwrap()
}
