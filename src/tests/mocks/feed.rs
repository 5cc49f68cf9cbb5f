//! This module provides release feed sources that do not touch the network.

//		Packages

use crate::releases::FeedSource;
use core::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use reqwest::Url;
use serde_json::{Value as JsonValue, json};
use std::sync::Arc;



//		Structs

//		StaticFeed																
/// A feed source that always returns the same body.
#[derive(Debug, Default)]
pub(crate) struct StaticFeed {
	/// The body to return.
	body:    String,

	/// How many times the feed has been fetched.
	fetches: Arc<AtomicUsize>,

	/// The URLs that were fetched, in order.
	urls:    Arc<Mutex<Vec<Url>>>,
}

//󰭅		StaticFeed																
impl StaticFeed {
	//		new																	
	pub(crate) fn new<S: Into<String>>(body: S) -> Self {
		Self {
			body: body.into(),
			..Default::default()
		}
	}

	//		fetches																
	pub(crate) fn fetches(&self) -> Arc<AtomicUsize> {
		Arc::clone(&self.fetches)
	}

	//		urls																
	pub(crate) fn urls(&self) -> Arc<Mutex<Vec<Url>>> {
		Arc::clone(&self.urls)
	}
}

//󰭅		FeedSource																
impl FeedSource for StaticFeed {
	//		fetch																
	async fn fetch(&self, url: &Url) -> String {
		let _ = self.fetches.fetch_add(1, Ordering::SeqCst);
		self.urls.lock().push(url.clone());
		self.body.clone()
	}
}

//		PanickingFeed															
/// A feed source that panics when fetched.
#[derive(Debug)]
pub(crate) struct PanickingFeed;

//󰭅		FeedSource																
impl FeedSource for PanickingFeed {
	//		fetch																
	async fn fetch(&self, url: &Url) -> String {
		panic!("Connection to {url} reset");
	}
}



//		Functions

//		release																	
/// Creates a release as it would appear in a GitHub feed.
pub(crate) fn release(id: u64, tag: &str, prerelease: bool) -> JsonValue {
	json!({
		"id":         id,
		"tag_name":   tag,
		"html_url":   format!("https://github.com/example/app/releases/tag/{tag}"),
		"prerelease": prerelease,
		"draft":      false,
	})
}

//		feed_body																
/// Creates a feed body from a list of releases.
pub(crate) fn feed_body(releases: &[JsonValue]) -> String {
	JsonValue::Array(releases.to_vec()).to_string()
}
