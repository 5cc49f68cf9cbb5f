//		Packages

use figment::{
	Figment,
	providers::{Env, Format, Serialized, Toml},
};
use ignition::{
	releases::{Config as ResolverConfig, HttpFeed, VersionResolver, releases_url},
	version::AppVersion,
};
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::{
	io::stdout,
	thread::sleep,
	time::Duration,
};
use tokio::runtime::Builder;
use tracing::{Level, info, warn};
use tracing_subscriber::{
	EnvFilter,
	fmt::{format::FmtSpan, layer, writer::MakeWriterExt},
	layer::SubscriberExt,
	registry,
	util::SubscriberInitExt,
};



//		Structs

//		Config																	
/// The main configuration options for the application.
#[derive(Deserialize, Serialize, SmartDefault)]
pub struct Config {
	//		Public properties													
	/// The owner of the GitHub repository that releases are published to.
	#[default = "PazerOP"]
	pub owner:         String,
	
	/// The name of the GitHub repository that releases are published to.
	#[default = "tf2_bot_detector"]
	pub repo:          String,
	
	/// The version of the running application.
	#[default(AppVersion::new(1, 2, 0).with_revision(500))]
	pub version:       AppVersion,
	
	/// How long each iteration of the interactive loop takes, in milliseconds.
	#[default = 16]
	pub tick_interval: u64,
}



//		Functions

//		main																	
fn main() {
	registry()
		.with(
			EnvFilter::new("info,ignition=debug")
		)
		.with(
			layer()
				.with_writer(stdout.with_max_level(Level::DEBUG))
				.with_span_events(FmtSpan::NONE)
				.with_target(false)
		)
		.init()
	;
	let config: Config = Figment::from(Serialized::defaults(Config::default()))
		.merge(Toml::file("check-updates.toml"))
		.merge(Env::raw())
		.extract()
		.expect("Error loading config")
	;
	//	The interactive loop runs on this thread, and network work on the runtime
	let runtime        = Builder::new_multi_thread().enable_all().build().expect("Error creating runtime");
	let mut resolver   = VersionResolver::new(
		ResolverConfig {
			version: config.version.clone(),
			feed:    releases_url(&config.owner, &config.repo).expect("Invalid repository"),
		},
		HttpFeed::new(),
		runtime.handle().clone(),
	);
	info!("Application started");
	info!("{}/{} v{}", config.owner, config.repo, config.version);
	let _started       = resolver.start();
	let mut ticks      = 0_u64;
	let resolution     = loop {
		if let Some(resolution) = resolver.poll() {
			break resolution;
		}
		ticks += 1;
		sleep(Duration::from_millis(config.tick_interval));
	};
	info!("Check completed after {ticks} ticks");
	if resolution.failed {
		warn!("Unable to check for new versions");
	}
	if let Some(ref stable) = resolution.stable {
		info!("New stable version available: {} at {}", stable.version, stable.url);
	}
	if let Some(ref preview) = resolution.preview {
		info!("New preview version available: {} at {}", preview.version, preview.url);
	}
	if !resolution.failed && !resolution.is_update_available() {
		info!("Already running the newest version");
	}
	info!("Application stopped");
}
