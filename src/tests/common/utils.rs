//		Packages

use crate::version::AppVersion;
use core::time::Duration;
use tokio::time::{sleep, timeout};



//		Functions

//		wait_for																
/// Waits until the condition holds, yielding to the runtime in between checks
/// so that background tasks can make progress.
///
/// Panics if the condition does not hold within five seconds.
///
pub(crate) async fn wait_for<F: Fn() -> bool>(condition: F) {
	timeout(Duration::from_secs(5), async {
		while !condition() {
			sleep(Duration::from_millis(1)).await;
		}
	}).await.expect("Timed out waiting for condition");
}

//		v																		
/// Parses a version, panicking if it is invalid.
pub(crate) fn v(tag: &str) -> AppVersion {
	tag.parse().expect("Invalid version")
}
