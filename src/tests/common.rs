//		Modules

#[path = "common/utils.rs"]
pub(crate) mod utils;
