pub use qblast_config::config::Config;

pub mod http;
pub mod util;
