pub mod config_cmd;
#[cfg(feature = "sqlite")]
pub mod history;
pub mod onboard;
pub mod run;
pub mod status;
