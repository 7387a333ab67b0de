pub mod app;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod copy;
pub mod error;
pub mod messages;
pub mod naming;
pub mod output;
pub mod schedule;
pub mod services;

pub use app::App;
pub use cancel::CancelSlot;
pub use config::Config;
pub use naming::{SplitAt, file_name};
