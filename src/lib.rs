// Library surface for the binary and for headless/integration tests.
// Everything that touches a real terminal stays in main.rs.
pub mod app;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod generator;
pub mod logging;
pub mod monitor;
pub mod notification;
pub mod presenter;
pub mod runtime;
pub mod sample;
pub mod session;
pub mod ui;
pub mod util;
pub mod worker;

pub use error::{BreathError, Result};
