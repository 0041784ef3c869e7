//! kc-noshim: rebuild the macOS boot kernel collection without one kext.
//!
//! The library exposes each step so it can be driven with a fake
//! [`process::CommandRunner`] in tests.

pub mod collection;
pub mod config;
pub mod error;
pub mod installer;
pub mod kext_list;
pub mod logging;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod timing;
pub mod volume;

pub use config::KcConfig;
pub use error::{Error, Result};
