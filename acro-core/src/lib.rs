// lib.rs
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod macros;

pub mod config;
pub mod entry_gate;
pub mod error;
pub mod interfaces;
pub mod params;
pub mod state_machine;
pub mod types;

pub use config::*;
pub use entry_gate::check_entry;
pub use error::*;
pub use interfaces::*;
pub use params::{ManeuverParameters, derive};
pub use state_machine::*;
pub use types::*;
