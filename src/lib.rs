#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
#[cfg(test)]
#[macro_use]
extern crate assert_float_eq;

pub mod config;
pub mod import_data;
pub mod interpolate;
pub mod logs;
pub mod playback;
pub mod segment;
pub mod track;
pub mod track_icon;
pub mod track_store;
pub mod utils;
