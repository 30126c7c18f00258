#[macro_use]
extern crate rust_i18n;

pub mod components;
pub mod config;
pub mod digest;
pub mod error;
pub mod runner;
pub mod startup;

// Report labels, Vietnamese unless configured otherwise
i18n!("locales", fallback = "vi");
