#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en-US");

pub mod component;
pub mod config;
pub mod error;
pub mod init;
pub mod signal;
pub mod tools;
