pub mod config;
pub mod coordinator;
pub mod domain;
pub mod errors;
pub mod input;
pub mod notify;
pub mod page;
pub mod protocol;
pub mod runtime;
pub mod site;
pub mod store;
pub mod tracker;
pub mod util;

pub use autolang_core::{LanguageLabel, classify};

#[cfg(test)]
mod tests;
