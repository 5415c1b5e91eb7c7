pub mod label;
pub mod script;
