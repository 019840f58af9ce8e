//! Reading configuration objects from text, streams and files.

mod builder;
mod file;

pub use builder::ConfigReader;
