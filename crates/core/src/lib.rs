#![forbid(unsafe_code)]

pub mod audio;
pub mod concepts;
pub mod error;
pub mod model;
pub mod pronunciation;

pub use error::DecodeError;
