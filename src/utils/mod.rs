//! Utility functions and helpers.

pub mod http;
pub mod oauth;
pub mod url;

pub use self::url::{join_base, resolve};
