//! Configuration entry module
//!
//! This module defines the resolved configuration record, its typed value
//! views and the request/filter types used to look entries up.

pub mod models;
pub mod request;

pub use models::*;
pub use request::*;
