//! Owner-scoped queries. Every function takes the caller's identity and adds
//! it to the `WHERE` clause itself.

pub mod availability;
pub mod profile;
pub mod service;
