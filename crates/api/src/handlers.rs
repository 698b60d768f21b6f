pub mod availability;
pub mod profile;
pub mod services;
