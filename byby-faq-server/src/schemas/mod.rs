//! JSON request / response types of the public API.

pub mod chat;
