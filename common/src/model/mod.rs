//! Domain models shared across services

pub mod account;
