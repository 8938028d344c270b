//! ACIS module - Client implementation for the ACIS Trading REST API

pub mod auth;
pub mod client;
pub mod messages;
pub mod rest;

pub use client::{AcisClient, AcisClientBuilder};
