#![doc = include_str!("../README.md")]

pub mod agent;
pub mod auth;
pub mod chat;
pub mod error;
pub mod tools;

pub use error::AgentError;
