#![doc = include_str!("../README.md")]

pub mod checks;

pub use checks::validate_repo;
