//! # Quill Core
//!
//! The domain layer of the Quill post service.
//! This crate contains the post model, its validation rules, the ports that
//! infrastructure must implement, and the service that ties them together.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;
pub mod validation;

pub use error::DomainError;
pub use service::PostService;
