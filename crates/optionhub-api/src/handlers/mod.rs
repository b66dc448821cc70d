//! HTTP handlers for optionhub-api.

pub mod attributes;
pub mod health;
pub mod option_requests;
pub mod vocabulary;
