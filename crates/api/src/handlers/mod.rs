//! Request handlers, one module per resource.

pub mod auth;
pub mod character;
pub mod generation;
pub mod scene;
pub mod storage;
