//! Typed client for the todo gateway's browser-facing surface.

pub mod client;

pub use client::{Credentials, GatewayClient, NewTodo, NewUser, Reply};
