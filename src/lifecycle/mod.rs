//! Lifecycle management.
//!
//! ```text
//! main.rs:   load config → init logging/metrics → bind → HttpServer::run
//! shutdown:  Ctrl-C → Shutdown::trigger → stop accepting → drain → exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
