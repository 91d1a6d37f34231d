//! Iamus Console: admin console for an Iamus metaverse directory server.
//!
//! The library holds the REST client, the per-operator session, the console
//! operations and the view builders. The binary wires them to a web console
//! and a command line.

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod ops;
pub mod server;
pub mod session;
pub mod view;
