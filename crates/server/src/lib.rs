//! Zenith server library.
//!
//! Session identity, profile lookup and first-login provisioning of the
//! default Zenith workspace. The `zenith-server` binary and the `zenith` CLI
//! are thin shells over these modules.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
