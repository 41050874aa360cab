//! `visvas-admin`: command-line client for the Visvas admin backend.
//!
//! Drives the same API client and controllers as the web dashboard, with
//! `reqwest` as the transport and a JSON file as the session storage.

pub mod cli;
pub mod commands;
pub mod storage;
pub mod transport;
