//! SQLite storage for captured leads.
//!
//! This module provides database initialization, pragma configuration and
//! schema migrations.

pub mod migrations;

pub use migrations::init_db;
