//! Law-firm case management backend.
//!
//! A REST service over an embedded database: clients, cases and hearing
//! sessions, calendar scheduling, invoicing and payments, tasks, document
//! metadata, notification records, reports, and stubbed assistant endpoints.

pub mod config;
pub mod db;
pub mod error;
pub mod firm;
pub mod web;
