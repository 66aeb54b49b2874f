//! trackle - A project/timesheet tracking API with runtime-definable typed attributes
//!
//! The core is a generic Entity-Attribute-Value (EAV) subsystem: administrators
//! define custom attributes (text, number, date, select) at runtime and attach
//! validated values of those attributes to projects without schema changes.

pub mod catalog;
pub mod cli;
pub mod filter;
pub mod http_server;
pub mod observability;
pub mod projects;
pub mod seed;
pub mod store;
pub mod sync;
pub mod validation;
