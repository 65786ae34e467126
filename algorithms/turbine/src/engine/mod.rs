//! Execution Engine
//!
//! Backend dispatch and lane-parallel keystream application.

pub mod dispatcher;
pub mod parallel;

pub use dispatcher::get_active_backend_name;
