//! Framework-agnostic planner and budget operations.
//!
//! Everything here takes the owner id explicitly and returns crate errors, so
//! the HTTP layer and the tests drive the same code paths.

pub mod account;
pub mod budget;
pub mod calendar;
pub mod category;
pub mod day;
pub mod planner;
pub mod tag;
pub mod task;
pub mod time;
pub mod transaction;
pub mod user;
