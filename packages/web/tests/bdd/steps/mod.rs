//! Step definitions for the web scenarios
//!
//! Given steps build the page in the in-memory browser, When steps act,
//! Then steps check the outcome and the collected soft assertions.

pub mod given;
pub mod then;
