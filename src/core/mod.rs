//! Core infrastructure
//!
//! Cross-cutting pieces shared by the platform layer and the motor driver.

pub mod logging;
