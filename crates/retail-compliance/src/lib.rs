//! Compliance obligation lifecycle tracking and site risk forecasting.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
