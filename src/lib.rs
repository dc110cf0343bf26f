//! Reads a StressMonitor peripheral over BLE and turns its four biometric
//! values into a stress score.

pub mod ble;
pub mod config;
pub mod dashboard;
pub mod monitor;
pub mod reader;
pub mod session;
pub mod signal;
pub mod stress;
pub mod value;
pub mod widget;

#[cfg(test)]
mod fake;
