//! Real-time clock drivers

pub mod ds1302;

pub use ds1302::{DataPin, DateTime, Ds1302};
