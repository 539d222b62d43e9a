//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in gloam-core for the dimmer's peripherals:
//!
//! - PWM hobby-servo actuator
//! - GPIO indicator LED
//! - Debounced push button
//! - DS1302 real-time clock

#![no_std]
#![deny(unsafe_code)]

pub mod button;
pub mod indicator;
pub mod rtc;
pub mod servo;
