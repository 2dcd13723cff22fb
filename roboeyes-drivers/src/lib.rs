//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined in
//! roboeyes-core:
//!
//! - SSD1306 / SH1106 monochrome OLED panels over async I2C

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
