//! Hardware driver implementations
//!
//! This crate provides the peripheral drivers the Folia firmware runs
//! on, written against the `embedded-hal` / `embedded-hal-async` traits:
//!
//! - FT6336 capacitive touch controller (polled, async I2C)
//! - ST7789 TFT panel (blocking SPI)

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod touch;
