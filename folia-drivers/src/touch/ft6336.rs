//! FT6336 capacitive touch controller
//!
//! Polled driver over async I2C. One burst read returns the touch-count
//! register together with the first point's coordinate block;
//! interpreting the block (bounds, jump rejection, smoothing) happens in
//! `folia_core::touch::filter`. The chip's INT line is not used.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

/// 7-bit I2C address
pub const FT6336_ADDR: u8 = 0x38;

/// Chip vendor id reported by genuine parts
pub const VENDOR_ID: u8 = 0x64;

/// Register map (the slice this driver touches)
#[allow(dead_code)]
mod reg {
    /// Operating mode
    pub const DEV_MODE: u8 = 0x00;
    /// Gesture id (unused, the gesture engine is too coarse)
    pub const GEST_ID: u8 = 0x01;
    /// Touch point count in the low nibble
    pub const TD_STATUS: u8 = 0x02;
    /// First touch point coordinate block, 6 bytes
    pub const P1_XH: u8 = 0x03;
    /// Chip vendor id
    pub const CHIP_ID: u8 = 0xA3;
    /// Firmware version
    pub const FIRMID: u8 = 0xA6;
}

/// FT6336 over an async I2C bus
pub struct Ft6336<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Ft6336<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: FT6336_ADDR,
        }
    }

    /// Read a single register
    pub async fn read_register(&mut self, register: u8) -> Result<u8, I2C::Error> {
        let mut value = [0u8];
        self.i2c
            .write_read(self.address, &[register], &mut value)
            .await?;
        Ok(value[0])
    }

    /// Read the touch-count register and the first point's coordinate
    /// block in a single bus transaction
    pub async fn read_touch(&mut self) -> Result<(u8, [u8; 6]), I2C::Error> {
        let mut report = [0u8; 7];
        self.i2c
            .write_read(self.address, &[reg::TD_STATUS], &mut report)
            .await?;

        let count = report[0] & 0x0F;
        let mut data = [0u8; 6];
        data.copy_from_slice(&report[1..]);
        Ok((count, data))
    }

    /// Chip vendor id, for a bring-up sanity check against [`VENDOR_ID`]
    pub async fn chip_id(&mut self) -> Result<u8, I2C::Error> {
        self.read_register(reg::CHIP_ID).await
    }
}

/// Hardware reset: pulse RST low, then give the chip time to boot
pub fn reset<RST, D>(rst: &mut RST, delay: &mut D) -> Result<(), RST::Error>
where
    RST: OutputPin,
    D: DelayNs,
{
    rst.set_low()?;
    delay.delay_ms(10);
    rst.set_high()?;
    delay.delay_ms(100);
    Ok(())
}
