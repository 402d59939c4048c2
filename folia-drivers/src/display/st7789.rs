//! ST7789 TFT panel driver
//!
//! 240x320 RGB565 panel over blocking SPI with DC (data/command) and CS
//! lines. Covers the minimal init sequence, MADCTL rotation, and the
//! drawing primitives the page renderer uses. Coordinates are signed and
//! clipped to the panel, since page content slides partly off-screen
//! during a swipe.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Native panel resolution
pub const PANEL_WIDTH: u16 = 240;
pub const PANEL_HEIGHT: u16 = 320;

/// RGB565 colors used by the UI
pub mod color {
    pub const BLACK: u16 = 0x0000;
    pub const WHITE: u16 = 0xFFFF;
    pub const RED: u16 = 0xF800;
    pub const GREEN: u16 = 0x07E0;
    pub const BLUE: u16 = 0x001F;
    pub const YELLOW: u16 = 0xFFE0;
}

/// Command subset the driver issues
#[allow(dead_code)]
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// MADCTL bits
mod madctl {
    pub const MY: u8 = 0x80;
    pub const MX: u8 = 0x40;
    pub const MV: u8 = 0x20;
}

/// Errors from panel transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<Bus, Pin> {
    /// SPI transfer failed
    Bus(Bus),
    /// DC or CS line failed
    Pin(Pin),
}

/// ST7789 over a blocking SPI bus
pub struct St7789<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
    /// Logical dimensions under the current rotation
    width: u16,
    height: u16,
}

impl<SPI, DC, CS, PinE> St7789<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin<Error = PinE>,
    CS: OutputPin<Error = PinE>,
{
    pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
        Self {
            spi,
            dc,
            cs,
            width: PANEL_WIDTH,
            height: PANEL_HEIGHT,
        }
    }

    /// Logical width under the current rotation
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Logical height under the current rotation
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Hardware reset followed by the minimal init sequence
    pub fn init<RST, D>(
        &mut self,
        rst: &mut RST,
        delay: &mut D,
    ) -> Result<(), DisplayError<SPI::Error, PinE>>
    where
        RST: OutputPin<Error = PinE>,
        D: DelayNs,
    {
        // Reset pulse: settle high, 20 ms low, then 120 ms of boot time
        rst.set_high().map_err(DisplayError::Pin)?;
        delay.delay_ms(1);
        rst.set_low().map_err(DisplayError::Pin)?;
        delay.delay_ms(20);
        rst.set_high().map_err(DisplayError::Pin)?;
        delay.delay_ms(120);

        self.command(cmd::SWRESET)?;
        delay.delay_ms(150);
        self.command(cmd::SLPOUT)?;
        delay.delay_ms(10);

        // 16 bpp RGB565
        self.command_with_data(cmd::COLMOD, &[0x55])?;
        self.set_rotation(0)?;

        // The usual ST7789 modules ship with inversion expected on
        self.command(cmd::INVON)?;
        self.command(cmd::NORON)?;
        self.command(cmd::DISPON)?;
        delay.delay_ms(10);
        Ok(())
    }

    /// Set the rotation in quarter turns (0..=3); odd rotations swap the
    /// logical width and height
    pub fn set_rotation(&mut self, rotation: u8) -> Result<(), DisplayError<SPI::Error, PinE>> {
        let value = match rotation & 0x03 {
            0 => 0,
            1 => madctl::MX | madctl::MV,
            2 => madctl::MX | madctl::MY,
            _ => madctl::MY | madctl::MV,
        };
        if rotation & 0x01 == 0 {
            self.width = PANEL_WIDTH;
            self.height = PANEL_HEIGHT;
        } else {
            self.width = PANEL_HEIGHT;
            self.height = PANEL_WIDTH;
        }
        self.command_with_data(cmd::MADCTL, &[value])
    }

    fn command(&mut self, command: u8) -> Result<(), DisplayError<SPI::Error, PinE>> {
        self.cs.set_low().map_err(DisplayError::Pin)?;
        self.dc.set_low().map_err(DisplayError::Pin)?;
        let result = self.spi.write(&[command]).map_err(DisplayError::Bus);
        self.cs.set_high().map_err(DisplayError::Pin)?;
        result
    }

    fn data(&mut self, data: &[u8]) -> Result<(), DisplayError<SPI::Error, PinE>> {
        self.cs.set_low().map_err(DisplayError::Pin)?;
        self.dc.set_high().map_err(DisplayError::Pin)?;
        let result = self.spi.write(data).map_err(DisplayError::Bus);
        self.cs.set_high().map_err(DisplayError::Pin)?;
        result
    }

    fn command_with_data(
        &mut self,
        command: u8,
        data: &[u8],
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        self.command(command)?;
        self.data(data)
    }

    /// Address a window and leave the controller expecting pixel data
    fn set_window(
        &mut self,
        x0: u16,
        y0: u16,
        x1: u16,
        y1: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        self.command_with_data(
            cmd::CASET,
            &[(x0 >> 8) as u8, x0 as u8, (x1 >> 8) as u8, x1 as u8],
        )?;
        self.command_with_data(
            cmd::RASET,
            &[(y0 >> 8) as u8, y0 as u8, (y1 >> 8) as u8, y1 as u8],
        )?;
        self.command(cmd::RAMWR)
    }

    /// Stream `count` copies of one RGB565 value into the current window
    fn flood(&mut self, color: u16, count: u32) -> Result<(), DisplayError<SPI::Error, PinE>> {
        let [hi, lo] = color.to_be_bytes();
        let mut chunk = [0u8; 128];
        for pair in chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }

        self.cs.set_low().map_err(DisplayError::Pin)?;
        self.dc.set_high().map_err(DisplayError::Pin)?;

        let mut remaining = count as usize * 2;
        while remaining > 0 {
            let n = remaining.min(chunk.len());
            if let Err(e) = self.spi.write(&chunk[..n]) {
                // Deselect before reporting so the bus is not left held
                self.cs.set_high().map_err(DisplayError::Pin)?;
                return Err(DisplayError::Bus(e));
            }
            remaining -= n;
        }
        self.cs.set_high().map_err(DisplayError::Pin)
    }

    /// Fill the whole screen with one color
    pub fn fill_screen(&mut self, color: u16) -> Result<(), DisplayError<SPI::Error, PinE>> {
        let (w, h) = (self.width, self.height);
        self.set_window(0, 0, w - 1, h - 1)?;
        self.flood(color, u32::from(w) * u32::from(h))
    }

    /// Filled rectangle, clipped to the panel
    pub fn fill_rect(
        &mut self,
        x: i16,
        y: i16,
        w: u16,
        h: u16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        let x0 = i32::from(x).max(0);
        let y0 = i32::from(y).max(0);
        let x1 = (i32::from(x) + i32::from(w) - 1).min(i32::from(self.width) - 1);
        let y1 = (i32::from(y) + i32::from(h) - 1).min(i32::from(self.height) - 1);
        if x1 < x0 || y1 < y0 {
            return Ok(());
        }

        self.set_window(x0 as u16, y0 as u16, x1 as u16, y1 as u16)?;
        self.flood(color, ((x1 - x0 + 1) * (y1 - y0 + 1)) as u32)
    }

    /// Single pixel; silently off-panel coordinates are dropped
    pub fn draw_pixel(
        &mut self,
        x: i16,
        y: i16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        if x < 0 || y < 0 || x >= self.width as i16 || y >= self.height as i16 {
            return Ok(());
        }
        self.set_window(x as u16, y as u16, x as u16, y as u16)?;
        self.data(&color.to_be_bytes())
    }

    /// Horizontal line of `len` pixels starting at (x, y)
    pub fn draw_hline(
        &mut self,
        x: i16,
        y: i16,
        len: u16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        self.fill_rect(x, y, len, 1, color)
    }

    /// Vertical line of `len` pixels starting at (x, y)
    pub fn draw_vline(
        &mut self,
        x: i16,
        y: i16,
        len: u16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        self.fill_rect(x, y, 1, len, color)
    }

    /// Rectangle outline
    pub fn draw_rect(
        &mut self,
        x: i16,
        y: i16,
        w: u16,
        h: u16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        if w == 0 || h == 0 {
            return Ok(());
        }
        self.draw_hline(x, y, w, color)?;
        self.draw_hline(x, y + h as i16 - 1, w, color)?;
        self.draw_vline(x, y, h, color)?;
        self.draw_vline(x + w as i16 - 1, y, h, color)
    }

    /// Arbitrary line, Bresenham
    pub fn draw_line(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        let (mut x, mut y) = (i32::from(x0), i32::from(y0));
        let (x1, y1) = (i32::from(x1), i32::from(y1));

        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.draw_pixel(x as i16, y as i16, color)?;
            if x == x1 && y == y1 {
                return Ok(());
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Triangle outline through three vertices
    pub fn draw_triangle(
        &mut self,
        x0: i16,
        y0: i16,
        x1: i16,
        y1: i16,
        x2: i16,
        y2: i16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        self.draw_line(x0, y0, x1, y1, color)?;
        self.draw_line(x1, y1, x2, y2, color)?;
        self.draw_line(x2, y2, x0, y0, color)
    }

    /// Circle outline, midpoint algorithm
    pub fn draw_circle(
        &mut self,
        cx: i16,
        cy: i16,
        radius: u16,
        color: u16,
    ) -> Result<(), DisplayError<SPI::Error, PinE>> {
        let r = radius as i16;
        let mut x = 0i16;
        let mut y = r;
        let mut d = 3 - 2 * i32::from(r);

        while x <= y {
            for &(px, py) in &[
                (cx + x, cy + y),
                (cx - x, cy + y),
                (cx + x, cy - y),
                (cx - x, cy - y),
                (cx + y, cy + x),
                (cx - y, cy + x),
                (cx + y, cy - x),
                (cx - y, cy - x),
            ] {
                self.draw_pixel(px, py, color)?;
            }
            if d < 0 {
                d += 4 * i32::from(x) + 6;
            } else {
                d += 4 * (i32::from(x) - i32::from(y)) + 10;
                y -= 1;
            }
            x += 1;
        }
        Ok(())
    }
}
