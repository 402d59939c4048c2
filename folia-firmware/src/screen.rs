//! Page content rendering
//!
//! Implements the core's `PageCanvas` over the ST7789 driver. The two
//! pages carry the demo board's content: a red triangle on the first
//! page, a blue one on the second, each drawn relative to the requested
//! center so the content slides with the finger.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use folia_core::traits::PageCanvas;
use folia_core::ui::Page;
use folia_drivers::display::st7789::{color, DisplayError, St7789};

pub struct Screen<SPI, DC, CS> {
    panel: St7789<SPI, DC, CS>,
}

impl<SPI, DC, CS> Screen<SPI, DC, CS> {
    pub fn new(panel: St7789<SPI, DC, CS>) -> Self {
        Self { panel }
    }
}

impl<SPI, DC, CS, PinE> PageCanvas for Screen<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin<Error = PinE>,
    CS: OutputPin<Error = PinE>,
{
    type Error = DisplayError<SPI::Error, PinE>;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.panel.fill_screen(color::BLACK)
    }

    fn draw_page(&mut self, page: Page, center_x: i16) -> Result<(), Self::Error> {
        match page {
            Page::First => self.panel.draw_triangle(
                center_x - 100,
                30,
                center_x - 40,
                30,
                center_x - 70,
                90,
                color::RED,
            ),
            Page::Second => self.panel.draw_triangle(
                center_x + 40,
                200,
                center_x + 100,
                200,
                center_x + 70,
                260,
                color::BLUE,
            ),
        }
    }
}
