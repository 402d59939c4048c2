//! Folia - Swipe-page touch display firmware
//!
//! Firmware for the STM32F411 demo board: ST7789 TFT on SPI1, FT6336
//! capacitive touch panel on I2C1. A single cooperative task runs the
//! whole input pipeline once per 10 ms tick - there is no other work,
//! and the touch INT line is deliberately unused (pure polling).

#![no_std]
#![no_main]

mod screen;

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals::I2C1;
use embassy_stm32::spi::{self, Spi};
use embassy_stm32::time::Hertz;
use embassy_time::{Delay, Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use folia_core::touch::{GestureEvent, GestureRecognizer, TouchFilter};
use folia_core::ui::{self, PageController};
use folia_core::{SCREEN_HEIGHT, SCREEN_WIDTH};
use folia_drivers::display::St7789;
use folia_drivers::touch::ft6336::{self, Ft6336};

use crate::screen::Screen;

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<I2C1>;
});

/// Main loop period: one full pipeline pass per tick
const POLL_INTERVAL_MS: u64 = 10;

/// Delay between settle-animation frames
const SLIDE_FRAME_MS: u64 = 8;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Folia firmware starting...");

    let p = embassy_stm32::init(Default::default());
    let mut delay = Delay;

    // Panel: SPI1 (PA5 SCK / PA7 MOSI), CS PA4, DC PB1, RST PB0,
    // backlight PB10
    let mut spi_config = spi::Config::default();
    spi_config.frequency = Hertz(24_000_000);
    let panel_spi = Spi::new_blocking_txonly(p.SPI1, p.PA5, p.PA7, spi_config);

    let dc = Output::new(p.PB1, Level::Low, Speed::VeryHigh);
    let cs = Output::new(p.PA4, Level::High, Speed::VeryHigh);
    let mut lcd_rst = Output::new(p.PB0, Level::High, Speed::Low);
    let mut backlight = Output::new(p.PB10, Level::Low, Speed::Low);

    let mut panel = St7789::new(panel_spi, dc, cs);
    match panel.init(&mut lcd_rst, &mut delay) {
        Ok(()) => info!("Panel initialized"),
        Err(e) => error!("Panel init failed: {:?}", e),
    }
    backlight.set_high();

    // Touch: FT6336 on I2C1 (PB6 SCL / PB7 SDA), RST PB2
    let mut tp_rst = Output::new(p.PB2, Level::High, Speed::Low);
    if ft6336::reset(&mut tp_rst, &mut delay).is_err() {
        warn!("Touch reset line failed");
    }

    let mut i2c_config = i2c::Config::default();
    i2c_config.timeout = Duration::from_millis(100);
    let i2c = I2c::new(
        p.I2C1, p.PB6, p.PB7, Irqs, p.DMA1_CH6, p.DMA1_CH5, i2c_config,
    );

    let mut touch = Ft6336::new(i2c);
    match touch.chip_id().await {
        Ok(id) => info!("Touch controller up, chip id {=u8:x}", id),
        Err(e) => warn!("Touch controller not responding: {:?}", e),
    }

    let mut screen = Screen::new(panel);
    let mut filter = TouchFilter::new(SCREEN_WIDTH, SCREEN_HEIGHT);
    let mut gestures = GestureRecognizer::new();
    let mut pages = PageController::new();

    if let Err(e) = ui::show_page(&mut screen, pages.current_page()) {
        error!("Initial page draw failed: {:?}", e);
    }
    info!("Entering input loop");

    loop {
        // A failed bus read is indistinguishable from "no finger" for
        // the pipeline; it costs one debounce slot at worst
        let sample = match touch.read_touch().await {
            Ok((count, data)) => filter.update(count, &data),
            Err(e) => {
                warn!("Touch read failed: {:?}", e);
                filter.update(0, &[0; 6])
            }
        };

        let event = gestures.poll(sample);

        match event {
            Some(GestureEvent::Down { x, y }) => {
                debug!("DOWN at ({}, {})", x, y);
                pages.begin_drag(x, y);
            }
            Some(GestureEvent::Move { dx, dy, .. }) => {
                trace!("MOVE delta ({}, {})", dx, dy);
            }
            _ => {}
        }

        // Follow the finger every tick, not only on MOVE events
        if gestures.is_pressed() && pages.is_dragging() {
            let pos = gestures.position();
            if let Some(offset) = pages.drag_to(pos.x, pos.y) {
                if let Err(e) = ui::draw_slide(&mut screen, pages.current_page(), offset) {
                    error!("Slide draw failed: {:?}", e);
                }
            }
        }

        if let Some(GestureEvent::Up { x, y }) = event {
            debug!("UP at ({}, {})", x, y);
            let verdict = pages.end_drag();

            // Blocking settle animation: every frame plays out before
            // the next touch sample is taken
            while let Some(offset) = pages.step_toward(verdict.target) {
                if let Err(e) = ui::draw_slide(&mut screen, pages.current_page(), offset) {
                    error!("Slide draw failed: {:?}", e);
                }
                Timer::after_millis(SLIDE_FRAME_MS).await;
            }

            if verdict.commits(pages.current_page()) {
                info!("Page switched");
            }
            pages.settle(verdict);
            if let Err(e) = ui::show_page(&mut screen, pages.current_page()) {
                error!("Page draw failed: {:?}", e);
            }
        }

        // Fixed inter-iteration delay rather than a catch-up ticker, so
        // a settle animation is not followed by a burst of stale polls
        Timer::after_millis(POLL_INTERVAL_MS).await;
    }
}
