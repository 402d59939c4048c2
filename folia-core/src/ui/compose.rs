//! Slide composition
//!
//! Drawing both pages at offset-dependent centers is what produces the
//! sliding illusion: the current page tracks the finger and the neighbor
//! being revealed rides one screen width beside it.

use crate::traits::PageCanvas;
use crate::ui::pages::Page;
use crate::SCREEN_WIDTH;

const W: i16 = SCREEN_WIDTH as i16;

/// Draw the current page shifted by `offset_x` with its neighbor beside
/// it. First's neighbor sits one screen to the right, Second's one screen
/// to the left, so the page the finger reveals is always adjacent.
pub fn draw_slide<C: PageCanvas>(
    canvas: &mut C,
    page: Page,
    offset_x: i16,
) -> Result<(), C::Error> {
    let offset = offset_x.clamp(-W, W);
    canvas.clear()?;

    let center = W / 2 + offset;
    match page {
        Page::First => {
            draw_if_visible(canvas, Page::First, center)?;
            draw_if_visible(canvas, Page::Second, center + W)?;
        }
        Page::Second => {
            draw_if_visible(canvas, Page::First, center - W)?;
            draw_if_visible(canvas, Page::Second, center)?;
        }
    }
    Ok(())
}

/// Static redraw of a single page at rest
pub fn show_page<C: PageCanvas>(canvas: &mut C, page: Page) -> Result<(), C::Error> {
    canvas.clear()?;
    canvas.draw_page(page, W / 2)
}

/// Skip a page whose center is far enough out that nothing lands on the
/// panel
fn draw_if_visible<C: PageCanvas>(
    canvas: &mut C,
    page: Page,
    center_x: i16,
) -> Result<(), C::Error> {
    if center_x < -W || center_x > 2 * W {
        return Ok(());
    }
    canvas.draw_page(page, center_x)
}
