//! Rendering trait between the page UI and the panel

use crate::ui::pages::Page;

/// Surface the UI draws pages onto.
///
/// Implemented by the firmware over the panel driver; the core stays
/// hardware-free and the slide composition testable with a recording
/// fake.
pub trait PageCanvas {
    type Error;

    /// Fill the screen with the background color
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Paint one page's content horizontally centered at `center_x`.
    ///
    /// Centers may fall partly off the panel while a slide is in flight;
    /// implementations clip rather than reject.
    fn draw_page(&mut self, page: Page, center_x: i16) -> Result<(), Self::Error>;
}
