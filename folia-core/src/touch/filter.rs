//! Touch sample filter
//!
//! The only place raw hardware noise is absorbed; everything downstream
//! assumes clean, monotonic-enough samples.

use super::Point;

/// Samples farther than this (Manhattan) from the last accepted sample
/// are implausible finger motion within one poll period and get dropped
pub const JUMP_REJECT_PX: u16 = 80;

/// Validates and smooths raw controller reports.
///
/// Holds the last accepted coordinate as both the jump-rejection baseline
/// and the smoothing history. The history is cleared whenever the panel
/// reports zero touches, so a new press starts unblended; rejected
/// samples leave it untouched.
#[derive(Debug, Clone)]
pub struct TouchFilter {
    width: u16,
    height: u16,
    last_x: u16,
    last_y: u16,
    has_history: bool,
}

impl TouchFilter {
    /// Create a filter for a panel of the given logical dimensions
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            last_x: 0,
            last_y: 0,
            has_history: false,
        }
    }

    /// Process one controller report.
    ///
    /// `count` is the touch-count register value, `data` the six
    /// coordinate bytes starting at the first touch point. Returns the
    /// accepted (smoothed) coordinate, or `None` when the panel is
    /// released or the sample is rejected.
    pub fn update(&mut self, count: u8, data: &[u8; 6]) -> Option<Point> {
        if count == 0 {
            // Released: drop the baseline so the next press starts fresh
            self.has_history = false;
            return None;
        }

        let raw = parse_point(data);

        // Transient garbage must not corrupt the baseline
        if raw.x >= self.width || raw.y >= self.height {
            return None;
        }

        if self.has_history {
            let last = Point::new(self.last_x, self.last_y);
            if raw.manhattan(&last) > JUMP_REJECT_PX {
                return None;
            }
        }

        let accepted = if self.has_history {
            // 3:1 blend toward the previous accepted sample
            Point::new(
                (3 * self.last_x + raw.x) / 4,
                (3 * self.last_y + raw.y) / 4,
            )
        } else {
            raw
        };

        self.last_x = accepted.x;
        self.last_y = accepted.y;
        self.has_history = true;
        Some(accepted)
    }
}

/// Extract the 12-bit X/Y pair from a coordinate register block.
///
/// The top nibble of bytes 0/2 carries the high 4 bits, bytes 1/3 the
/// low 8.
fn parse_point(data: &[u8; 6]) -> Point {
    let x = ((data[0] as u16 & 0xF0) << 4) | data[1] as u16;
    let y = ((data[2] as u16 & 0xF0) << 4) | data[3] as u16;
    Point::new(x, y)
}
