//! Gesture state machine
//!
//! Converts the filtered press/no-press signal into discrete DOWN/MOVE/UP
//! events. Release is debounced over consecutive missed polls so a single
//! dropped read does not end the session; DOWN fires immediately, since a
//! false positive there is rare and costs nothing. MOVE measures against
//! the last *reported* position, so sub-threshold jitter accumulates
//! toward the next reportable move instead of being discarded poll by
//! poll.

use super::Point;

/// Manhattan distance from the last reported position before MOVE fires
pub const MOVE_THRESHOLD_PX: u16 = 3;

/// Consecutive missed polls before a release is trusted.
/// At a 10 ms poll period, 2 misses = 20 ms.
pub const RELEASE_CONFIRM: u8 = 2;

/// A discrete touch event. At most one is produced per poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureEvent {
    /// Finger landed
    Down { x: u16, y: u16 },
    /// Finger moved at least [`MOVE_THRESHOLD_PX`] since the last report;
    /// `dx`/`dy` are relative to the previously reported position
    Move { x: u16, y: u16, dx: i16, dy: i16 },
    /// Finger lifted; coordinates are the last valid sample
    Up { x: u16, y: u16 },
}

/// Press/no-press edge detector with release debounce.
///
/// One instance lives for the whole firmware run; state is reset
/// field-by-field on transitions, never re-created.
#[derive(Debug, Clone)]
pub struct GestureRecognizer {
    /// Whether the current poll saw a valid touch
    pressed: bool,
    /// Whether the machine is inside an active DOWN..UP session
    was_pressed: bool,
    /// Consecutive missed polls while active
    release_count: u8,
    /// DOWN coordinate of the current session
    start_x: u16,
    start_y: u16,
    /// Most recent valid coordinate
    last_x: u16,
    last_y: u16,
    /// Last position reported via DOWN or MOVE
    move_ref_x: u16,
    move_ref_y: u16,
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureRecognizer {
    pub const fn new() -> Self {
        Self {
            pressed: false,
            was_pressed: false,
            release_count: 0,
            start_x: 0,
            start_y: 0,
            last_x: 0,
            last_y: 0,
            move_ref_x: 0,
            move_ref_y: 0,
        }
    }

    /// Run one poll of the state machine. Call exactly once per tick.
    pub fn poll(&mut self, sample: Option<Point>) -> Option<GestureEvent> {
        match sample {
            Some(p) => {
                self.pressed = true;
                self.release_count = 0;
                self.last_x = p.x;
                self.last_y = p.y;

                if !self.was_pressed {
                    // Idle -> active: report DOWN right away
                    self.was_pressed = true;
                    self.start_x = p.x;
                    self.start_y = p.y;
                    self.move_ref_x = p.x;
                    self.move_ref_y = p.y;
                    return Some(GestureEvent::Down { x: p.x, y: p.y });
                }

                let reference = Point::new(self.move_ref_x, self.move_ref_y);
                if p.manhattan(&reference) >= MOVE_THRESHOLD_PX {
                    let dx = p.x as i16 - self.move_ref_x as i16;
                    let dy = p.y as i16 - self.move_ref_y as i16;
                    self.move_ref_x = p.x;
                    self.move_ref_y = p.y;
                    return Some(GestureEvent::Move { x: p.x, y: p.y, dx, dy });
                }

                // Below threshold: the session is alive, nothing to report
                None
            }
            None => {
                self.pressed = false;

                if !self.was_pressed {
                    self.release_count = 0;
                    return None;
                }

                // Possibly a real release, possibly one dropped read
                self.release_count += 1;
                if self.release_count < RELEASE_CONFIRM {
                    return None;
                }

                self.was_pressed = false;
                self.release_count = 0;
                Some(GestureEvent::Up {
                    x: self.last_x,
                    y: self.last_y,
                })
            }
        }
    }

    /// Whether the current poll saw a valid touch
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Most recent valid coordinate
    pub fn position(&self) -> Point {
        Point::new(self.last_x, self.last_y)
    }

    /// DOWN coordinate of the current session
    pub fn start(&self) -> Point {
        Point::new(self.start_x, self.start_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(x: u16, y: u16) -> Option<Point> {
        Some(Point::new(x, y))
    }

    #[test]
    fn test_down_on_first_contact() {
        let mut gestures = GestureRecognizer::new();
        assert_eq!(
            gestures.poll(at(100, 150)),
            Some(GestureEvent::Down { x: 100, y: 150 })
        );
        assert!(gestures.is_pressed());
        assert_eq!(gestures.start(), Point::new(100, 150));
    }

    #[test]
    fn test_holding_still_emits_nothing() {
        let mut gestures = GestureRecognizer::new();
        gestures.poll(at(100, 150));
        for _ in 0..50 {
            assert_eq!(gestures.poll(at(100, 150)), None);
        }
    }

    #[test]
    fn test_jitter_accumulates_toward_move() {
        let mut gestures = GestureRecognizer::new();
        gestures.poll(at(100, 100));

        // 1 px, then 2 px from the reference: below threshold, dropped
        assert_eq!(gestures.poll(at(101, 100)), None);
        assert_eq!(gestures.poll(at(102, 100)), None);

        // 3 px from the reference: the accumulated drift is reported
        assert_eq!(
            gestures.poll(at(103, 100)),
            Some(GestureEvent::Move {
                x: 103,
                y: 100,
                dx: 3,
                dy: 0
            })
        );

        // The reference advanced to the reported point
        assert_eq!(gestures.poll(at(104, 100)), None);
    }

    #[test]
    fn test_move_delta_is_against_reported_position() {
        let mut gestures = GestureRecognizer::new();
        gestures.poll(at(100, 100));
        gestures.poll(at(110, 100));
        assert_eq!(
            gestures.poll(at(95, 102)),
            Some(GestureEvent::Move {
                x: 95,
                y: 102,
                dx: -15,
                dy: 2
            })
        );
    }

    #[test]
    fn test_single_dropout_does_not_end_session() {
        let mut gestures = GestureRecognizer::new();
        gestures.poll(at(100, 100));

        assert_eq!(gestures.poll(None), None);

        // Touch back: no UP happened, and no duplicate DOWN either
        assert_eq!(gestures.poll(at(100, 100)), None);
        assert!(gestures.is_pressed());
    }

    #[test]
    fn test_up_after_confirmed_release() {
        let mut gestures = GestureRecognizer::new();
        gestures.poll(at(100, 100));
        gestures.poll(at(120, 100));

        assert_eq!(gestures.poll(None), None);
        assert_eq!(
            gestures.poll(None),
            Some(GestureEvent::Up { x: 120, y: 100 })
        );

        // Exactly one UP; further empty polls stay quiet
        assert_eq!(gestures.poll(None), None);
        assert_eq!(gestures.poll(None), None);
    }

    #[test]
    fn test_up_uses_last_valid_coordinate() {
        let mut gestures = GestureRecognizer::new();
        gestures.poll(at(100, 100));

        // Sub-threshold drift still counts as the last valid position
        gestures.poll(at(101, 100));

        gestures.poll(None);
        assert_eq!(
            gestures.poll(None),
            Some(GestureEvent::Up { x: 101, y: 100 })
        );
    }

    #[test]
    fn test_dropout_counter_resets_on_contact() {
        let mut gestures = GestureRecognizer::new();
        gestures.poll(at(100, 100));

        // Alternating dropouts never accumulate to a release
        for _ in 0..10 {
            assert_eq!(gestures.poll(None), None);
            assert_eq!(gestures.poll(at(100, 100)), None);
        }
    }

    #[test]
    fn test_new_session_after_up() {
        let mut gestures = GestureRecognizer::new();
        gestures.poll(at(100, 100));
        gestures.poll(None);
        gestures.poll(None);

        assert_eq!(
            gestures.poll(at(50, 60)),
            Some(GestureEvent::Down { x: 50, y: 60 })
        );
        assert_eq!(gestures.start(), Point::new(50, 60));
    }

    proptest! {
        /// Whatever the sample stream, the event stream is well-formed:
        /// DOWN only from idle, MOVE/UP only inside a DOWN..UP span.
        #[test]
        fn event_stream_is_well_formed(
            samples in proptest::collection::vec(
                proptest::option::of((0u16..240, 0u16..320)),
                0..300,
            )
        ) {
            let mut gestures = GestureRecognizer::new();
            let mut active = false;

            for s in samples {
                match gestures.poll(s.map(|(x, y)| Point::new(x, y))) {
                    Some(GestureEvent::Down { .. }) => {
                        prop_assert!(!active);
                        active = true;
                    }
                    Some(GestureEvent::Move { .. }) => prop_assert!(active),
                    Some(GestureEvent::Up { .. }) => {
                        prop_assert!(active);
                        active = false;
                    }
                    None => {}
                }
            }
        }
    }
}
