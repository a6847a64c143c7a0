//! OS hooks the overlay needs while it is click-through: with hit-testing
//! off the window gets no pointer or keyboard events, so they are polled.

use glam::Vec2;

#[cfg(windows)]
pub mod win32;

/// Whether the pointer and ESC can be polled globally. Without that, the
/// overlay has to keep hit-testing on or the slime could never be grabbed.
pub fn supports_click_through() -> bool {
    cfg!(windows)
}

/// Pointer position in screen pixels, regardless of which window is under it.
pub fn global_cursor() -> Option<Vec2> {
    #[cfg(windows)]
    {
        win32::cursor_pos()
    }
    #[cfg(not(windows))]
    {
        None
    }
}

pub fn escape_pressed() -> bool {
    #[cfg(windows)]
    {
        win32::is_escape_pressed()
    }
    #[cfg(not(windows))]
    {
        false
    }
}
