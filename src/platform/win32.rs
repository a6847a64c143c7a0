use glam::Vec2;
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::GetAsyncKeyState;
use windows::Win32::UI::WindowsAndMessaging::GetCursorPos;

/// VK_ESCAPE. High bit of `GetAsyncKeyState` = currently down.
const VK_ESCAPE: i32 = 0x1B;

pub fn cursor_pos() -> Option<Vec2> {
    let mut point = POINT::default();
    unsafe { GetCursorPos(&mut point) }.ok()?;
    Some(Vec2::new(point.x as f32, point.y as f32))
}

/// Works regardless of focus; the overlay never takes keyboard focus.
pub fn is_escape_pressed() -> bool {
    unsafe { GetAsyncKeyState(VK_ESCAPE) & (0x8000u16 as i16) != 0 }
}
