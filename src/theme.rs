use ratatui::style::Color;

// Centralized overview colors.

pub const RING_RGB: (u8, u8, u8) = (255, 165, 0);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Border color of the focused window while the focus ring is visible.
pub fn focus_ring() -> Color {
    rgb_to_color(RING_RGB)
}

// Window frames
pub fn frame_border() -> Color {
    Color::DarkGray
}
pub fn frame_title() -> Color {
    Color::Gray
}
pub fn frame_title_focused() -> Color {
    Color::White
}

pub fn backdrop_bg() -> Color {
    Color::Black
}
pub fn placeholder_fg() -> Color {
    Color::DarkGray
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_stands_out_from_plain_frames() {
        assert_eq!(focus_ring(), Color::Rgb(255, 165, 0));
        assert_ne!(focus_ring(), frame_border());
    }
}
