//! Mapping from the model's 0-1000 grid to viewport pixels
//!
//! No clamping happens here. Out-of-range model output is passed through
//! and the browser decides what a click outside the viewport means.

/// Side of the normalized coordinate grid
pub const GRID_SIZE: f64 = 1000.0;

/// Default scroll distance in pixels when the model omits `magnitude`
pub const DEFAULT_SCROLL_MAGNITUDE: i64 = 800;

pub fn to_pixel_x(x: i64, viewport_width: u32) -> i64 {
    scale(x, viewport_width)
}

pub fn to_pixel_y(y: i64, viewport_height: u32) -> i64 {
    scale(y, viewport_height)
}

fn scale(value: i64, dimension: u32) -> i64 {
    (value as f64 / GRID_SIZE * f64::from(dimension)).round() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    /// Case-insensitive parse; `None` for anything outside the four directions
    pub fn parse(direction: &str) -> Option<Self> {
        match direction.trim().to_ascii_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Signed wheel delta `(dx, dy)`; `None` when the magnitude has no negation
    pub fn delta(self, magnitude: i64) -> Option<(i64, i64)> {
        match self {
            Self::Down => Some((0, magnitude)),
            Self::Up => magnitude.checked_neg().map(|dy| (0, dy)),
            Self::Right => Some((magnitude, 0)),
            Self::Left => magnitude.checked_neg().map(|dx| (dx, 0)),
        }
    }
}

/// Prefix `https://` unless the URL already names http or https
pub fn ensure_url_scheme(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
