// Tilt Timer - Screen Layouts
//
// Describes what the OLED should show and lays it out on any
// `embedded_graphics` draw target.  The firmware draws into the SSD1306
// frame buffer; tests draw into an in-memory canvas.

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyle, TextStyleBuilder};

use crate::config::*;

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

/// Screen orientation, clockwise quarter turns from the panel's native
/// landscape layout.  `Rotate90` and `Rotate270` are 64x128 portrait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Rotate0,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl Rotation {
    pub fn index(&self) -> u8 {
        match self {
            Self::Rotate0 => 0,
            Self::Rotate90 => 1,
            Self::Rotate180 => 2,
            Self::Rotate270 => 3,
        }
    }

    pub fn is_portrait(&self) -> bool {
        matches!(self, Self::Rotate90 | Self::Rotate270)
    }

    /// Size of the drawing area as seen by the layout code.
    pub fn logical_size(&self) -> Size {
        if self.is_portrait() {
            Size::new(SCREEN_HEIGHT, SCREEN_WIDTH)
        } else {
            Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
        }
    }

    /// Map a logical point to panel coordinates.  Points outside the
    /// logical area return `None`.
    pub fn to_physical(&self, point: Point) -> Option<(u32, u32)> {
        let size = self.logical_size();
        if point.x < 0 || point.y < 0 {
            return None;
        }
        let (x, y) = (point.x as u32, point.y as u32);
        if x >= size.width || y >= size.height {
            return None;
        }

        let (w, h) = (SCREEN_WIDTH, SCREEN_HEIGHT);
        Some(match self {
            Self::Rotate0 => (x, y),
            Self::Rotate90 => (w - 1 - y, x),
            Self::Rotate180 => (w - 1 - x, h - 1 - y),
            Self::Rotate270 => (y, h - 1 - x),
        })
    }
}

// ---------------------------------------------------------------------------
// Screen content
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Duration legend around a "Choose" prompt; always drawn upright.
    Menu,
    Countdown { remaining_seconds: u32 },
    TimesUp,
}

/// Lay out `screen` on `target`.  The caller clears and flushes.
pub fn draw<D>(target: &mut D, screen: &Screen) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    match screen {
        Screen::Menu => draw_menu(target),
        Screen::Countdown { remaining_seconds } => draw_countdown(target, *remaining_seconds),
        Screen::TimesUp => draw_times_up(target),
    }
}

fn draw_menu<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let small = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

    // (text, top-left) in landscape panel coordinates.
    let items: [(&str, Point); 9] = [
        ("Choose", Point::new(48, 28)),
        // Bottom: 5 s
        ("5s", Point::new(57, 54)),
        ("v", Point::new(60, 44)),
        // Right: 10 s
        ("10s", Point::new(104, 28)),
        (">", Point::new(96, 30)),
        // Top: 15 s
        ("15s", Point::new(54, 4)),
        ("^", Point::new(60, 14)),
        // Left: 30 s
        ("30s", Point::new(4, 28)),
        ("<", Point::new(24, 30)),
    ];

    for (text, position) in items {
        Text::with_baseline(text, position, small, Baseline::Top).draw(target)?;
    }
    Ok(())
}

fn draw_countdown<D>(target: &mut D, remaining_seconds: u32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let center = target.bounding_box().center();
    let digits = remaining_seconds.to_string();

    Text::with_text_style(&digits, center, large, centered()).draw(target)?;
    Ok(())
}

fn draw_times_up<D>(target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let large = MonoTextStyle::new(&FONT_10X20, BinaryColor::On);
    let bounds = target.bounding_box();
    let center = bounds.center();

    // Only six large glyphs fit across a portrait screen.
    let lines: &[(&str, i32)] = if bounds.size.height > bounds.size.width {
        &[("Time", -22), ("is", 0), ("Up!", 22)]
    } else {
        &[("Time's", -11), ("Up!", 11)]
    };

    for &(text, dy) in lines {
        Text::with_text_style(text, center + Point::new(0, dy), large, centered()).draw(target)?;
    }
    Ok(())
}

fn centered() -> TextStyle {
    TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build()
}
