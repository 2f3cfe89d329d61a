//! Procedural LED animations
//!
//! A pattern is a pure function of the frame number and strip length; the
//! session owns the frame counter and the timing.

use std::str::FromStr;

use super::color::{hsl_to_rgb, Rgb};

pub const DEFAULT_FRAME_INTERVAL_MS: u32 = 100;

/// Physical layout of the LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arrangement {
    Strip,
    #[default]
    Ring,
    /// Square-ish grid, `ceil(sqrt(n))` LEDs per row.
    Matrix,
}

impl FromStr for Arrangement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strip" => Ok(Arrangement::Strip),
            "ring" => Ok(Arrangement::Ring),
            "matrix" => Ok(Arrangement::Matrix),
            other => Err(format!("unknown arrangement: {}", other)),
        }
    }
}

pub trait FramePattern {
    fn name(&self) -> &'static str;

    /// Called once before frame 0.
    fn init(&mut self, _led_count: usize) {}

    /// Colors for every LED; the result always has `led_count` entries.
    fn colors_for_frame(&self, frame: u64, led_count: usize) -> Vec<Rgb>;

    fn frame_interval_ms(&self) -> u32 {
        DEFAULT_FRAME_INTERVAL_MS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    RainbowWave,
    FireEffect,
    Scanner,
    ColorWipe,
    Breathing,
    RotateRainbow,
    PulseRing,
    SpinningDot,
    MatrixRain,
    Checkerboard,
    MatrixSnake,
}

const STRIP_PATTERNS: &[PatternKind] = &[
    PatternKind::RainbowWave,
    PatternKind::FireEffect,
    PatternKind::Scanner,
    PatternKind::ColorWipe,
    PatternKind::Breathing,
];

const RING_PATTERNS: &[PatternKind] = &[
    PatternKind::RotateRainbow,
    PatternKind::PulseRing,
    PatternKind::SpinningDot,
];

const MATRIX_PATTERNS: &[PatternKind] = &[
    PatternKind::MatrixRain,
    PatternKind::Checkerboard,
    PatternKind::MatrixSnake,
];

/// Pattern library offered for a layout.
pub fn patterns_for(arrangement: Arrangement) -> &'static [PatternKind] {
    match arrangement {
        Arrangement::Strip => STRIP_PATTERNS,
        Arrangement::Ring => RING_PATTERNS,
        Arrangement::Matrix => MATRIX_PATTERNS,
    }
}

#[inline]
fn grid_size(count: usize) -> usize {
    (count as f64).sqrt().ceil() as usize
}

#[inline]
fn sine_level(frame: u64, speed: f64) -> u8 {
    (((frame as f64 * speed).sin() + 1.0) * 127.5) as u8
}

impl FramePattern for PatternKind {
    fn name(&self) -> &'static str {
        match self {
            PatternKind::RainbowWave => "Rainbow Wave",
            PatternKind::FireEffect => "Fire Effect",
            PatternKind::Scanner => "Scanner",
            PatternKind::ColorWipe => "Color Wipe",
            PatternKind::Breathing => "Breathing",
            PatternKind::RotateRainbow => "Rotate Rainbow",
            PatternKind::PulseRing => "Pulse Ring",
            PatternKind::SpinningDot => "Spinning Dot",
            PatternKind::MatrixRain => "Matrix Rain",
            PatternKind::Checkerboard => "Checkerboard",
            PatternKind::MatrixSnake => "Matrix Snake",
        }
    }

    fn frame_interval_ms(&self) -> u32 {
        match self {
            PatternKind::RainbowWave | PatternKind::RotateRainbow => 100,
            PatternKind::FireEffect | PatternKind::PulseRing => 80,
            PatternKind::Scanner | PatternKind::SpinningDot | PatternKind::MatrixRain => 150,
            PatternKind::ColorWipe | PatternKind::Checkerboard => 200,
            PatternKind::Breathing => 50,
            PatternKind::MatrixSnake => 120,
        }
    }

    fn colors_for_frame(&self, frame: u64, count: usize) -> Vec<Rgb> {
        if count == 0 {
            return Vec::new();
        }
        let n = count as u64;
        match self {
            PatternKind::RainbowWave => (0..count)
                .map(|i| {
                    let hue = (i as f64 * 360.0 / count as f64 + frame as f64 * 2.0) % 360.0;
                    hsl_to_rgb(hue, 100.0, 50.0)
                })
                .collect(),
            PatternKind::FireEffect => (0..count)
                .map(|i| {
                    let heat = (((i as u64 + frame) as f64 * 0.3).sin() * 255.0).max(0.0);
                    Rgb::clamp_f64(heat, (heat * 0.4).floor(), 0.0)
                })
                .collect(),
            PatternKind::Scanner => {
                let pos = ((frame % (n * 2)) as i64 - n as i64).abs();
                (0..count)
                    .map(|i| {
                        let distance = (i as i64 - pos).abs();
                        Rgb::new((255 - distance * 50).max(0) as u8, 0, 0)
                    })
                    .collect()
            }
            PatternKind::ColorWipe => {
                const WIPE: [Rgb; 4] = [
                    Rgb::new(255, 0, 0),
                    Rgb::new(0, 255, 0),
                    Rgb::new(0, 0, 255),
                    Rgb::new(255, 255, 0),
                ];
                let color = WIPE[((frame / n) % WIPE.len() as u64) as usize];
                let pos = (frame % n) as usize;
                (0..count)
                    .map(|i| if i <= pos { color } else { Rgb::BLACK })
                    .collect()
            }
            PatternKind::Breathing => {
                let level = sine_level(frame, 0.1);
                vec![Rgb::new(0, level, level); count]
            }
            PatternKind::RotateRainbow => (0..count)
                .map(|i| {
                    let hue = ((i as u64 + frame) as f64 * 360.0 / count as f64) % 360.0;
                    hsl_to_rgb(hue, 100.0, 50.0)
                })
                .collect(),
            PatternKind::PulseRing => {
                let level = sine_level(frame, 0.2);
                vec![Rgb::new(level, 0, level); count]
            }
            PatternKind::SpinningDot => {
                let pos = (frame % n) as usize;
                (0..count)
                    .map(|i| if i == pos { Rgb::WHITE } else { Rgb::BLACK })
                    .collect()
            }
            PatternKind::MatrixRain => {
                let size = grid_size(count) as u64;
                (0..count as u64)
                    .map(|i| {
                        let (x, y) = (i % size, i / size);
                        let drop = (frame + x * 3) % (size + 5);
                        let level = match drop.checked_sub(y) {
                            Some(0) => 255,
                            Some(1) => 128,
                            Some(2) => 64,
                            _ => 0,
                        };
                        Rgb::new(0, level, 0)
                    })
                    .collect()
            }
            PatternKind::Checkerboard => {
                let size = grid_size(count) as u64;
                (0..count as u64)
                    .map(|i| {
                        let (x, y) = (i % size, i / size);
                        if (x + y + frame) % 2 == 0 {
                            Rgb::WHITE
                        } else {
                            Rgb::BLACK
                        }
                    })
                    .collect()
            }
            PatternKind::MatrixSnake => {
                let length = grid_size(count).min(8) as u64;
                let head = frame % n;
                (0..n)
                    .map(|i| {
                        let distance = (head + n - i) % n;
                        if distance < length {
                            Rgb::new(0, (255 - distance * 255 / length) as u8, 0)
                        } else {
                            Rgb::BLACK
                        }
                    })
                    .collect()
            }
        }
    }
}
