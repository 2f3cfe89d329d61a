//! RGB colors and brightness scaling

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the `#` is optional, hex digits are case-insensitive).
    ///
    /// Anything else is black, which is what a color picker's empty value maps to.
    pub fn from_hex(hex: &str) -> Self {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Self::BLACK;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
        Self::new(channel(0), channel(2), channel(4))
    }

    /// Scale every channel by `brightness / 255`, rounding down.
    pub fn scaled(self, brightness: u8) -> Self {
        let scale = |c: u8| (c as u16 * brightness as u16 / 255) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    /// Build from float channels, saturating to `0..=255`.
    pub(crate) fn clamp_f64(r: f64, g: f64, b: f64) -> Self {
        let clamp = |c: f64| c.clamp(0.0, 255.0) as u8;
        Self::new(clamp(r), clamp(g), clamp(b))
    }
}

/// `hue` in degrees, `saturation` and `lightness` in percent.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = saturation / 100.0;
    let l = lightness / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h * 6.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Rgb::clamp_f64(
        ((r + m) * 255.0).round(),
        ((g + m) * 255.0).round(),
        ((b + m) * 255.0).round(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#ff8000"), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::from_hex("00FFaa"), Rgb::new(0, 255, 170));
        assert_eq!(Rgb::from_hex("#fff"), Rgb::BLACK);
        assert_eq!(Rgb::from_hex("#gg0000"), Rgb::BLACK);
        assert_eq!(Rgb::from_hex(""), Rgb::BLACK);
    }

    #[test]
    fn test_scaled() {
        assert_eq!(Rgb::new(255, 100, 1).scaled(255), Rgb::new(255, 100, 1));
        assert_eq!(Rgb::new(255, 100, 1).scaled(128), Rgb::new(128, 50, 0));
        assert_eq!(Rgb::WHITE.scaled(0), Rgb::BLACK);
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 100.0, 50.0), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 100.0, 50.0), Rgb::new(0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 100.0, 50.0), Rgb::new(0, 0, 255));
        assert_eq!(hsl_to_rgb(60.0, 100.0, 50.0), Rgb::new(255, 255, 0));
        assert_eq!(hsl_to_rgb(360.0, 100.0, 50.0), Rgb::new(255, 0, 0));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 100.0), Rgb::WHITE);
    }
}
