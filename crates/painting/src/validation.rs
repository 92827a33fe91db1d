use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Color must start with '#': {0}")]
    MissingHash(String),
    #[error("Unsupported color length: {0}")]
    InvalidLength(String),
    #[error("Invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

/// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` into straight-alpha RGBA
pub fn parse_hex_color(value: &str) -> Result<[u8; 4], ColorError> {
    let trimmed = value.trim();
    let Some(hex) = trimmed.strip_prefix('#') else {
        return Err(ColorError::MissingHash(value.to_string()));
    };
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidDigit(value.to_string()));
    }

    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).unwrap_or(0);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);

    match hex.len() {
        3 => Ok([digit(0) * 17, digit(1) * 17, digit(2) * 17, 255]),
        6 => Ok([byte(0), byte(2), byte(4), 255]),
        8 => Ok([byte(0), byte(2), byte(4), byte(6)]),
        _ => Err(ColorError::InvalidLength(value.to_string())),
    }
}

/// Check whether a string is a color [`parse_hex_color`] accepts
pub fn is_hex_color(value: &str) -> bool {
    parse_hex_color(value).is_ok()
}

/// A width is usable when it is finite and positive
pub fn is_valid_width(width: f32) -> bool {
    width.is_finite() && width > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_form() {
        assert_eq!(parse_hex_color("#FF0000"), Ok([255, 0, 0, 255]));
        assert_eq!(parse_hex_color("#00c000"), Ok([0, 192, 0, 255]));
    }

    #[test]
    fn test_parse_short_and_alpha_forms() {
        assert_eq!(parse_hex_color("#fff"), Ok([255, 255, 255, 255]));
        assert_eq!(parse_hex_color("#11223380"), Ok([0x11, 0x22, 0x33, 0x80]));
    }

    #[test]
    fn test_rejects_bad_colors() {
        assert!(matches!(
            parse_hex_color("FF0000"),
            Err(ColorError::MissingHash(_))
        ));
        assert!(matches!(
            parse_hex_color("#12345"),
            Err(ColorError::InvalidLength(_))
        ));
        assert!(matches!(
            parse_hex_color("#zzzzzz"),
            Err(ColorError::InvalidDigit(_))
        ));
        assert!(!is_hex_color("red"));
    }

    #[test]
    fn test_width_validation() {
        assert!(is_valid_width(1.0));
        assert!(!is_valid_width(0.0));
        assert!(!is_valid_width(-2.0));
        assert!(!is_valid_width(f32::NAN));
        assert!(!is_valid_width(f32::INFINITY));
    }
}
