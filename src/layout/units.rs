//! Length unit conversions.

/// Twentieths of a point per inch.
pub const TWIPS_PER_INCH: f64 = 1440.0;

/// English metric units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

/// Convert inches to twips, rounded to the nearest whole twip.
pub fn twips_from_inches(inches: f64) -> i64 {
    (inches * TWIPS_PER_INCH).round() as i64
}

/// Convert twips to inches.
pub fn inches_from_twips(twips: i64) -> f64 {
    twips as f64 / TWIPS_PER_INCH
}

/// Convert inches to EMU, rounded to the nearest whole unit.
pub fn emu_from_inches(inches: f64) -> i64 {
    (inches * EMU_PER_INCH).round() as i64
}
