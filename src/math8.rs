use embassy_time::Duration;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Convert a unit interval value (0.0-1.0) into an 8-bit level
///
/// Values outside of the interval saturate.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unit_to_u8(value: f32) -> u8 {
    libm::roundf(value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Elapsed time stretched by a rate multiplier, in milliseconds
///
/// The multiplier is resolved to 1/1000 so long-running animations keep
/// integer precision.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scaled_millis(elapsed: Duration, rate: f32) -> u64 {
    let rate_milli = libm::roundf(rate.max(0.0) * 1000.0) as u64;
    elapsed.as_millis().saturating_mul(rate_milli) / 1000
}
