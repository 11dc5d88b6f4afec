//! macOS DPI handling implementation.
//!
//! Quartz coordinates are already logical points on Retina displays and
//! the nominal-resolution capture matches them, so no process-level
//! opt-in is needed.

/// Set DPI awareness (no-op on macOS).
pub fn set_dpi_aware() {
    // No-op: the system handles Retina scaling
}

/// Get the current DPI scale factor.
///
/// Returns 1.0; capture and cursor share the same logical space.
pub fn get_primary_scale_factor() -> f64 {
    1.0
}
