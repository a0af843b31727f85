use fixed::types::U32F32;

use super::{Range, Resolution};

/// Converts a raw channel count to lux.  Counts above the full-scale code of `resolution` are
/// treated as full scale.
#[must_use]
pub fn lux_from(count: u16, range: Range, resolution: Resolution) -> U32F32 {
    let full_scale = resolution.full_scale();
    let count = u32::from(count.min(full_scale));
    U32F32::from_num(count * range.lux()) / U32F32::from_num(full_scale)
}

#[test]
pub fn full_scale() {
    assert_eq!(
        lux_from(0xFFFF, Range::Lux10000, Resolution::Bits16),
        U32F32::from_num(10_000)
    );
    assert_eq!(
        lux_from(0x0FFF, Range::Lux375, Resolution::Bits12),
        U32F32::from_num(375)
    );
}

#[test]
pub fn twelve_bit_counts_are_clamped() {
    assert_eq!(
        lux_from(0x8000, Range::Lux375, Resolution::Bits12),
        U32F32::from_num(375)
    );
}

#[test]
pub fn midpoint() {
    let lux = lux_from(0x8000, Range::Lux10000, Resolution::Bits16);
    assert!(
        lux > U32F32::from_num(5_000) && lux < U32F32::from_num(5_001)
    );
}
