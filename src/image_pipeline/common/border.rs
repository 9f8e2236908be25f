//! Border handling for neighbourhood lookups.
//!
//! Every stage that samples outside the image folds the coordinate back with
//! reflect-101 (`-1 -> 1`, `len -> len - 2`). Unlike edge-repeat, this keeps
//! the parity of the coordinate, so a reflected Bayer neighbour still lands on
//! a site of the same colour.

/// Map a possibly out-of-range coordinate onto `[0, len)` by reflect-101.
///
/// `len` must be non-zero. A one-sample axis maps everything to `0`.
#[inline]
pub fn reflect_101(i: isize, len: usize) -> usize {
    debug_assert!(len > 0, "reflect_101 on an empty axis");
    if len <= 1 {
        return 0;
    }
    if i >= 0 && (i as usize) < len {
        return i as usize;
    }

    let period = (2 * len - 2) as isize;
    let r = i.rem_euclid(period) as usize;
    if r < len { r } else { 2 * len - 2 - r }
}
