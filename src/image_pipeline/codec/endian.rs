//! Byte-order normalisation for on-disk 16-bit samples.

/// Byte order of the machine doing the I/O.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEndian {
    Little,
    Big,
}

impl HostEndian {
    pub const fn native() -> Self {
        if cfg!(target_endian = "big") {
            HostEndian::Big
        } else {
            HostEndian::Little
        }
    }
}

/// Convert between host order and big-endian disk order in place.
///
/// The swap is its own inverse, so the same pass serves reads and writes. On
/// a big-endian host the samples are already in disk order.
pub fn swap_for_disk(samples: &mut [u16], host: HostEndian) {
    if host == HostEndian::Little {
        for value in samples.iter_mut() {
            *value = value.swap_bytes();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn little_endian_host_swaps() {
        let mut samples = [0x0102, 0xFF00, 0x00FF];
        swap_for_disk(&mut samples, HostEndian::Little);
        assert_eq!(samples, [0x0201, 0x00FF, 0xFF00]);
    }

    #[test]
    fn big_endian_host_is_untouched() {
        let mut samples = [0x0102, 0xFF00, 0x00FF];
        swap_for_disk(&mut samples, HostEndian::Big);
        assert_eq!(samples, [0x0102, 0xFF00, 0x00FF]);
    }

    #[test]
    fn swap_matches_big_endian_bytes_on_either_host() {
        // What lands on disk must be the big-endian encoding, whichever host
        // produced it.
        for host in [HostEndian::Little, HostEndian::Big] {
            let value = 0xA1B2u16;
            let mut samples = [value];
            swap_for_disk(&mut samples, host);
            let on_disk = match host {
                HostEndian::Little => samples[0].to_le_bytes(),
                HostEndian::Big => samples[0].to_be_bytes(),
            };
            assert_eq!(on_disk, value.to_be_bytes());
        }
    }

    #[test]
    fn native_matches_target() {
        let native_bytes = 0x0102u16.to_ne_bytes();
        let expected = if native_bytes[0] == 0x01 {
            HostEndian::Big
        } else {
            HostEndian::Little
        };
        assert_eq!(HostEndian::native(), expected);
    }
}
