//! Flat ROM offsets versus `(bank, local address)` pairs.
//!
//! A flat offset is the only stored form; bank and local address are always
//! derived from it.

/// Size of one switchable ROM bank.
pub const BANK_SIZE: u32 = 0x4000;

/// Largest supported cartridge image (128 banks).
pub const ROM_SIZE: u32 = 0x20_0000;

/// First local address of the switchable window.
pub const ROMX_START: u16 = 0x4000;

/// First local address past the ROM area.
pub const ROM_END: u16 = 0x8000;

pub const fn bank_of(offset: u32) -> u32 {
    offset / BANK_SIZE
}

/// Local address a flat offset is visible at once its bank is mapped.
///
/// Bank 0 lives at `$0000-$3FFF`, every other bank at `$4000-$7FFF`.
pub const fn local_address(offset: u32) -> u16 {
    let addr = (offset % BANK_SIZE) as u16;
    if bank_of(offset) != 0 {
        addr + ROMX_START
    } else {
        addr
    }
}

/// Flat offset of `local` when `bank` is mapped.
///
/// Bank 0 has no switchable window of its own: `0:4000-7fff` is left as is,
/// which is the same offset `1:4000-7fff` resolves to (the MBC3 quirk). RAM
/// addresses pass through unchanged.
pub const fn global_address(local: u16, bank: u32) -> u32 {
    if local < ROM_END && local >= ROMX_START && bank > 0 {
        local as u32 + (bank - 1) * BANK_SIZE
    } else {
        local as u32
    }
}

/// ` ; <offset> (<bank>:<local>)`, appended to routine headers.
pub fn address_comment(offset: u32) -> String {
    format!(
        " ; {:x} ({:x}:{:x})",
        offset,
        bank_of(offset),
        local_address(offset)
    )
}

/// Last byte of the bank containing `offset`.
pub const fn bank_end(offset: u32) -> u32 {
    (bank_of(offset) + 1) * BANK_SIZE - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_zero_maps_to_low_window() {
        assert_eq!(local_address(0x0000), 0x0000);
        assert_eq!(local_address(0x3FFF), 0x3FFF);
        assert_eq!(local_address(0x0150), 0x0150);
    }

    #[test]
    fn other_banks_map_to_high_window() {
        assert_eq!(local_address(0x4000), 0x4000);
        assert_eq!(local_address(0x7FFF), 0x7FFF);
        assert_eq!(local_address(0x1_C123), 0x4123);
        assert_eq!(local_address(ROM_SIZE - 1), 0x7FFF);
    }

    #[test]
    fn global_address_inverts_local_address() {
        for offset in (0..ROM_SIZE).step_by(0x3FF) {
            let bank = bank_of(offset);
            assert_eq!(
                global_address(local_address(offset), bank),
                offset,
                "offset {offset:#x}"
            );
        }
        assert_eq!(global_address(local_address(ROM_SIZE - 1), 0x7F), ROM_SIZE - 1);
    }

    #[test]
    fn bank_zero_high_window_aliases_bank_one() {
        for k in [0u16, 0x1234, 0x3FFF] {
            let local = ROMX_START + k;
            assert_eq!(global_address(local, 0), global_address(local, 1));
        }
        assert_eq!(global_address(0x4000, 0), 0x4000);
        assert_eq!(global_address(0x4000, 2), 0x8000);
    }

    #[test]
    fn ram_addresses_pass_through() {
        assert_eq!(global_address(0xC000, 5), 0xC000);
        assert_eq!(global_address(0xFF80, 1), 0xFF80);
        assert_eq!(global_address(0x1234, 7), 0x1234);
    }

    #[test]
    fn bank_end_and_comment() {
        assert_eq!(bank_end(0x0100), 0x3FFF);
        assert_eq!(bank_end(0x4000), 0x7FFF);
        assert_eq!(bank_end(0x1_C000), 0x1_FFFF);
        assert_eq!(address_comment(0x1_C123), " ; 1c123 (7:4123)");
        assert_eq!(address_comment(0x150), " ; 150 (0:150)");
    }
}
