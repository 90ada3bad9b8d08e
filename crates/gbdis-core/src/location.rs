use crate::address::{BANK_SIZE, ROM_SIZE};
use crate::error::LocationError;
use crate::symbols::SymbolTable;

/// Resolve a user-supplied location to a flat ROM offset.
///
/// Accepts `bank:address` (both hex), a ROM symbol name, or a hex offset with
/// an optional `0x` or `$` prefix, tried in that order.
pub fn parse_location(input: &str, symbols: &SymbolTable) -> Result<u32, LocationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(LocationError::Empty);
    }

    let unparsable = || LocationError::Unparsable(trimmed.to_string());

    let offset = if let Some((bank_s, addr_s)) = trimmed.split_once(':') {
        let bank = parse_hex(bank_s).ok_or_else(unparsable)?;
        let addr = parse_hex(addr_s).ok_or_else(unparsable)?;
        u64::from(bank) * u64::from(BANK_SIZE) + u64::from(addr % BANK_SIZE)
    } else if let Some(offset) = symbols.address_of(trimmed) {
        u64::from(offset)
    } else {
        u64::from(parse_hex(trimmed).ok_or_else(unparsable)?)
    };

    match u32::try_from(offset) {
        Ok(offset) if offset < ROM_SIZE => Ok(offset),
        _ => Err(LocationError::OutOfRange {
            offset: u32::try_from(offset).unwrap_or(u32::MAX),
        }),
    }
}

fn parse_hex(text: &str) -> Option<u32> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_and_address_pairs() {
        let sym = SymbolTable::new();
        assert_eq!(parse_location("7:4123", &sym), Ok(0x1_C123));
        assert_eq!(parse_location("0:0150", &sym), Ok(0x150));
        assert_eq!(parse_location("$7f:$7fff", &sym), Ok(0x1F_FFFF));
        // The address wraps into the bank window.
        assert_eq!(parse_location("2:0010", &sym), Ok(0x8010));
    }

    #[test]
    fn symbols_resolve_before_hex() {
        let sym = SymbolTable::parse_sym("01:4abc Decade\n00:0150 Start\n").unwrap();
        assert_eq!(parse_location("Start", &sym), Ok(0x150));
        // "Decade" would also be valid hex.
        assert_eq!(parse_location("Decade", &sym), Ok(0x4ABC));
    }

    #[test]
    fn plain_hex_offsets() {
        let sym = SymbolTable::new();
        assert_eq!(parse_location("1c123", &sym), Ok(0x1_C123));
        assert_eq!(parse_location("0x150", &sym), Ok(0x150));
        assert_eq!(parse_location(" $4000 ", &sym), Ok(0x4000));
    }

    #[test]
    fn rejects_bad_locations() {
        let sym = SymbolTable::new();
        assert_eq!(parse_location("  ", &sym), Err(LocationError::Empty));
        assert_eq!(
            parse_location("NoSuchLabel", &sym),
            Err(LocationError::Unparsable("NoSuchLabel".to_string()))
        );
        assert_eq!(
            parse_location("80:4000", &sym),
            Err(LocationError::OutOfRange { offset: 0x20_0000 })
        );
        assert_eq!(
            parse_location("200000", &sym),
            Err(LocationError::OutOfRange { offset: 0x20_0000 })
        );
    }
}
