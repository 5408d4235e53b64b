// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, U256};

pub fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

pub fn parse_hex_bytes(s: &str) -> Option<Vec<u8>> {
    hex::decode(strip_0x(s)).ok()
}

pub fn parse_address_hex(s: &str) -> Option<Address> {
    let bytes = parse_hex_bytes(s.trim())?;
    if bytes.len() != 20 {
        return None;
    }
    Some(Address::from_slice(&bytes))
}

pub fn parse_u256_hex(s: &str) -> Option<U256> {
    U256::from_str_radix(strip_0x(s), 16).ok()
}

/// Wei amount written either as a decimal string or as 0x-prefixed hex.
pub fn parse_wei(s: &str) -> Option<U256> {
    let s = s.trim();
    if s.starts_with("0x") || s.starts_with("0X") {
        parse_u256_hex(s)
    } else {
        U256::from_str_radix(s, 10).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsers_accept_lower_and_upper_prefixes() {
        assert_eq!(parse_u256_hex("0x2a"), Some(U256::from(42u64)));
        assert_eq!(parse_u256_hex("0X2a"), Some(U256::from(42u64)));
        assert_eq!(parse_hex_bytes("0Xabcd"), Some(vec![0xab, 0xcd]));
    }

    #[test]
    fn address_parser_enforces_twenty_bytes() {
        assert!(parse_address_hex("0x5c952063c7fc8610FFDB798152D69F0B9550762b").is_some());
        assert!(parse_address_hex("0xabcd").is_none());
        assert!(parse_address_hex("not-an-address").is_none());
    }

    #[test]
    fn wei_parser_takes_decimal_and_hex() {
        assert_eq!(parse_wei("1000"), Some(U256::from(1_000u64)));
        assert_eq!(parse_wei("0x3e8"), Some(U256::from(1_000u64)));
        assert_eq!(
            parse_wei("10000000000000000000"),
            Some(U256::from(10_000_000_000_000_000_000u128))
        );
        assert!(parse_wei("1e18").is_none());
    }
}
