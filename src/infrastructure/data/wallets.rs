// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

//! Loads account material from a free-form text file: any `0x`-prefixed
//! 40-hex-char token is an address, any 64-hex-char token a private key.
//! Duplicates are dropped in first-seen order; addresses and keys are paired
//! by position.

use crate::domain::error::AppError;
use alloy::primitives::Address;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

lazy_static! {
    static ref HEX_TOKEN: Regex = Regex::new(r"0[xX][0-9a-fA-F]+").expect("static pattern");
}

#[derive(Debug, Clone, Default)]
pub struct WalletBook {
    pub addresses: Vec<Address>,
    pub keys: Vec<String>,
}

impl WalletBook {
    pub fn len(&self) -> usize {
        self.addresses.len().min(self.keys.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Paired (address, private key) accounts, truncated to the shorter list.
    pub fn accounts(&self) -> impl Iterator<Item = (Address, &str)> + '_ {
        self.addresses
            .iter()
            .copied()
            .zip(self.keys.iter().map(String::as_str))
    }
}

pub fn load_wallets(path: impl AsRef<Path>) -> Result<WalletBook, AppError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        AppError::Wallet(format!(
            "failed to read {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;
    Ok(parse_wallets(&content))
}

pub fn parse_wallets(content: &str) -> WalletBook {
    let mut book = WalletBook::default();
    let mut seen_addrs: HashSet<Address> = HashSet::new();
    let mut seen_keys: HashSet<String> = HashSet::new();

    for token in HEX_TOKEN.find_iter(content) {
        let token = token.as_str();
        // "0x" + 40 hex chars is an address, "0x" + 64 a private key. Other
        // lengths (tx hashes, calldata fragments) are noise.
        match token.len() {
            42 => {
                if let Ok(addr) = Address::from_str(token) {
                    if seen_addrs.insert(addr) {
                        book.addresses.push(addr);
                    }
                }
            }
            66 => {
                let key = token.to_lowercase();
                if seen_keys.insert(key.clone()) {
                    book.keys.push(key);
                }
            }
            _ => {}
        }
    }

    book
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn parses_pairs_out_of_freeform_text() {
        let content = "\
# account 1
0xd715f6DaBC496c7eb7Ff5324cc01419E6fB3F346,0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d
account 2 -> 0x672108336D05aCB5fBb1D9b596688deD43D22a9B 0x8b3a350cf5c34c9194ca85829a2df0ec3153be0318b5e2d3348e872092edffba
";
        let book = parse_wallets(content);
        assert_eq!(book.len(), 2);
        assert_eq!(
            book.addresses[0],
            address!("d715f6DaBC496c7eb7Ff5324cc01419E6fB3F346")
        );
        assert!(book.keys[0].starts_with("0x59c6995e"));
    }

    #[test]
    fn dedupes_repeated_entries_preserving_order() {
        let content = "\
0xd715f6DaBC496c7eb7Ff5324cc01419E6fB3F346
0xd715f6DaBC496c7eb7Ff5324cc01419E6fB3F346
0x672108336D05aCB5fBb1D9b596688deD43D22a9B
";
        let book = parse_wallets(content);
        assert_eq!(book.addresses.len(), 2);
        assert_eq!(
            book.addresses[1],
            address!("672108336D05aCB5fBb1D9b596688deD43D22a9B")
        );
    }

    #[test]
    fn ignores_hex_noise_of_other_lengths() {
        let content = "tx 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef00 data 0xabcdef";
        let book = parse_wallets(content);
        assert!(book.is_empty());
    }

    #[test]
    fn accounts_iterator_truncates_to_shorter_list() {
        let content = "\
0xd715f6DaBC496c7eb7Ff5324cc01419E6fB3F346
0x672108336D05aCB5fBb1D9b596688deD43D22a9B
0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d
";
        let book = parse_wallets(content);
        assert_eq!(book.accounts().count(), 1);
    }
}
