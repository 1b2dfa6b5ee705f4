//! Input parsing helpers for CLI commands.

use anyhow::{bail, Result};

/// Parse a hex-encoded wallet address, validating basic format.
pub fn parse_address(s: &str) -> Result<String> {
    let addr = s.trim();
    if !addr.starts_with("0x") || addr.len() != 42 {
        bail!("Invalid address '{addr}'. Must be 0x-prefixed and 42 chars.");
    }
    if !addr[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        bail!("Invalid hex in address '{addr}'.");
    }
    Ok(addr.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_address() {
        let addr = parse_address("0xCCeE77e74C4466DF0dA0ec85F2D3505956fD6Fa7").unwrap();
        assert_eq!(addr, "0xCCeE77e74C4466DF0dA0ec85F2D3505956fD6Fa7");
    }

    #[test]
    fn whitespace_is_trimmed() {
        let addr = parse_address("  0xCCeE77e74C4466DF0dA0ec85F2D3505956fD6Fa7  ").unwrap();
        assert!(addr.starts_with("0x"));
    }

    #[test]
    fn rejects_missing_prefix() {
        assert!(parse_address("CCeE77e74C4466DF0dA0ec85F2D3505956fD6Fa7").is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(parse_address("0x123").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn rejects_non_hex() {
        assert!(parse_address("0xGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG").is_err());
    }
}
