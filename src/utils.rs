// Utility helpers shared by the decoder, submitter and view

use ethers::types::{Address, U256};
use ethers::utils::format_units;

use crate::{
    constants::ETHER_DECIMALS,
    error::{AppError, Result},
};

/// Render a base-unit amount as ether with at least one fraction digit
/// (`1e18` -> `"1.0"`, `0` -> `"0.0"`, `15e17` -> `"1.5"`).
pub fn format_ether_display(amount: U256) -> Result<String> {
    let full = format_units(amount, ETHER_DECIMALS)
        .map_err(|e| AppError::DecodeFailure(format!("Amount conversion error: {}", e)))?;
    Ok(trim_fraction(&full))
}

fn trim_fraction(value: &str) -> String {
    match value.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            let fraction = if fraction.is_empty() { "0" } else { fraction };
            format!("{}.{}", whole, fraction)
        }
        None => format!("{}.0", value),
    }
}

/// Strip a leading `0x`/`0X` marker if present.
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Always return the payload with a `0x` marker.
pub fn with_hex_prefix(value: &str) -> String {
    format!("0x{}", strip_hex_prefix(value))
}

/// Lowercase `0x`-prefixed hex form of an address.
pub fn address_to_lower_hex(address: &Address) -> String {
    format!("{:#x}", address)
}

pub fn same_address(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}
