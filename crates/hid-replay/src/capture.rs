//! Capture files in the `hid-capture` JSON layout.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureReport {
    pub timestamp_us: u64,
    pub report_id: u8,
    /// Space separated bytes, e.g. `"0x03 0x90 0x00"`.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureFile {
    pub vendor_id: String,
    pub product_id: String,
    pub captures: Vec<CaptureReport>,
}

impl CaptureFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read capture file '{}'", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse capture file '{}'", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid capture JSON")
    }

    pub fn ids(&self) -> Result<(u16, u16)> {
        let vid = parse_hex_u16(&self.vendor_id).map_err(anyhow::Error::msg)?;
        let pid = parse_hex_u16(&self.product_id).map_err(anyhow::Error::msg)?;
        Ok((vid, pid))
    }
}

impl CaptureReport {
    pub fn bytes(&self) -> Result<Vec<u8>> {
        parse_hex_bytes(self.data.split_whitespace())
            .with_context(|| format!("Bad report data at t={}us", self.timestamp_us))
    }
}

pub fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let s = s.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(s, 16).map_err(|e| format!("invalid hex value '{s}': {e}"))
}

/// Parse byte tokens such as `0x03`, `03` or `3`.
pub fn parse_hex_bytes<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for token in tokens {
        let digits = token.trim_start_matches("0x").trim_start_matches("0X");
        if digits.is_empty() || digits.len() > 2 {
            bail!("invalid byte '{token}'");
        }
        let byte =
            u8::from_str_radix(digits, 16).with_context(|| format!("invalid byte '{token}'"))?;
        bytes.push(byte);
    }
    Ok(bytes)
}

// ── BDD-style scenario tests ────────────────────────────────────────────────
