//! Byte unit tables and the kb-size policy that selects between them.
//!
//! Four tables exist:
//! - DECIMAL: `B`, `KB` .. `YB` with multipliers 1000^n
//! - IEC: `B`, `KiB` .. `YiB` with multipliers 1024^n
//! - JEDEC: `B`, `KB` .. `YB` with multipliers 1024^n
//! - COMBINED: DECIMAL merged with IEC; `B` comes from IEC
//!
//! Multipliers are `u128` because `YB` and `YiB` exceed `u64`.

use lazy_static::lazy_static;

/// Unit prefixes in ascending order of magnitude.
const PREFIXES: [&str; 8] = ["K", "M", "G", "T", "P", "E", "Z", "Y"];

/// Selects which unit table byte quantities are formatted and parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KbPolicy {
    /// 1000-based, `KB`/`MB`/...
    Decimal,
    /// 1024-based with legacy names `KB`/`MB`/...
    Jedec,
    /// 1024-based with IEC names `KiB`/`MiB`/...
    Iec,
    /// Decimal and IEC tables together.
    #[default]
    Combined,
}

impl KbPolicy {
    /// Maps a policy token to a policy.
    ///
    /// Unknown tokens select [`KbPolicy::Combined`], which accepts every
    /// spelling and formats with whichever unit fits best.
    pub fn from_token(token: &str) -> KbPolicy {
        match token.trim().to_ascii_lowercase().as_str() {
            "decimal" | "1000" => KbPolicy::Decimal,
            "jedec" | "old" | "1024" => KbPolicy::Jedec,
            "iec" | "new" => KbPolicy::Iec,
            _ => KbPolicy::Combined,
        }
    }

    /// Like [`KbPolicy::from_token`], mapping an absent token to `Combined`.
    pub fn from_token_opt(token: Option<&str>) -> KbPolicy {
        token.map(KbPolicy::from_token).unwrap_or_default()
    }

    /// Returns the unit table for this policy.
    pub fn table(self) -> &'static UnitTable {
        select_table(self)
    }
}

/// A unit symbol and its multiplier in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitEntry {
    pub unit: &'static str,
    pub multiplier: u128,
}

/// Immutable mapping from unit symbol to multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitTable {
    entries: Vec<UnitEntry>,
}

impl UnitTable {
    fn build(base: u128, names: &[&'static str]) -> Self {
        let mut entries = Vec::with_capacity(names.len());
        let mut multiplier = 1u128;
        for name in names {
            entries.push(UnitEntry { unit: *name, multiplier });
            multiplier *= base;
        }
        Self { entries }
    }

    /// Merges `other` into `self`; entries of `other` replace same-named ones.
    fn merged(&self, other: &UnitTable) -> Self {
        let mut entries = self.entries.clone();
        for entry in &other.entries {
            match entries.iter_mut().find(|e| e.unit == entry.unit) {
                Some(existing) => existing.multiplier = entry.multiplier,
                None => entries.push(*entry),
            }
        }
        Self { entries }
    }

    /// Returns the multiplier for a canonical unit symbol.
    pub fn multiplier(&self, unit: &str) -> Option<u128> {
        self.entries
            .iter()
            .find(|e| e.unit == unit)
            .map(|e| e.multiplier)
    }

    /// Returns true if the table knows the canonical unit symbol.
    pub fn contains(&self, unit: &str) -> bool {
        self.multiplier(unit).is_some()
    }

    /// Returns the entries in table order.
    pub fn entries(&self) -> &[UnitEntry] {
        &self.entries
    }

    /// Returns the entries sorted by multiplier, largest first.
    pub fn entries_descending(&self) -> Vec<UnitEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.multiplier.cmp(&a.multiplier));
        sorted
    }
}

const DECIMAL_NAMES: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];
const IEC_NAMES: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

lazy_static! {
    /// 1000-based table.
    pub static ref DECIMAL: UnitTable = UnitTable::build(1000, &DECIMAL_NAMES);
    /// 1024-based table with legacy names.
    pub static ref JEDEC_BINARY: UnitTable = UnitTable::build(1024, &DECIMAL_NAMES);
    /// 1024-based table with IEC names.
    pub static ref IEC_BINARY: UnitTable = UnitTable::build(1024, &IEC_NAMES);
    /// Decimal and IEC units together.
    pub static ref COMBINED: UnitTable = DECIMAL.merged(&IEC_BINARY);
}

/// Returns the unit table selected by `policy`.
pub fn select_table(policy: KbPolicy) -> &'static UnitTable {
    match policy {
        KbPolicy::Decimal => &*DECIMAL,
        KbPolicy::Jedec => &*JEDEC_BINARY,
        KbPolicy::Iec => &*IEC_BINARY,
        KbPolicy::Combined => &*COMBINED,
    }
}

/// Normalizes a unit spelling to its canonical table key.
///
/// Accepts an optional magnitude letter, an optional `i` and a trailing `b`,
/// all case-insensitive: `"kib"` becomes `"KiB"`, `"gb"` becomes `"GB"`.
pub fn canonical_unit(token: &str) -> Option<String> {
    let lower = token.trim().to_ascii_lowercase();
    let body = lower.strip_suffix('b')?;
    let (prefix, iec) = match body.strip_suffix('i') {
        Some(rest) if !rest.is_empty() => (rest, true),
        _ => (body, false),
    };

    match prefix.len() {
        0 => Some("B".to_string()),
        1 => {
            let letter = prefix.to_ascii_uppercase();
            if !PREFIXES.contains(&letter.as_str()) {
                return None;
            }
            Some(if iec { format!("{letter}iB") } else { format!("{letter}B") })
        }
        _ => None,
    }
}
