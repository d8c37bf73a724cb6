//! Knot and link names
//!
//! Row names are structured identifiers, e.g. `K6a3`, `16n992421` or
//! `18nh_07319980`: an optional `K`/`L` prefix, the crossing number, one or
//! more flavor markers (`a` alternating, `n` non-alternating, `h`/`s`/`t`
//! hyperbolic-type suffixes), optional underscores and a counter.
//!
//! A lookup key may additionally carry Dehn filling coefficients, as in
//! `K6a3(1,0)` or `L5a1(0,0)(1,2)`.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::errors::{TableError, TableResult};

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([KL]*)([0-9]+)([anhst]+)(_*)([0-9]+)$").expect("valid name regex")
    })
}

fn filling_split_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.*?)((?:\([0-9 .+-]+,[0-9 .+-]+\))*)$").expect("valid filling regex")
    })
}

fn filling_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([0-9 .+-]+),([0-9 .+-]+)\)").expect("valid filling regex"))
}

/// A parsed row name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnotName {
    raw: String,
    prefix: String,
    crossings: u32,
    flavor: String,
    counter: String,
}

impl KnotName {
    /// Parse a row name. Returns `None` for strings that cannot name a row.
    pub fn parse(name: &str) -> Option<Self> {
        let caps = name_regex().captures(name)?;
        let crossings = caps[2].parse::<u32>().ok()?;

        Some(Self {
            raw: name.to_string(),
            prefix: caps[1].to_string(),
            crossings,
            flavor: caps[3].to_string(),
            counter: caps[5].to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn crossings(&self) -> u32 {
        self.crossings
    }

    /// Flavor markers, e.g. `a`, `nh`, `ns`
    pub fn flavor(&self) -> &str {
        &self.flavor
    }

    /// Counter within the crossing number and flavor, leading zeros kept
    pub fn counter(&self) -> &str {
        &self.counter
    }

    pub fn is_alternating(&self) -> bool {
        self.flavor.contains('a')
    }

    /// Names with an `L` prefix describe links
    pub fn is_link(&self) -> bool {
        self.prefix.starts_with('L')
    }
}

impl fmt::Display for KnotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Dehn filling coefficients for one cusp
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Filling {
    pub meridian: f64,
    pub longitude: f64,
}

impl fmt::Display for Filling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.meridian, self.longitude)
    }
}

/// Split a lookup key into the bare row name and its filling coefficients.
pub fn split_filling_info(key: &str) -> TableResult<(&str, Vec<Filling>)> {
    let key = key.trim();
    let caps = match filling_split_regex().captures(key) {
        Some(caps) => caps,
        None => return Ok((key, Vec::new())),
    };

    let base = caps.get(1).map_or(key, |m| m.as_str());
    let suffix = caps.get(2).map_or("", |m| m.as_str());

    let mut fillings = Vec::new();
    for pair in filling_regex().captures_iter(suffix) {
        let meridian = parse_coefficient(key, &pair[1])?;
        let longitude = parse_coefficient(key, &pair[2])?;
        fillings.push(Filling {
            meridian,
            longitude,
        });
    }

    Ok((base, fillings))
}

fn parse_coefficient(key: &str, text: &str) -> TableResult<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    compact.parse::<f64>().map_err(|_| {
        TableError::bad_configuration(
            "name",
            format!("bad filling coefficient '{}' in '{}'", text.trim(), key),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefixed_knot() {
        let name = KnotName::parse("K6a3").unwrap();
        assert_eq!(name.crossings(), 6);
        assert_eq!(name.flavor(), "a");
        assert_eq!(name.counter(), "3");
        assert!(name.is_alternating());
        assert!(!name.is_link());
    }

    #[test]
    fn test_parse_bare_names() {
        let name = KnotName::parse("16n992421").unwrap();
        assert_eq!(name.crossings(), 16);
        assert!(!name.is_alternating());

        let name = KnotName::parse("18nh_07319980").unwrap();
        assert_eq!(name.crossings(), 18);
        assert_eq!(name.flavor(), "nh");
        assert_eq!(name.counter(), "07319980");

        let name = KnotName::parse("18ah_4028506").unwrap();
        assert!(name.is_alternating());
        assert_eq!(name.to_string(), "18ah_4028506");
    }

    #[test]
    fn test_parse_link() {
        let name = KnotName::parse("L5a1").unwrap();
        assert!(name.is_link());
    }

    #[test]
    fn test_rejects_non_names() {
        assert!(KnotName::parse("").is_none());
        assert!(KnotName::parse("K6").is_none());
        assert!(KnotName::parse("m004").is_none());
        assert!(KnotName::parse("K6a3; DROP TABLE x").is_none());
    }

    #[test]
    fn test_split_without_filling() {
        let (base, fillings) = split_filling_info("K8n1").unwrap();
        assert_eq!(base, "K8n1");
        assert!(fillings.is_empty());
    }

    #[test]
    fn test_split_with_fillings() {
        let (base, fillings) = split_filling_info("L6a2(1,0)(-2, 3.5)").unwrap();
        assert_eq!(base, "L6a2");
        assert_eq!(
            fillings,
            vec![
                Filling {
                    meridian: 1.0,
                    longitude: 0.0
                },
                Filling {
                    meridian: -2.0,
                    longitude: 3.5
                },
            ]
        );
    }

    #[test]
    fn test_split_bad_coefficient() {
        assert!(split_filling_info("K6a3(1-,0)").is_err());
    }
}
