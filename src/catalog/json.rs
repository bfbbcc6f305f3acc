//! JSON catalog loader.
//!
//! Reads catalog sources into a [`Catalog`], validating their structure and
//! reporting every problem with the scheme and pattern it belongs to.
//!
//! # Feature
//!
//! Requires the `json` feature.
//!
//! # Source format
//!
//! ```json
//! {
//!   "scheme": "elo",
//!   "brand": "Elo",
//!   "type": "credit",
//!   "countries": ["BR"],
//!   "priorityOver": ["aura"],
//!   "patterns": [
//!     { "bin": "^(506699|5067[0-6]\\d)", "length": 16, "luhn": true, "cvvLength": 3 }
//!   ],
//!   "bins": [
//!     { "bin": "506699", "type": "debit", "issuer": "Some Bank", "countries": ["BR"] }
//!   ]
//! }
//! ```
//!
//! A file holds either one source object or an array of them. `length` is a
//! number or an array of numbers. Compiled catalogs that carry extra fields
//! (`number`, `cvv`, `metadata`) load unchanged since unknown fields are
//! ignored.
//!
//! # Directory layout
//!
//! [`JsonCatalogLoader::from_dir`] reads every `*.json` file of a directory
//! in name order. A sub-directory is one scheme split over several files: the
//! first file with patterns is the base, patterns and BIN records of all files
//! are merged (first occurrence wins), and countries are unioned.

use super::{BinPattern, Brand, Catalog, CardType, FineBinRecord};
use crate::error::{CatalogError, CatalogIssue};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;

/// JSON catalog loader.
pub struct JsonCatalogLoader;

impl JsonCatalogLoader {
    /// Loads a catalog from a file or a source directory.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    /// Loads a catalog from a JSON file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use card_identifier::catalog::JsonCatalogLoader;
    ///
    /// let catalog = JsonCatalogLoader::from_file("cards-detailed.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let catalog = Self::parse(&content)?;
        tracing::info!(path = %path.display(), brands = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Loads a catalog from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Catalog, CatalogError> {
        let mut content = String::new();
        reader.read_to_string(&mut content)?;
        Self::parse(&content)
    }

    /// Loads a catalog from a JSON string.
    pub fn parse(json: &str) -> Result<Catalog, CatalogError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| CatalogError::Parse(format!("JSON parse error: {}", e)))?;

        let sources = match value {
            Value::Array(items) => items,
            Value::Object(_) => vec![value],
            _ => {
                return Err(CatalogError::Parse(
                    "Invalid JSON format: expected array or object".to_string(),
                ))
            }
        };

        let named = sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| {
                let name = source
                    .get("scheme")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("source {}", i));
                (name, source)
            })
            .collect();

        build(named)
    }

    /// Loads a catalog from a directory of source files.
    pub fn from_dir<P: AsRef<Path>>(path: P) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let mut entries: Vec<_> = fs::read_dir(path)?.collect::<Result<_, _>>()?;
        entries.sort_by_key(|e| {
            let name = e.file_name().to_string_lossy().into_owned();
            name.strip_suffix(".json").map(str::to_string).unwrap_or(name)
        });

        let mut named = Vec::new();
        for entry in entries {
            let entry_path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();

            if entry_path.is_dir() {
                let files = read_json_files(&entry_path)?;
                if files.is_empty() {
                    continue;
                }
                let sources = files
                    .into_iter()
                    .map(|(file, content)| parse_source(&format!("{}/{}", name, file), &content))
                    .collect::<Result<Vec<_>, _>>()?;
                named.push((name.clone(), merge_sources(sources, &name)));
            } else if name.ends_with(".json") {
                let content = fs::read_to_string(&entry_path)?;
                named.push((name.clone(), parse_source(&name, &content)?));
            }
        }

        let catalog = build(named)?;
        tracing::info!(path = %path.display(), brands = catalog.len(), "catalog loaded");
        Ok(catalog)
    }
}

/// Reads all `*.json` files of a directory, sorted by name.
fn read_json_files(dir: &Path) -> Result<Vec<(String, String)>, CatalogError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".json") && entry.path().is_file() {
            files.push((name, fs::read_to_string(entry.path())?));
        }
    }
    files.sort();
    Ok(files)
}

fn parse_source(name: &str, content: &str) -> Result<Value, CatalogError> {
    serde_json::from_str(content)
        .map_err(|e| CatalogError::Parse(format!("{}: JSON parse error: {}", name, e)))
}

/// Merges the files of a split scheme directory into one source object.
fn merge_sources(mut sources: Vec<Value>, scheme_name: &str) -> Value {
    if sources.len() == 1 {
        return sources.remove(0);
    }

    let has_patterns =
        |s: &Value| s.get("patterns").and_then(Value::as_array).is_some_and(|p| !p.is_empty());
    let base = sources.iter().find(|s| has_patterns(s)).unwrap_or(&sources[0]);

    let mut merged = Map::new();
    merged.insert(
        "scheme".to_string(),
        base.get("scheme")
            .cloned()
            .unwrap_or_else(|| Value::String(scheme_name.to_string())),
    );
    for key in ["brand", "type", "priorityOver"] {
        if let Some(v) = base.get(key) {
            merged.insert(key.to_string(), v.clone());
        }
    }

    let mut seen_patterns = HashSet::new();
    let patterns: Vec<Value> = sources
        .iter()
        .filter_map(|s| s.get("patterns").and_then(Value::as_array))
        .flatten()
        .filter(|p| seen_patterns.insert(p.to_string()))
        .cloned()
        .collect();
    merged.insert("patterns".to_string(), Value::Array(patterns));

    let mut seen_bins = HashSet::new();
    let bins: Vec<Value> = sources
        .iter()
        .filter_map(|s| s.get("bins").and_then(Value::as_array))
        .flatten()
        .filter(|b| seen_bins.insert(b.get("bin").map(Value::to_string).unwrap_or_default()))
        .cloned()
        .collect();
    if !bins.is_empty() {
        merged.insert("bins".to_string(), Value::Array(bins));
    }

    let mut countries: Vec<Value> = Vec::new();
    for source in sources.iter() {
        for country in source.get("countries").and_then(Value::as_array).into_iter().flatten() {
            if !countries.contains(country) {
                countries.push(country.clone());
            }
        }
    }
    merged.insert("countries".to_string(), Value::Array(countries));

    Value::Object(merged)
}

/// Internal structure for deserializing a brand source.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawSource {
    #[serde(default, alias = "name")]
    scheme: Option<String>,

    #[serde(default, alias = "displayName")]
    brand: Option<String>,

    #[serde(default, rename = "type")]
    card_type: Option<String>,

    #[serde(default)]
    countries: Option<Vec<String>>,

    #[serde(default)]
    priority_over: Option<Vec<String>>,

    #[serde(default)]
    patterns: Option<Vec<Value>>,

    #[serde(default)]
    bins: Option<Vec<Value>>,
}

/// Internal structure for deserializing a fine BIN record.
#[derive(Debug, Deserialize)]
struct RawBin {
    bin: String,

    #[serde(default, rename = "type")]
    card_type: Option<String>,

    #[serde(default)]
    category: Option<String>,

    #[serde(default, alias = "bank")]
    issuer: Option<String>,

    #[serde(default)]
    countries: Option<Vec<String>>,
}

impl RawBin {
    fn into_record(self) -> FineBinRecord {
        FineBinRecord {
            bin: self.bin,
            card_type: self.card_type,
            category: self.category,
            issuer: self.issuer,
            countries: self.countries,
        }
    }
}

/// Converts every source, collecting all structural issues before failing.
fn build(named: Vec<(String, Value)>) -> Result<Catalog, CatalogError> {
    let mut issues = Vec::new();
    let mut brands = Vec::with_capacity(named.len());

    for (name, source) in named {
        if let Some(brand) = brand_from_source(&name, source, &mut issues) {
            brands.push(brand);
        }
    }

    if !issues.is_empty() {
        return Err(CatalogError::Invalid(issues));
    }

    Catalog::new(brands)
}

fn brand_from_source(name: &str, source: Value, issues: &mut Vec<CatalogIssue>) -> Option<Brand> {
    let raw: RawSource = match serde_json::from_value(source) {
        Ok(raw) => raw,
        Err(e) => {
            issues.push(CatalogIssue::new(name, format!("malformed source: {}", e)));
            return None;
        }
    };
    let before = issues.len();

    let scheme = match raw.scheme {
        Some(s) if !s.is_empty() => s,
        _ => {
            issues.push(CatalogIssue::new(name, "missing required field \"scheme\""));
            name.to_string()
        }
    };
    let display_name = raw.brand.unwrap_or_else(|| {
        issues.push(CatalogIssue::new(&scheme, "missing required field \"brand\""));
        String::new()
    });

    let card_type = match raw.card_type.as_deref() {
        None => CardType::Credit,
        Some(s) => CardType::parse(s).unwrap_or_else(|| {
            tracing::warn!(scheme = %scheme, card_type = s, "type should be \"credit\" or \"debit\"");
            CardType::Credit
        }),
    };

    let mut patterns = Vec::new();
    match raw.patterns {
        Some(values) if !values.is_empty() => {
            for (i, value) in values.iter().enumerate() {
                let source = format!("{}[pattern {}]", scheme, i);
                match pattern_from_value(value, &source) {
                    Ok(p) => patterns.push(p),
                    Err(mut found) => issues.append(&mut found),
                }
            }
        }
        _ => issues.push(CatalogIssue::new(&scheme, "\"patterns\" must be a non-empty array")),
    }

    let mut fine_bins = Vec::new();
    for (i, value) in raw.bins.unwrap_or_default().into_iter().enumerate() {
        match serde_json::from_value::<RawBin>(value) {
            Ok(bin) => fine_bins.push(bin.into_record()),
            Err(e) => issues.push(CatalogIssue::new(
                format!("{}[bin {}]", scheme, i),
                format!("BIN entry missing or invalid \"bin\" field: {}", e),
            )),
        }
    }

    if issues.len() > before {
        return None;
    }

    Some(Brand {
        scheme,
        display_name,
        card_type,
        patterns,
        countries: raw.countries.unwrap_or_default(),
        priority_over: raw.priority_over.unwrap_or_default(),
        fine_bins,
    })
}

/// Validates and compiles one pattern object, returning every issue found.
fn pattern_from_value(value: &Value, source: &str) -> Result<BinPattern, Vec<CatalogIssue>> {
    let mut issues = Vec::new();
    let issue = |message: &str| CatalogIssue::new(source, message);

    if !value.is_object() {
        return Err(vec![issue("pattern must be an object")]);
    }

    let bin = match value.get("bin") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => {
            issues.push(issue("pattern missing \"bin\" field"));
            None
        }
    };

    let lengths = match value.get("length").or_else(|| value.get("lengths")) {
        None => {
            issues.push(issue("pattern missing \"length\" field"));
            None
        }
        Some(Value::Array(items)) => {
            let parsed: Option<Vec<usize>> = items.iter().map(as_positive).collect();
            if parsed.is_none() {
                issues.push(issue("pattern \"length\" must be a number or array of numbers"));
            }
            parsed
        }
        Some(v) => match as_positive(v) {
            Some(n) => Some(vec![n]),
            None => {
                issues.push(issue("pattern \"length\" must be a number or array of numbers"));
                None
            }
        },
    };

    let luhn = match value.get("luhn") {
        Some(Value::Bool(b)) => Some(*b),
        _ => {
            issues.push(issue("pattern missing or invalid \"luhn\" field (must be boolean)"));
            None
        }
    };

    let cvv_length = match value.get("cvvLength").and_then(as_positive) {
        Some(n) => Some(n),
        None => {
            issues.push(issue(
                "pattern missing or invalid \"cvvLength\" field (must be a positive number)",
            ));
            None
        }
    };

    match (bin, lengths, luhn, cvv_length) {
        (Some(bin), Some(lengths), Some(luhn), Some(cvv_length)) if issues.is_empty() => {
            BinPattern::new(bin, &lengths, luhn, cvv_length)
                .map_err(|e| vec![CatalogIssue::new(source, e.message)])
        }
        _ => Err(issues),
    }
}

fn as_positive(value: &Value) -> Option<usize> {
    value
        .as_u64()
        .filter(|&n| n > 0)
        .and_then(|n| usize::try_from(n).ok())
}
