//! Loading route record sets from a TOML or JSON file.
//!
//! Mirrors the dispatch-on-extension convention used for the rest of this
//! codebase's configuration: `.toml` files are the default, `.json` is
//! accepted too, and anything else is a load-time error rather than a
//! silent misparse.

use crate::record::Record;
use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawRecord<V> {
    pattern: String,
    value: V,
}

#[derive(Debug, Deserialize)]
struct RecordSet<V> {
    routes: Vec<RawRecord<V>>,
}

/// Load a list of `Record<V>` from `path`. The file format is
/// `{ routes = [ { pattern = "...", value = ... }, ... ] }`, with `value`
/// deserialized as whatever `V` the caller's engine is built over.
pub fn load_records<V: DeserializeOwned>(path: &Path) -> Result<Vec<Record<V>>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading route file {}", path.display()))?;

    let set: RecordSet<V> = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("parsing {} as TOML", path.display()))?,
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("parsing {} as JSON", path.display()))?,
        Some(ext) => bail!("unsupported route file format: .{ext}, use .toml or .json"),
        None => bail!("route file {} has no extension, use .toml or .json", path.display()),
    };

    tracing::info!(routes = set.routes.len(), path = %path.display(), "loaded route set");
    Ok(set
        .routes
        .into_iter()
        .map(|r| Record::new(r.pattern, r.value))
        .collect())
}
