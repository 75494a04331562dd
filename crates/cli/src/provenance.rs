use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// What produced an artifact.
#[derive(Serialize)]
pub struct Payload {
    /// File path or `example:<name>`.
    pub source: String,
    pub command: &'static str,
    pub params: Value,
}

impl Payload {
    pub fn new(source: String, command: &'static str, params: Value) -> Self {
        Self {
            source,
            command,
            params,
        }
    }
}

#[derive(Serialize)]
struct Sidecar<'a> {
    toric_cy_version: &'static str,
    #[serde(flatten)]
    payload: &'a Payload,
    output: String,
}

/// Write `<stem>.provenance.json` next to `artifact`.
pub fn write_sidecar(artifact: &Path, payload: Payload) -> Result<PathBuf> {
    let path = provenance_path(artifact);
    let doc = Sidecar {
        toric_cy_version: toric_cy::VERSION,
        payload: &payload,
        output: artifact.to_string_lossy().into_owned(),
    };
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn provenance_path(artifact: &Path) -> PathBuf {
    let mut name = artifact
        .file_stem()
        .map_or_else(|| "artifact".into(), |s| s.to_os_string());
    name.push(".provenance.json");
    artifact.with_file_name(name)
}
