use log::{info, warn};
use std::collections::HashMap;
use std::path::Path;

/// A static file held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub content_type: &'static str,
    pub content: Vec<u8>,
}

/// Frontend files, loaded once at startup and read-only afterwards.
#[derive(Debug, Default)]
pub struct AssetStore {
    files: HashMap<String, Asset>,
}

pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext {
        "html" => "text/html",
        "js" | "mjs" => "text/javascript",
        "css" => "text/css",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "json" => "application/json",
        "woff2" => "application/font-woff2",
        _ => "application/octet-stream",
    }
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every regular file directly inside `dir`. A missing directory
    /// gives an empty store; the API keeps working without a frontend.
    pub fn load_dir(dir: &Path) -> std::io::Result<Self> {
        let mut store = Self::new();
        if !dir.is_dir() {
            warn!("Asset directory {} not found, serving API only", dir.display());
            return Ok(store);
        }

        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let content = std::fs::read(entry.path())?;
            store.insert(&name, content);
        }
        info!("Loaded {} assets from {}", store.len(), dir.display());
        Ok(store)
    }

    pub fn insert(&mut self, name: &str, content: Vec<u8>) {
        let asset = Asset {
            content_type: content_type_for(name),
            content,
        };
        self.files.insert(name.trim_start_matches('/').to_string(), asset);
    }

    /// Looks up a request path; `/` maps to `index.html`.
    pub fn get(&self, path: &str) -> Option<&Asset> {
        let name = path.trim_start_matches('/');
        let name = if name.is_empty() { "index.html" } else { name };
        self.files.get(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
