use std::{collections::HashMap, fs, path::Path};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");
const BUILTIN_CONTENTS: &str = include_str!("../data/contents.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar: String,
}

/// One entry of the gist catalog. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GistRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub language: String,
    pub stars: u32,
    pub forks: u32,
    pub updated_at: DateTime<Utc>,
    pub owner: Owner,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GistFile {
    pub name: String,
    pub language: String,
    pub content: String,
}

/// A catalog JSON entry. Custom catalogs may inline the gist's files.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    #[serde(flatten)]
    record: GistRecord,
    #[serde(default)]
    files: Option<Vec<GistFile>>,
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    id: String,
    files: Vec<GistFile>,
}

#[derive(Debug, Deserialize)]
struct ContentTable {
    #[serde(default)]
    gist: Vec<ContentEntry>,
}

/// The gist catalog plus the file contents keyed by gist id.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<GistRecord>,
    contents: HashMap<String, Vec<GistFile>>,
}

impl Catalog {
    pub fn new(records: Vec<GistRecord>, contents: HashMap<String, Vec<GistFile>>) -> Self {
        Self { records, contents }
    }

    pub fn builtin() -> Result<Self> {
        let (records, mut contents) = parse_records(BUILTIN_CATALOG).context("embedded catalog is invalid")?;
        contents.extend(parse_contents(BUILTIN_CONTENTS).context("embedded contents are invalid")?);
        Ok(Self::new(records, contents))
    }

    /// Loads a catalog from a JSON file. Only the `files` listed inline on
    /// each entry are viewable; entries without them have no content.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let (records, contents) = parse_records(&raw)
            .with_context(|| format!("failed to parse catalog {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            records = records.len(),
            with_files = contents.len(),
            "Loaded catalog"
        );
        Ok(Self::new(records, contents))
    }

    pub fn records(&self) -> &[GistRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&GistRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Ordered files of a gist, or `None` when no content record exists.
    pub fn files(&self, id: &str) -> Option<&[GistFile]> {
        self.contents.get(id).map(Vec::as_slice)
    }
}

fn parse_records(raw: &str) -> Result<(Vec<GistRecord>, HashMap<String, Vec<GistFile>>)> {
    let entries: Vec<CatalogEntry> = serde_json::from_str(raw)?;
    let mut records = Vec::with_capacity(entries.len());
    let mut contents = HashMap::new();
    for CatalogEntry { record, files } in entries {
        if records.iter().any(|r: &GistRecord| r.id == record.id) {
            anyhow::bail!("duplicate gist id {:?}", record.id);
        }
        if let Some(files) = files {
            contents.insert(record.id.clone(), files);
        }
        records.push(record);
    }
    Ok((records, contents))
}

fn parse_contents(raw: &str) -> Result<HashMap<String, Vec<GistFile>>> {
    let table: ContentTable = toml::from_str(raw)?;
    Ok(table.gist.into_iter().map(|entry| (entry.id, entry.files)).collect())
}
