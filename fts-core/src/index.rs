//! The two indexing phases: loading documents from the dump and building
//! the inverted index.
//!
//! Both phases are checkpoint-guarded: a namespace that already has a last
//! key was fully written by an earlier run, so the phase is skipped and the
//! stored checkpoint is logged instead. The checkpoint meta is written only
//! after the namespace commit succeeds.

use crate::dump::DumpReader;
use crate::postings;
use crate::progress;
use crate::store::{Namespace, Store};
use crate::tokenizer::tokenize;
use crate::{DbStateMeta, DocId, Document};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

pub const DOCS_META: &str = "docsMeta";
pub const INDEX_META: &str = "indexMeta";

/// Stream the gzipped XML dump into the docs namespace, assigning dense ids
/// in dump order. All documents land in one atomic batch.
pub fn load_documents(store: &Store, path: impl AsRef<Path>) -> Result<()> {
    if store.last_value(Namespace::Docs)?.is_some() {
        let meta = read_meta(store, DOCS_META)?;
        tracing::info!(
            count = meta.count,
            last_updated_at = %meta.last_updated_at,
            "documents already loaded, skipping"
        );
        return Ok(());
    }

    let spinner = progress::spinner("loading documents...");
    let start = Instant::now();

    let mut reader = DumpReader::open(path)?;
    let mut batch = store.new_batch();
    let mut id: DocId = 0;
    while let Some(raw) = reader.next_doc()? {
        let doc = Document {
            id,
            title: raw.title,
            url: raw.url,
            text: raw.text,
            rank: 0.0,
        };
        match serde_json::to_vec(&doc) {
            Ok(encoded) => batch.put(Namespace::Docs, doc.id.to_string(), encoded),
            Err(err) => tracing::warn!(id = doc.id, %err, "failed to encode document, skipping"),
        }
        id += 1;
    }

    let count = store.commit(batch)?;
    write_meta(store, DOCS_META, count)?;

    spinner.finish_and_clear();
    tracing::info!(count, elapsed = ?start.elapsed(), "documents loaded");
    Ok(())
}

/// Scan every stored document, accumulate the inverted index in memory and
/// flush it in one bulk write. The map is the memory peak of the whole
/// process; it is bounded by the distinct-token set of the corpus.
pub fn build_index(store: &Store) -> Result<()> {
    if store.last_value(Namespace::Index)?.is_some() {
        let meta = read_meta(store, INDEX_META)?;
        tracing::info!(
            tokens = meta.count,
            last_updated_at = %meta.last_updated_at,
            "index already built, skipping"
        );
        return Ok(());
    }

    let spinner = progress::spinner("building index...");
    let start = Instant::now();

    let mut inverted: HashMap<String, Vec<DocId>> = HashMap::new();
    store.scan(Namespace::Docs, |key, value| {
        let doc: Document = match serde_json::from_slice(value) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(key, %err, "failed to decode document, skipping");
                return Ok(());
            }
        };
        for token in tokenize(&doc.text) {
            let ids = inverted.entry(token).or_default();
            // ids are appended in scan order, so a repeat within this
            // document can only be the last entry
            if ids.last() == Some(&doc.id) {
                continue;
            }
            ids.push(doc.id);
        }
        Ok(())
    })?;

    let mut batch = store.new_batch();
    for (token, ids) in &inverted {
        batch.put(
            Namespace::Index,
            token.as_str(),
            postings::encode(ids).into_bytes(),
        );
    }
    let count = store.commit(batch)?;
    write_meta(store, INDEX_META, count)?;

    spinner.finish_and_clear();
    tracing::info!(tokens = count, elapsed = ?start.elapsed(), "index built");
    Ok(())
}

fn write_meta(store: &Store, field: &str, count: u64) -> Result<()> {
    let meta = DbStateMeta {
        last_updated_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .context("failed to format checkpoint timestamp")?,
        count,
    };
    store.put(Namespace::Meta, field, &serde_json::to_vec(&meta)?)
}

/// A non-empty namespace without its checkpoint means the store is
/// inconsistent; surfacing the error aborts startup.
fn read_meta(store: &Store, field: &str) -> Result<DbStateMeta> {
    let raw = store
        .get(Namespace::Meta, field)?
        .with_context(|| format!("meta record {field} missing for a non-empty namespace"))?;
    Ok(serde_json::from_slice(&raw)?)
}
