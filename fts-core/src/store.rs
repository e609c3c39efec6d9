//! Typed façade over the embedded redb store.
//!
//! Four logically separate keyspaces share one database file: `meta` holds
//! the load/build checkpoints, `index` the inverted index (token -> posting
//! list), `docs` the JSON-encoded documents keyed by decimal id, and
//! `results` the search-result cache. redb tables are ordered B-trees, so
//! scans run in lexicographic byte order of the keys.

use anyhow::{Context, Result};
use redb::{Builder, Database, ReadableTable, TableDefinition};
use std::path::Path;

const META: TableDefinition<&str, &[u8]> = TableDefinition::new("meta");
const INDEX: TableDefinition<&str, &[u8]> = TableDefinition::new("index");
const DOCS: TableDefinition<&str, &[u8]> = TableDefinition::new("docs");
const RESULTS: TableDefinition<&str, &[u8]> = TableDefinition::new("results");

const DB_FILE: &str = "fts.redb";

/// Page-cache budget handed to redb, in bytes.
const CACHE_SIZE: usize = 3 << 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    Meta,
    Index,
    Docs,
    Results,
}

impl Namespace {
    const ALL: [Namespace; 4] = [
        Namespace::Meta,
        Namespace::Index,
        Namespace::Docs,
        Namespace::Results,
    ];

    fn table(self) -> TableDefinition<'static, &'static str, &'static [u8]> {
        match self {
            Namespace::Meta => META,
            Namespace::Index => INDEX,
            Namespace::Docs => DOCS,
            Namespace::Results => RESULTS,
        }
    }
}

/// Buffered puts applied atomically by [`Store::commit`].
#[derive(Default)]
pub struct WriteBatch {
    entries: Vec<(Namespace, String, Vec<u8>)>,
}

impl WriteBatch {
    pub fn put(&mut self, ns: Namespace, key: impl Into<String>, value: Vec<u8>) {
        self.entries.push((ns, key.into(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct Store {
    db: Database,
}

impl Store {
    /// Open (or create) the database under `data_dir` and make sure every
    /// namespace exists, so later reads never hit a missing table.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;
        let path = data_dir.join(DB_FILE);

        let db = Builder::new()
            .set_cache_size(CACHE_SIZE)
            .create(&path)
            .with_context(|| format!("failed to open store at {}", path.display()))?;

        let txn = db.begin_write()?;
        for ns in Namespace::ALL {
            txn.open_table(ns.table())?;
        }
        txn.commit()?;

        Ok(Self { db })
    }

    pub fn get(&self, ns: Namespace, key: &str) -> Result<Option<Vec<u8>>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(ns.table())?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    pub fn put(&self, ns: Namespace, key: &str, value: &[u8]) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(ns.table())?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn new_batch(&self) -> WriteBatch {
        WriteBatch::default()
    }

    /// Apply every buffered put in a single write transaction. Returns the
    /// number of entries written.
    pub fn commit(&self, batch: WriteBatch) -> Result<u64> {
        let count = batch.len() as u64;
        let txn = self.db.begin_write()?;
        {
            let mut meta = txn.open_table(META)?;
            let mut index = txn.open_table(INDEX)?;
            let mut docs = txn.open_table(DOCS)?;
            let mut results = txn.open_table(RESULTS)?;
            for (ns, key, value) in &batch.entries {
                let table = match ns {
                    Namespace::Meta => &mut meta,
                    Namespace::Index => &mut index,
                    Namespace::Docs => &mut docs,
                    Namespace::Results => &mut results,
                };
                table.insert(key.as_str(), value.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(count)
    }

    /// Full scan of a namespace in lexicographic key order.
    pub fn scan(
        &self,
        ns: Namespace,
        mut f: impl FnMut(&str, &[u8]) -> Result<()>,
    ) -> Result<()> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(ns.table())?;
        for entry in table.iter()? {
            let (key, value) = entry?;
            f(key.value(), value.value())?;
        }
        Ok(())
    }

    /// Value stored under the greatest key, or `None` when the namespace is
    /// empty. A non-empty answer is the signal that the phase writing this
    /// namespace already completed.
    pub fn last_value(&self, ns: Namespace) -> Result<Option<Vec<u8>>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(ns.table())?;
        let last = table.last()?.map(|(_, guard)| guard.value().to_vec());
        Ok(last)
    }

    /// Drop every entry in a namespace by deleting and recreating its table.
    pub fn drop_namespace(&self, ns: Namespace) -> Result<()> {
        let txn = self.db.begin_write()?;
        txn.delete_table(ns.table())?;
        txn.open_table(ns.table())?;
        txn.commit()?;
        Ok(())
    }
}
