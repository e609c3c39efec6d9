//! Query evaluation: posting retrieval, combination, ranking, caching and
//! page slicing.

use crate::postings;
use crate::store::{Namespace, Store};
use crate::tokenizer::tokenize;
use crate::{DocId, Document};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub query: String,
    pub exact: bool,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMeta {
    pub total_results_count: usize,
    pub current_page_count: usize,
    pub time_taken: String,
    pub search_query: String,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResults {
    pub meta: SearchMeta,
    pub data: Vec<Document>,
}

pub struct Engine {
    store: Arc<Store>,
}

impl Engine {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Answer a query. The full ranked list is computed (or read back from
    /// the result cache) and the requested page is sliced out of it; a page
    /// past the end yields an empty page, never an error.
    pub fn search(&self, params: &SearchParams) -> Result<SearchResults> {
        let start = Instant::now();

        let docs = match self.cached_results(&params.query, params.exact)? {
            Some(docs) => docs,
            None => {
                let docs = self.evaluate(&params.query, params.exact)?;
                self.cache_results(&params.query, params.exact, &docs);
                docs
            }
        };

        let total = docs.len();
        let page = params.page.max(1);
        let from = (page - 1).saturating_mul(params.limit).min(total);
        let to = from.saturating_add(params.limit).min(total);
        let data: Vec<Document> = docs[from..to].to_vec();

        Ok(SearchResults {
            meta: SearchMeta {
                total_results_count: total,
                current_page_count: data.len(),
                time_taken: format!("{:.9} seconds", start.elapsed().as_secs_f64()),
                search_query: params.query.clone(),
                page,
                limit: params.limit,
            },
            data,
        })
    }

    /// Combine posting lists, hydrate the documents and rank them.
    fn evaluate(&self, query: &str, exact: bool) -> Result<Vec<Document>> {
        let query_tokens = tokenize(query);

        let mut combined: Option<Vec<DocId>> = None;
        for token in &query_tokens {
            let Some(raw) = self.store.get(Namespace::Index, token)? else {
                continue;
            };
            let ids = postings::decode(std::str::from_utf8(&raw)?)?;
            combined = Some(match combined {
                None => ids,
                Some(acc) if exact => intersect(&acc, &ids),
                Some(mut acc) => {
                    acc.extend(ids);
                    acc
                }
            });
        }

        // hydrate each distinct id once, in order of first appearance
        let mut seen: HashSet<DocId> = HashSet::new();
        let mut docs = Vec::new();
        for id in combined.unwrap_or_default() {
            if !seen.insert(id) {
                continue;
            }
            match self.document(id)? {
                Some(doc) => docs.push(doc),
                None => tracing::warn!(id, "posting list references a missing document"),
            }
        }

        if exact {
            // every hit matched every token
            for doc in &mut docs {
                doc.rank = 1.0;
            }
            return Ok(docs);
        }
        Ok(rank(docs, &query_tokens))
    }

    fn document(&self, id: DocId) -> Result<Option<Document>> {
        let Some(raw) = self.store.get(Namespace::Docs, &id.to_string())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    fn cached_results(&self, query: &str, exact: bool) -> Result<Option<Vec<Document>>> {
        let Some(raw) = self.store.get(Namespace::Results, &cache_key(query, exact))? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    /// A failed write only costs us the cache entry, never the request.
    fn cache_results(&self, query: &str, exact: bool, docs: &[Document]) {
        let encoded = match serde_json::to_vec(docs) {
            Ok(encoded) => encoded,
            Err(err) => {
                tracing::warn!(%err, "failed to encode search results for caching");
                return;
            }
        };
        if let Err(err) = self
            .store
            .put(Namespace::Results, &cache_key(query, exact), &encoded)
        {
            tracing::warn!(%err, "failed to cache search results");
        }
    }
}

/// Queries that differ only in case share an entry; queries that analyze
/// identically but differ in punctuation or spacing do not.
fn cache_key(query: &str, exact: bool) -> String {
    format!("{}:{}", query.to_lowercase(), if exact { "1" } else { "0" })
}

/// Set intersection keeping the order of first appearance in `a`.
fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let members: HashSet<DocId> = b.iter().copied().collect();
    a.iter().copied().filter(|id| members.contains(id)).collect()
}

/// Score each document by the fraction of query tokens found in its text,
/// then order by descending score. The sort is stable, so equal scores keep
/// hydration order.
fn rank(mut docs: Vec<Document>, query_tokens: &[String]) -> Vec<Document> {
    if query_tokens.is_empty() {
        return docs;
    }
    for doc in &mut docs {
        let doc_tokens: HashSet<String> = tokenize(&doc.text).into_iter().collect();
        let matched = query_tokens
            .iter()
            .filter(|token| doc_tokens.contains(token.as_str()))
            .count();
        doc.rank = matched as f64 / query_tokens.len() as f64;
    }
    docs.sort_by(|a, b| {
        b.rank
            .partial_cmp(&a.rank)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    docs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_key_lowercases_and_tags_mode() {
        assert_eq!(cache_key("Dogs", true), "dogs:1");
        assert_eq!(cache_key("Dogs", false), "dogs:0");
        // lexically distinct queries stay distinct entries
        assert_ne!(cache_key("dogs ", false), cache_key("dogs", false));
    }

    #[test]
    fn intersect_keeps_first_list_order() {
        assert_eq!(intersect(&[3, 1, 2], &[2, 3]), vec![3, 2]);
        assert!(intersect(&[1], &[2]).is_empty());
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let doc = |id, text: &str| Document {
            id,
            title: String::new(),
            url: String::new(),
            text: text.to_string(),
            rank: 0.0,
        };
        let tokens = vec!["cat".to_string(), "dog".to_string()];
        let ranked = rank(
            vec![doc(0, "dogs bark"), doc(1, "cats and dogs"), doc(2, "cats purr")],
            &tokens,
        );
        let order: Vec<DocId> = ranked.iter().map(|d| d.id).collect();
        assert_eq!(order, vec![1, 0, 2]);
        assert_eq!(ranked[0].rank, 1.0);
        assert_eq!(ranked[1].rank, 0.5);
        assert_eq!(ranked[2].rank, 0.5);
    }
}
