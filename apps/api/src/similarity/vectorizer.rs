//! TF-IDF vectorizer over a per-call corpus.
//!
//! Term counting goes through `tf_idf_vectorizer::TokenFrequency`; the
//! weighting convention is fixed so cosine rankings are reproducible:
//! - tokens: lower-cased runs of alphanumeric/`_` chars, at least 2 chars long
//! - tf: raw term count in the document
//! - df: number of documents containing the term
//! - idf: `ln((1 + n) / (1 + df)) + 1`
//! - every row is L2-normalized (all-zero rows stay zero)

use std::collections::BTreeSet;

use tf_idf_vectorizer::TokenFrequency;

/// Dense TF-IDF matrix; `rows[i]` corresponds to the i-th input document.
#[derive(Debug, Clone, PartialEq)]
pub struct TfIdfMatrix {
    /// Vocabulary terms in column order (sorted).
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

/// Splits text into lower-cased word tokens of two or more characters.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Number of documents that would produce at least one token.
pub fn informative_documents<S: AsRef<str>>(documents: &[S]) -> usize {
    documents
        .iter()
        .filter(|d| !tokenize(d.as_ref()).is_empty())
        .count()
}

/// Builds the TF-IDF matrix for `documents`, preserving their order.
/// The vocabulary is derived from this corpus alone.
pub fn vectorize<S: AsRef<str>>(documents: &[S]) -> TfIdfMatrix {
    let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

    // per-document term counts, plus one count per document a term occurs in
    let mut doc_freq = TokenFrequency::new();
    let mut vocabulary: BTreeSet<&str> = BTreeSet::new();
    let term_counts: Vec<TokenFrequency> = tokenized
        .iter()
        .map(|tokens| {
            let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
            let mut counts = TokenFrequency::new();
            counts.add_tokens(&tokens);

            let distinct: BTreeSet<&str> = tokens.iter().copied().collect();
            doc_freq.add_tokens(&distinct.iter().copied().collect::<Vec<_>>());
            vocabulary.extend(distinct);
            counts
        })
        .collect();

    let n = documents.len() as f64;
    let vocabulary: Vec<String> = vocabulary.into_iter().map(str::to_string).collect();
    let idf: Vec<f64> = vocabulary
        .iter()
        .map(|term| {
            let df = doc_freq.token_count(term) as f64;
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        })
        .collect();

    let rows = term_counts
        .iter()
        .map(|counts| {
            let mut row: Vec<f64> = vocabulary
                .iter()
                .zip(&idf)
                .map(|(term, weight)| counts.token_count(term) as f64 * weight)
                .collect();
            l2_normalize(&mut row);
            row
        })
        .collect();

    TfIdfMatrix { vocabulary, rows }
}

fn l2_normalize(row: &mut [f64]) {
    let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}
