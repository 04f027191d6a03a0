//! Bag-of-words text vectorizers (term counts and TF-IDF) restored from a
//! fitted JSON artifact.

use std::collections::{BTreeMap, HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Deserializer};

use super::{FeatureVector, Vectorizer};

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorizerKind {
    Count,
    Tfidf,
}

impl VectorizerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VectorizerKind::Count => "count",
            VectorizerKind::Tfidf => "tfidf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// On-disk form of a fitted vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerSpec {
    pub kind: VectorizerKind,
    pub vocabulary: HashMap<String, usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    #[serde(default)]
    pub stop_words: Vec<String>,
    #[serde(default)]
    pub sublinear_tf: bool,
    /// Absent means "kind default"; an explicit `null` disables normalisation.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub norm: Option<Option<Norm>>,
    #[serde(default)]
    pub binary: bool,
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone)]
enum Weighting {
    Count,
    Tfidf { idf: Vec<f64>, sublinear_tf: bool },
}

/// A ready-to-use vectorizer: compiled token pattern, vocabulary lookup and
/// term weighting.
#[derive(Debug, Clone)]
pub struct TextVectorizer {
    kind: VectorizerKind,
    vocabulary: HashMap<String, usize>,
    token_pattern: Regex,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    weighting: Weighting,
    norm: Option<Norm>,
    binary: bool,
}

impl TextVectorizer {
    /// Validate a deserialized spec. The error string describes the first
    /// inconsistency found.
    pub fn from_spec(spec: VectorizerSpec) -> Result<Self, String> {
        let dim = spec.vocabulary.len();
        if dim == 0 {
            return Err("vocabulary is empty".into());
        }

        let mut seen = vec![false; dim];
        for (term, &idx) in &spec.vocabulary {
            if idx >= dim {
                return Err(format!(
                    "vocabulary index {idx} for term {term:?} is out of range for {dim} terms"
                ));
            }
            if std::mem::replace(&mut seen[idx], true) {
                return Err(format!("vocabulary index {idx} is assigned to more than one term"));
            }
        }

        let (min_n, max_n) = spec.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(format!("invalid ngram_range ({min_n}, {max_n})"));
        }

        let token_pattern = Regex::new(&spec.token_pattern)
            .map_err(|e| format!("token_pattern does not compile: {e}"))?;
        if token_pattern.captures_len() > 2 {
            return Err("token_pattern may contain at most one capturing group".into());
        }

        let weighting = match spec.kind {
            VectorizerKind::Count => Weighting::Count,
            VectorizerKind::Tfidf => {
                let idf = spec
                    .idf
                    .ok_or_else(|| "tfidf vectorizer is missing idf weights".to_string())?;
                if idf.len() != dim {
                    return Err(format!(
                        "idf has {} weights but the vocabulary has {dim} terms",
                        idf.len()
                    ));
                }
                Weighting::Tfidf {
                    idf,
                    sublinear_tf: spec.sublinear_tf,
                }
            }
        };

        let norm = spec.norm.unwrap_or(match spec.kind {
            VectorizerKind::Count => None,
            VectorizerKind::Tfidf => Some(Norm::L2),
        });

        let stop_words = spec
            .stop_words
            .into_iter()
            .map(|w| if spec.lowercase { w.to_lowercase() } else { w })
            .collect();

        Ok(Self {
            kind: spec.kind,
            vocabulary: spec.vocabulary,
            token_pattern,
            lowercase: spec.lowercase,
            ngram_range: spec.ngram_range,
            stop_words,
            weighting,
            norm,
            binary: spec.binary,
        })
    }

    fn tokenize<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let tokens: Vec<&str> = if self.token_pattern.captures_len() == 2 {
            self.token_pattern
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str())
                .collect()
        } else {
            self.token_pattern
                .find_iter(text)
                .map(|m| m.as_str())
                .collect()
        };

        tokens
            .into_iter()
            .filter(|t| !self.stop_words.contains(*t))
            .collect()
    }

    /// Word n-grams in the configured range, joined by a single space.
    fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let tokens = self.tokenize(&text);

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n.min(tokens.len()) {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }
}

impl Vectorizer for TextVectorizer {
    fn transform(&self, text: &str) -> anyhow::Result<FeatureVector> {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let mut features = FeatureVector::from_columns(self.dimension(), counts);

        if self.binary {
            features.map_values(|_, v| v.min(1.0));
        }

        if let Weighting::Tfidf { idf, sublinear_tf } = &self.weighting {
            if *sublinear_tf {
                features.map_values(|_, tf| 1.0 + tf.ln());
            }
            features.map_values(|idx, tf| tf * idf[idx]);
        }

        match self.norm {
            Some(Norm::L1) => {
                let norm = features.l1_norm();
                features.normalize_by(norm);
            }
            Some(Norm::L2) => {
                let norm = features.l2_norm();
                features.normalize_by(norm);
            }
            None => {}
        }

        Ok(features)
    }

    fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    fn kind(&self) -> &'static str {
        self.kind.as_str()
    }
}
