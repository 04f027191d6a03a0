//! Linear and naive Bayes text classifiers restored from fitted JSON
//! artifacts.

use anyhow::bail;
use serde::Deserialize;

use super::{Classifier, FeatureVector, Prediction};

/// On-disk form of a fitted classifier, tagged by `kind`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    LogisticRegression {
        classes: Vec<i64>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    LinearSvc {
        classes: Vec<i64>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
    MultinomialNb {
        classes: Vec<i64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
}

impl ClassifierSpec {
    pub fn build(self) -> Result<Box<dyn Classifier>, String> {
        match self {
            ClassifierSpec::LogisticRegression {
                classes,
                coef,
                intercept,
            } => Ok(Box::new(LinearModel::new(
                LinearKind::LogisticRegression,
                classes,
                coef,
                intercept,
            )?)),
            ClassifierSpec::LinearSvc {
                classes,
                coef,
                intercept,
            } => Ok(Box::new(LinearModel::new(
                LinearKind::LinearSvc,
                classes,
                coef,
                intercept,
            )?)),
            ClassifierSpec::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => Ok(Box::new(NaiveBayes::new(
                classes,
                class_log_prior,
                feature_log_prob,
            )?)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearKind {
    LogisticRegression,
    LinearSvc,
}

/// Shared shape checks: at least two classes, a non-empty rectangular weight
/// matrix. Returns the feature width.
fn check_matrix(classes: &[i64], rows: &[Vec<f64>], what: &str) -> Result<usize, String> {
    if classes.len() < 2 {
        return Err(format!("expected at least 2 classes, got {}", classes.len()));
    }
    let width = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| format!("{what} has no rows"))?;
    if width == 0 {
        return Err(format!("{what} rows are empty"));
    }
    if let Some(pos) = rows.iter().position(|r| r.len() != width) {
        return Err(format!(
            "{what} row {pos} has {} columns, expected {width}",
            rows[pos].len()
        ));
    }
    Ok(width)
}

fn check_dimension(features: &FeatureVector, expected: usize, name: &str) -> anyhow::Result<()> {
    if features.dim() != expected {
        bail!(
            "X has {} features, but {name} is expecting {expected} features as input",
            features.dim()
        );
    }
    Ok(())
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

fn argmax(scores: &[f64]) -> usize {
    scores
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |(best, best_score), (i, &s)| {
            if s > best_score {
                (i, s)
            } else {
                (best, best_score)
            }
        })
        .0
}

/// Linear decision function `coef · x + intercept`.
///
/// A binary model carries one weight row; a positive score selects
/// `classes[1]`. Multi-class models carry one row per class.
#[derive(Debug, Clone)]
pub struct LinearModel {
    kind: LinearKind,
    classes: Vec<i64>,
    coef: Vec<Vec<f64>>,
    intercept: Vec<f64>,
    n_features: usize,
}

impl LinearModel {
    pub fn new(
        kind: LinearKind,
        classes: Vec<i64>,
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    ) -> Result<Self, String> {
        let n_features = check_matrix(&classes, &coef, "coef")?;

        let expected_rows = if classes.len() == 2 { 1 } else { classes.len() };
        if coef.len() != expected_rows {
            return Err(format!(
                "coef has {} rows but {} classes need {expected_rows}",
                coef.len(),
                classes.len()
            ));
        }
        if intercept.len() != coef.len() {
            return Err(format!(
                "intercept has {} entries but coef has {} rows",
                intercept.len(),
                coef.len()
            ));
        }

        Ok(Self {
            kind,
            classes,
            coef,
            intercept,
            n_features,
        })
    }

    pub fn decision_function(&self, features: &FeatureVector) -> Vec<f64> {
        self.coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| features.dot(row) + b)
            .collect()
    }

    fn name(&self) -> &'static str {
        match self.kind {
            LinearKind::LogisticRegression => "LogisticRegression",
            LinearKind::LinearSvc => "LinearSVC",
        }
    }
}

impl Classifier for LinearModel {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<Prediction> {
        check_dimension(features, self.n_features, self.name())?;
        let scores = self.decision_function(features);

        if let &[score] = scores.as_slice() {
            let label = if score > 0.0 {
                self.classes[1]
            } else {
                self.classes[0]
            };
            let probabilities = match self.kind {
                LinearKind::LogisticRegression => {
                    let p = sigmoid(score);
                    Some(vec![1.0 - p, p])
                }
                LinearKind::LinearSvc => None,
            };
            return Ok(Prediction::new(label, probabilities));
        }

        let label = self.classes[argmax(&scores)];
        let probabilities = match self.kind {
            LinearKind::LogisticRegression => Some(softmax(&scores)),
            LinearKind::LinearSvc => None,
        };
        Ok(Prediction::new(label, probabilities))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn kind(&self) -> &'static str {
        match self.kind {
            LinearKind::LogisticRegression => "logistic_regression",
            LinearKind::LinearSvc => "linear_svc",
        }
    }
}

/// Multinomial naive Bayes over term weights.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    classes: Vec<i64>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl NaiveBayes {
    pub fn new(
        classes: Vec<i64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    ) -> Result<Self, String> {
        let n_features = check_matrix(&classes, &feature_log_prob, "feature_log_prob")?;
        if feature_log_prob.len() != classes.len() {
            return Err(format!(
                "feature_log_prob has {} rows for {} classes",
                feature_log_prob.len(),
                classes.len()
            ));
        }
        if class_log_prior.len() != classes.len() {
            return Err(format!(
                "class_log_prior has {} entries for {} classes",
                class_log_prior.len(),
                classes.len()
            ));
        }

        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
            n_features,
        })
    }

    /// Unnormalised log posterior per class.
    pub fn joint_log_likelihood(&self, features: &FeatureVector) -> Vec<f64> {
        self.feature_log_prob
            .iter()
            .zip(&self.class_log_prior)
            .map(|(row, prior)| features.dot(row) + prior)
            .collect()
    }
}

impl Classifier for NaiveBayes {
    fn predict(&self, features: &FeatureVector) -> anyhow::Result<Prediction> {
        check_dimension(features, self.n_features, "MultinomialNB")?;
        let jll = self.joint_log_likelihood(features);
        let label = self.classes[argmax(&jll)];
        Ok(Prediction::new(label, Some(softmax(&jll))))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn kind(&self) -> &'static str {
        "multinomial_nb"
    }
}
