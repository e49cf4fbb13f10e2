//! Train/test partitioning by source target.

use crate::augment::source_root;
use crate::core::Label;
use crate::error::{Result, TransitError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Configuration for [`stratified_split`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Fraction of source targets held out for testing.
    pub test_ratio: f64,
    /// Seed of the shuffle.
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
        }
    }
}

impl SplitConfig {
    pub fn with_test_ratio(mut self, ratio: f64) -> Self {
        self.test_ratio = ratio;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(TransitError::InvalidParameter(format!(
                "test_ratio must be in (0, 1), got {}",
                self.test_ratio
            )));
        }
        Ok(())
    }
}

/// Indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split items into train and test, stratified by label.
///
/// Items sharing a source root (see [`source_root`]) always land in the
/// same partition; a group takes the label of its first item. Each class
/// sends `round(ratio * groups)` groups to test, keeping at least one group
/// per side when the class has two or more. The shuffle is seeded, so the
/// split is reproducible.
pub fn stratified_split(ids: &[&str], labels: &[Label], config: &SplitConfig) -> Result<Split> {
    config.validate()?;
    if ids.len() != labels.len() {
        return Err(TransitError::DimensionMismatch {
            expected: ids.len(),
            got: labels.len(),
        });
    }

    let mut groups: Vec<(Label, Vec<usize>)> = Vec::new();
    let mut by_root: HashMap<&str, usize> = HashMap::new();
    for (i, (id, &label)) in ids.iter().zip(labels).enumerate() {
        let root = source_root(id);
        match by_root.get(root) {
            Some(&g) => groups[g].1.push(i),
            None => {
                by_root.insert(root, groups.len());
                groups.push((label, vec![i]));
            }
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut split = Split {
        train: Vec::new(),
        test: Vec::new(),
    };
    for class in [Label::Transit, Label::NoTransit] {
        let mut members: Vec<usize> = (0..groups.len())
            .filter(|&g| groups[g].0 == class)
            .collect();
        members.shuffle(&mut rng);
        let n = members.len();
        let n_test = if n < 2 {
            0
        } else {
            ((config.test_ratio * n as f64).round() as usize).clamp(1, n - 1)
        };
        for (k, &g) in members.iter().enumerate() {
            let side = if k < n_test { &mut split.test } else { &mut split.train };
            side.extend_from_slice(&groups[g].1);
        }
    }
    split.train.sort_unstable();
    split.test.sort_unstable();
    Ok(split)
}

/// Source roots present on both sides of a split.
pub fn leaked_roots<'a, I, J>(train_ids: I, test_ids: J) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
    J: IntoIterator<Item = &'a str>,
{
    let train: BTreeSet<&str> = train_ids.into_iter().map(source_root).collect();
    let test: BTreeSet<&str> = test_ids.into_iter().map(source_root).collect();
    train.intersection(&test).map(|r| r.to_string()).collect()
}
