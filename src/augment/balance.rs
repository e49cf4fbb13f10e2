//! Class-balanced expansion of a labelled seed set.

use super::{check_labels, seed_root, Augmenter, Strategy};
use crate::core::{Label, LightCurve};
use crate::error::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// Suffix kinds appended to augmented target ids.
pub const AUGMENT_KINDS: [&str; 4] = ["inj", "noisy", "deep", "shallow"];

/// Seed id an augmented id was derived from.
///
/// Strips one trailing `_<kind><digits>` suffix (digits optional); other
/// ids are returned unchanged.
pub fn source_root(target_id: &str) -> &str {
    let Some((root, suffix)) = target_id.rsplit_once('_') else {
        return target_id;
    };
    let is_augmented = AUGMENT_KINDS.iter().any(|kind| {
        suffix
            .strip_prefix(kind)
            .is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit()))
    });
    if is_augmented && !root.is_empty() {
        root
    } else {
        target_id
    }
}

impl Augmenter {
    /// Expand each class to exactly `target_per_class` curves, then shuffle.
    ///
    /// Every class starts with its original seeds (truncated if there are
    /// more than the target), then cycles through the seeds adding
    /// derivatives until the target is met. Positives get injections and
    /// variants; negatives get variants only. A class with no seeds stays
    /// empty.
    pub fn augment_balanced<R: Rng + ?Sized>(
        &self,
        base: &[LightCurve],
        labels: &[Label],
        target_per_class: usize,
        rng: &mut R,
    ) -> Result<(Vec<LightCurve>, Vec<Label>)> {
        check_labels(base, labels)?;

        let mut curves = Vec::with_capacity(2 * target_per_class);
        let mut out_labels = Vec::with_capacity(2 * target_per_class);
        for class in [Label::Transit, Label::NoTransit] {
            let seeds: Vec<(usize, &LightCurve)> = base
                .iter()
                .enumerate()
                .zip(labels)
                .filter(|(_, &l)| l == class)
                .map(|(seed, _)| seed)
                .collect();
            let expanded = self.expand_class(&seeds, class, target_per_class, rng)?;
            info!(
                label = class.as_u8(),
                seeds = seeds.len(),
                total = expanded.len(),
                "class expanded"
            );
            out_labels.extend(std::iter::repeat(class).take(expanded.len()));
            curves.extend(expanded);
        }

        let mut paired: Vec<(LightCurve, Label)> = curves.into_iter().zip(out_labels).collect();
        paired.shuffle(rng);
        Ok(paired.into_iter().unzip())
    }

    fn expand_class<R: Rng + ?Sized>(
        &self,
        seeds: &[(usize, &LightCurve)],
        class: Label,
        target: usize,
        rng: &mut R,
    ) -> Result<Vec<LightCurve>> {
        let mut out: Vec<LightCurve> = seeds
            .iter()
            .take(target)
            .map(|(_, lc)| (*lc).clone())
            .collect();

        let mut cycle = 0;
        while out.len() < target && !seeds.is_empty() {
            for (index, seed) in seeds {
                if out.len() >= target {
                    break;
                }
                let root = seed_root(seed, *index);
                let derived = self.expand_seed(seed, &root, class, Strategy::Both, cycle, rng)?;
                let room = target - out.len();
                out.extend(derived.into_iter().take(room));
            }
            cycle += 1;
        }
        Ok(out)
    }
}

/// Balanced expansion with the default configuration.
pub fn augment_balanced<R: Rng + ?Sized>(
    base: &[LightCurve],
    labels: &[Label],
    target_per_class: usize,
    rng: &mut R,
) -> Result<(Vec<LightCurve>, Vec<Label>)> {
    Augmenter::default().augment_balanced(base, labels, target_per_class, rng)
}
