//! Single-target analysis with an explicitly owned model and cache.

use super::{BoxedClassifier, ModelSchema};
use crate::core::{Mission, Outcome};
use crate::detection::{BoxLeastSquares, NEUTRAL_PERIOD};
use crate::error::Result;
use crate::features::{FeatureExtractor, FeatureId};
use crate::preprocess::{Preprocessor, Quality};
use crate::source::{fetch_with_retry, SignalSource};
use crate::transform::fold;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use tracing::{debug, info, warn};

/// Score reported when no model is loaded.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Configuration for [`AnalysisContext`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Most reports kept in the cache; 0 disables caching.
    pub cache_capacity: usize,
    /// Calls made to the source before a target is given up.
    pub fetch_attempts: usize,
    /// Cleaning quality for interactive analysis.
    pub quality: Quality,
    /// Rough size of the folded-curve payload.
    pub display_points: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 128,
            fetch_attempts: 3,
            quality: Quality::Fast,
            display_points: 1000,
        }
    }
}

impl ContextConfig {
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_fetch_attempts(mut self, attempts: usize) -> Self {
        self.fetch_attempts = attempts;
        self
    }

    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }
}

/// Everything learned about one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub target_id: String,
    pub mission: Mission,
    /// Best BLS period, or the neutral period when the search could not run.
    pub period: f64,
    pub bls_power: f64,
    /// Signal detection efficiency of the periodogram.
    pub sde: f64,
    /// Transit probability from the model, 0.5 without one.
    pub score: f64,
    /// Minimum of the cleaned flux.
    pub transit_depth_min: f64,
    /// Samples delivered by the source before cleaning.
    pub raw_points: usize,
    pub cleaned_points: usize,
    /// `(phase, flux)` of the folded curve, thinned for display.
    pub folded: Vec<(f64, f64)>,
    pub features: BTreeMap<String, f64>,
}

/// Model and cache availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextStatus {
    pub model_loaded: bool,
    pub model_name: Option<String>,
    pub schema_columns: Option<usize>,
    pub cached: usize,
    pub cache_capacity: usize,
}

/// Least-recently-used map of reports by target id.
#[derive(Debug, Default)]
struct ReportCache {
    capacity: usize,
    entries: HashMap<String, AnalysisReport>,
    order: VecDeque<String>,
}

impl ReportCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }

    fn get(&mut self, key: &str) -> Option<AnalysisReport> {
        let report = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(report)
    }

    fn insert(&mut self, key: String, report: AnalysisReport) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.contains_key(&key) {
            self.touch(&key);
        } else {
            while self.entries.len() >= self.capacity {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
                debug!(target_id = %oldest, "cache eviction");
            }
            self.order.push_back(key.clone());
        }
        self.entries.insert(key, report);
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Owns every pipeline stage, the optional model and the report cache.
///
/// Constructed once and handed to whatever serves requests; there is no
/// process-wide state.
pub struct AnalysisContext<S: SignalSource> {
    source: S,
    preprocessor: Preprocessor,
    period_finder: BoxLeastSquares,
    extractor: FeatureExtractor,
    classifier: Option<BoxedClassifier>,
    schema: Option<ModelSchema>,
    config: ContextConfig,
    cache: ReportCache,
}

impl<S: SignalSource> AnalysisContext<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ContextConfig::default())
    }

    pub fn with_config(source: S, config: ContextConfig) -> Self {
        Self {
            source,
            preprocessor: Preprocessor::default(),
            period_finder: BoxLeastSquares::default(),
            extractor: FeatureExtractor::default(),
            classifier: None,
            schema: None,
            cache: ReportCache::new(config.cache_capacity),
            config,
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: Preprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_period_finder(mut self, period_finder: BoxLeastSquares) -> Self {
        self.period_finder = period_finder;
        self
    }

    pub fn with_extractor(mut self, extractor: FeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Install a model and, optionally, its training-time schema. Cached
    /// reports are dropped since their scores came from the old model.
    pub fn with_classifier(mut self, classifier: BoxedClassifier, schema: Option<ModelSchema>) -> Self {
        self.set_classifier(classifier, schema);
        self
    }

    pub fn set_classifier(&mut self, classifier: BoxedClassifier, schema: Option<ModelSchema>) {
        info!(
            model = classifier.name(),
            columns = schema.as_ref().map(ModelSchema::len),
            "model installed"
        );
        self.classifier = Some(classifier);
        self.schema = schema;
        self.cache.clear();
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drop every cached report.
    pub fn clear(&mut self) {
        debug!(entries = self.cache.len(), "cache cleared");
        self.cache.clear();
    }

    pub fn status(&self) -> ContextStatus {
        ContextStatus {
            model_loaded: self.classifier.is_some(),
            model_name: self.classifier.as_ref().map(|c| c.name().to_string()),
            schema_columns: self.schema.as_ref().map(ModelSchema::len),
            cached: self.cache.len(),
            cache_capacity: self.config.cache_capacity,
        }
    }

    /// Fetch, clean, search, fold, extract and score one target.
    ///
    /// Unknown targets are `NotFound`; targets too sparse to clean or
    /// characterize are `InsufficientData`. `Err` is reserved for model
    /// failures. Found reports are cached by target id.
    pub fn analyze(&mut self, target_id: &str) -> Result<Outcome<AnalysisReport>> {
        if let Some(report) = self.cache.get(target_id) {
            debug!(target_id, "cache hit");
            return Ok(Outcome::Found(report));
        }

        let mission = Mission::infer(target_id);
        let raw = match fetch_with_retry(&self.source, target_id, mission, self.config.fetch_attempts)
        {
            Outcome::Found(lc) => lc,
            Outcome::NotFound => return Ok(Outcome::NotFound),
            Outcome::InsufficientData { needed, got } => {
                return Ok(Outcome::InsufficientData { needed, got })
            }
        };
        let raw_points = raw.len();

        let cleaned = match self.preprocessor.clean(Some(&raw), self.config.quality) {
            Outcome::Found(lc) => lc,
            Outcome::NotFound => return Ok(Outcome::NotFound),
            Outcome::InsufficientData { needed, got } => {
                return Ok(Outcome::InsufficientData { needed, got })
            }
        };

        let (period, epoch, bls_power, sde) = match self.period_finder.periodogram(&cleaned) {
            Ok(pg) => (pg.best.period, Some(pg.best.transit_time), pg.best.power, pg.sde()),
            Err(err) => {
                warn!(target_id, %err, "period search failed");
                (NEUTRAL_PERIOD, None, 0.0, 0.0)
            }
        };
        let folded = match fold(&cleaned, period, epoch) {
            Ok(folded) => folded.downsample(self.config.display_points),
            Err(err) => {
                warn!(target_id, %err, "folding failed");
                Vec::new()
            }
        };

        let vector = match self.extractor.extract(&cleaned, target_id) {
            Outcome::Found(vector) => vector,
            Outcome::NotFound => return Ok(Outcome::NotFound),
            Outcome::InsufficientData { needed, got } => {
                return Ok(Outcome::InsufficientData { needed, got })
            }
        };

        let score = match &self.classifier {
            Some(model) => {
                let row = match &self.schema {
                    Some(schema) => schema.align(&vector),
                    None => vector.values().to_vec(),
                };
                model.predict_probability(&row)?
            }
            None => NEUTRAL_SCORE,
        };

        let report = AnalysisReport {
            target_id: target_id.to_string(),
            mission,
            period,
            bls_power,
            sde,
            score,
            transit_depth_min: vector.get(FeatureId::SciTransitDepthMin),
            raw_points,
            cleaned_points: cleaned.len(),
            folded,
            features: vector.to_map(),
        };
        info!(target_id, %mission, period, score, "analysis done");
        self.cache.insert(target_id.to_string(), report.clone());
        Ok(Outcome::Found(report))
    }
}
