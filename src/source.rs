//! Raw light-curve acquisition.
//!
//! A [`SignalSource`] answers "give me the raw curve of this target".
//! Unknown targets are `Ok(None)`; `Err` means the lookup itself failed
//! (network, disk, malformed file) and may be retried with
//! [`fetch_with_retry`].

use crate::core::{LightCurve, Mission, Outcome};
use crate::error::{Result, TransitError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Supplier of raw light curves by target designation.
pub trait SignalSource {
    /// Raw curve of `target_id` observed by `mission`, `None` if unknown.
    fn fetch(&self, target_id: &str, mission: Mission) -> Result<Option<LightCurve>>;
}

impl<S: SignalSource + ?Sized> SignalSource for &S {
    fn fetch(&self, target_id: &str, mission: Mission) -> Result<Option<LightCurve>> {
        (**self).fetch(target_id, mission)
    }
}

impl<S: SignalSource + ?Sized> SignalSource for Box<S> {
    fn fetch(&self, target_id: &str, mission: Mission) -> Result<Option<LightCurve>> {
        (**self).fetch(target_id, mission)
    }
}

/// Fetch a target, retrying failed lookups.
///
/// Makes at most `attempts` calls (at least one). A missing target is
/// `NotFound` right away; a lookup that keeps failing is logged and also
/// reported as `NotFound`.
pub fn fetch_with_retry<S: SignalSource + ?Sized>(
    source: &S,
    target_id: &str,
    mission: Mission,
    attempts: usize,
) -> Outcome<LightCurve> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match source.fetch(target_id, mission) {
            Ok(Some(lc)) => {
                debug!(target_id, %mission, points = lc.len(), "light curve fetched");
                return Outcome::Found(lc);
            }
            Ok(None) => {
                debug!(target_id, %mission, "target not found");
                return Outcome::NotFound;
            }
            Err(err) => {
                debug!(target_id, attempt, %err, "fetch failed");
                if attempt == attempts {
                    warn!(target_id, attempts, %err, "giving up on target");
                }
            }
        }
    }
    Outcome::NotFound
}

/// Map-backed source, mostly for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    curves: HashMap<String, LightCurve>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a curve under `target_id` (for every mission).
    pub fn insert(&mut self, target_id: impl Into<String>, lc: LightCurve) {
        self.curves.insert(target_id.into(), lc);
    }

    pub fn with_curve(mut self, target_id: impl Into<String>, lc: LightCurve) -> Self {
        self.insert(target_id, lc);
        self
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl SignalSource for InMemorySource {
    fn fetch(&self, target_id: &str, _mission: Mission) -> Result<Option<LightCurve>> {
        Ok(self
            .curves
            .get(target_id)
            .map(|lc| lc.clone().with_target_id(target_id)))
    }
}

/// Reads `<dir>/<mission>/<id>.csv`, falling back to `<dir>/<id>.csv`.
///
/// Files have a header with `time` and `flux` columns and optional
/// `flux_err` and `quality` columns. Unparseable numeric cells are read as
/// NaN (left for the preprocessor to drop); unparseable quality flags as 0.
/// Ids containing path separators are rejected with `InvalidParameter`.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locate(&self, target_id: &str, mission: Mission) -> Option<PathBuf> {
        let file = format!("{target_id}.csv");
        let mission_dir = mission.to_string().to_ascii_lowercase();
        [self.root.join(mission_dir).join(&file), self.root.join(&file)]
            .into_iter()
            .find(|p| p.is_file())
    }
}

/// Target ids become file names, so they may not name a directory.
fn check_file_stem(target_id: &str) -> Result<()> {
    let escapes = target_id.is_empty()
        || target_id == "."
        || target_id == ".."
        || target_id.contains(['/', '\\', '\0'])
        || Path::new(target_id).is_absolute();
    if escapes {
        return Err(TransitError::InvalidParameter(format!(
            "target id '{target_id}' is not a valid file name"
        )));
    }
    Ok(())
}

impl SignalSource for CsvDirectorySource {
    fn fetch(&self, target_id: &str, mission: Mission) -> Result<Option<LightCurve>> {
        check_file_stem(target_id)?;
        match self.locate(target_id, mission) {
            Some(path) => read_light_curve_csv(&path).map(|lc| Some(lc.with_target_id(target_id))),
            None => Ok(None),
        }
    }
}

/// Read a raw light curve from a CSV file.
pub fn read_light_curve_csv(path: impl AsRef<Path>) -> Result<LightCurve> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (Some(time_idx), Some(flux_idx)) = (column("time"), column("flux")) else {
        return Err(TransitError::Csv(format!(
            "{}: expected 'time' and 'flux' columns",
            path.display()
        )));
    };
    let err_idx = column("flux_err");
    let quality_idx = column("quality");

    let number = |cell: Option<&str>| {
        cell.and_then(|c| c.parse::<f64>().ok())
            .unwrap_or(f64::NAN)
    };
    let mut time = Vec::new();
    let mut flux = Vec::new();
    let mut flux_err = Vec::new();
    let mut quality = Vec::new();
    for record in reader.records() {
        let record = record?;
        time.push(number(record.get(time_idx)));
        flux.push(number(record.get(flux_idx)));
        if let Some(i) = err_idx {
            flux_err.push(number(record.get(i)));
        }
        if let Some(i) = quality_idx {
            quality.push(record.get(i).and_then(|c| c.parse::<u32>().ok()).unwrap_or(0));
        }
    }

    let mut builder = LightCurve::builder().time(time).flux(flux);
    if err_idx.is_some() {
        builder = builder.flux_err(flux_err);
    }
    if quality_idx.is_some() {
        builder = builder.quality(quality);
    }
    builder.build()
}
