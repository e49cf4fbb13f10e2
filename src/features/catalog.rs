//! The fixed feature schema.
//!
//! Every extracted vector has exactly one value per [`FeatureId`], in the
//! order of [`FeatureId::ALL`]. Generic statistics are named after the
//! tsfresh convention (`flux__<function>__<param>_<value>`) so feature
//! tables stay interchangeable with tables produced by that library;
//! domain statistics are prefixed `sci_`.

use super::autocorrelation::{
    agg_autocorrelation, autocorrelation, partial_autocorrelation,
    time_reversal_asymmetry_statistic, Aggregate,
};
use super::basic::*;
use super::change::*;
use super::complexity::{c3, cid_ce, lempel_ziv_complexity};
use super::counting::*;
use super::distribution::{
    kurtosis, large_standard_deviation, quantile_sorted, ratio_beyond_r_sigma, skewness,
    symmetry_looking, variance_larger_than_standard_deviation,
};
use super::entropy::{binned_entropy, permutation_entropy};
use super::science::ScienceStats;
use super::spectral::{SpectralMoment, Spectrum};
use super::trend::{agg_linear_trend, ar_coefficient, linear_trend, LinearTrend, TrendAttr};
use crate::error::{Result, TransitError};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Column prefix of the generic statistics.
pub const FLUX_PREFIX: &str = "flux__";

const AGG_AUTOCORRELATION_MAX_LAG: usize = 40;
const AGG_TREND_CHUNK_LEN: usize = 10;
const AR_ORDER: usize = 10;
const ENERGY_SEGMENTS: usize = 10;

/// Identifier of one feature column.
///
/// Percent-valued parameters are stored as integers (`10` for `0.1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureId {
    SumValues,
    Median,
    Mean,
    Length,
    StandardDeviation,
    Variance,
    RootMeanSquare,
    Maximum,
    Minimum,
    AbsoluteMaximum,
    AbsEnergy,
    AbsoluteSumOfChanges,
    MeanAbsChange,
    MeanChange,
    MeanSecondDerivativeCentral,
    VariationCoefficient,
    Skewness,
    Kurtosis,
    Quantile { percent: u8 },
    RatioBeyondRSigma { r: u8 },
    LargeStandardDeviation { percent: u8 },
    SymmetryLooking { percent: u8 },
    VarianceLargerThanStandardDeviation,
    CountAboveMean,
    CountBelowMean,
    LongestStrikeAboveMean,
    LongestStrikeBelowMean,
    FirstLocationOfMaximum,
    LastLocationOfMaximum,
    FirstLocationOfMinimum,
    LastLocationOfMinimum,
    HasDuplicate,
    HasDuplicateMax,
    HasDuplicateMin,
    NumberPeaks { support: u8 },
    NumberCrossingM { m: u8 },
    IndexMassQuantile { percent: u8 },
    Autocorrelation { lag: u8 },
    AggAutocorrelation(Aggregate),
    PartialAutocorrelation { lag: u8 },
    TimeReversalAsymmetry { lag: u8 },
    C3 { lag: u8 },
    CidCe { normalize: bool },
    LempelZivComplexity { bins: u8 },
    BinnedEntropy { max_bins: u8 },
    PermutationEntropy { dimension: u8 },
    FourierEntropy { bins: u8 },
    FftCoefficientAbs { coeff: u8 },
    FftAggregated(SpectralMoment),
    LinearTrend(TrendAttr),
    AggLinearTrend { attr: TrendAttr, agg: Aggregate },
    ArCoefficient { coeff: u8 },
    ChangeQuantiles { agg: Aggregate, is_abs: bool },
    EnergyRatioByChunks { focus: u8 },
    PercentageOfReoccurringDatapoints,
    PercentageOfReoccurringValues,
    SumOfReoccurringDataPoints,
    SumOfReoccurringValues,
    RatioValueNumberToLength,
    SciStdDev,
    SciSkewness,
    SciKurtosis,
    SciTransitDepthMin,
    SciMad,
    SciPeakToPeak,
    SciAmplitude,
}

/// Number of feature columns.
pub const FEATURE_COUNT: usize = FeatureId::ALL.len();

impl FeatureId {
    /// Every feature, in column order.
    pub const ALL: &'static [FeatureId] = &[
        FeatureId::SumValues,
        FeatureId::Median,
        FeatureId::Mean,
        FeatureId::Length,
        FeatureId::StandardDeviation,
        FeatureId::Variance,
        FeatureId::RootMeanSquare,
        FeatureId::Maximum,
        FeatureId::Minimum,
        FeatureId::AbsoluteMaximum,
        FeatureId::AbsEnergy,
        FeatureId::AbsoluteSumOfChanges,
        FeatureId::MeanAbsChange,
        FeatureId::MeanChange,
        FeatureId::MeanSecondDerivativeCentral,
        FeatureId::VariationCoefficient,
        FeatureId::Skewness,
        FeatureId::Kurtosis,
        FeatureId::Quantile { percent: 10 },
        FeatureId::Quantile { percent: 20 },
        FeatureId::Quantile { percent: 30 },
        FeatureId::Quantile { percent: 40 },
        FeatureId::Quantile { percent: 60 },
        FeatureId::Quantile { percent: 70 },
        FeatureId::Quantile { percent: 80 },
        FeatureId::Quantile { percent: 90 },
        FeatureId::RatioBeyondRSigma { r: 1 },
        FeatureId::RatioBeyondRSigma { r: 2 },
        FeatureId::RatioBeyondRSigma { r: 3 },
        FeatureId::LargeStandardDeviation { percent: 25 },
        FeatureId::SymmetryLooking { percent: 5 },
        FeatureId::VarianceLargerThanStandardDeviation,
        FeatureId::CountAboveMean,
        FeatureId::CountBelowMean,
        FeatureId::LongestStrikeAboveMean,
        FeatureId::LongestStrikeBelowMean,
        FeatureId::FirstLocationOfMaximum,
        FeatureId::LastLocationOfMaximum,
        FeatureId::FirstLocationOfMinimum,
        FeatureId::LastLocationOfMinimum,
        FeatureId::HasDuplicate,
        FeatureId::HasDuplicateMax,
        FeatureId::HasDuplicateMin,
        FeatureId::NumberPeaks { support: 1 },
        FeatureId::NumberPeaks { support: 3 },
        FeatureId::NumberPeaks { support: 5 },
        FeatureId::NumberCrossingM { m: 1 },
        FeatureId::IndexMassQuantile { percent: 10 },
        FeatureId::IndexMassQuantile { percent: 50 },
        FeatureId::IndexMassQuantile { percent: 90 },
        FeatureId::Autocorrelation { lag: 1 },
        FeatureId::Autocorrelation { lag: 2 },
        FeatureId::Autocorrelation { lag: 3 },
        FeatureId::Autocorrelation { lag: 5 },
        FeatureId::Autocorrelation { lag: 10 },
        FeatureId::AggAutocorrelation(Aggregate::Mean),
        FeatureId::AggAutocorrelation(Aggregate::Median),
        FeatureId::AggAutocorrelation(Aggregate::Var),
        FeatureId::PartialAutocorrelation { lag: 1 },
        FeatureId::PartialAutocorrelation { lag: 2 },
        FeatureId::PartialAutocorrelation { lag: 3 },
        FeatureId::TimeReversalAsymmetry { lag: 1 },
        FeatureId::TimeReversalAsymmetry { lag: 2 },
        FeatureId::TimeReversalAsymmetry { lag: 3 },
        FeatureId::C3 { lag: 1 },
        FeatureId::C3 { lag: 2 },
        FeatureId::C3 { lag: 3 },
        FeatureId::CidCe { normalize: true },
        FeatureId::CidCe { normalize: false },
        FeatureId::LempelZivComplexity { bins: 10 },
        FeatureId::BinnedEntropy { max_bins: 10 },
        FeatureId::PermutationEntropy { dimension: 3 },
        FeatureId::PermutationEntropy { dimension: 5 },
        FeatureId::FourierEntropy { bins: 10 },
        FeatureId::FftCoefficientAbs { coeff: 1 },
        FeatureId::FftCoefficientAbs { coeff: 2 },
        FeatureId::FftCoefficientAbs { coeff: 3 },
        FeatureId::FftCoefficientAbs { coeff: 4 },
        FeatureId::FftAggregated(SpectralMoment::Centroid),
        FeatureId::FftAggregated(SpectralMoment::Variance),
        FeatureId::FftAggregated(SpectralMoment::Skew),
        FeatureId::FftAggregated(SpectralMoment::Kurtosis),
        FeatureId::LinearTrend(TrendAttr::Slope),
        FeatureId::LinearTrend(TrendAttr::Intercept),
        FeatureId::LinearTrend(TrendAttr::Rvalue),
        FeatureId::LinearTrend(TrendAttr::Stderr),
        FeatureId::AggLinearTrend { attr: TrendAttr::Slope, agg: Aggregate::Mean },
        FeatureId::AggLinearTrend { attr: TrendAttr::Intercept, agg: Aggregate::Mean },
        FeatureId::AggLinearTrend { attr: TrendAttr::Slope, agg: Aggregate::Var },
        FeatureId::ArCoefficient { coeff: 0 },
        FeatureId::ArCoefficient { coeff: 1 },
        FeatureId::ArCoefficient { coeff: 2 },
        FeatureId::ChangeQuantiles { agg: Aggregate::Mean, is_abs: true },
        FeatureId::ChangeQuantiles { agg: Aggregate::Var, is_abs: false },
        FeatureId::EnergyRatioByChunks { focus: 0 },
        FeatureId::EnergyRatioByChunks { focus: 9 },
        FeatureId::PercentageOfReoccurringDatapoints,
        FeatureId::PercentageOfReoccurringValues,
        FeatureId::SumOfReoccurringDataPoints,
        FeatureId::SumOfReoccurringValues,
        FeatureId::RatioValueNumberToLength,
        FeatureId::SciStdDev,
        FeatureId::SciSkewness,
        FeatureId::SciKurtosis,
        FeatureId::SciTransitDepthMin,
        FeatureId::SciMad,
        FeatureId::SciPeakToPeak,
        FeatureId::SciAmplitude,
    ];

    /// Column name.
    pub fn name(&self) -> String {
        let frac = |percent: u8| f64::from(percent) / 100.0;
        let py_bool = |b: bool| if b { "True" } else { "False" };
        let generic = match *self {
            FeatureId::SumValues => "sum_values".to_string(),
            FeatureId::Median => "median".to_string(),
            FeatureId::Mean => "mean".to_string(),
            FeatureId::Length => "length".to_string(),
            FeatureId::StandardDeviation => "standard_deviation".to_string(),
            FeatureId::Variance => "variance".to_string(),
            FeatureId::RootMeanSquare => "root_mean_square".to_string(),
            FeatureId::Maximum => "maximum".to_string(),
            FeatureId::Minimum => "minimum".to_string(),
            FeatureId::AbsoluteMaximum => "absolute_maximum".to_string(),
            FeatureId::AbsEnergy => "abs_energy".to_string(),
            FeatureId::AbsoluteSumOfChanges => "absolute_sum_of_changes".to_string(),
            FeatureId::MeanAbsChange => "mean_abs_change".to_string(),
            FeatureId::MeanChange => "mean_change".to_string(),
            FeatureId::MeanSecondDerivativeCentral => "mean_second_derivative_central".to_string(),
            FeatureId::VariationCoefficient => "variation_coefficient".to_string(),
            FeatureId::Skewness => "skewness".to_string(),
            FeatureId::Kurtosis => "kurtosis".to_string(),
            FeatureId::Quantile { percent } => format!("quantile__q_{}", frac(percent)),
            FeatureId::RatioBeyondRSigma { r } => format!("ratio_beyond_r_sigma__r_{r}"),
            FeatureId::LargeStandardDeviation { percent } => {
                format!("large_standard_deviation__r_{}", frac(percent))
            }
            FeatureId::SymmetryLooking { percent } => {
                format!("symmetry_looking__r_{}", frac(percent))
            }
            FeatureId::VarianceLargerThanStandardDeviation => {
                "variance_larger_than_standard_deviation".to_string()
            }
            FeatureId::CountAboveMean => "count_above_mean".to_string(),
            FeatureId::CountBelowMean => "count_below_mean".to_string(),
            FeatureId::LongestStrikeAboveMean => "longest_strike_above_mean".to_string(),
            FeatureId::LongestStrikeBelowMean => "longest_strike_below_mean".to_string(),
            FeatureId::FirstLocationOfMaximum => "first_location_of_maximum".to_string(),
            FeatureId::LastLocationOfMaximum => "last_location_of_maximum".to_string(),
            FeatureId::FirstLocationOfMinimum => "first_location_of_minimum".to_string(),
            FeatureId::LastLocationOfMinimum => "last_location_of_minimum".to_string(),
            FeatureId::HasDuplicate => "has_duplicate".to_string(),
            FeatureId::HasDuplicateMax => "has_duplicate_max".to_string(),
            FeatureId::HasDuplicateMin => "has_duplicate_min".to_string(),
            FeatureId::NumberPeaks { support } => format!("number_peaks__n_{support}"),
            FeatureId::NumberCrossingM { m } => format!("number_crossing_m__m_{m}"),
            FeatureId::IndexMassQuantile { percent } => {
                format!("index_mass_quantile__q_{}", frac(percent))
            }
            FeatureId::Autocorrelation { lag } => format!("autocorrelation__lag_{lag}"),
            FeatureId::AggAutocorrelation(agg) => format!(
                "agg_autocorrelation__f_agg_\"{}\"__maxlag_{AGG_AUTOCORRELATION_MAX_LAG}",
                agg.name()
            ),
            FeatureId::PartialAutocorrelation { lag } => {
                format!("partial_autocorrelation__lag_{lag}")
            }
            FeatureId::TimeReversalAsymmetry { lag } => {
                format!("time_reversal_asymmetry_statistic__lag_{lag}")
            }
            FeatureId::C3 { lag } => format!("c3__lag_{lag}"),
            FeatureId::CidCe { normalize } => format!("cid_ce__normalize_{}", py_bool(normalize)),
            FeatureId::LempelZivComplexity { bins } => {
                format!("lempel_ziv_complexity__bins_{bins}")
            }
            FeatureId::BinnedEntropy { max_bins } => format!("binned_entropy__max_bins_{max_bins}"),
            FeatureId::PermutationEntropy { dimension } => {
                format!("permutation_entropy__dimension_{dimension}__tau_1")
            }
            FeatureId::FourierEntropy { bins } => format!("fourier_entropy__bins_{bins}"),
            FeatureId::FftCoefficientAbs { coeff } => {
                format!("fft_coefficient__attr_\"abs\"__coeff_{coeff}")
            }
            FeatureId::FftAggregated(moment) => {
                format!("fft_aggregated__aggtype_\"{}\"", moment.name())
            }
            FeatureId::LinearTrend(attr) => format!("linear_trend__attr_\"{}\"", attr.name()),
            FeatureId::AggLinearTrend { attr, agg } => format!(
                "agg_linear_trend__attr_\"{}\"__chunk_len_{AGG_TREND_CHUNK_LEN}__f_agg_\"{}\"",
                attr.name(),
                agg.name()
            ),
            FeatureId::ArCoefficient { coeff } => {
                format!("ar_coefficient__coeff_{coeff}__k_{AR_ORDER}")
            }
            FeatureId::ChangeQuantiles { agg, is_abs } => format!(
                "change_quantiles__f_agg_\"{}\"__isabs_{}__qh_0.8__ql_0.2",
                agg.name(),
                py_bool(is_abs)
            ),
            FeatureId::EnergyRatioByChunks { focus } => format!(
                "energy_ratio_by_chunks__num_segments_{ENERGY_SEGMENTS}__segment_focus_{focus}"
            ),
            FeatureId::PercentageOfReoccurringDatapoints => {
                "percentage_of_reoccurring_datapoints_to_all_datapoints".to_string()
            }
            FeatureId::PercentageOfReoccurringValues => {
                "percentage_of_reoccurring_values_to_all_values".to_string()
            }
            FeatureId::SumOfReoccurringDataPoints => "sum_of_reoccurring_data_points".to_string(),
            FeatureId::SumOfReoccurringValues => "sum_of_reoccurring_values".to_string(),
            FeatureId::RatioValueNumberToLength => {
                "ratio_value_number_to_time_series_length".to_string()
            }
            FeatureId::SciStdDev => return "sci_std_dev".to_string(),
            FeatureId::SciSkewness => return "sci_skewness".to_string(),
            FeatureId::SciKurtosis => return "sci_kurtosis".to_string(),
            FeatureId::SciTransitDepthMin => return "sci_transit_depth_min".to_string(),
            FeatureId::SciMad => return "sci_mad".to_string(),
            FeatureId::SciPeakToPeak => return "sci_peak_to_peak".to_string(),
            FeatureId::SciAmplitude => return "sci_amplitude".to_string(),
        };
        format!("{FLUX_PREFIX}{generic}")
    }

    /// Column position in [`FeatureId::ALL`].
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|id| id == self)
            .unwrap_or(usize::MAX)
    }

    /// Look a feature up by column name.
    pub fn from_name(name: &str) -> Option<FeatureId> {
        feature_names()
            .iter()
            .position(|n| n == name)
            .map(|i| Self::ALL[i])
    }

    /// Whether this is one of the domain (`sci_`) statistics.
    pub fn is_science(&self) -> bool {
        matches!(
            self,
            FeatureId::SciStdDev
                | FeatureId::SciSkewness
                | FeatureId::SciKurtosis
                | FeatureId::SciTransitDepthMin
                | FeatureId::SciMad
                | FeatureId::SciPeakToPeak
                | FeatureId::SciAmplitude
        )
    }

    /// Raw value of this statistic; may be non-finite.
    pub(crate) fn compute(&self, s: &SeriesSummary<'_>) -> f64 {
        let x = s.flux;
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        let frac = |percent: u8| f64::from(percent) / 100.0;
        match *self {
            FeatureId::SumValues => sum_values(x),
            FeatureId::Median => quantile_sorted(&s.sorted, 0.5),
            FeatureId::Mean => mean(x),
            FeatureId::Length => length(x),
            FeatureId::StandardDeviation => standard_deviation(x),
            FeatureId::Variance => variance(x),
            FeatureId::RootMeanSquare => root_mean_square(x),
            FeatureId::Maximum => maximum(x),
            FeatureId::Minimum => minimum(x),
            FeatureId::AbsoluteMaximum => absolute_maximum(x),
            FeatureId::AbsEnergy => abs_energy(x),
            FeatureId::AbsoluteSumOfChanges => absolute_sum_of_changes(x),
            FeatureId::MeanAbsChange => mean_abs_change(x),
            FeatureId::MeanChange => mean_change(x),
            FeatureId::MeanSecondDerivativeCentral => mean_second_derivative_central(x),
            FeatureId::VariationCoefficient => variation_coefficient(x),
            FeatureId::Skewness => skewness(x),
            FeatureId::Kurtosis => kurtosis(x),
            FeatureId::Quantile { percent } => quantile_sorted(&s.sorted, frac(percent)),
            FeatureId::RatioBeyondRSigma { r } => ratio_beyond_r_sigma(x, f64::from(r)),
            FeatureId::LargeStandardDeviation { percent } => {
                flag(large_standard_deviation(x, frac(percent)))
            }
            FeatureId::SymmetryLooking { percent } => flag(symmetry_looking(x, frac(percent))),
            FeatureId::VarianceLargerThanStandardDeviation => {
                flag(variance_larger_than_standard_deviation(x))
            }
            FeatureId::CountAboveMean => count_above_mean(x) as f64,
            FeatureId::CountBelowMean => count_below_mean(x) as f64,
            FeatureId::LongestStrikeAboveMean => longest_strike_above_mean(x) as f64,
            FeatureId::LongestStrikeBelowMean => longest_strike_below_mean(x) as f64,
            FeatureId::FirstLocationOfMaximum => first_location_of_maximum(x),
            FeatureId::LastLocationOfMaximum => last_location_of_maximum(x),
            FeatureId::FirstLocationOfMinimum => first_location_of_minimum(x),
            FeatureId::LastLocationOfMinimum => last_location_of_minimum(x),
            FeatureId::HasDuplicate => flag(has_duplicate(x)),
            FeatureId::HasDuplicateMax => flag(has_duplicate_max(x)),
            FeatureId::HasDuplicateMin => flag(has_duplicate_min(x)),
            FeatureId::NumberPeaks { support } => number_peaks(x, support.into()) as f64,
            FeatureId::NumberCrossingM { m } => number_crossing_m(x, f64::from(m)) as f64,
            FeatureId::IndexMassQuantile { percent } => index_mass_quantile(x, frac(percent)),
            FeatureId::Autocorrelation { lag } => autocorrelation(x, lag.into()),
            FeatureId::AggAutocorrelation(agg) => {
                agg_autocorrelation(x, AGG_AUTOCORRELATION_MAX_LAG, agg)
            }
            FeatureId::PartialAutocorrelation { lag } => partial_autocorrelation(x, lag.into()),
            FeatureId::TimeReversalAsymmetry { lag } => {
                time_reversal_asymmetry_statistic(x, lag.into())
            }
            FeatureId::C3 { lag } => c3(x, lag.into()),
            FeatureId::CidCe { normalize } => cid_ce(x, normalize),
            FeatureId::LempelZivComplexity { bins } => lempel_ziv_complexity(x, bins.into()),
            FeatureId::BinnedEntropy { max_bins } => binned_entropy(x, max_bins.into()),
            FeatureId::PermutationEntropy { dimension } => {
                permutation_entropy(x, dimension.into(), 1)
            }
            FeatureId::FourierEntropy { bins } => s.spectrum.entropy(bins.into()),
            FeatureId::FftCoefficientAbs { coeff } => s.spectrum.coefficient_abs(coeff.into()),
            FeatureId::FftAggregated(moment) => s.spectrum.aggregated(moment),
            FeatureId::LinearTrend(attr) => s.trend.get(attr),
            FeatureId::AggLinearTrend { attr, agg } => {
                agg_linear_trend(x, AGG_TREND_CHUNK_LEN, agg, attr)
            }
            FeatureId::ArCoefficient { coeff } => ar_coefficient(x, AR_ORDER, coeff.into()),
            FeatureId::ChangeQuantiles { agg, is_abs } => change_quantiles(x, 0.2, 0.8, is_abs, agg),
            FeatureId::EnergyRatioByChunks { focus } => {
                energy_ratio_by_chunks(x, ENERGY_SEGMENTS, focus.into())
            }
            FeatureId::PercentageOfReoccurringDatapoints => {
                percentage_of_reoccurring_datapoints_to_all_datapoints(x)
            }
            FeatureId::PercentageOfReoccurringValues => {
                percentage_of_reoccurring_values_to_all_values(x)
            }
            FeatureId::SumOfReoccurringDataPoints => sum_of_reoccurring_data_points(x),
            FeatureId::SumOfReoccurringValues => sum_of_reoccurring_values(x),
            FeatureId::RatioValueNumberToLength => ratio_value_number_to_time_series_length(x),
            FeatureId::SciStdDev => s.science.std_dev,
            FeatureId::SciSkewness => s.science.skewness,
            FeatureId::SciKurtosis => s.science.kurtosis,
            FeatureId::SciTransitDepthMin => s.science.transit_depth_min,
            FeatureId::SciMad => s.science.mad,
            FeatureId::SciPeakToPeak => s.science.peak_to_peak,
            FeatureId::SciAmplitude => s.science.amplitude,
        }
    }
}

/// Column names of every feature, in column order.
pub fn feature_names() -> &'static [String] {
    static NAMES: OnceLock<Vec<String>> = OnceLock::new();
    NAMES.get_or_init(|| FeatureId::ALL.iter().map(FeatureId::name).collect())
}

/// Work shared by several features of one series.
pub(crate) struct SeriesSummary<'a> {
    flux: &'a [f64],
    sorted: Vec<f64>,
    spectrum: Spectrum,
    trend: LinearTrend,
    science: ScienceStats,
}

impl<'a> SeriesSummary<'a> {
    pub(crate) fn new(flux: &'a [f64]) -> Self {
        Self {
            flux,
            sorted: crate::utils::sorted_finite(flux),
            spectrum: Spectrum::of(flux),
            trend: linear_trend(flux),
            science: ScienceStats::compute(flux),
        }
    }
}

/// One row of features for one light curve.
///
/// Holds exactly [`FEATURE_COUNT`] finite values in column order, plus the
/// id of the curve they describe. The id is not a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    target_id: String,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Build from values in column order. Non-finite values become 0.
    pub fn new(target_id: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        if values.len() != FEATURE_COUNT {
            return Err(TransitError::DimensionMismatch {
                expected: FEATURE_COUNT,
                got: values.len(),
            });
        }
        let values = values
            .into_iter()
            .map(|v| if v.is_finite() { v } else { 0.0 })
            .collect();
        Ok(Self {
            target_id: target_id.into(),
            values,
        })
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    pub fn with_target_id(mut self, target_id: impl Into<String>) -> Self {
        self.target_id = target_id.into();
        self
    }

    /// Values in column order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, id: FeatureId) -> f64 {
        self.values.get(id.index()).copied().unwrap_or(0.0)
    }

    pub fn get_by_name(&self, name: &str) -> Option<f64> {
        feature_names()
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }

    /// `(name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        feature_names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique_and_prefixed() {
        let names = feature_names();
        assert_eq!(names.len(), FEATURE_COUNT);
        let unique: HashSet<&String> = names.iter().collect();
        assert_eq!(unique.len(), FEATURE_COUNT);
        for (id, name) in FeatureId::ALL.iter().zip(names) {
            if id.is_science() {
                assert!(name.starts_with("sci_"), "{name}");
            } else {
                assert!(name.starts_with(FLUX_PREFIX), "{name}");
            }
        }
    }

    #[test]
    fn tsfresh_style_names() {
        assert_eq!(FeatureId::Quantile { percent: 10 }.name(), "flux__quantile__q_0.1");
        assert_eq!(
            FeatureId::LargeStandardDeviation { percent: 25 }.name(),
            "flux__large_standard_deviation__r_0.25"
        );
        assert_eq!(
            FeatureId::FftCoefficientAbs { coeff: 2 }.name(),
            "flux__fft_coefficient__attr_\"abs\"__coeff_2"
        );
        assert_eq!(
            FeatureId::CidCe { normalize: true }.name(),
            "flux__cid_ce__normalize_True"
        );
        assert_eq!(FeatureId::SciTransitDepthMin.name(), "sci_transit_depth_min");
    }

    #[test]
    fn signature_columns_exist() {
        for name in [
            "flux__mean",
            "flux__standard_deviation",
            "flux__sum_values",
            "flux__variance",
        ] {
            assert!(FeatureId::from_name(name).is_some(), "{name}");
        }
        assert!(FeatureId::from_name("target_id").is_none());
    }

    #[test]
    fn index_round_trips() {
        for (i, id) in FeatureId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn vector_zero_fills_and_checks_width() {
        let mut values = vec![1.0; FEATURE_COUNT];
        values[0] = f64::NAN;
        values[1] = f64::INFINITY;
        let v = FeatureVector::new("KIC 1", values).unwrap();
        assert_eq!(v.values()[0], 0.0);
        assert_eq!(v.values()[1], 0.0);
        assert_eq!(v.get(FeatureId::Mean), 1.0);
        assert_eq!(v.get_by_name("flux__median"), Some(0.0));
        assert_eq!(v.to_map().len(), FEATURE_COUNT);
        assert!(FeatureVector::new("x", vec![0.0; 3]).is_err());
    }
}
