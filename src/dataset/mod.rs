//! Training data generation.
//!
//! Seeds are fetched, cleaned and split into train and test **before** any
//! augmentation; each partition is then expanded on its own and turned
//! into feature rows. Feature tables are persisted as CSV with the columns
//! `target_id`, `target_label` and one column per feature.

mod builder;
mod split;
mod table;

pub use builder::{DatasetBuilder, DatasetConfig, TrainingDataset};
pub use split::{leaked_roots, stratified_split, Split, SplitConfig};
pub use table::{
    read_feature_table, read_feature_table_file, write_feature_table, write_feature_table_file,
    FeatureTable, Sample, ID_COLUMN, LABEL_COLUMN, SIGNATURE_COLUMNS,
};
