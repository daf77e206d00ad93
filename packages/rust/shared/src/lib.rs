//! Shared types, error model, and configuration for mtextstrip.
//!
//! This crate is the foundation depended on by all other mtextstrip crates.
//! It provides:
//! - [`StripError`]: the unified error type
//! - The drawing model ([`Drawing`], [`Entity`], and the text-bearing entity kinds)
//! - Configuration ([`AppConfig`], config loading and saving)

pub mod config;
pub mod drawing;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, config_dir, config_file_path, load_config_from,
    load_config_or_default, save_config_to,
};
pub use drawing::{
    AttributeReference, BlockReference, Cell, ColumnType, Dimension, Drawing, Entity,
    ExtensionDictionary, FieldLink, Layer, LeaderContent, MLeader, MText, MTextValue,
    OtherEntity, STANDARD_TEXT_STYLE, Table, is_layer_locked,
};
pub use error::{Result, StripError};
