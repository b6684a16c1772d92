pub mod localization;

pub use lexiform_engine::{ReplacementValue, Replacements};
pub use localization::{
    LocaleCatalogStats, LocalizationError, LocalizationManager, PlaceholderMismatch,
};
