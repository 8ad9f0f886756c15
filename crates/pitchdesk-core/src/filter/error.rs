use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown facet: {0}")]
    UnknownFacet(String),

    #[error("Unknown value '{value}' for facet '{facet}'")]
    UnknownValue { facet: String, value: String },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unknown date range: {0}")]
    UnknownDateRange(String),
}
