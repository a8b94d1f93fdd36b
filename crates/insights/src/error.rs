#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    #[error("unknown period '{0}' (expected 6months, 12months or all)")]
    UnknownPeriod(String),
}
