use crate::category::Category;
use crate::route::EngineError;

#[derive(Debug, Clone, PartialEq)]
pub enum LayerError {
    /// A feature without usable geometry; the whole collection is rejected.
    MalformedFeature { category: Category, index: usize },
    /// Range circles requested for a hidden or empty category.
    LayerNotActive(Category),
    /// Upstream feed reported no payload or one that does not parse.
    SubscriptionDeliveryFailure { feed: String, reason: String },
    InvalidRoute(String),
    RouteNotFound { index: usize, available: usize },
    Playback(EngineError),
}

impl std::fmt::Display for LayerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerError::MalformedFeature { category, index } => {
                write!(f, "{category} feature at index {index} has no position")
            }
            LayerError::LayerNotActive(category) => {
                write!(f, "{} layer is not active", category.display_name())
            }
            LayerError::SubscriptionDeliveryFailure { feed, reason } => {
                write!(f, "emitted {feed} data is not valid: {reason}")
            }
            LayerError::InvalidRoute(reason) => write!(f, "invalid flight route: {reason}"),
            LayerError::RouteNotFound { index, available } => {
                write!(
                    f,
                    "flight route {index} is not available ({available} loaded)"
                )
            }
            LayerError::Playback(e) => write!(f, "route playback failed: {e}"),
        }
    }
}

impl std::error::Error for LayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LayerError::Playback(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EngineError> for LayerError {
    fn from(e: EngineError) -> Self {
        LayerError::Playback(e)
    }
}

#[cfg(test)]
mod tests {
    use super::LayerError;
    use crate::category::Category;

    #[test]
    fn not_active_reads_as_an_alert() {
        assert_eq!(
            LayerError::LayerNotActive(Category::VdlStation).to_string(),
            "VDL station layer is not active"
        );
    }
}
