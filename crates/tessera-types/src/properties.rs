//! Chain-wide properties consumed by block production

use crate::error::ConfigError;

/// Default maximum number of parallel threads in one cycle
pub const DEFAULT_MAX_THREADS_PER_CYCLE: u32 = 4;

/// Read-only chain configuration
///
/// Loaded from chain state at startup; never mutated by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalProperties {
    /// Maximum number of parallel threads in one cycle
    #[cfg_attr(feature = "serde", serde(default = "default_max_threads_per_cycle"))]
    pub max_threads_per_cycle: u32,
    /// Maximum number of cycles in one block (unbounded when absent)
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_cycles_per_block: Option<u32>,
}

#[cfg(feature = "serde")]
fn default_max_threads_per_cycle() -> u32 {
    DEFAULT_MAX_THREADS_PER_CYCLE
}

impl Default for GlobalProperties {
    fn default() -> Self {
        Self {
            max_threads_per_cycle: DEFAULT_MAX_THREADS_PER_CYCLE,
            max_cycles_per_block: None,
        }
    }
}

impl GlobalProperties {
    /// Properties with the given thread bound and no cycle bound
    pub fn with_max_threads(max_threads_per_cycle: u32) -> Self {
        Self {
            max_threads_per_cycle,
            max_cycles_per_block: None,
        }
    }

    /// Reject bounds that cannot produce a schedule
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_threads_per_cycle == 0 {
            return Err(ConfigError::ZeroBound("max_threads_per_cycle"));
        }
        if self.max_cycles_per_block == Some(0) {
            return Err(ConfigError::ZeroBound("max_cycles_per_block"));
        }
        Ok(())
    }

    /// Thread bound as a `usize`
    pub fn thread_limit(&self) -> usize {
        self.max_threads_per_cycle as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_properties() {
        let props = GlobalProperties::default();
        assert_eq!(props.max_threads_per_cycle, 4);
        assert_eq!(props.max_cycles_per_block, None);
        assert!(props.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_threads() {
        let props = GlobalProperties::with_max_threads(0);
        assert_eq!(
            props.validate(),
            Err(ConfigError::ZeroBound("max_threads_per_cycle"))
        );
    }

    #[test]
    fn test_validate_zero_cycles() {
        let props = GlobalProperties {
            max_threads_per_cycle: 2,
            max_cycles_per_block: Some(0),
        };
        assert_eq!(
            props.validate(),
            Err(ConfigError::ZeroBound("max_cycles_per_block"))
        );
    }

    #[test]
    fn test_thread_limit() {
        assert_eq!(GlobalProperties::with_max_threads(8).thread_limit(), 8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_properties_serde_defaults() {
        let props: GlobalProperties = serde_json::from_str("{}").unwrap();
        assert_eq!(props, GlobalProperties::default());

        let props: GlobalProperties =
            serde_json::from_str(r#"{"max_threads_per_cycle": 16, "max_cycles_per_block": 32}"#)
                .unwrap();
        assert_eq!(props.max_threads_per_cycle, 16);
        assert_eq!(props.max_cycles_per_block, Some(32));
    }
}
