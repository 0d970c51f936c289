use std::{net::SocketAddr, path::PathBuf, time::Duration};

/// Wall-clock budget of a single fill when none is configured
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(15);

/// Per-run search settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FillOptions {
    /// How long the caller waits before reporting a partial board
    pub deadline: Duration,
    /// Fixed RNG seed for reproducible vocabulary orderings
    pub seed: Option<u64>,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            deadline: DEFAULT_DEADLINE,
            seed: None,
        }
    }
}

impl FillOptions {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Server process configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Directory of wordset-style `.json` corpus files
    pub data_dir: PathBuf,
    pub fill: FillOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8890)),
            data_dir: PathBuf::from("data/"),
            fill: FillOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_server() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8890);
        assert_eq!(config.fill.deadline, Duration::from_secs(15));
        assert_eq!(config.fill.seed, None);
    }

    #[test]
    fn builder_overrides() {
        let options = FillOptions::default()
            .with_deadline(Duration::from_millis(250))
            .with_seed(7);
        assert_eq!(options.deadline, Duration::from_millis(250));
        assert_eq!(options.seed, Some(7));
    }
}
