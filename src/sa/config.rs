//! SA configuration.

/// Configuration for the Simulated Annealing algorithm.
///
/// Cooling is geometric: after every iteration, skipped or not,
/// `T_{k+1} = cooling_rate * T_k`. With the defaults the temperature falls
/// to about 61% of `T_0` after 5 000 iterations and to about 0.7% after
/// 50 000.
///
/// # Examples
///
/// ```
/// use u_deck::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(2.0)
///     .with_cooling_rate(0.999)
///     .with_max_iterations(10_000)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values allow more exploration.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1]. Higher = slower cooling.
    pub cooling_rate: f64,

    /// Iteration budget. Every neighbor attempt counts, including skipped ones.
    pub max_iterations: usize,

    /// Best cost is sampled into the history every this many iterations.
    pub history_interval: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 1.0,
            cooling_rate: 0.9999,
            max_iterations: 50_000,
            history_interval: 100,
            seed: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_rate(mut self, rate: f64) -> Self {
        self.cooling_rate = rate;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_history_interval(mut self, n: usize) -> Self {
        self.history_interval = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.initial_temperature.is_finite() || self.initial_temperature <= 0.0 {
            return Err("initial_temperature must be positive and finite".into());
        }
        if self.cooling_rate.is_nan() || self.cooling_rate <= 0.0 || self.cooling_rate > 1.0 {
            return Err(format!(
                "cooling_rate must be in (0, 1], got {}",
                self.cooling_rate
            ));
        }
        if self.history_interval == 0 {
            return Err("history_interval must be at least 1".into());
        }
        Ok(())
    }
}
