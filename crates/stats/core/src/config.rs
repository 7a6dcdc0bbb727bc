/// Engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatsConfig {
    /// Constant `K` in `damage = raw * K / (K + defense)`.
    /// With defense floored at zero the denominator never drops below `K`.
    pub defense_constant: f32,

    /// Whether [`crate::ResourcePool::tick`] applies the *Regen stats.
    pub regen_enabled: bool,
}

impl StatsConfig {
    // ===== compile-time constants =====
    /// Smallest change that counts as a change.
    ///
    /// Used both to skip base-value writes that only differ by float noise and
    /// to suppress change notifications for recomputes that land on the same value.
    pub const VALUE_EPSILON: f32 = 1e-4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DEFENSE_CONSTANT: f32 = 100.0;

    pub fn new() -> Self {
        Self {
            defense_constant: Self::DEFAULT_DEFENSE_CONSTANT,
            regen_enabled: true,
        }
    }

    pub fn with_defense_constant(mut self, defense_constant: f32) -> Self {
        self.defense_constant = defense_constant;
        self
    }

    pub fn with_regen(mut self, regen_enabled: bool) -> Self {
        self.regen_enabled = regen_enabled;
        self
    }

    /// Returns true if `a` and `b` differ by more than [`Self::VALUE_EPSILON`].
    #[inline]
    pub fn differs(a: f32, b: f32) -> bool {
        (a - b).abs() > Self::VALUE_EPSILON
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::new()
    }
}
