use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Palette used when a widget has no explicit colors configured.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884D8", "#82CA9D",
];

/// Stroke used for a single unconfigured line or bar series.
pub const SINGLE_SERIES_COLOR: &str = "#8884d8";

/// Supplies a color for series that have none configured. Injected into
/// the query facade so tests can pin the assignment down.
pub trait ColorSource {
    fn color_for(&mut self, index: usize) -> String;
}

/// Deterministic default: cycles through [`DEFAULT_PALETTE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteColors;

impl ColorSource for PaletteColors {
    fn color_for(&mut self, index: usize) -> String {
        DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string()
    }
}

/// Random hex colors. Seedable so tests stay reproducible.
pub struct RandomColors {
    rng: StdRng,
}

impl RandomColors {
    /// Colors from operating system randomness.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Colors from a fixed seed (useful for deterministic tests).
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColors {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorSource for RandomColors {
    fn color_for(&mut self, _index: usize) -> String {
        format!("#{:06x}", self.rng.gen_range(0..0x100_0000))
    }
}
