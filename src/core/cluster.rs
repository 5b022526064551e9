//! Frequency-reuse cluster size selection.
//!
//! Valid hexagonal reuse clusters have `N = i² + i·j + j²` cells. The selector
//! returns the smallest such `N` that satisfies the co-channel interference
//! requirement derived from the target SIR.

/// Largest shift parameter enumerated for `i` and `j`.
pub const MAX_SHIFT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSelection {
    /// Theoretical (real-valued) cluster requirement.
    pub required: f64,
    pub size: u32,
    /// True when `required` exceeded every candidate and the largest was returned.
    pub saturated: bool,
}

/// Distinct positive `i² + i·j + j²` for `i, j` in `0..=MAX_SHIFT`, ascending.
pub fn candidate_sizes() -> Vec<u32> {
    let mut sizes: Vec<u32> = (0..=MAX_SHIFT)
        .flat_map(|i| (0..=MAX_SHIFT).map(move |j| i * i + i * j + j * j))
        .filter(|&n| n > 0)
        .collect();
    sizes.sort_unstable();
    sizes.dedup();
    sizes
}

/// `((sir_linear · interferers) ^ (2 / n)) / 3`
pub fn theoretical_cluster_size(sir_linear: f64, co_channel_interferers: f64, path_loss_exponent: f64) -> f64 {
    (sir_linear * co_channel_interferers).powf(2.0 / path_loss_exponent) / 3.0
}

/// Picks the smallest candidate `>= required`, falling back to the largest candidate.
///
/// An infinite or NaN `required` also falls back to the largest candidate.
pub fn select_cluster_size(required: f64) -> ClusterSelection {
    select_from(&candidate_sizes(), required)
}

pub(crate) fn select_from(candidates: &[u32], required: f64) -> ClusterSelection {
    match candidates.iter().copied().find(|&n| f64::from(n) >= required) {
        Some(size) => ClusterSelection {
            required,
            size,
            saturated: false,
        },
        None => {
            let size = candidates.last().copied().unwrap_or(1);
            tracing::warn!(
                "⚠️ Cluster requirement {:.2} exceeds every reuse pattern; capping at {}",
                required,
                size
            );
            ClusterSelection {
                required,
                size,
                saturated: true,
            }
        }
    }
}
