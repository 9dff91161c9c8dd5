use crate::foundation::error::{VoxweaveError, VoxweaveResult};

/// 1-based fragment ordinal in authored order.
///
/// Drives the persisted filename (`fragment<N>.mp3`); zero is never a valid id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FragmentId(pub u32);

impl FragmentId {
    /// Create a validated fragment id (`n >= 1`).
    pub fn new(n: u32) -> VoxweaveResult<Self> {
        if n == 0 {
            return Err(VoxweaveError::validation("FragmentId must be >= 1"));
        }
        Ok(Self(n))
    }
}

impl std::fmt::Display for FragmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Convert a millisecond duration to the nearest whole sample frame count at `sample_rate`.
pub fn ms_to_frames(ms: u64, sample_rate: u32) -> u64 {
    let num = u128::from(ms) * u128::from(sample_rate);
    ((num + 500) / 1000) as u64
}

/// Convert a sample frame count to the nearest whole millisecond at `sample_rate`.
pub fn frames_to_ms(frames: u64, sample_rate: u32) -> u64 {
    if sample_rate == 0 {
        return 0;
    }
    let num = u128::from(frames) * 1000;
    let den = u128::from(sample_rate);
    ((num + (den / 2)) / den) as u64
}
