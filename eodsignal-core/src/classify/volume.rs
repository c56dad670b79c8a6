//! Volume-regime label from the ratio of today's volume to its 20-day average.

use crate::config::VolumeLabelThresholds;
use crate::domain::VolumeLabel;

/// Bucket a volume ratio against seven ascending thresholds `t`.
///
/// | ratio                | label        |
/// |----------------------|--------------|
/// | absent or <= 0       | Dormant      |
/// | (0, t0)              | VeryLow      |
/// | [t0, t1)             | Low          |
/// | [t1, t2)             | Normal       |
/// | [t2, t3)             | Active       |
/// | [t3, t4)             | Burst        |
/// | [t4, t6)             | StrongBurst  |
/// | >= t6                | Climax       |
///
/// `t5` only constrains the ordering; the band between `t4` and `t6` is a
/// single label.
pub fn classify_volume(ratio: Option<f64>, t: &VolumeLabelThresholds) -> VolumeLabel {
    let t = &t.0;
    let r = match ratio {
        Some(r) if r > 0.0 => r,
        _ => return VolumeLabel::Dormant,
    };
    if r < t[0] {
        VolumeLabel::VeryLow
    } else if r < t[1] {
        VolumeLabel::Low
    } else if r < t[2] {
        VolumeLabel::Normal
    } else if r < t[3] {
        VolumeLabel::Active
    } else if r < t[4] {
        VolumeLabel::Burst
    } else if r < t[6] {
        VolumeLabel::StrongBurst
    } else {
        VolumeLabel::Climax
    }
}
