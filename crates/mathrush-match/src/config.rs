//! Matchmaking configuration and rating tolerance bands.

use mathrush_model::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::MatchError;

// ---------------------------------------------------------------------------
// ToleranceBands
// ---------------------------------------------------------------------------

/// One step of the tolerance function: players rated at most `up_to`
/// accept opponents within `tolerance` points. `up_to: None` is the
/// open-ended top band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub up_to: Option<i64>,
    pub tolerance: i64,
}

/// A non-decreasing step function from rating to allowed rating gap.
///
/// Higher bands get wider tolerance because fewer players sit up there.
/// The defaults are:
///
/// ```text
/// points ≤ 50   → 25
/// points ≤ 150  → 30
/// points ≤ 250  → 40
/// points > 250  → 50
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToleranceBands(Vec<ToleranceBand>);

impl ToleranceBands {
    /// Builds bands from `(up_to, tolerance)` pairs in ascending order.
    pub fn new(bands: impl IntoIterator<Item = (Option<i64>, i64)>) -> Self {
        Self(
            bands
                .into_iter()
                .map(|(up_to, tolerance)| ToleranceBand { up_to, tolerance })
                .collect(),
        )
    }

    /// Returns the tolerance for a player rated `points`.
    pub fn tolerance_for(&self, points: i64) -> i64 {
        self.0
            .iter()
            .find(|band| band.up_to.is_none_or(|max| points <= max))
            .or(self.0.last())
            .map_or(0, |band| band.tolerance)
    }

    /// The bands, lowest first.
    pub fn bands(&self) -> &[ToleranceBand] {
        &self.0
    }

    /// Checks that the bands describe a total, non-decreasing function.
    pub fn validate(&self) -> Result<(), MatchError> {
        let Some((last, steps)) = self.0.split_last() else {
            return Err(MatchError::InvalidConfig("tolerance bands must not be empty".into()));
        };
        if last.up_to.is_some() {
            return Err(MatchError::InvalidConfig(
                "the last tolerance band must be open-ended".into(),
            ));
        }

        let mut previous: Option<ToleranceBand> = None;
        for band in steps.iter().chain(std::iter::once(last)) {
            if band.tolerance < 0 {
                return Err(MatchError::InvalidConfig(format!(
                    "negative tolerance {}",
                    band.tolerance
                )));
            }
            if let Some(prev) = previous {
                let (Some(prev_max), current_max) = (prev.up_to, band.up_to) else {
                    return Err(MatchError::InvalidConfig(
                        "only the last tolerance band may be open-ended".into(),
                    ));
                };
                if let Some(max) = current_max {
                    if max <= prev_max {
                        return Err(MatchError::InvalidConfig(format!(
                            "tolerance breakpoints must increase (got {prev_max} then {max})"
                        )));
                    }
                }
                if band.tolerance < prev.tolerance {
                    return Err(MatchError::InvalidConfig(format!(
                        "tolerance must not shrink as points grow (got {} then {})",
                        prev.tolerance, band.tolerance
                    )));
                }
            }
            previous = Some(*band);
        }
        Ok(())
    }
}

impl Default for ToleranceBands {
    fn default() -> Self {
        Self::new([(Some(50), 25), (Some(150), 30), (Some(250), 40), (None, 50)])
    }
}

// ---------------------------------------------------------------------------
// MatchConfig
// ---------------------------------------------------------------------------

/// Settings for the match allocator.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Players per game. Reaching it starts the game.
    pub capacity: usize,

    /// Rating gap accepted for each rating band.
    pub tolerance: ToleranceBands,

    /// Whether new games hand out starting power-ups.
    pub power_ups_enabled: bool,

    /// How many power-ups each admitted player receives.
    pub initial_power_ups: usize,

    /// Questions fetched for every new game.
    pub question_batch_size: usize,

    /// How many times a join is re-attempted after losing a write race
    /// before opening a new game instead.
    pub max_commit_attempts: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            tolerance: ToleranceBands::default(),
            power_ups_enabled: true,
            initial_power_ups: 3,
            question_batch_size: 10,
            max_commit_attempts: 3,
        }
    }
}

impl MatchConfig {
    /// Rejects settings the allocator can't honor.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.capacity < DEFAULT_CAPACITY {
            return Err(MatchError::InvalidConfig(format!(
                "capacity must be at least {DEFAULT_CAPACITY}, got {}",
                self.capacity
            )));
        }
        if self.max_commit_attempts == 0 {
            return Err(MatchError::InvalidConfig(
                "max_commit_attempts must be at least 1".into(),
            ));
        }
        self.tolerance.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tolerance_for_default_breakpoints() {
        let bands = ToleranceBands::default();
        assert_eq!(bands.tolerance_for(0), 25);
        assert_eq!(bands.tolerance_for(50), 25);
        assert_eq!(bands.tolerance_for(51), 30);
        assert_eq!(bands.tolerance_for(150), 30);
        assert_eq!(bands.tolerance_for(151), 40);
        assert_eq!(bands.tolerance_for(250), 40);
        assert_eq!(bands.tolerance_for(251), 50);
        assert_eq!(bands.tolerance_for(10_000), 50);
    }

    #[test]
    fn test_tolerance_for_negative_points_uses_lowest_band() {
        assert_eq!(ToleranceBands::default().tolerance_for(-40), 25);
    }

    #[test]
    fn test_tolerance_for_is_non_decreasing() {
        let bands = ToleranceBands::default();
        let mut previous = bands.tolerance_for(-100);
        for points in -100..=400 {
            let current = bands.tolerance_for(points);
            assert!(current >= previous, "tolerance dropped at {points}");
            assert!([25, 30, 40, 50].contains(&current));
            previous = current;
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(MatchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_shrinking_tolerance() {
        let bands = ToleranceBands::new([(Some(50), 30), (None, 20)]);
        assert!(matches!(bands.validate(), Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_unordered_breakpoints() {
        let bands = ToleranceBands::new([(Some(150), 25), (Some(50), 30), (None, 50)]);
        assert!(bands.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bounded_top_band() {
        let bands = ToleranceBands::new([(Some(50), 25)]);
        assert!(bands.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_open_band_in_the_middle() {
        let bands = ToleranceBands::new([(None, 25), (None, 30)]);
        assert!(bands.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_single_slot_games() {
        let config = MatchConfig {
            capacity: 1,
            ..MatchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_partial_json_keeps_defaults() {
        let config: MatchConfig =
            serde_json::from_str(r#"{ "power_ups_enabled": false }"#).unwrap();
        assert!(!config.power_ups_enabled);
        assert_eq!(config.capacity, 2);
        assert_eq!(config.tolerance, ToleranceBands::default());
    }

    #[test]
    fn test_tolerance_bands_json_shape() {
        let bands: ToleranceBands = serde_json::from_str(
            r#"[{ "up_to": 100, "tolerance": 10 }, { "up_to": null, "tolerance": 20 }]"#,
        )
        .unwrap();
        assert_eq!(bands.tolerance_for(100), 10);
        assert_eq!(bands.tolerance_for(101), 20);
    }
}
