//! Local best score and display name persistence
//!
//! Stores the device-local best and the player's leaderboard name in
//! browser LocalStorage as plain string values. Native builds keep the
//! in-memory struct but skip persistence.

/// LocalStorage key for the best score
const BEST_KEY: &str = "lane_dash_best";
/// LocalStorage key for the display name
const NAME_KEY: &str = "lane_dash_name";

/// Shortest display name accepted for leaderboard submission
pub const MIN_NAME_CHARS: usize = 2;

/// Per-device player profile
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalProfile {
    /// Best score seen on this device
    pub best_score: u64,
    /// Name used for leaderboard submissions (trimmed)
    pub display_name: String,
}

impl LocalProfile {
    /// Record a finished run. Returns true when `score` beat the stored
    /// best (the caller should save).
    pub fn record_score(&mut self, score: u64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            true
        } else {
            false
        }
    }

    /// Update the display name, trimming surrounding whitespace
    pub fn set_display_name(&mut self, name: &str) {
        self.display_name = name.trim().to_string();
    }

    /// Whether the stored name is long enough to submit under
    pub fn has_valid_name(&self) -> bool {
        self.display_name.trim().chars().count() >= MIN_NAME_CHARS
    }

    /// Load profile from browser LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();

        let mut profile = Self::default();
        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(BEST_KEY) {
                match raw.parse::<u64>() {
                    Ok(best) => profile.best_score = best,
                    Err(_) => log::warn!("ignoring unparseable stored best score: {raw:?}"),
                }
            }
            if let Ok(Some(name)) = storage.get_item(NAME_KEY) {
                profile.set_display_name(&name);
            }
        }
        profile
    }

    /// Save profile to browser LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(BEST_KEY, &self.best_score.to_string())
                .and_then(|_| storage.set_item(NAME_KEY, &self.display_name))
                .is_err()
            {
                log::warn!("failed to save profile to LocalStorage");
            }
        }
    }

    /// Native stub - no persistence
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    /// Native stub - no persistence
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_score_keeps_best() {
        let mut profile = LocalProfile::default();
        assert!(profile.record_score(100));
        assert_eq!(profile.best_score, 100);
        assert!(!profile.record_score(50));
        assert_eq!(profile.best_score, 100);
        assert!(profile.record_score(150));
        assert_eq!(profile.best_score, 150);
    }

    #[test]
    fn test_equal_score_is_not_a_new_best() {
        let mut profile = LocalProfile::default();
        profile.record_score(100);
        assert!(!profile.record_score(100));
    }

    #[test]
    fn test_display_name_trimmed_and_validated() {
        let mut profile = LocalProfile::default();
        profile.set_display_name("  Ada  ");
        assert_eq!(profile.display_name, "Ada");
        assert!(profile.has_valid_name());

        profile.set_display_name("x");
        assert!(!profile.has_valid_name());
        profile.set_display_name("   ");
        assert!(!profile.has_valid_name());
    }
}
