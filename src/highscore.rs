//! Best-score persistence
//!
//! A single scalar in LocalStorage. Writes are fire-and-forget: a failed
//! store never reaches the simulation.

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "granny_dash_highscore";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Record a finished run. Returns true (and persists) only when the
    /// score beats the stored best.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save();
        true
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(best) = raw.parse::<u64>() {
                    log::info!("Loaded high score: {}", best);
                    return Self { best };
                }
            }
        }

        log::info!("No high score found, starting fresh");
        Self::new()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(Self::STORAGE_KEY, &self.best.to_string())
                .is_err()
            {
                log::warn!("Failed to persist high score");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_tracks_best() {
        let mut hs = HighScore::new();
        assert!(hs.submit(10));
        assert_eq!(hs.best, 10);

        // Equal or lower scores are not a new best
        assert!(!hs.submit(10));
        assert!(!hs.submit(3));
        assert_eq!(hs.best, 10);

        assert!(hs.submit(11));
        assert_eq!(hs.best, 11);
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let mut hs = HighScore::new();
        assert!(!hs.submit(0));
        assert_eq!(hs.best, 0);
    }
}
