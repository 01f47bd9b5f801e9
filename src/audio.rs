//! Sound effect and music routing
//!
//! Pre-created `HtmlAudioElement` pools, one per cue; cues with several
//! recordings pick one at random per play. All playback is fire-and-forget:
//! a blocked or failed `play()` is logged and never touches the simulation.

#[cfg(not(target_arch = "wasm32"))]
use crate::settings::AudioSettings;

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Good pickup collected
    Collect,
    /// Player took a hit
    Hit,
    /// Slipped on a bad pickup
    Slip,
    /// Run ended
    GameOver,
    /// Jump accepted
    Jump,
    /// The cat obstacle's own cry, layered under the hit cue
    Cat,
}

impl SoundEffect {
    /// Audio files for this cue; multi-entry cues pick randomly per play
    pub fn sources(self) -> &'static [&'static str] {
        match self {
            SoundEffect::Collect => &["assets/audio/items.wav"],
            SoundEffect::Hit => &[
                "assets/audio/aduh1.wav",
                "assets/audio/aduh2.wav",
                "assets/audio/aduh3.wav",
                "assets/audio/aduh4.wav",
            ],
            SoundEffect::Slip => &["assets/audio/pisang.wav"],
            SoundEffect::GameOver => &["assets/audio/gameover.wav"],
            SoundEffect::Jump => &[
                "assets/audio/loncat1.mp3",
                "assets/audio/loncat2.mp3",
                "assets/audio/loncat3.mp3",
            ],
            SoundEffect::Cat => &["assets/audio/cat.mp3"],
        }
    }
}

/// Background music tracks; one is picked at random per session
pub const BGM_TRACKS: [&str; 2] = ["assets/audio/backsound1.mp3", "assets/audio/backsound2.mp3"];

#[cfg(target_arch = "wasm32")]
mod wasm {
    use super::{BGM_TRACKS, SoundEffect};
    use crate::consts::{BGM_VOLUME, SFX_VOLUME};
    use crate::settings::AudioSettings;
    use wasm_bindgen::JsValue;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    /// Audio routing with independent, persisted BGM/SFX toggles
    pub struct AudioManager {
        pub settings: AudioSettings,
        collect: Vec<HtmlAudioElement>,
        hit: Vec<HtmlAudioElement>,
        slip: Vec<HtmlAudioElement>,
        game_over: Vec<HtmlAudioElement>,
        jump: Vec<HtmlAudioElement>,
        cat: Vec<HtmlAudioElement>,
        current_bgm: Option<HtmlAudioElement>,
    }

    impl AudioManager {
        pub fn new() -> Self {
            let settings = AudioSettings::load();
            Self {
                settings,
                collect: pool(SoundEffect::Collect),
                hit: pool(SoundEffect::Hit),
                slip: pool(SoundEffect::Slip),
                game_over: pool(SoundEffect::GameOver),
                jump: pool(SoundEffect::Jump),
                cat: pool(SoundEffect::Cat),
                current_bgm: None,
            }
        }

        /// Play a one-shot cue, respecting the SFX toggle
        pub fn play(&self, effect: SoundEffect) {
            if !self.settings.sfx_enabled {
                return;
            }
            let elements = match effect {
                SoundEffect::Collect => &self.collect,
                SoundEffect::Hit => &self.hit,
                SoundEffect::Slip => &self.slip,
                SoundEffect::GameOver => &self.game_over,
                SoundEffect::Jump => &self.jump,
                SoundEffect::Cat => &self.cat,
            };
            let Some(el) = pick(elements) else { return };
            el.set_current_time(0.0);
            el.set_volume(SFX_VOLUME);
            fire_and_forget(el.play(), "sfx");
        }

        /// Start a randomly chosen looped track, replacing any current one
        pub fn start_bgm(&mut self) {
            self.stop_bgm();

            let idx = (js_sys::Math::random() * BGM_TRACKS.len() as f64) as usize;
            let track = BGM_TRACKS[idx.min(BGM_TRACKS.len() - 1)];

            match HtmlAudioElement::new_with_src(track) {
                Ok(el) => {
                    el.set_loop(true);
                    el.set_volume(BGM_VOLUME);
                    if self.settings.bgm_enabled {
                        fire_and_forget(el.play(), "bgm");
                    }
                    self.current_bgm = Some(el);
                }
                Err(_) => log::warn!("Failed to create BGM element for {}", track),
            }
        }

        pub fn pause_bgm(&self) {
            if let Some(el) = &self.current_bgm {
                let _ = el.pause();
            }
        }

        pub fn resume_bgm(&self) {
            if !self.settings.bgm_enabled {
                return;
            }
            if let Some(el) = &self.current_bgm {
                fire_and_forget(el.play(), "bgm");
            }
        }

        /// Pause and rewind the current track
        pub fn stop_bgm(&mut self) {
            if let Some(el) = self.current_bgm.take() {
                let _ = el.pause();
                el.set_current_time(0.0);
            }
        }

        pub fn set_bgm_enabled(&mut self, enabled: bool) {
            self.settings.bgm_enabled = enabled;
            self.settings.save();
            if enabled {
                self.resume_bgm();
            } else {
                self.pause_bgm();
            }
        }

        pub fn set_sfx_enabled(&mut self, enabled: bool) {
            self.settings.sfx_enabled = enabled;
            self.settings.save();
        }
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    fn pool(effect: SoundEffect) -> Vec<HtmlAudioElement> {
        effect
            .sources()
            .iter()
            .filter_map(|src| HtmlAudioElement::new_with_src(src).ok())
            .collect()
    }

    fn pick(elements: &[HtmlAudioElement]) -> Option<&HtmlAudioElement> {
        if elements.is_empty() {
            return None;
        }
        let idx = (js_sys::Math::random() * elements.len() as f64) as usize;
        elements.get(idx.min(elements.len() - 1))
    }

    /// Consume a playback promise off the simulation path; failures (e.g.
    /// autoplay policy before a user gesture) are logged and dropped
    fn fire_and_forget(result: Result<js_sys::Promise, JsValue>, what: &'static str) {
        match result {
            Ok(promise) => {
                wasm_bindgen_futures::spawn_local(async move {
                    if JsFuture::from(promise).await.is_err() {
                        log::debug!("{} playback blocked", what);
                    }
                });
            }
            Err(_) => log::debug!("{} playback failed to start", what),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::AudioManager;

/// Native stub so the library builds and tests off-browser
#[cfg(not(target_arch = "wasm32"))]
#[derive(Default)]
pub struct AudioManager {
    pub settings: AudioSettings,
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new() -> Self {
        Self {
            settings: AudioSettings::load(),
        }
    }

    pub fn play(&self, _effect: SoundEffect) {}
    pub fn start_bgm(&mut self) {}
    pub fn pause_bgm(&self) {}
    pub fn resume_bgm(&self) {}
    pub fn stop_bgm(&mut self) {}

    pub fn set_bgm_enabled(&mut self, enabled: bool) {
        self.settings.bgm_enabled = enabled;
    }

    pub fn set_sfx_enabled(&mut self, enabled: bool) {
        self.settings.sfx_enabled = enabled;
    }
}
