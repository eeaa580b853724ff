//! Audio behind a minimal media interface
//!
//! The session only ever needs play/pause/rewind on the music loop and a
//! one-shot win sound. Browsers may reject playback (autoplay policy); that
//! is logged and the game carries on silently.

/// Media controls the session drives
pub trait SoundPlayer {
    /// Start (or resume) the looping background music
    fn play_music(&mut self);
    /// Pause the background music
    fn pause_music(&mut self);
    /// Seek the background music back to its beginning
    fn rewind_music(&mut self);
    /// Play the one-shot win sound
    fn play_win(&mut self);
}

/// No-op backend for native builds and headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl SoundPlayer for SilentAudio {
    fn play_music(&mut self) {
        log::debug!("(silent) music play");
    }

    fn pause_music(&mut self) {
        log::debug!("(silent) music pause");
    }

    fn rewind_music(&mut self) {}

    fn play_win(&mut self) {
        log::debug!("(silent) win sound");
    }
}

/// Effective volume from settings (0.0 when muted)
pub fn effective_volume(master: f32, channel: f32, muted: bool) -> f32 {
    if muted {
        0.0
    } else {
        (master * channel).clamp(0.0, 1.0)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use js_sys::Promise;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlAudioElement;

    use super::{SoundPlayer, effective_volume};
    use crate::settings::Settings;

    /// Music loop and win sound as `<audio>` elements
    pub struct WebAudio {
        music: Option<HtmlAudioElement>,
        win: Option<HtmlAudioElement>,
    }

    impl WebAudio {
        pub fn new(settings: &Settings) -> Self {
            let music = load(&settings.music_url);
            if let Some(el) = &music {
                el.set_loop(true);
                el.set_volume(effective_volume(
                    settings.master_volume,
                    settings.music_volume,
                    settings.muted,
                ) as f64);
            }

            let win = load(&settings.win_sound_url);
            if let Some(el) = &win {
                el.set_volume(effective_volume(
                    settings.master_volume,
                    settings.sfx_volume,
                    settings.muted,
                ) as f64);
            }

            Self { music, win }
        }
    }

    fn load(url: &str) -> Option<HtmlAudioElement> {
        match HtmlAudioElement::new_with_src(url) {
            Ok(el) => Some(el),
            Err(e) => {
                log::warn!("Failed to create audio element for {}: {:?}", url, e);
                None
            }
        }
    }

    /// Start playback; a rejected play promise is logged and ignored
    fn play(el: &HtmlAudioElement, what: &'static str) {
        match el.play() {
            Ok(promise) => watch_playback(promise, what),
            Err(e) => log::warn!("Error playing {}: {:?}", what, e),
        }
    }

    /// Autoplay policy rejects `play()` until the first user gesture
    fn watch_playback(promise: Promise, what: &'static str) {
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                log::warn!("Error playing {}: {:?}", what, e);
            }
        });
    }

    impl SoundPlayer for WebAudio {
        fn play_music(&mut self) {
            if let Some(el) = &self.music {
                play(el, "music");
            }
        }

        fn pause_music(&mut self) {
            if let Some(el) = &self.music {
                let _ = el.pause();
            }
        }

        fn rewind_music(&mut self) {
            if let Some(el) = &self.music {
                el.set_current_time(0.0);
            }
        }

        fn play_win(&mut self) {
            if let Some(el) = &self.win {
                el.set_current_time(0.0);
                play(el, "win sound");
            }
        }
    }
}
