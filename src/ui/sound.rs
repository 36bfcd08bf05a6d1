/// Sound engine: procedural chiptune effects via rodio.
///
/// Every effect is synthesized once at startup into an in-memory WAV
/// buffer and played fire-and-forget through rodio's mixer.
///
/// Build without the "sound" feature to get a silent stub with the same API.

use crate::sim::event::GameEvent;

/// Effects the game can play.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Coin,
    Caught,
    TimeUp,
    LevelClear,
    FinalWin,
}

impl Sfx {
    /// Which effect (if any) a step event should trigger.
    pub fn for_event(event: &GameEvent) -> Option<Sfx> {
        match event {
            GameEvent::CoinCollected { .. } => Some(Sfx::Coin),
            GameEvent::PlayerCaught { .. } => Some(Sfx::Caught),
            GameEvent::TimeUp => Some(Sfx::TimeUp),
            GameEvent::GoalReached { .. } => Some(Sfx::LevelClear),
            _ => None,
        }
    }
}

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use super::Sfx;

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        coin: Arc<Vec<u8>>,
        caught: Arc<Vec<u8>>,
        time_up: Arc<Vec<u8>>,
        level_clear: Arc<Vec<u8>>,
        final_win: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            let coin = melody(&[988.0, 1319.0], 0.06, Wave::Square, 0.2);
            let caught = melody(&[392.0, 330.0, 262.0, 196.0], 0.14, Wave::Sine, 0.3);
            let time_up = melody(&[880.0, 0.0, 880.0, 0.0, 880.0], 0.09, Wave::Square, 0.2);
            let level_clear = melody(&[523.0, 659.0, 784.0, 1047.0], 0.09, Wave::Bright, 0.3);
            let mut final_win = melody(&[523.0, 523.0, 784.0, 784.0, 880.0, 1047.0], 0.12, Wave::Bright, 0.3);
            final_win.extend(melody(&[1047.0], 0.4, Wave::Sine, 0.3));

            Some(SoundEngine {
                _stream: stream,
                handle,
                coin: Arc::new(make_wav(&coin)),
                caught: Arc::new(make_wav(&caught)),
                time_up: Arc::new(make_wav(&time_up)),
                level_clear: Arc::new(make_wav(&level_clear)),
                final_win: Arc::new(make_wav(&final_win)),
            })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = match sfx {
                Sfx::Coin => &self.coin,
                Sfx::Caught => &self.caught,
                Sfx::TimeUp => &self.time_up,
                Sfx::LevelClear => &self.level_clear,
                Sfx::FinalWin => &self.final_win,
            };
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Synthesis: a melody is a run of equal-length notes
    // ════════════════════════════════════════════════════════════

    #[derive(Clone, Copy)]
    enum Wave {
        Sine,
        /// Sine + odd harmonic, reads as "square" on small speakers.
        Square,
        /// Sine + octave, for fanfares.
        Bright,
    }

    fn sample(wave: Wave, freq: f32, t: f32) -> f32 {
        let base = (t * freq * TAU).sin();
        match wave {
            Wave::Sine => base,
            Wave::Square => base * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3,
            Wave::Bright => base * 0.65 + (t * freq * 2.0 * TAU).sin() * 0.35,
        }
    }

    /// A frequency of 0.0 is a rest.
    fn melody(notes: &[f32], note_dur: f32, wave: Wave, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * note_dur) as usize;
        let mut out = Vec::with_capacity(n * notes.len());
        for &freq in notes {
            for i in 0..n {
                if freq == 0.0 {
                    out.push(0.0);
                    continue;
                }
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.7);
                out.push(sample(wave, freq, t) * env * volume);
            }
        }
        out
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        const CHANNELS: u16 = 1;
        const BITS: u16 = 16;
        let block_align = CHANNELS * BITS / 8;
        let byte_rate = SAMPLE_RATE * block_align as u32;
        let data_size = samples.len() as u32 * block_align as u32;

        let mut buf = Vec::with_capacity(44 + data_size as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVEfmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&CHANNELS.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&BITS.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let v = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_sizes() {
            let wav = make_wav(&melody(&[440.0, 0.0], 0.01, Wave::Sine, 0.5));
            let samples = 2 * (SAMPLE_RATE as f32 * 0.01) as usize;
            assert_eq!(wav.len(), 44 + samples * 2);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..16], b"WAVEfmt ");
            let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
            assert_eq!(data_size as usize, samples * 2);
        }

        #[test]
        fn rests_are_silent() {
            let m = melody(&[0.0], 0.01, Wave::Square, 1.0);
            assert!(m.iter().all(|&s| s == 0.0));
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}

/// Play whatever the step's events call for.
pub fn play_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for effect in events.iter().filter_map(Sfx::for_event) {
        sfx.play(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_mapping() {
        assert_eq!(Sfx::for_event(&GameEvent::CoinCollected { x: 1, y: 1, score: 10 }), Some(Sfx::Coin));
        assert_eq!(Sfx::for_event(&GameEvent::PlayerCaught { id: 0 }), Some(Sfx::Caught));
        assert_eq!(Sfx::for_event(&GameEvent::TimeUp), Some(Sfx::TimeUp));
        assert_eq!(Sfx::for_event(&GameEvent::GoalReached { x: 0, y: 0 }), Some(Sfx::LevelClear));
        assert_eq!(Sfx::for_event(&GameEvent::PlayerBlocked), None);
        assert_eq!(Sfx::for_event(&GameEvent::EnemyTurned { id: 2 }), None);
    }
}
