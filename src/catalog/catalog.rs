use super::Track;

/// Immutable list of the audio tracks served for review.
///
/// Built once at startup and never mutated for the process lifetime.
#[derive(Debug)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Catalog {
        Catalog { tracks }
    }

    /// The built-in soundscape selection.
    pub fn builtin() -> Catalog {
        Catalog::new(vec![
            Track::new(
                1,
                "Deep Relaxing Ambient Music",
                "test-DeepRelaxingAmbientMusic-100.wav",
            ),
            Track::new(2, "Forest Rain", "test-ForestBath-100.wav"),
            Track::new(
                3,
                "Rain and Animal Sound",
                "test-RainSoundAndAnimalSound-100.wav",
            ),
            Track::new(
                4,
                "Soothing Soundscape For Deep Sleep",
                "test-SoothingSoundscapeForDeepSleepInsomniaRelief-100.wav",
            ),
            Track::new(5, "Stillness and Innerpeace", "test-StillnessAndInnerPeace100.wav"),
        ])
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get_tracks_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn dummy() -> Catalog {
        Catalog::new(vec![Track::new(1, "Test Track", "test-track.wav")])
    }
}
