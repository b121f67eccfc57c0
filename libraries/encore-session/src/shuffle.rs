//! Track list randomization

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};

/// Fisher-Yates shuffle using the thread-local RNG
///
/// Every ordering is equally likely.
pub fn shuffle_tracks<T>(tracks: &mut [T]) {
    let mut rng = thread_rng();
    shuffle_tracks_with(tracks, &mut rng);
}

/// Fisher-Yates shuffle driven by the given RNG
pub fn shuffle_tracks_with<T, R: Rng + ?Sized>(tracks: &mut [T], rng: &mut R) {
    tracks.shuffle(rng);
}
