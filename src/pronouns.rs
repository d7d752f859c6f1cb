//! Pronoun Vocabulary
//!
//! The fixed, ordered list of pronoun tokens whose probability mass is read
//! off the masked-language model, partitioned by position into human-referring
//! and non-human-referring groups. The order and partition are load-bearing:
//! scores are only comparable across runs if both stay exactly as defined.

/// Pronoun tokens in scoring order. The first [`N_HUMAN`] entries are
/// human-referring; the rest refer to non-human entities. Case-distinct
/// entries ("You" vs "you") are separate vocabulary slots.
pub const PRONOUNS: [&str; 19] = [
    "you", "we", "us", "he", "she", "her", "him", "You", "We", "Us", "He",
    "She", "Her", "I", "i", "it", "its", "It", "Its",
];

/// Number of leading human-referring tokens in [`PRONOUNS`].
pub const N_HUMAN: usize = 15;

/// Split a per-sentence probability vector into (human, non-human) mass.
///
/// The vector must be in [`PRONOUNS`] order. The partition is positional:
/// indices `0..N_HUMAN` are summed as human mass, the remainder as non-human.
pub fn partition_mass(probs: &[f64]) -> (f64, f64) {
    debug_assert_eq!(probs.len(), PRONOUNS.len());
    let human: f64 = probs[..N_HUMAN].iter().sum();
    let nonhuman: f64 = probs[N_HUMAN..].iter().sum();
    (human, nonhuman)
}
