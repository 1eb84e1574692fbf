//! Audio/transcript pairing by file name.
//!
//! Transcription pipelines name their output inconsistently, so each audio
//! file is matched against the sidecars in its directory by a chain of
//! matchers. The first matcher that finds something wins.

use once_cell::sync::Lazy;
use regex::Regex;

/// Audio extensions recognised in listings, lowercase.
pub const AUDIO_EXTENSIONS: [&str; 5] = ["flac", "wav", "mp3", "m4a", "ogg"];

const SIDECAR_SUFFIX: &str = ".json";

/// `_<uuid>.<audio ext>` at the end of a file name
static EMBEDDED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)_([a-f0-9-]{36})\.(flac|wav|mp3|m4a|ogg)$").expect("valid identifier regex")
});

/// Which matcher produced a pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// `<stem>.json` next to `<stem>.<ext>`
    ExactStem,
    /// Sidecar name contains the UUID embedded in the audio name
    EmbeddedIdentifier,
    /// One stem contains the other
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing<'a> {
    pub sidecar: &'a str,
    pub strategy: MatchStrategy,
}

type Matcher = for<'a> fn(&str, &'a [String]) -> Option<&'a str>;

const MATCHERS: [(MatchStrategy, Matcher); 3] = [
    (MatchStrategy::ExactStem, exact_stem),
    (MatchStrategy::EmbeddedIdentifier, embedded_identifier),
    (MatchStrategy::Substring, substring_containment),
];

pub fn is_audio(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| AUDIO_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
}

pub fn is_sidecar(file_name: &str) -> bool {
    file_name.ends_with(SIDECAR_SUFFIX)
}

/// Audio file name without its extension
pub fn audio_stem(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if is_audio(file_name) => stem,
        _ => file_name,
    }
}

fn sidecar_stem(file_name: &str) -> &str {
    file_name.strip_suffix(SIDECAR_SUFFIX).unwrap_or(file_name)
}

/// Find the transcript sidecar for `audio_name` among `sidecars`.
///
/// Deterministic for a given `sidecars` order.
pub fn pair_transcript<'a>(audio_name: &str, sidecars: &'a [String]) -> Option<Pairing<'a>> {
    MATCHERS.iter().find_map(|(strategy, matcher)| {
        matcher(audio_name, sidecars).map(|sidecar| Pairing {
            sidecar,
            strategy: *strategy,
        })
    })
}

fn exact_stem<'a>(audio_name: &str, sidecars: &'a [String]) -> Option<&'a str> {
    let wanted = format!("{}{}", audio_stem(audio_name), SIDECAR_SUFFIX);
    sidecars
        .iter()
        .find(|sidecar| **sidecar == wanted)
        .map(String::as_str)
}

fn embedded_identifier<'a>(audio_name: &str, sidecars: &'a [String]) -> Option<&'a str> {
    let id = EMBEDDED_ID.captures(audio_name)?.get(1)?.as_str();
    sidecars
        .iter()
        .find(|sidecar| sidecar.contains(id))
        .map(String::as_str)
}

// Known weak spot: with overlapping names in one folder this can pick a
// sibling's transcript. Ties go to the first sidecar in `sidecars`.
fn substring_containment<'a>(audio_name: &str, sidecars: &'a [String]) -> Option<&'a str> {
    let stem = audio_stem(audio_name);
    if stem.is_empty() {
        return None;
    }

    sidecars
        .iter()
        .find(|sidecar| {
            let candidate = sidecar_stem(sidecar);
            !candidate.is_empty() && (stem.contains(candidate) || candidate.contains(stem))
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classification() {
        assert!(is_audio("a.flac"));
        assert!(is_audio("A.WAV"));
        assert!(is_audio("x.y.Mp3"));
        assert!(is_audio("clip.m4a"));
        assert!(is_audio("clip.ogg"));
        assert!(!is_audio("flac"));
        assert!(!is_audio("a.aac"));
        assert!(!is_audio("a.json"));

        assert!(is_sidecar("a.json"));
        assert!(!is_sidecar("a.json.bak"));
    }

    #[test]
    fn test_audio_stem() {
        assert_eq!(audio_stem("take1.flac"), "take1");
        assert_eq!(audio_stem("talk.v2.MP3"), "talk.v2");
        assert_eq!(audio_stem("readme.txt"), "readme.txt");
    }

    #[test]
    fn test_exact_stem_wins_over_other_tiers() {
        let sidecars = names(&["take10.json", "take1.json"]);
        let pairing = pair_transcript("take1.flac", &sidecars).unwrap();
        assert_eq!(pairing.sidecar, "take1.json");
        assert_eq!(pairing.strategy, MatchStrategy::ExactStem);
    }

    #[test]
    fn test_embedded_identifier() {
        let sidecars = names(&["other.json", "notes_3fa85f64-5717-4562-b3fc-2c963f66afa6.json"]);
        let pairing =
            pair_transcript("rec_3fa85f64-5717-4562-b3fc-2c963f66afa6.flac", &sidecars).unwrap();
        assert_eq!(
            pairing.sidecar,
            "notes_3fa85f64-5717-4562-b3fc-2c963f66afa6.json"
        );
        assert_eq!(pairing.strategy, MatchStrategy::EmbeddedIdentifier);
    }

    #[test]
    fn test_embedded_identifier_requires_underscore_and_extension() {
        assert_eq!(
            embedded_identifier(
                "rec-3fa85f64-5717-4562-b3fc-2c963f66afa6.flac",
                &names(&["x_3fa85f64-5717-4562-b3fc-2c963f66afa6.json"])
            ),
            None
        );
        assert_eq!(
            embedded_identifier(
                "rec_3fa85f64-5717-4562-b3fc-2c963f66afa6.txt",
                &names(&["x_3fa85f64-5717-4562-b3fc-2c963f66afa6.json"])
            ),
            None
        );
    }

    #[test]
    fn test_substring_either_direction() {
        let sidecars = names(&["unrelated.json", "interview.json"]);
        let pairing = pair_transcript("interview_part1.wav", &sidecars).unwrap();
        assert_eq!(pairing.sidecar, "interview.json");
        assert_eq!(pairing.strategy, MatchStrategy::Substring);

        let sidecars = names(&["interview_full_transcript.json"]);
        let pairing = pair_transcript("interview.wav", &sidecars).unwrap();
        assert_eq!(pairing.sidecar, "interview_full_transcript.json");
    }

    #[test]
    fn test_substring_first_candidate_wins() {
        let sidecars = names(&["ab.json", "abc.json"]);
        assert_eq!(
            pair_transcript("abcd.mp3", &sidecars).map(|p| p.sidecar),
            Some("ab.json")
        );
    }

    #[test]
    fn test_empty_stems_never_match() {
        let sidecars = names(&[".json"]);
        assert_eq!(pair_transcript("talk.mp3", &sidecars), None);
    }

    #[test]
    fn test_no_match() {
        let sidecars = names(&["alpha.json", "beta.json"]);
        assert_eq!(pair_transcript("gamma.ogg", &sidecars), None);
        assert_eq!(pair_transcript("gamma.ogg", &[]), None);
    }

    #[test]
    fn test_pairing_is_deterministic() {
        let sidecars = names(&["ab.json", "abc.json", "b.json"]);
        let first = pair_transcript("abc_x.flac", &sidecars);
        for _ in 0..10 {
            assert_eq!(pair_transcript("abc_x.flac", &sidecars), first);
        }
    }
}
