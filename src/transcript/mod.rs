use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod innertube;

use crate::resolver::VideoId;

/// One available captioning stream for a video, as enumerated by the source.
/// Tracks are cheap descriptors; no cue data is fetched until [`TranscriptSource::fetch_cues`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptTrack {
    /// BCP-47 style language code reported by the source (e.g. `en`, `pt-BR`).
    pub language_code: String,

    /// Human-readable language name.
    pub language: String,

    /// True for auto-generated (ASR) tracks, false for authored captions.
    pub is_generated: bool,

    /// Source-specific locator for the cue payload.
    pub base_url: String,
}

impl TranscriptTrack {
    /// Short label used in logs and diagnostics.
    pub fn describe(&self) -> String {
        if self.is_generated {
            format!("{} (auto-generated)", self.language_code)
        } else {
            self.language_code.clone()
        }
    }
}

/// A single timed text fragment within a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cue {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// A successfully fetched transcript: the joined cue text plus the
/// metadata of the track that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub language_code: String,
    pub is_generated: bool,
}

/// Outcome kinds the acquirer distinguishes when talking to a transcript
/// source. Anything that is not success, "disabled", or "not found" is an
/// opaque transport failure.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("transcripts are disabled for this video")]
    Disabled,

    #[error("video not found or unavailable")]
    NotFound,

    #[error("{0}")]
    Transport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("transcripts are disabled for video '{0}'")]
    TranscriptsDisabled(String),

    #[error("no transcript tracks found for video '{0}'")]
    NoTracksFound(String),

    #[error("all {count} transcript track(s) failed for video '{video_id}'", count = .causes.len())]
    AllCandidatesFailed {
        video_id: String,
        /// Per-candidate (track label, failure) pairs, in attempt order.
        causes: Vec<(String, SourceError)>,
    },
}

/// External transcript provider. The concrete implementation talks to
/// YouTube ([`innertube::InnertubeSource`]); tests substitute fakes.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Enumerate the tracks available for a video, in the source's order.
    async fn list_tracks(&self, id: &VideoId) -> Result<Vec<TranscriptTrack>, SourceError>;

    /// Fetch the cue sequence for one track.
    async fn fetch_cues(&self, track: &TranscriptTrack) -> Result<Vec<Cue>, SourceError>;
}

/// Fetch a transcript for `id`, trying every available track until one
/// succeeds.
///
/// Tracks whose language matches an entry in `preferred_languages` are tried
/// first (earlier preferences first); all remaining tracks follow in their
/// original enumeration order, so a video with any working track never fails
/// outright. Per-candidate failures are recorded and the loop moves on; the
/// first successful fetch wins and later candidates are not attempted.
pub async fn acquire(
    source: &dyn TranscriptSource,
    id: &VideoId,
    preferred_languages: &[String],
) -> Result<Transcript, AcquireError> {
    let tracks = source.list_tracks(id).await.map_err(|e| match e {
        SourceError::Disabled => AcquireError::TranscriptsDisabled(id.to_string()),
        SourceError::NotFound => AcquireError::NoTracksFound(id.to_string()),
        transport @ SourceError::Transport(_) => AcquireError::AllCandidatesFailed {
            video_id: id.to_string(),
            causes: vec![("track enumeration".to_string(), transport)],
        },
    })?;

    if tracks.is_empty() {
        return Err(AcquireError::NoTracksFound(id.to_string()));
    }

    let candidates = order_by_preference(tracks, preferred_languages);
    tracing::debug!(
        video_id = %id,
        order = ?candidates.iter().map(TranscriptTrack::describe).collect::<Vec<_>>(),
        "trying transcript tracks"
    );

    let mut causes = Vec::new();
    for track in &candidates {
        match source.fetch_cues(track).await {
            Ok(cues) => {
                let text = join_cues(&cues);
                if text.trim().is_empty() {
                    tracing::warn!(track = %track.describe(), "track fetched but contained no text");
                    causes.push((
                        track.describe(),
                        SourceError::Transport("track contained no cue text".to_string()),
                    ));
                    continue;
                }
                return Ok(Transcript {
                    text,
                    language_code: track.language_code.clone(),
                    is_generated: track.is_generated,
                });
            }
            Err(e) => {
                tracing::warn!(track = %track.describe(), error = %e, "transcript fetch failed, trying next track");
                causes.push((track.describe(), e));
            }
        }
    }

    Err(AcquireError::AllCandidatesFailed {
        video_id: id.to_string(),
        causes,
    })
}

/// Stable-sort tracks by preference rank: the index of the first preference
/// matching the track's language, with unmatched tracks ranked last. Stable
/// sorting preserves the enumeration order within each rank.
fn order_by_preference(
    mut tracks: Vec<TranscriptTrack>,
    preferred_languages: &[String],
) -> Vec<TranscriptTrack> {
    tracks.sort_by_key(|track| {
        preferred_languages
            .iter()
            .position(|lang| language_matches(lang, &track.language_code))
            .unwrap_or(preferred_languages.len())
    });
    tracks
}

/// Case-insensitive match that also lets a base preference like `pt`
/// cover regional variants like `pt-BR`.
fn language_matches(preference: &str, code: &str) -> bool {
    let preference = preference.to_ascii_lowercase();
    let code = code.to_ascii_lowercase();
    code == preference || code.split('-').next() == Some(preference.as_str())
}

/// Join cue texts with a single space, preserving cue order. Every cue's
/// text goes through untouched; the separator is the only whitespace added.
fn join_cues(cues: &[Cue]) -> String {
    cues.iter()
        .map(|cue| cue.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use std::sync::Mutex;

    /// In-memory source: a listing outcome plus per-language fetch outcomes,
    /// with a log of every fetch attempted.
    struct FakeSource {
        pub listing: Result<Vec<TranscriptTrack>, SourceError>,
        pub cues: Vec<(String, Result<Vec<Cue>, SourceError>)>,
        pub fetched: Mutex<Vec<String>>,
    }

    impl FakeSource {
        pub fn new(
            listing: Result<Vec<TranscriptTrack>, SourceError>,
            cues: Vec<(String, Result<Vec<Cue>, SourceError>)>,
        ) -> Self {
            Self {
                listing,
                cues,
                fetched: Mutex::new(Vec::new()),
            }
        }

        pub fn fetch_count(&self) -> usize {
            self.fetched.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TranscriptSource for FakeSource {
        async fn list_tracks(&self, _id: &VideoId) -> Result<Vec<TranscriptTrack>, SourceError> {
            match &self.listing {
                Ok(tracks) => Ok(tracks.clone()),
                Err(SourceError::Disabled) => Err(SourceError::Disabled),
                Err(SourceError::NotFound) => Err(SourceError::NotFound),
                Err(SourceError::Transport(msg)) => Err(SourceError::Transport(msg.clone())),
            }
        }

        async fn fetch_cues(&self, track: &TranscriptTrack) -> Result<Vec<Cue>, SourceError> {
            self.fetched
                .lock()
                .unwrap()
                .push(track.language_code.clone());
            let (_, outcome) = self
                .cues
                .iter()
                .find(|(code, _)| code == &track.language_code)
                .expect("fake has no outcome for track");
            match outcome {
                Ok(cues) => Ok(cues.clone()),
                Err(SourceError::Disabled) => Err(SourceError::Disabled),
                Err(SourceError::NotFound) => Err(SourceError::NotFound),
                Err(SourceError::Transport(msg)) => Err(SourceError::Transport(msg.clone())),
            }
        }
    }

    fn track(code: &str, generated: bool) -> TranscriptTrack {
        TranscriptTrack {
            language_code: code.to_string(),
            language: code.to_string(),
            is_generated: generated,
            base_url: String::new(),
        }
    }

    fn cue(text: &str) -> Cue {
        Cue {
            text: text.to_string(),
            start: 0.0,
            duration: 1.0,
        }
    }

    fn video_id() -> VideoId {
        resolve("dQw4w9WgXcQ").unwrap()
    }

    fn prefs(langs: &[&str]) -> Vec<String> {
        langs.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let source = FakeSource::new(
            Ok(vec![track("en", false), track("pt", false), track("de", false)]),
            vec![
                ("en".to_string(), Err(SourceError::Transport("boom".into()))),
                ("pt".to_string(), Ok(vec![cue("Olá"), cue("mundo")])),
                ("de".to_string(), Ok(vec![cue("unreachable")])),
            ],
        );

        let transcript = acquire(&source, &video_id(), &prefs(&["en", "pt"]))
            .await
            .unwrap();

        assert_eq!(transcript.text, "Olá mundo");
        assert_eq!(transcript.language_code, "pt");
        // en failed, pt succeeded, de never attempted.
        assert_eq!(source.fetch_count(), 2);
    }

    #[tokio::test]
    async fn preferred_language_is_tried_first() {
        let source = FakeSource::new(
            Ok(vec![track("en", false), track("pt", true)]),
            vec![
                ("en".to_string(), Ok(vec![cue("hello")])),
                ("pt".to_string(), Ok(vec![cue("Olá"), cue("mundo")])),
            ],
        );

        let transcript = acquire(&source, &video_id(), &prefs(&["pt", "en"]))
            .await
            .unwrap();

        assert_eq!(transcript.text, "Olá mundo");
        assert!(transcript.is_generated);
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(*source.fetched.lock().unwrap(), vec!["pt".to_string()]);
    }

    #[tokio::test]
    async fn base_language_preference_covers_regional_variant() {
        let source = FakeSource::new(
            Ok(vec![track("en", false), track("pt-BR", false)]),
            vec![
                ("en".to_string(), Ok(vec![cue("hello")])),
                ("pt-BR".to_string(), Ok(vec![cue("Olá")])),
            ],
        );

        let transcript = acquire(&source, &video_id(), &prefs(&["pt"])).await.unwrap();
        assert_eq!(transcript.language_code, "pt-BR");
    }

    #[tokio::test]
    async fn unmatched_tracks_are_still_attempted_in_enumeration_order() {
        let source = FakeSource::new(
            Ok(vec![track("de", false), track("fr", false), track("ja", false)]),
            vec![
                ("de".to_string(), Err(SourceError::Transport("boom".into()))),
                ("fr".to_string(), Err(SourceError::Transport("boom".into()))),
                ("ja".to_string(), Ok(vec![cue("こんにちは")])),
            ],
        );

        let transcript = acquire(&source, &video_id(), &prefs(&["en"])).await.unwrap();
        assert_eq!(transcript.language_code, "ja");
        assert_eq!(
            *source.fetched.lock().unwrap(),
            vec!["de".to_string(), "fr".to_string(), "ja".to_string()]
        );
    }

    #[tokio::test]
    async fn zero_tracks_is_no_tracks_found() {
        let source = FakeSource::new(Ok(vec![]), vec![]);
        let err = acquire(&source, &video_id(), &prefs(&["en"])).await.unwrap_err();
        assert!(matches!(err, AcquireError::NoTracksFound(_)));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn disabled_listing_skips_all_fetches() {
        let source = FakeSource::new(Err(SourceError::Disabled), vec![]);
        let err = acquire(&source, &video_id(), &prefs(&["en"])).await.unwrap_err();
        assert!(matches!(err, AcquireError::TranscriptsDisabled(_)));
        assert_eq!(source.fetch_count(), 0);
    }

    #[tokio::test]
    async fn every_candidate_failing_reports_all_causes() {
        let source = FakeSource::new(
            Ok(vec![track("en", false), track("pt", false)]),
            vec![
                ("en".to_string(), Err(SourceError::Transport("rate limited".into()))),
                ("pt".to_string(), Err(SourceError::Transport("malformed cues".into()))),
            ],
        );

        let err = acquire(&source, &video_id(), &prefs(&["en"])).await.unwrap_err();
        match err {
            AcquireError::AllCandidatesFailed { causes, .. } => {
                assert_eq!(causes.len(), 2);
                assert_eq!(causes[0].0, "en");
                assert_eq!(causes[1].0, "pt");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_cue_text_counts_as_candidate_failure() {
        let source = FakeSource::new(
            Ok(vec![track("en", false), track("pt", false)]),
            vec![
                ("en".to_string(), Ok(vec![])),
                ("pt".to_string(), Ok(vec![cue("Olá")])),
            ],
        );

        let transcript = acquire(&source, &video_id(), &prefs(&["en", "pt"]))
            .await
            .unwrap();
        assert_eq!(transcript.text, "Olá");
        assert_eq!(source.fetch_count(), 2);
    }

    #[test]
    fn join_preserves_cue_order_and_internal_whitespace() {
        let cues = vec![cue("two  spaces"), cue("then"), cue("more")];
        assert_eq!(join_cues(&cues), "two  spaces then more");
    }

    #[test]
    fn join_passes_every_cue_through_untouched() {
        let cues = vec![cue("a"), cue(""), cue("b")];
        assert_eq!(join_cues(&cues), "a  b");
    }

    #[tokio::test]
    async fn whitespace_only_cue_text_counts_as_candidate_failure() {
        let source = FakeSource::new(
            Ok(vec![track("en", false), track("pt", false)]),
            vec![
                ("en".to_string(), Ok(vec![cue(""), cue("")])),
                ("pt".to_string(), Ok(vec![cue("Olá")])),
            ],
        );

        let transcript = acquire(&source, &video_id(), &prefs(&["en", "pt"]))
            .await
            .unwrap();
        assert_eq!(transcript.text, "Olá");
        assert_eq!(source.fetch_count(), 2);
    }
}
