//! Keyword-scoring heuristic classifier
//!
//! Deterministic fallback used whenever the completion backend is unavailable
//! or returns something the validator rejects. It never fails: every input maps
//! to a member of the configured vocabulary, with Standard / Expert as the
//! default when nothing scores.

use crate::keywords::{Category, KeywordScorer, KeywordTable, Scoreboard, TierWeights};
use crate::normalize::normalize;
use crate::series::SeriesDetector;
use viewmode_core::{Classification, PictureMode, Result, Revision, ViewingMode, ViewingSettings};

/// Winning bucket after scores are merged for a revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Cinema,
    Sports,
    /// Music plus non-music entertainment (music only in the legacy revision)
    MusicEntertainment,
    Gaming,
    Vivid,
}

/// Scores and decision for one title, kept for logging and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub scores: Scoreboard,
    pub series_marker: bool,
    pub winner: Option<Bucket>,
    pub winning_score: u32,
    pub music_dominant: bool,
}

/// Heuristic classifier over a compiled keyword table
pub struct HeuristicClassifier {
    scorer: KeywordScorer,
    series: SeriesDetector,
    series_bonus: u32,
    min_score: u32,
}

impl HeuristicClassifier {
    /// Compile `table` with `weights`; series bonus defaults to the strong weight
    pub fn new(table: &KeywordTable, weights: TierWeights) -> Result<Self> {
        Ok(Self {
            scorer: table.compile(weights)?,
            series: SeriesDetector::new()?,
            series_bonus: weights.strong,
            min_score: 1,
        })
    }

    pub fn with_series_bonus(mut self, bonus: u32) -> Self {
        self.series_bonus = bonus;
        self
    }

    /// Smallest score that can win; clamped to 1 so zero never wins
    pub fn with_min_score(mut self, min_score: u32) -> Self {
        self.min_score = min_score.max(1);
        self
    }

    /// Raw per-category scores, series bonus included in cinema
    pub fn score(&self, text: &str) -> (Scoreboard, bool) {
        let normalized = normalize(text);
        let mut scores = self.scorer.score(&normalized);
        let series_marker = self.series.is_match(&normalized);
        if series_marker {
            scores.add(Category::Cinema, self.series_bonus);
        }
        (scores, series_marker)
    }

    /// Score `text` and pick the winning bucket for `revision`
    pub fn evaluate(&self, text: &str, revision: Revision) -> Verdict {
        let (scores, series_marker) = self.score(text);

        let music = scores.get(Category::Music);
        let merged = match revision {
            Revision::Paired => music + scores.get(Category::Entertainment),
            Revision::Legacy => music,
        };

        // Priority order; a later bucket must strictly beat an earlier one.
        let candidates = [
            (Bucket::Cinema, scores.get(Category::Cinema)),
            (Bucket::Sports, scores.get(Category::Sports)),
            (Bucket::MusicEntertainment, merged),
            (Bucket::Gaming, scores.get(Category::Gaming)),
            (Bucket::Vivid, scores.get(Category::Vivid)),
        ];

        let mut best: Option<(Bucket, u32)> = None;
        for (bucket, score) in candidates {
            if score < self.min_score {
                continue;
            }
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((bucket, score)),
            }
        }

        let winner = best.map(|(bucket, _)| bucket);
        let winning_score = best.map(|(_, score)| score).unwrap_or(0);
        let music_dominant = winner == Some(Bucket::MusicEntertainment) && music * 2 > merged;

        Verdict {
            scores,
            series_marker,
            winner,
            winning_score,
            music_dominant,
        }
    }

    /// Classify into the vocabulary of `revision`
    pub fn classify(&self, text: &str, revision: Revision) -> Classification {
        let verdict = self.evaluate(text, revision);
        match revision {
            Revision::Legacy => Classification::from(legacy_mode(&verdict)),
            Revision::Paired => Classification::from(paired_settings(&verdict)),
        }
    }

    pub fn viewing_mode(&self, text: &str) -> ViewingMode {
        legacy_mode(&self.evaluate(text, Revision::Legacy))
    }

    pub fn settings(&self, text: &str) -> ViewingSettings {
        paired_settings(&self.evaluate(text, Revision::Paired))
    }
}

fn legacy_mode(verdict: &Verdict) -> ViewingMode {
    match verdict.winner {
        Some(Bucket::Cinema) => ViewingMode::Cinema,
        Some(Bucket::Sports) => ViewingMode::Sport,
        Some(Bucket::MusicEntertainment) => ViewingMode::Music,
        Some(Bucket::Gaming) => ViewingMode::Gaming,
        Some(Bucket::Vivid) => ViewingMode::Vivid,
        None => ViewingMode::Standard,
    }
}

fn paired_settings(verdict: &Verdict) -> ViewingSettings {
    let picture = match verdict.winner {
        Some(Bucket::Cinema) => PictureMode::Movie,
        Some(Bucket::Sports) => PictureMode::Sports,
        Some(Bucket::MusicEntertainment) => PictureMode::Entertainment,
        Some(Bucket::Gaming) => PictureMode::Graphics,
        Some(Bucket::Vivid) => PictureMode::Dynamic,
        None => PictureMode::Expert,
    };
    ViewingSettings::paired(picture, verdict.music_dominant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{builtin_table, TierKeywords};
    use std::collections::BTreeMap;
    use viewmode_core::AudioProfile;

    fn heuristic() -> HeuristicClassifier {
        HeuristicClassifier::new(&builtin_table(), TierWeights::default()).unwrap()
    }

    fn settings(picture_mode: PictureMode, audio_profile: AudioProfile) -> ViewingSettings {
        ViewingSettings {
            picture_mode,
            audio_profile,
        }
    }

    #[test]
    fn test_reference_titles() {
        let h = heuristic();
        let cases = [
            (
                "Avengers: Endgame Official Trailer",
                PictureMode::Movie,
                AudioProfile::Movie,
            ),
            (
                "Lakers vs Warriors Highlights",
                PictureMode::Sports,
                AudioProfile::Sport,
            ),
            (
                "Taylor Swift - Anti-Hero (Official Music Video)",
                PictureMode::Entertainment,
                AudioProfile::Music,
            ),
            (
                "Elden Ring Boss Guide",
                PictureMode::Graphics,
                AudioProfile::Entertainment,
            ),
            ("8K HDR Nature Demo", PictureMode::Dynamic, AudioProfile::Auto),
        ];

        for (title, picture, audio) in cases {
            assert_eq!(h.settings(title), settings(picture, audio), "{}", title);
        }
    }

    #[test]
    fn test_legacy_reference_titles() {
        let h = heuristic();
        assert_eq!(h.viewing_mode("Avengers: Endgame Official Trailer"), ViewingMode::Cinema);
        assert_eq!(h.viewing_mode("Lakers vs Warriors Highlights"), ViewingMode::Sport);
        assert_eq!(
            h.viewing_mode("Taylor Swift - Anti-Hero (Official Music Video)"),
            ViewingMode::Music
        );
        assert_eq!(h.viewing_mode("Elden Ring Boss Guide"), ViewingMode::Gaming);
        assert_eq!(h.viewing_mode("8K HDR Nature Demo"), ViewingMode::Vivid);
    }

    #[test]
    fn test_nothing_scores_gives_default() {
        let h = heuristic();
        for title in [
            "Some random text",
            "Python Tutorial for Beginners",
            "Cooking Pasta Carbonara - Easy Recipe",
            "",
        ] {
            assert_eq!(h.settings(title), ViewingSettings::default(), "{}", title);
            assert_eq!(h.viewing_mode(title), ViewingMode::Standard, "{}", title);
        }
    }

    #[test]
    fn test_word_fragments_give_default() {
        let h = heuristic();
        for title in [
            "Product Unboxing - New Tech Gadgets",
            "Democracy Now - Headlines",
            "Nuclear Fusion Explained",
            "Discover Paris Travel",
            "Embrace the Journey",
        ] {
            assert_eq!(h.settings(title), ViewingSettings::default(), "{}", title);
            assert_eq!(h.viewing_mode(title), ViewingMode::Standard, "{}", title);
        }
    }

    #[test]
    fn test_series_marker_biases_to_cinema() {
        let h = heuristic();
        let verdict = h.evaluate("Breaking Bad S05E16 - Felina", Revision::Paired);
        assert!(verdict.series_marker);
        assert_eq!(verdict.winner, Some(Bucket::Cinema));
        assert_eq!(verdict.scores.get(Category::Cinema), 3);

        assert_eq!(h.settings("The Office S3E12").picture_mode, PictureMode::Movie);
    }

    #[test]
    fn test_series_marker_loses_to_stronger_signal() {
        let h = heuristic();
        assert_eq!(
            h.settings("Minecraft Let's Play S01E01").picture_mode,
            PictureMode::Graphics
        );
        assert_eq!(
            h.settings("Stranger Things S04E01 Gameplay Walkthrough Speedrun").picture_mode,
            PictureMode::Graphics
        );
    }

    #[test]
    fn test_tie_breaks_by_priority() {
        let h = heuristic();
        // gaming 5 vs vivid 5
        let verdict = h.evaluate("Cyberpunk 2077 4K HDR Ray Tracing Gameplay", Revision::Paired);
        assert_eq!(verdict.scores.get(Category::Gaming), verdict.scores.get(Category::Vivid));
        assert_eq!(verdict.winner, Some(Bucket::Gaming));
    }

    #[test]
    fn test_tie_prefers_cinema_over_everything() {
        let mut categories = BTreeMap::new();
        // Entertainment left out so the merged bucket scores the same as the rest
        for category in Category::ALL
            .into_iter()
            .filter(|c| *c != Category::Entertainment)
        {
            categories.insert(
                category,
                TierKeywords {
                    medium: vec!["shared".to_string()],
                    ..Default::default()
                },
            );
        }
        let h = HeuristicClassifier::new(&KeywordTable::new(categories), TierWeights::default())
            .unwrap();
        assert_eq!(h.settings("shared").picture_mode, PictureMode::Movie);
        assert_eq!(h.viewing_mode("shared"), ViewingMode::Cinema);
    }

    #[test]
    fn test_entertainment_merges_with_music() {
        let h = heuristic();

        assert_eq!(
            h.settings("Dave Chappelle Stand-Up Comedy Special"),
            settings(PictureMode::Entertainment, AudioProfile::Entertainment)
        );
        assert_eq!(
            h.viewing_mode("Dave Chappelle Stand-Up Comedy Special"),
            ViewingMode::Standard
        );

        // music 4 of a bucket worth 5
        assert_eq!(
            h.settings("Music Video Reaction"),
            settings(PictureMode::Entertainment, AudioProfile::Music)
        );
        assert_eq!(h.viewing_mode("Music Video Reaction"), ViewingMode::Music);

        assert_eq!(
            h.settings("Funny Cat Reaction Compilation"),
            settings(PictureMode::Entertainment, AudioProfile::Entertainment)
        );
    }

    #[test]
    fn test_music_exactly_half_is_not_dominant() {
        let mut categories = BTreeMap::new();
        categories.insert(
            Category::Music,
            TierKeywords {
                medium: vec!["remix".to_string()],
                ..Default::default()
            },
        );
        categories.insert(
            Category::Entertainment,
            TierKeywords {
                medium: vec!["prank".to_string()],
                ..Default::default()
            },
        );
        let h = HeuristicClassifier::new(&KeywordTable::new(categories), TierWeights::default())
            .unwrap();

        let verdict = h.evaluate("prank remix", Revision::Paired);
        assert_eq!(verdict.winning_score, 4);
        assert!(!verdict.music_dominant);
        assert_eq!(
            h.settings("prank remix").audio_profile,
            AudioProfile::Entertainment
        );
    }

    #[test]
    fn test_mixed_signals() {
        let h = heuristic();
        let cases = [
            ("FIFA World Cup 2026 Highlights", PictureMode::Sports),
            ("FIFA 24 Career Mode Gameplay", PictureMode::Graphics),
            ("Taylor Swift: The Eras Tour Movie - In Theaters Now", PictureMode::Movie),
            ("Guardians of the Galaxy Vol 3 - Soundtrack Trailer", PictureMode::Movie),
            ("Minecraft Survival Let's Play Episode 1", PictureMode::Graphics),
            ("Spider-Man PS5 Gameplay Walkthrough", PictureMode::Graphics),
            ("Northern Lights Aurora Borealis 4K", PictureMode::Dynamic),
            ("Vibrant Coral Reef - 8K Underwater", PictureMode::Dynamic),
            ("Dune: Part Three - Official Trailer (2026)", PictureMode::Movie),
            ("Premier League Goals - Matchday 15", PictureMode::Sports),
            ("UFC 310 Highlights: Best Knockouts", PictureMode::Sports),
            ("Coachella 2024 - Full Set", PictureMode::Entertainment),
        ];
        for (title, picture) in cases {
            assert_eq!(h.settings(title).picture_mode, picture, "{}", title);
        }
    }

    #[test]
    fn test_min_score_raises_the_bar() {
        let h = heuristic().with_min_score(3);
        // sports 1 from "final" alone
        assert_eq!(h.settings("The Final").picture_mode, PictureMode::Expert);
        assert_eq!(h.settings("Chelsea Highlights").picture_mode, PictureMode::Sports);
    }

    #[test]
    fn test_custom_series_bonus() {
        let h = heuristic().with_series_bonus(10);
        assert_eq!(
            h.settings("Minecraft Let's Play S01E01").picture_mode,
            PictureMode::Movie
        );
    }

    #[test]
    fn test_output_is_always_consistent() {
        let h = heuristic();
        for title in ["Music Video Reaction", "anything", "8k", "nba", "gameplay"] {
            assert!(h.settings(title).is_consistent());
        }
    }
}
