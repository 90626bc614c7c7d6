//! Weighted keyword tables and the Aho-Corasick scorer built from them

use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::info;
use viewmode_core::{Error, Result};

/// Scoring category. Declaration order is the tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cinema,
    Sports,
    Music,
    Entertainment,
    Gaming,
    Vivid,
}

impl Category {
    pub const COUNT: usize = 6;

    pub const ALL: [Category; Self::COUNT] = [
        Self::Cinema,
        Self::Sports,
        Self::Music,
        Self::Entertainment,
        Self::Gaming,
        Self::Vivid,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cinema => "cinema",
            Self::Sports => "sports",
            Self::Music => "music",
            Self::Entertainment => "entertainment",
            Self::Gaming => "gaming",
            Self::Vivid => "vivid",
        }
    }
}

/// Keyword weight tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Strong,
    Medium,
    Weak,
}

/// Point value per tier. Must satisfy strong > medium > weak > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierWeights {
    #[serde(default = "default_strong")]
    pub strong: u32,
    #[serde(default = "default_medium")]
    pub medium: u32,
    #[serde(default = "default_weak")]
    pub weak: u32,
}

impl TierWeights {
    pub fn weight(&self, tier: Tier) -> u32 {
        match tier {
            Tier::Strong => self.strong,
            Tier::Medium => self.medium,
            Tier::Weak => self.weak,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.weak == 0 || self.medium <= self.weak || self.strong <= self.medium {
            return Err(Error::config(format!(
                "tier weights must satisfy strong > medium > weak > 0 (got {}/{}/{})",
                self.strong, self.medium, self.weak
            )));
        }
        Ok(())
    }
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            strong: default_strong(),
            medium: default_medium(),
            weak: default_weak(),
        }
    }
}

fn default_strong() -> u32 {
    3
}

fn default_medium() -> u32 {
    2
}

fn default_weak() -> u32 {
    1
}

/// Keywords of one category, split by tier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierKeywords {
    #[serde(default)]
    pub strong: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub weak: Vec<String>,
}

impl TierKeywords {
    fn iter(&self) -> impl Iterator<Item = (Tier, &str)> {
        let strong = self.strong.iter().map(|k| (Tier::Strong, k.as_str()));
        let medium = self.medium.iter().map(|k| (Tier::Medium, k.as_str()));
        let weak = self.weak.iter().map(|k| (Tier::Weak, k.as_str()));
        strong.chain(medium).chain(weak)
    }
}

/// Category → tier → keywords.
///
/// YAML form:
/// ```yaml
/// cinema:
///   strong: ["official trailer"]
///   medium: ["trailer", "movie"]
///   weak: ["scene"]
/// ```
/// Keywords are matched case-insensitively as whole tokens: an edge of a
/// keyword that is a letter or digit must not touch another letter or digit
/// in the text. Punctuation or spaces at a keyword's edge match as written
/// (`"vs "`, `"(lyrics)"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable {
    categories: BTreeMap<Category, TierKeywords>,
}

impl KeywordTable {
    pub fn new(categories: BTreeMap<Category, TierKeywords>) -> Self {
        Self { categories }
    }

    /// Load and validate a table from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let table: Self = serde_yaml::from_str(&content)?;
        table.validate()?;
        info!(
            "Loaded keyword table from {} ({} keywords)",
            path.display(),
            table.keyword_count()
        );
        Ok(table)
    }

    pub fn get(&self, category: Category) -> Option<&TierKeywords> {
        self.categories.get(&category)
    }

    pub fn keyword_count(&self) -> usize {
        self.categories.values().map(|t| t.iter().count()).sum()
    }

    /// Reject blank keywords, keywords repeated within one category, and
    /// empty tables
    pub fn validate(&self) -> Result<()> {
        if self.keyword_count() == 0 {
            return Err(Error::config("keyword table is empty"));
        }

        for (category, tiers) in &self.categories {
            let mut seen = HashSet::new();
            for (_, keyword) in tiers.iter() {
                if keyword.trim().is_empty() {
                    return Err(Error::config(format!(
                        "blank keyword in category '{}'",
                        category.label()
                    )));
                }
                if !seen.insert(keyword.to_lowercase()) {
                    return Err(Error::config(format!(
                        "keyword '{}' appears more than once in category '{}'",
                        keyword,
                        category.label()
                    )));
                }
            }
        }

        Ok(())
    }

    /// Compile into a scorer with the given tier weights
    pub fn compile(&self, weights: TierWeights) -> Result<KeywordScorer> {
        self.validate()?;
        weights.validate()?;
        KeywordScorer::build(self, weights)
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        builtin_table()
    }
}

/// Per-category scores for one piece of text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    scores: [u32; Category::COUNT],
}

impl Scoreboard {
    pub fn get(&self, category: Category) -> u32 {
        self.scores[category.index()]
    }

    pub fn add(&mut self, category: Category, points: u32) {
        self.scores[category.index()] += points;
    }

    pub fn is_empty(&self) -> bool {
        self.scores.iter().all(|s| *s == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u32)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

/// Multi-pattern matcher over every keyword of a table
pub struct KeywordScorer {
    matcher: AhoCorasick,
    /// Points awarded per pattern, indexed by pattern id. A keyword listed
    /// under several categories awards each of them.
    awards: Vec<Vec<(Category, u32)>>,
    /// Whether each pattern starts / ends with a word character
    edges: Vec<(bool, bool)>,
}

impl KeywordScorer {
    fn build(table: &KeywordTable, weights: TierWeights) -> Result<Self> {
        let mut patterns: Vec<String> = Vec::new();
        let mut awards: Vec<Vec<(Category, u32)>> = Vec::new();
        let mut edges: Vec<(bool, bool)> = Vec::new();
        let mut ids: HashMap<String, usize> = HashMap::new();

        for (category, tiers) in &table.categories {
            for (tier, keyword) in tiers.iter() {
                let keyword = keyword.to_lowercase();
                let id = *ids.entry(keyword.clone()).or_insert_with(|| {
                    edges.push((
                        keyword.chars().next().is_some_and(is_word_char),
                        keyword.chars().next_back().is_some_and(is_word_char),
                    ));
                    patterns.push(keyword);
                    awards.push(Vec::new());
                    patterns.len() - 1
                });
                awards[id].push((*category, weights.weight(tier)));
            }
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| Error::config(format!("Failed to build keyword matcher: {}", e)))?;

        Ok(Self {
            matcher,
            awards,
            edges,
        })
    }

    /// Sum tier weights over the distinct keywords found in `text` as tokens
    pub fn score(&self, text: &str) -> Scoreboard {
        let mut hit = vec![false; self.awards.len()];
        for m in self.matcher.find_overlapping_iter(text) {
            let id = m.pattern().as_usize();
            if !hit[id] && self.on_token_edges(text, id, m.start(), m.end()) {
                hit[id] = true;
            }
        }

        let mut board = Scoreboard::default();
        for (id, _) in hit.iter().enumerate().filter(|(_, h)| **h) {
            for (category, points) in &self.awards[id] {
                board.add(*category, *points);
            }
        }
        board
    }

    pub fn pattern_count(&self) -> usize {
        self.awards.len()
    }

    /// "boxing" must not fire inside "unboxing"
    fn on_token_edges(&self, text: &str, id: usize, start: usize, end: usize) -> bool {
        let (word_start, word_end) = self.edges[id];
        let before = text.get(..start).and_then(|s| s.chars().next_back());
        let after = text.get(end..).and_then(|s| s.chars().next());

        !(word_start && before.is_some_and(is_word_char))
            && !(word_end && after.is_some_and(is_word_char))
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The keyword table shipped with the crate
pub fn builtin_table() -> KeywordTable {
    let mut categories = BTreeMap::new();

    categories.insert(
        Category::Cinema,
        TierKeywords {
            strong: words(&[
                "official trailer",
                "official teaser",
                "final trailer",
                "in theaters",
                "in theatres",
                "now playing",
                "coming soon",
                "imax",
                "original series",
                "full movie",
            ]),
            medium: words(&[
                "trailer",
                "teaser",
                "movie",
                "film",
                "cinema",
                "official clip",
                "episode",
                "season",
                "series",
                "sitcom",
                "netflix",
                "hbo",
                "disney+",
                "prime video",
                "marvel",
                "pixar",
                "warner bros",
                "universal pictures",
                "dc comics",
            ]),
            weak: words(&[
                "scene",
                "clip",
                "theater",
                "theatre",
                "part 2",
                "part 3",
                "part three",
                "will return",
                "director",
                "starring",
            ]),
        },
    );

    categories.insert(
        Category::Sports,
        TierKeywords {
            strong: words(&[
                "highlights",
                "full match",
                "extended highlights",
                "touchdown",
                "grand prix",
                "knockout",
                "knockouts",
                "world cup",
                "premier league",
                "champions league",
                "super bowl",
            ]),
            medium: words(&[
                "nba",
                "nfl",
                "mlb",
                "nhl",
                "ucl",
                "la liga",
                "serie a",
                "bundesliga",
                "formula 1",
                "f1 ",
                "ufc",
                "wimbledon",
                "olympics",
                "goal",
                "vs ",
                "vs.",
                "matchday",
            ]),
            weak: words(&[
                "match",
                "race",
                "boxing",
                "mma",
                "tennis",
                "football",
                "soccer",
                "basketball",
                "baseball",
                "golf",
                "cricket",
                "rugby",
                "final",
            ]),
        },
    );

    categories.insert(
        Category::Music,
        TierKeywords {
            strong: words(&[
                "official music video",
                "music video",
                "official audio",
                "official video",
                "lyric video",
                "(lyrics)",
                "live concert",
                "full album",
                "full set",
            ]),
            medium: words(&[
                "concert",
                "live performance",
                "symphony",
                "orchestra",
                "acoustic",
                "remix",
                "dj set",
                "lyrics",
                "album",
                "coachella",
                "glastonbury",
            ]),
            weak: words(&[
                "music",
                "song",
                "audio",
                "cover",
                "festival",
                "tour",
                "single",
                "soundtrack",
            ]),
        },
    );

    categories.insert(
        Category::Entertainment,
        TierKeywords {
            strong: words(&[
                "stand-up comedy",
                "talk show",
                "late night show",
                "reality show",
                "variety show",
            ]),
            medium: words(&[
                "comedy",
                "sketch",
                "prank",
                "red carpet",
                "award show",
                "funny moments",
            ]),
            weak: words(&["vlog", "funny", "reaction", "celebrity"]),
        },
    );

    categories.insert(
        Category::Gaming,
        TierKeywords {
            strong: words(&[
                "gameplay",
                "let's play",
                "lets play",
                "walkthrough",
                "speedrun",
                "playthrough",
                "boss guide",
                "boss fight",
                "game guide",
                "esports",
            ]),
            medium: words(&[
                "minecraft",
                "fortnite",
                "gta",
                "call of duty",
                "valorant",
                "league of legends",
                "elden ring",
                "zelda",
                "pokemon",
                "cs2",
                "counter-strike",
                "cyberpunk 2077",
                "fifa",
                "video game",
            ]),
            weak: words(&[
                "gaming",
                "gamer",
                "twitch",
                "ps5",
                "xbox",
                "nintendo",
                "steam deck",
                "stream",
            ]),
        },
    );

    categories.insert(
        Category::Vivid,
        TierKeywords {
            strong: words(&[
                "8k",
                "dolby vision",
                "hdr10",
                "4k hdr",
                "ultra hd",
                "hdr demo",
                "aurora borealis",
                "northern lights",
            ]),
            medium: words(&[
                "aurora",
                "timelapse",
                "coral reef",
                "wildlife",
                "nature scenes",
                "fireworks",
                "demo",
                "4k wildlife",
                "8k nature",
            ]),
            weak: words(&[
                "4k",
                "hdr",
                "colorful",
                "colourful",
                "vibrant",
                "neon",
                "satisfying",
                "landscape",
                "nature",
                "slow motion",
                "asmr",
            ]),
        },
    );

    KeywordTable::new(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> KeywordScorer {
        builtin_table().compile(TierWeights::default()).unwrap()
    }

    #[test]
    fn test_builtin_table_is_valid() {
        let table = builtin_table();
        table.validate().unwrap();
        for category in Category::ALL {
            assert!(table.get(category).is_some(), "missing {:?}", category);
        }
    }

    #[test]
    fn test_overlapping_keywords_each_count_once() {
        let board = scorer().score("taylor swift - anti-hero (official music video)");
        // "official music video" (3) + "music video" (3) + "music" (1)
        assert_eq!(board.get(Category::Music), 7);
        assert_eq!(board.get(Category::Cinema), 0);
    }

    #[test]
    fn test_repeated_keyword_counts_once() {
        let board = scorer().score("highlights highlights highlights");
        assert_eq!(board.get(Category::Sports), 3);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let s = scorer();
        assert_eq!(s.score("ELDEN RING BOSS GUIDE"), s.score("elden ring boss guide"));
    }

    #[test]
    fn test_keyword_shared_between_categories() {
        let mut categories = BTreeMap::new();
        categories.insert(
            Category::Gaming,
            TierKeywords {
                strong: words(&["fifa"]),
                ..Default::default()
            },
        );
        categories.insert(
            Category::Sports,
            TierKeywords {
                weak: words(&["fifa"]),
                ..Default::default()
            },
        );
        let s = KeywordTable::new(categories)
            .compile(TierWeights::default())
            .unwrap();

        let board = s.score("fifa 24");
        assert_eq!(board.get(Category::Gaming), 3);
        assert_eq!(board.get(Category::Sports), 1);
        assert_eq!(s.pattern_count(), 1);
    }

    #[test]
    fn test_keywords_do_not_match_inside_words() {
        let s = scorer();
        for text in [
            "product unboxing - new tech gadgets",
            "democracy now - headlines",
            "nuclear fusion explained",
            "discover paris travel",
            "embrace the journey",
        ] {
            assert!(s.score(text).is_empty(), "{:?} scored {:?}", text, s.score(text));
        }
    }

    #[test]
    fn test_token_match_at_text_edges_and_punctuation() {
        let s = scorer();
        assert_eq!(s.score("boxing").get(Category::Sports), 1);
        assert_eq!(s.score("title fight: boxing!").get(Category::Sports), 1);
        // a later whole-word occurrence still counts after a fragment
        assert_eq!(s.score("unboxing then boxing").get(Category::Sports), 1);
        // punctuated keywords keep their literal edges
        assert_eq!(s.score("lakers vs warriors").get(Category::Sports), 2);
        assert_eq!(s.score("song title (lyrics)").get(Category::Music), 3 + 2 + 1);
    }

    #[test]
    fn test_empty_text_scores_nothing() {
        assert!(scorer().score("").is_empty());
    }

    #[test]
    fn test_weights_must_be_ordered() {
        assert!(TierWeights::default().validate().is_ok());
        for (strong, medium, weak) in [(3, 3, 1), (3, 2, 2), (3, 2, 0), (1, 2, 3)] {
            let weights = TierWeights {
                strong,
                medium,
                weak,
            };
            assert!(weights.validate().is_err(), "{:?} accepted", weights);
        }
    }

    #[test]
    fn test_duplicate_keyword_in_category_rejected() {
        let mut categories = BTreeMap::new();
        categories.insert(
            Category::Cinema,
            TierKeywords {
                strong: words(&["Trailer"]),
                weak: words(&["trailer"]),
                ..Default::default()
            },
        );
        let err = KeywordTable::new(categories).validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let mut categories = BTreeMap::new();
        categories.insert(
            Category::Vivid,
            TierKeywords {
                medium: words(&["  "]),
                ..Default::default()
            },
        );
        assert!(KeywordTable::new(categories).validate().is_err());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(KeywordTable::new(BTreeMap::new()).validate().is_err());
    }

    #[test]
    fn test_table_from_yaml() {
        let yaml = r#"
cinema:
  strong: ["official trailer"]
  medium: ["trailer"]
gaming:
  weak: ["speedrun"]
"#;
        let table: KeywordTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.keyword_count(), 3);
        let scorer = table.compile(TierWeights::default()).unwrap();
        assert_eq!(scorer.score("speedrun official trailer").get(Category::Cinema), 5);
    }
}
