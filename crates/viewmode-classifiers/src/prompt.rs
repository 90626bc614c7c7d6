//! Chat prompt for the completion backend

use std::fmt::Write;
use viewmode_core::{AudioProfile, ChatMessage, PictureMode, Revision, ViewingMode};

const ROLE: &str = "You classify YouTube videos and TV content so a television can pick \
its display settings. You receive a video title, sometimes followed by its channel name.";

const CATEGORIES: &str = "\
Content categories:
- Cinema: movies, TV shows, trailers, episodes (S05E16, Season 2), film franchises, streaming originals.
- Sports: matches, highlights, leagues (NBA, NFL, Premier League, F1), fights, races.
- Music: music videos, lyric videos, official audio, concerts, festival sets, orchestras.
- Entertainment: comedy, stand-up, talk shows, sketches, award shows, reality TV.
- Gaming: gameplay, let's plays, walkthroughs, speedruns, esports, game guides, game titles.
- Vivid: HDR/4K/8K demos, nature and wildlife footage, aurora, timelapses, fireworks.
- Anything else (news, tutorials, cooking, podcasts, reviews) gets the default.";

const PRIORITY_RULES: &str = "\
Priority rules:
1. Pick the primary content type when several could apply.
2. Gameplay beats technical quality: a 4K HDR game video is Gaming.
3. Trailers and movie clips are Cinema, even inside a reaction or review.
4. A concert documentary is Music, a sports documentary is Sports.
5. When uncertain, use the default.";

/// Builds the `[system, user]` messages for one classification
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    revision: Revision,
    system: String,
}

impl PromptBuilder {
    pub fn new(revision: Revision) -> Self {
        let system = match revision {
            Revision::Legacy => legacy_system_prompt(),
            Revision::Paired => paired_system_prompt(),
        };
        Self { revision, system }
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    pub fn system_prompt(&self) -> &str {
        &self.system
    }

    /// Messages for `content`: the bare title or the `TITLE:/CHANNEL:` block
    pub fn messages(&self, content: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system.clone()),
            ChatMessage::user(content),
        ]
    }
}

fn join<T: AsRef<str>>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn legacy_system_prompt() -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{}\n", ROLE);
    let _ = writeln!(prompt, "{}\n", CATEGORIES);
    let _ = writeln!(
        prompt,
        "Viewing modes (exact spelling, case-sensitive): {}",
        join(ViewingMode::ALL.iter().map(|m| m.as_str()))
    );
    let _ = writeln!(
        prompt,
        "Map Cinema to Cinema, Sports to Sport, Music to Music, Gaming to Gaming, \
Vivid to Vivid. Entertainment and everything else map to Standard.\n"
    );
    let _ = writeln!(prompt, "{}\n", PRIORITY_RULES.replace("the default", "Standard"));
    let _ = write!(
        prompt,
        "Reply with a single JSON object and nothing else, no code fences:\n\
{{\"viewing_mode\": \"<mode>\"}}"
    );
    prompt
}

fn paired_system_prompt() -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{}\n", ROLE);
    let _ = writeln!(prompt, "{}\n", CATEGORIES);
    let _ = writeln!(
        prompt,
        "Picture modes (exact spelling, case-sensitive): {}",
        join(PictureMode::ALL.iter().map(|m| m.as_str()))
    );
    let _ = writeln!(
        prompt,
        "Audio profiles (exact spelling, case-sensitive): {}\n",
        join(AudioProfile::ALL.iter().map(|a| a.as_str()))
    );
    let _ = writeln!(
        prompt,
        "Map Cinema to Movie, Sports to Sports, Music and Entertainment to Entertainment, \
Gaming to Graphics, Vivid to Dynamic. The default is Expert.\n"
    );
    let _ = writeln!(prompt, "Pairing (audio profile allowed for each picture mode):");
    for picture in PictureMode::ALL {
        let allowed: Vec<&str> = AudioProfile::ALL
            .iter()
            .filter(|a| picture.admits(**a))
            .map(|a| a.as_str())
            .collect();
        let _ = writeln!(prompt, "- {} -> {}", picture, allowed.join(" or "));
    }
    let _ = writeln!(
        prompt,
        "Use Music with Entertainment only when the video is mainly music.\n"
    );
    let _ = writeln!(prompt, "{}\n", PRIORITY_RULES.replace("the default", "Expert"));
    let _ = write!(
        prompt,
        "Reply with a single JSON object and nothing else, no code fences:\n\
{{\"picture_mode\": \"<picture mode>\", \"audio_profile\": \"<audio profile>\"}}"
    );
    prompt
}
