//! Episode records as served by the API and as displayed

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

use super::format::{duration_to_string, format_published_at};

/// Audio file section of an episode record
#[derive(Clone, Debug, Deserialize)]
pub struct EpisodeFile {
    pub url: String,
    #[serde(deserialize_with = "deserialize_seconds")]
    pub duration: u64,
}

/// Raw episode record from `GET /episodes` and `GET /episodes/{id}`
#[derive(Clone, Debug, Deserialize)]
pub struct EpisodeRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub members: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub description: String,
    pub published_at: String,
    pub file: EpisodeFile,
}

/// An episode ready for display and playback
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Episode {
    pub id: String,
    pub title: String,
    pub members: String,
    pub thumbnail: String,
    pub url: String,
    pub duration: u64,
    pub published_at: String,
    pub duration_as_string: String,
    pub description: String,
}

impl TryFrom<EpisodeRecord> for Episode {
    type Error = anyhow::Error;

    fn try_from(record: EpisodeRecord) -> Result<Self> {
        let published_at = format_published_at(&record.published_at)
            .with_context(|| format!("episode {}", record.id))?;

        Ok(Self {
            duration_as_string: duration_to_string(record.file.duration),
            duration: record.file.duration,
            url: record.file.url,
            id: record.id,
            title: record.title,
            members: record.members,
            thumbnail: record.thumbnail,
            published_at,
            description: record.description,
        })
    }
}

/// `file.duration` shows up both as a JSON number and as a numeric string.
fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Int(u64),
        Float(f64),
        Text(String),
    }

    match Seconds::deserialize(deserializer)? {
        Seconds::Int(n) => Ok(n),
        Seconds::Float(f) if f.is_finite() && f >= 0.0 => Ok(f as u64),
        Seconds::Float(f) => Err(serde::de::Error::custom(format!("invalid duration: {f}"))),
        Seconds::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid duration: {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(duration: &str) -> String {
        format!(
            r#"{{
                "id": "a-importancia-da-contribuicao-em-open-source",
                "title": "Faladev #30 | A importância da contribuição em Open Source",
                "members": "Diego Fernandes, João Pedro",
                "published_at": "2021-01-22 19:28:00",
                "thumbnail": "https://example.com/opensource.jpg",
                "description": "<p>Nesse episódio do Faladev...</p>",
                "file": {{
                    "url": "https://example.com/opensource.m4a",
                    "type": "audio/x-m4a",
                    "duration": {duration}
                }}
            }}"#
        )
    }

    #[test]
    fn duration_as_number() {
        let record: EpisodeRecord = serde_json::from_str(&record_json("3981")).unwrap();
        assert_eq!(record.file.duration, 3981);
    }

    #[test]
    fn duration_as_string() {
        let record: EpisodeRecord = serde_json::from_str(&record_json("\"3981\"")).unwrap();
        assert_eq!(record.file.duration, 3981);
    }

    #[test]
    fn duration_rejects_non_numeric_string() {
        assert!(serde_json::from_str::<EpisodeRecord>(&record_json("\"long\"")).is_err());
    }

    #[test]
    fn record_converts_to_display_episode() {
        let record: EpisodeRecord = serde_json::from_str(&record_json("3981")).unwrap();
        let episode = Episode::try_from(record).unwrap();

        assert_eq!(episode.published_at, "22 Jan 21");
        assert_eq!(episode.duration_as_string, "66:21");
        assert_eq!(episode.url, "https://example.com/opensource.m4a");
        assert_eq!(episode.members, "Diego Fernandes, João Pedro");
    }
}
