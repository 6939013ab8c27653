use serde::{Deserialize, Deserializer, Serialize};

/// Lyrics as found in the library: either one raw blob of text or a list of
/// lines. Everything downstream works on the joined form via [`Lyrics::text`].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Lyrics {
    Raw(String),
    Lines(Vec<String>),
}

impl Lyrics {
    pub fn text(&self) -> String {
        match self {
            Lyrics::Raw(text) => text.clone(),
            Lyrics::Lines(lines) => lines.join(" "),
        }
    }
}

impl Default for Lyrics {
    fn default() -> Self {
        Lyrics::Raw(String::new())
    }
}

/// A single library entry. The title doubles as the key of every derived
/// vector map, so entries sharing a title overwrite each other there
/// (last one in corpus order wins).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Song {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub lyrics: Lyrics,
    #[serde(default, alias = "genre")]
    pub genres: Vec<String>,
    /// Kept as text because dumps mix integers, numeric strings and markers
    /// like "unknown"; parsed on demand by [`Song::release_year_int`].
    #[serde(default, alias = "year", deserialize_with = "year_as_string")]
    pub release_year: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default, alias = "youtube_url")]
    pub media_url: Option<String>,
}

impl Song {
    /// Songs with a blank title are excluded from vectorization and ranking.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn release_year_int(&self) -> Option<i32> {
        self.release_year
            .as_ref()
            .and_then(|year| year.trim().parse().ok())
    }
}

fn year_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum YearField {
        Number(i64),
        Text(String),
    }

    Ok(Option::<YearField>::deserialize(deserializer)?.map(|year| match year {
        YearField::Number(n) => n.to_string(),
        YearField::Text(s) => s,
    }))
}
