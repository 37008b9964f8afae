use serde::Deserialize;

/// Separator between artist and title in stream titles
const ARTIST_TITLE_SEPARATOR: &str = " - ";

/// Now-playing information for the live stream
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TrackInfo {
    /// Artist name (or station identity when unknown)
    pub artist: String,

    /// Track title
    pub title: String,
}

impl TrackInfo {
    /// Create a new `TrackInfo`
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Parse a free-text stream title of the form `"Artist - Title"`
    ///
    /// Splits on the first `" - "`. Without a separator the whole text
    /// becomes the title and `default_artist` is used. Returns `None` for
    /// blank input.
    #[must_use]
    pub fn parse_stream_title(text: &str, default_artist: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        // Trimmed input never starts or ends with the separator, so both
        // segments are non-empty here.
        Some(match text.split_once(ARTIST_TITLE_SEPARATOR) {
            Some((artist, title)) => Self::new(artist.trim(), title.trim()),
            None => Self::new(default_artist, text),
        })
    }
}

impl std::fmt::Display for TrackInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.artist, ARTIST_TITLE_SEPARATOR, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATION: &str = "Web Rádio";

    #[test]
    fn test_parse_artist_and_title() {
        let track = TrackInfo::parse_stream_title("DJ Durval - Night Grooves", STATION).unwrap();
        assert_eq!(track, TrackInfo::new("DJ Durval", "Night Grooves"));
    }

    #[test]
    fn test_parse_without_separator() {
        let track = TrackInfo::parse_stream_title("Just A Title", STATION).unwrap();
        assert_eq!(track, TrackInfo::new(STATION, "Just A Title"));
    }

    #[test]
    fn test_parse_splits_on_first_separator_only() {
        let track =
            TrackInfo::parse_stream_title("  Xutos - Pontapés - À Minha Maneira ", STATION)
                .unwrap();
        assert_eq!(track.artist, "Xutos");
        assert_eq!(track.title, "Pontapés - À Minha Maneira");
    }

    #[test]
    fn test_parse_hyphen_without_spaces_is_not_a_separator() {
        let track = TrackInfo::parse_stream_title("Jean-Michel Jarre", STATION).unwrap();
        assert_eq!(track, TrackInfo::new(STATION, "Jean-Michel Jarre"));
    }

    #[test]
    fn test_parse_dangling_separator() {
        assert_eq!(
            TrackInfo::parse_stream_title(" - Oxygène", STATION),
            Some(TrackInfo::new(STATION, "- Oxygène"))
        );
        assert_eq!(
            TrackInfo::parse_stream_title("Madredeus - ", STATION),
            Some(TrackInfo::new(STATION, "Madredeus -"))
        );
        assert_eq!(TrackInfo::parse_stream_title("   ", STATION), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TrackInfo::new("DJ Durval", "Night Grooves").to_string(),
            "DJ Durval - Night Grooves"
        );
    }
}
