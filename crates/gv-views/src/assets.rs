//! Artist avatars and artwork image fallbacks

use std::borrow::Cow;

use gv_core::Artwork;
use gv_data::config::AvatarConfig;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::warn;

/// Shown in place of an artwork image that is missing or failed to load
pub const IMAGE_PLACEHOLDER: &str = "https://via.placeholder.com/800x600?text=No+Image";

/// Characters left unescaped in a URI component; everything else,
/// including space, is percent-encoded
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const AVATAR_PALETTE: [&str; 15] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E2", "#F8B739",
    "#52B788", "#E63946", "#457B9D", "#A8DADC", "#E07A5F", "#3D5A80",
];

/// Where an avatar image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvatarSource {
    /// Photo shipped with the exhibition
    Local(String),
    /// Initials avatar from the fallback service
    Generated(String),
}

impl AvatarSource {
    pub fn url(&self) -> &str {
        match self {
            AvatarSource::Local(path) | AvatarSource::Generated(path) => path,
        }
    }
}

/// Deterministic palette colour for an artist name.
///
/// Same name, same colour, so generated avatars stay cacheable.
pub fn artist_color(artist: &str) -> &'static str {
    // Matches the browser hash: `hash << 5` truncates to 32 bits while the
    // subtraction does not, so the running value is kept in i64
    let mut hash: i64 = 0;
    for unit in artist.encode_utf16() {
        let shifted = i64::from((hash as i32).wrapping_shl(5));
        hash = i64::from(unit) + (shifted - hash);
    }
    AVATAR_PALETTE[(hash.unsigned_abs() % AVATAR_PALETTE.len() as u64) as usize]
}

/// Resolves avatar and image URLs for display
#[derive(Debug, Clone, Default)]
pub struct AssetResolver {
    config: AvatarConfig,
}

impl AssetResolver {
    pub fn new(config: AvatarConfig) -> Self {
        Self { config }
    }

    /// Local photo when one is configured, generated avatar otherwise
    pub fn avatar(&self, artist: &str) -> AvatarSource {
        self.avatar_sized(artist, self.config.size)
    }

    pub fn avatar_sized(&self, artist: &str, size: u32) -> AvatarSource {
        match self.config.local.get(artist) {
            Some(path) if !path.is_empty() => AvatarSource::Local(path.clone()),
            _ => AvatarSource::Generated(self.generated_avatar(artist, size)),
        }
    }

    /// Replacement after the local photo failed to load
    pub fn avatar_failed(&self, artist: &str) -> AvatarSource {
        warn!("Avatar for '{}' failed to load, using generated avatar", artist);
        AvatarSource::Generated(self.generated_avatar(artist, self.config.size))
    }

    pub fn generated_avatar(&self, artist: &str, size: u32) -> String {
        format!(
            "{}?name={}&background={}&color=fff&size={}",
            self.config.fallback_base,
            utf8_percent_encode(artist, URI_COMPONENT),
            artist_color(artist).trim_start_matches('#'),
            size
        )
    }

    /// Image to show for `artwork`
    pub fn image<'a>(&self, artwork: &'a Artwork) -> Cow<'a, str> {
        if artwork.image_url.trim().is_empty() {
            warn!("Artwork {} has no image, using placeholder", artwork.id);
            Cow::Borrowed(IMAGE_PLACEHOLDER)
        } else {
            Cow::Borrowed(&artwork.image_url)
        }
    }

    /// Replacement after the artwork image failed to load
    pub fn image_failed(&self, artwork: &Artwork) -> &'static str {
        warn!("Image {} for artwork {} failed to load, using placeholder", artwork.image_url, artwork.id);
        IMAGE_PLACEHOLDER
    }
}
