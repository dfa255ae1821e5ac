//! Poster URL derivation.

use listings::FilmId;

/// Text rendered into the fallback template when there is no identifier.
const UNRESOLVED_PLACEHOLDER: &str = "None";

/// URL templates used to build poster links. `{id}` is replaced with the
/// film identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterTemplates {
    pub primary: String,
    pub fallback: String,
}

impl Default for PosterTemplates {
    fn default() -> Self {
        Self {
            primary: "https://st.kp.yandex.net/images/film_iphone/iphone360_{id}.jpg".to_string(),
            fallback: "https://www.kinopoisk.ru/images/film_big/{id}.jpg".to_string(),
        }
    }
}

impl PosterTemplates {
    /// Build the poster URL for a film. Never fails.
    ///
    /// A resolved identifier uses the primary (small) template. An absent
    /// identifier falls back to the large-poster template.
    pub fn poster_url(&self, id: Option<&FilmId>) -> String {
        match id {
            Some(id) => self.primary.replace("{id}", id.as_str()),
            None => self.fallback.replace("{id}", UNRESOLVED_PLACEHOLDER),
        }
    }
}
