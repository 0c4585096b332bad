// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

/// Idiomas com rótulos próprios. O primeiro é o padrão.
pub const SUPPORTED_LANGUAGES: [&str; 2] = ["en", "el"];

// Nosso extrator de idioma
pub struct Locale(pub String);

impl Locale {
    /// Primeiro idioma suportado do Accept-Language, na ordem de preferência
    /// ("el-GR" -> "el"). Sem nenhum suportado, inglês.
    pub fn from_header(header_str: &str) -> Self {
        let lang = accept_language::parse(header_str)
            .iter()
            .map(|tag| tag.split('-').next().unwrap_or(tag).to_ascii_lowercase())
            .find(|primary| SUPPORTED_LANGUAGES.contains(&primary.as_str()))
            .unwrap_or_else(|| SUPPORTED_LANGUAGES[0].to_string());
        Locale(lang)
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_else(|| Locale(SUPPORTED_LANGUAGES[0].to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_first_supported_language() {
        assert_eq!(Locale::from_header("el-GR,el;q=0.9,en;q=0.8").0, "el");
        assert_eq!(Locale::from_header("de-DE,en;q=0.5").0, "en");
        assert_eq!(Locale::from_header("fr").0, "en");
    }
}
