use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Plural category of a count, as chosen by a language's plural rules.
///
/// Besides the usual CLDR categories there is [PluralCategory::Fraction] for
/// languages that inflect non-integral counts differently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
    Fraction,
}

impl PluralCategory {
    /// The form key a translation entry uses for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
            PluralCategory::Fraction => "fraction",
        }
    }
}

impl Display for PluralCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a count to the plural category of one language.
pub type PluralSelector = Arc<dyn Fn(f64) -> PluralCategory + Send + Sync>;

/// The selector used for languages without registered rules.
pub fn default_selector() -> PluralSelector {
    Arc::new(|_| PluralCategory::Other)
}

/// Derives the selector key of a locale: its first two letters, lowercased.
///
/// `en-US`, `en_GB` and `EN` all map to `en`.
pub fn language_of(locale: &str) -> String {
    locale.trim().chars().take(2).collect::<String>().to_lowercase()
}
