use indexmap::IndexMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collection::Document;
use crate::common::{atomic, format_float, Atomic, ReadExecutor, Value, WriteExecutor};
use crate::errors::FlatDbResult;
use crate::source::DocumentSource;
use crate::translation::{default_selector, language_of, PluralCategory, PluralSelector};

/// A phrase table with plural-aware lookups.
///
/// Phrases are loaded from flat documents where every top-level entry maps a
/// phrase to either its translation or a table of forms:
///
/// ```text
/// Hello: Ahoj
/// "%d potatoes":
///   sk_SK:
///     one: "%d zemiak"
///     few: "%d zemiaky"
///     other: "%d zemiakov"
///     fraction: "%d zemiaku"
/// ```
///
/// A lookup of an unknown phrase records it with an empty entry and marks
/// the table dirty, so translators can be handed the missing phrases.
#[derive(Clone, Default)]
pub struct TranslationLookup {
    inner: Arc<TranslationLookupInner>,
}

impl TranslationLookup {
    pub fn new() -> TranslationLookup {
        TranslationLookup {
            inner: Arc::new(TranslationLookupInner::new()),
        }
    }

    /// Builds a table from phrase documents; later documents overwrite
    /// earlier entries.
    pub fn from_documents<I: IntoIterator<Item = Document>>(documents: I) -> TranslationLookup {
        let lookup = TranslationLookup::new();
        for document in documents {
            lookup.ingest(document);
        }
        lookup
    }

    /// Builds a table from every document of a phrase source.
    pub fn from_source(source: &dyn DocumentSource) -> FlatDbResult<TranslationLookup> {
        let documents = source.documents()?;
        log::debug!("Loading phrases from {} documents", documents.len());
        Ok(TranslationLookup::from_documents(documents))
    }

    pub fn ingest(&self, document: Document) {
        self.inner.ingest(document)
    }

    /// Registers the plural rules of a language, keyed by the first two
    /// letters of a locale (`en`, `sk`, ...).
    pub fn with_selector<F>(self, language: &str, select: F) -> TranslationLookup
    where
        F: Fn(f64) -> PluralCategory + Send + Sync + 'static,
    {
        self.register_selector(language, Arc::new(select));
        self
    }

    pub fn register_selector(&self, language: &str, selector: PluralSelector) {
        self.inner.register_selector(language, selector)
    }

    /// Translates a phrase, picking the plural form for `count`.
    ///
    /// With an empty `other` this is a direct lookup of `one` and `count` is
    /// ignored. Otherwise `other` is the phrase key and `one` the singular
    /// fallback. The result is, in order of preference:
    ///
    /// 1. the entry itself when it is a plain translation
    /// 2. the form keyed by the exact count (`"2"`, `"2.5"`)
    /// 3. the form of the plural category chosen by the locale's rules
    /// 4. the `other` form
    /// 5. `one` when `count` is 1, else `other`
    pub fn translate(&self, one: &str, other: &str, count: f64, locale: &str) -> String {
        self.inner.translate(one, other, count, locale)
    }

    /// Direct lookup of a phrase.
    pub fn translate_phrase(&self, phrase: &str, locale: &str) -> String {
        self.inner.translate(phrase, "", 0.0, locale)
    }

    /// `true` once a lookup recorded a phrase missing from the table.
    pub fn is_dirty(&self) -> bool {
        self.inner.dirty.load(Ordering::Relaxed)
    }

    /// Phrases present in the table without any translation.
    pub fn missing_phrases(&self) -> Vec<String> {
        self.inner.phrases.read_with(|phrases| {
            phrases
                .iter()
                .filter(|(_, forms)| forms.is_blank())
                .map(|(phrase, _)| phrase.clone())
                .collect()
        })
    }

    /// A copy of the whole phrase table, recorded phrases included.
    pub fn phrases(&self) -> Document {
        self.inner.phrases.read_with(|phrases| {
            phrases
                .iter()
                .map(|(phrase, forms)| (phrase.clone(), forms.clone()))
                .collect()
        })
    }
}

struct TranslationLookupInner {
    phrases: Atomic<IndexMap<String, Value>>,
    dirty: AtomicBool,
    selectors: Atomic<IndexMap<String, PluralSelector>>,
}

impl Default for TranslationLookupInner {
    fn default() -> Self {
        TranslationLookupInner::new()
    }
}

impl TranslationLookupInner {
    fn new() -> Self {
        TranslationLookupInner {
            phrases: atomic(IndexMap::new()),
            dirty: AtomicBool::new(false),
            selectors: atomic(IndexMap::new()),
        }
    }

    fn ingest(&self, document: Document) {
        self.phrases.write_with(|phrases| {
            for (phrase, forms) in document {
                phrases.insert(phrase, forms);
            }
        });
    }

    fn register_selector(&self, language: &str, selector: PluralSelector) {
        let language = language_of(language);
        self.selectors
            .write_with(|selectors| selectors.insert(language, selector));
    }

    fn selector(&self, locale: &str) -> PluralSelector {
        let language = language_of(locale);
        self.selectors
            .read_with(|selectors| selectors.get(&language).cloned())
            .unwrap_or_else(default_selector)
    }

    fn translate(&self, one: &str, other: &str, count: f64, locale: &str) -> String {
        let one = one.trim();
        let (key, other, count) = if other.is_empty() {
            (one, None, None)
        } else {
            let other = other.trim();
            (other, Some(other), Some(count))
        };

        let fallback = || match (count, other) {
            (Some(count), _) if count == 1.0 && !one.is_empty() => one.to_string(),
            (_, Some(other)) => other.to_string(),
            (_, None) => one.to_string(),
        };

        let forms = match self.forms(key, locale) {
            Some(Value::Document(forms)) => forms,
            Some(Value::Array(_)) | None => return fallback(),
            Some(translation) => return form_text(&translation).unwrap_or_else(fallback),
        };

        if let Some(count) = count.filter(|count| *count != 0.0) {
            if let Some(text) = forms.get(&format_float(count)).and_then(form_text) {
                return text;
            }
        }

        let category = (self.selector(locale))(count.unwrap_or(0.0));
        [category.as_str(), PluralCategory::Other.as_str()]
            .iter()
            .find_map(|form| forms.get(form).and_then(form_text))
            .unwrap_or_else(fallback)
    }

    fn forms(&self, key: &str, locale: &str) -> Option<Value> {
        let entry = self.phrases.read_with(|phrases| phrases.get(key).cloned());

        let Some(entry) = entry else {
            log::debug!("Recording missing phrase '{}'", key);
            self.phrases.write_with(|phrases| {
                phrases
                    .entry(key.to_string())
                    .or_insert_with(|| Value::Document(Document::new()));
            });
            self.dirty.store(true, Ordering::Relaxed);
            return None;
        };

        if entry.is_blank() {
            return None;
        }

        match entry {
            Value::Document(forms) => match forms.get(locale) {
                Some(localized) if !localized.is_blank() => Some(localized.clone()),
                _ => Some(Value::Document(forms)),
            },
            other => Some(other),
        }
    }
}

fn form_text(form: &Value) -> Option<String> {
    match form {
        Value::String(text) => Some(text.clone()),
        Value::I64(_) | Value::F64(_) => form.canonical_text(),
        _ => None,
    }
}
