use crate::collection::Document;
use crate::common::{
    Value, CURRENT_FIELD, HOME_FIELD, HREF_FIELD, MISSING_ROUTE_HREF, NAVIGATION_TITLE_FIELD,
    PATH_SEPARATOR, ROUTE_FIELD, TEXT_FIELD, TITLE_FIELD,
};

/// The request a link is rendered for.
///
/// Links depend on the URI being served (to flag the current page) and the
/// active language (routes are prefixed with `/<code>`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkContext {
    request_uri: String,
    language_code: Option<String>,
}

impl LinkContext {
    pub fn new(request_uri: &str) -> LinkContext {
        LinkContext {
            request_uri: request_uri.to_string(),
            language_code: None,
        }
    }

    pub fn with_language(mut self, code: &str) -> LinkContext {
        let code = code.trim().trim_matches('/');
        self.language_code = if code.is_empty() {
            None
        } else {
            Some(code.to_string())
        };
        self
    }

    pub fn request_uri(&self) -> &str {
        &self.request_uri
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    /// Removes the leading `/<language>` segment of a URI.
    pub fn strip_language<'a>(&self, uri: &'a str) -> &'a str {
        let Some(code) = &self.language_code else {
            return uri;
        };
        match uri
            .strip_prefix(PATH_SEPARATOR)
            .and_then(|rest| rest.strip_prefix(code.as_str()))
        {
            Some("") => PATH_SEPARATOR,
            Some(rest) if rest.starts_with(PATH_SEPARATOR) => rest,
            _ => uri,
        }
    }

    /// Prefixes a route with the active language, if any.
    pub fn localize(&self, route: &str) -> String {
        match &self.language_code {
            Some(code) => format!("{}{}{}", PATH_SEPARATOR, code, route),
            None => route.to_string(),
        }
    }

    /// `true` when the URI points at the site root.
    pub fn is_home(&self, uri: &str) -> bool {
        self.strip_language(uri) == PATH_SEPARATOR
    }

    /// `true` when the URI addresses the page being served.
    pub fn is_current(&self, uri: &str) -> bool {
        trim_trailing(self.strip_language(uri))
            == trim_trailing(self.strip_language(&self.request_uri))
    }

    /// `true` when the page being served lies below the URI.
    pub fn is_active(&self, uri: &str) -> bool {
        if self.is_home(uri) {
            return false;
        }
        let uri = trim_trailing(self.strip_language(uri));
        let request = trim_trailing(self.strip_language(&self.request_uri));
        !uri.is_empty() && request.contains(uri)
    }
}

fn trim_trailing(uri: &str) -> &str {
    uri.trim_end_matches(PATH_SEPARATOR)
}

/// What a navigation element needs to render a link to a document.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSummary {
    pub text: String,
    pub href: Value,
    pub title: Option<String>,
    pub current: bool,
    pub home: bool,
}

impl LinkSummary {
    /// Shapes the summary as a document; `title`, `current` and `home` are
    /// only present when set.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        let mut fields: Vec<(&str, Value)> = vec![
            (TEXT_FIELD, Value::from(self.text.as_str())),
            (HREF_FIELD, self.href.clone()),
        ];
        if let Some(title) = &self.title {
            fields.push((TITLE_FIELD, Value::from(title.as_str())));
        }
        if self.current {
            fields.push((CURRENT_FIELD, Value::from(true)));
        }
        if self.home {
            fields.push((HOME_FIELD, Value::from(true)));
        }

        for (key, value) in fields {
            // field names are constants
            let _ = document.put(key, value);
        }
        document
    }
}

/// Builds links and hrefs for documents.
///
/// The query engine attaches `link` to every routed document it returns when
/// a builder is configured.
pub trait LinkBuilder: Send + Sync {
    fn link_to(&self, document: &Document, context: &LinkContext) -> LinkSummary;

    fn href_to(&self, document: &Document, context: &LinkContext) -> Value;
}

/// Derives links from the `route` field of a document.
///
/// The href is the explicit `href` field when present, else the route with
/// the active language prefixed (element-wise for sequences and per-language
/// maps), else `#missingroute`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouteLinkBuilder;

impl RouteLinkBuilder {
    pub fn new() -> RouteLinkBuilder {
        RouteLinkBuilder
    }
}

impl LinkBuilder for RouteLinkBuilder {
    fn link_to(&self, document: &Document, context: &LinkContext) -> LinkSummary {
        let text = document
            .get_str(NAVIGATION_TITLE_FIELD)
            .or_else(|| document.get_str(TITLE_FIELD))
            .unwrap_or_default()
            .to_string();
        let href = self.href_to(document, context);
        let (current, home) = match href.as_str() {
            Some(uri) => (context.is_current(uri), context.is_home(uri)),
            None => (false, false),
        };

        LinkSummary {
            text,
            href,
            title: document.get_str(TITLE_FIELD).map(String::from),
            current,
            home,
        }
    }

    fn href_to(&self, document: &Document, context: &LinkContext) -> Value {
        if let Some(href) = document.get(HREF_FIELD).filter(|v| !v.is_null()) {
            return href.clone();
        }

        match document.get(ROUTE_FIELD) {
            Some(Value::String(route)) => Value::from(context.localize(route)),
            Some(Value::Array(routes)) => {
                Value::Array(routes.iter().map(|route| localize_value(route, context)).collect())
            }
            Some(Value::Document(routes)) => Value::Document(
                routes
                    .iter()
                    .map(|(key, route)| (key.clone(), localize_value(route, context)))
                    .collect(),
            ),
            _ => Value::from(MISSING_ROUTE_HREF),
        }
    }
}

fn localize_value(route: &Value, context: &LinkContext) -> Value {
    match route {
        Value::String(route) => Value::from(context.localize(route)),
        other => other.clone(),
    }
}
