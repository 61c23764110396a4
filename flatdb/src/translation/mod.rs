//! Phrase translation with pluggable plural rules.
//!
//! Plural rules are not built in: each language registers a
//! [PluralSelector] mapping a count to a [PluralCategory], and languages
//! without one always select `other`.

mod lookup;
mod plural;

pub use lookup::*;
pub use plural::*;
