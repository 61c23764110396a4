use flatdb::doc;
use flatdb::translation::{PluralCategory, TranslationLookup};
use flatdb_int_test::test_util::{cleanup, create_test_context, run_test, TestContext};

fn slovak(n: f64) -> PluralCategory {
    if n.fract() != 0.0 {
        PluralCategory::Fraction
    } else if n == 1.0 {
        PluralCategory::One
    } else if (2.0..=4.0).contains(&n) {
        PluralCategory::Few
    } else {
        PluralCategory::Other
    }
}

fn load(ctx: &TestContext) -> flatdb::errors::FlatDbResult<TranslationLookup> {
    ctx.write_documents(&[
        doc! {
            "Hello": "Ahoj",
            "%d files": {
                sk_SK: {
                    one: "%d súbor",
                    few: "%d súbory",
                    other: "%d súborov",
                    "0": "žiadne súbory",
                },
                other: "%d files",
            },
        },
        doc! {
            "%d comments": {
                other: "%d komentárov",
            },
            "Untranslated": "",
        },
    ])?;
    Ok(TranslationLookup::from_source(&ctx.source())?.with_selector("sk", slovak))
}

#[test]
fn test_fallback_chain() {
    run_test(
        create_test_context,
        |ctx| {
            let lookup = load(&ctx)?;

            // verbatim string entry
            assert_eq!(lookup.translate_phrase("Hello", "sk_SK"), "Ahoj");

            // locale sub-entry, plural category
            assert_eq!(lookup.translate("%d file", "%d files", 1.0, "sk_SK"), "%d súbor");
            assert_eq!(lookup.translate("%d file", "%d files", 3.0, "sk_SK"), "%d súbory");
            assert_eq!(lookup.translate("%d file", "%d files", 8.0, "sk_SK"), "%d súborov");

            // the count key is skipped for zero
            assert_eq!(lookup.translate("%d file", "%d files", 0.0, "sk_SK"), "%d súborov");

            // no fraction form, falls back to other
            assert_eq!(lookup.translate("%d file", "%d files", 1.5, "sk_SK"), "%d súborov");

            // no locale entry: the phrase entry itself holds the forms
            assert_eq!(lookup.translate("%d file", "%d files", 2.0, "en_US"), "%d files");
            assert_eq!(lookup.translate("%d comment", "%d comments", 2.0, "sk_SK"), "%d komentárov");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_missing_and_empty_phrases() {
    run_test(
        create_test_context,
        |ctx| {
            let lookup = load(&ctx)?;
            assert!(!lookup.is_dirty());

            assert_eq!(lookup.translate_phrase("Untranslated", "sk_SK"), "Untranslated");
            assert!(!lookup.is_dirty());

            assert_eq!(lookup.translate("%d like", "%d likes", 1.0, "sk_SK"), "%d like");
            assert_eq!(lookup.translate("%d like", "%d likes", 4.0, "sk_SK"), "%d likes");
            assert!(lookup.is_dirty());

            let missing = lookup.missing_phrases();
            assert_eq!(missing, vec!["Untranslated".to_string(), "%d likes".to_string()]);
            Ok(())
        },
        cleanup,
    )
}
