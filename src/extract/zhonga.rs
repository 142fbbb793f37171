/// Extractor for zhonga.ru search pages.
///
/// A multi-entry page lists one `div.segmented-unit` per matched word. An
/// exact-match page has a single `span.pinyin` and one or more
/// `div#unit-dic-definitions` blocks.
use super::{Entry, Extraction};
use crate::document::{Attr, DocNode};
use crate::error::LookupError;
use tracing::warn;

const UNIT_CLASS: &str = "segmented-unit";
const UNIT_VALUE_CLASS: &str = "segmented-unit-value";
const PINYIN_CLASS: &str = "pinyin";
const DIC_DEFINITIONS_CLASS: &str = "segmented-unit-dic-definitions";
const USER_DEFINITIONS_CLASS: &str = "segmented-unit-user-definitions";
const SINGLE_DEFINITIONS_ID: &str = "unit-dic-definitions";

pub fn extract<N: DocNode>(body: N, query: &str) -> Result<Extraction, LookupError> {
    let units = body.find_all("div", Attr::Class(UNIT_CLASS));
    if units.is_empty() {
        return single_entry(body, query).map(Extraction::Single);
    }

    // A malformed unit is dropped; the page fails only when none is usable.
    let mut entries = Vec::with_capacity(units.len());
    let mut last_error = None;
    for (index, unit) in units.into_iter().enumerate() {
        match unit_entry(unit, index) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                warn!(index, "skipping malformed zhonga unit: {e}");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if entries.is_empty() => Err(e),
        _ => Ok(Extraction::Entries(entries)),
    }
}

fn unit_entry<N: DocNode>(unit: N, index: usize) -> Result<Entry, LookupError> {
    let missing = |what: &str| LookupError::ParseFailed(format!("zhonga unit {index} has no {what}"));

    let headword = unit
        .find("div", Attr::Class(UNIT_VALUE_CLASS))
        .and_then(|value| value.find("a", Attr::Any))
        .ok_or_else(|| missing("headword link"))?
        .text();

    let pinyin = unit
        .find("span", Attr::Class(PINYIN_CLASS))
        .ok_or_else(|| missing("pinyin"))?
        .trimmed_text();

    let dictionary = unit
        .find("div", Attr::Class(DIC_DEFINITIONS_CLASS))
        .map(|d| d.trimmed_text());
    let user = unit
        .find("div", Attr::Class(USER_DEFINITIONS_CLASS))
        .map(|d| d.trimmed_text());

    // Dictionary text first, user text appended without a separator.
    let translation = match (dictionary, user) {
        (Some(dic), Some(user)) => dic + &user,
        (Some(dic), None) => dic,
        (None, Some(user)) => user,
        (None, None) => return Err(missing("definitions")),
    };

    Ok(Entry {
        original: vec![headword],
        pronunciation: vec![pinyin],
        translation: vec![translation],
    })
}

fn single_entry<N: DocNode>(body: N, query: &str) -> Result<Entry, LookupError> {
    let pinyin = body
        .find("span", Attr::Class(PINYIN_CLASS))
        .ok_or_else(|| {
            LookupError::ParseFailed("zhonga page has neither word units nor a pinyin span".into())
        })?
        .trimmed_text();

    let translation = body
        .find_all("div", Attr::Id(SINGLE_DEFINITIONS_ID))
        .iter()
        .map(DocNode::trimmed_text)
        .collect();

    Ok(Entry {
        original: vec![query.to_string()],
        pronunciation: vec![pinyin],
        translation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HtmlDocument, MemElement};

    fn unit(headword: &str, pinyin: &str) -> MemElement {
        MemElement::new("div")
            .with_class("segmented-unit")
            .with_child(
                MemElement::new("div")
                    .with_class("segmented-unit-value")
                    .with_child(MemElement::new("a").with_text(headword)),
            )
            .with_child(MemElement::new("span").with_class("pinyin").with_text(pinyin))
    }

    fn definitions(class: &str, text: &str) -> MemElement {
        MemElement::new("div").with_class(class).with_text(text)
    }

    #[test]
    fn test_units_in_document_order() {
        let tree = MemElement::new("body")
            .with_child(
                unit("那", " nà ")
                    .with_child(definitions("segmented-unit-dic-definitions", " тот ")),
            )
            .with_child(
                unit("不", "bù")
                    .with_child(definitions("segmented-unit-dic-definitions", "не;"))
                    .with_child(definitions("segmented-unit-user-definitions", " нет")),
            );

        let Extraction::Entries(entries) = extract(&tree, "那不").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].original, vec!["那"]);
        assert_eq!(entries[0].pronunciation, vec!["nà"]);
        assert_eq!(entries[0].translation, vec!["тот"]);
        assert_eq!(entries[1].translation, vec!["не;нет"]);
    }

    #[test]
    fn test_user_definitions_fallback() {
        let tree = MemElement::new("body").with_child(
            unit("那不", "nà bù")
                .with_child(definitions("segmented-unit-user-definitions", "разве не")),
        );
        let Extraction::Entries(entries) = extract(&tree, "那不").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries[0].translation, vec!["разве не"]);
    }

    #[test]
    fn test_unit_without_definitions_fails() {
        let tree = MemElement::new("body").with_child(unit("那", "nà"));
        let err = extract(&tree, "那").unwrap_err();
        assert!(matches!(err, LookupError::ParseFailed(msg) if msg.contains("definitions")));
    }

    #[test]
    fn test_unit_without_pinyin_fails() {
        let tree = MemElement::new("body").with_child(
            MemElement::new("div")
                .with_class("segmented-unit")
                .with_child(
                    MemElement::new("div")
                        .with_class("segmented-unit-value")
                        .with_child(MemElement::new("a").with_text("那")),
                )
                .with_child(definitions("segmented-unit-dic-definitions", "тот")),
        );
        let err = extract(&tree, "那").unwrap_err();
        assert!(matches!(err, LookupError::ParseFailed(msg) if msg.contains("pinyin")));
    }

    #[test]
    fn test_malformed_unit_is_skipped() {
        let no_pinyin = MemElement::new("div")
            .with_class("segmented-unit")
            .with_child(
                MemElement::new("div")
                    .with_class("segmented-unit-value")
                    .with_child(MemElement::new("a").with_text("那")),
            )
            .with_child(definitions("segmented-unit-dic-definitions", "тот"));
        let tree = MemElement::new("body")
            .with_child(no_pinyin)
            .with_child(unit("不", "bù").with_child(definitions("segmented-unit-dic-definitions", "не")))
            .with_child(unit("吗", "ma"));

        let Extraction::Entries(entries) = extract(&tree, "那不吗").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original, vec!["不"]);
        assert_eq!(entries[0].translation, vec!["не"]);
    }

    #[test]
    fn test_single_entry_fallback() {
        let tree = MemElement::new("body")
            .with_child(MemElement::new("span").with_class("pinyin").with_text(" nǎr "))
            .with_child(
                MemElement::new("div")
                    .with_id("unit-dic-definitions")
                    .with_text(" где? "),
            )
            .with_child(
                MemElement::new("div")
                    .with_id("unit-dic-definitions")
                    .with_text("куда?"),
            );

        assert_eq!(
            extract(&tree, "哪儿").unwrap(),
            Extraction::Single(Entry {
                original: vec!["哪儿".into()],
                pronunciation: vec!["nǎr".into()],
                translation: vec!["где?".into(), "куда?".into()],
            })
        );
    }

    #[test]
    fn test_empty_page_is_parse_failure() {
        let tree = MemElement::new("body");
        assert!(matches!(
            extract(&tree, "哪儿"),
            Err(LookupError::ParseFailed(_))
        ));
    }

    #[test]
    fn test_html_units_page() {
        let doc = HtmlDocument::parse(include_str!("../../tests/fixtures/zhonga_units.html"));
        let Extraction::Entries(entries) = extract(doc.body(), "那不").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].translation, vec!["тот; там"]);
        assert_eq!(entries[1].translation, vec!["не;нет"]);
        assert_eq!(entries[2].original, vec!["那不"]);
        assert_eq!(entries[2].pronunciation, vec!["nà bù"]);
        assert_eq!(entries[2].translation, vec!["разве не"]);
    }

    #[test]
    fn test_html_single_page() {
        let doc = HtmlDocument::parse(include_str!("../../tests/fixtures/zhonga_single.html"));
        assert_eq!(
            serde_json::to_value(extract(doc.body(), "哪儿").unwrap()).unwrap(),
            serde_json::json!([["哪儿"], ["nǎr"], ["где?, куда?", "разг. где-нибудь"]])
        );
    }
}
