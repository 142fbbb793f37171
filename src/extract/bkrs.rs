/// Extractor for bkrs.info result pages.
///
/// Multi-entry pages hold one or more `table.tbl_bywords`. Rows alternate
/// between the headword (even rows) and its translation (odd rows); a
/// `<center>` inside any cell carries the pinyin for the current pair.
/// Exact-match pages have a `div.py` pinyin block and `div.ru` lines.
use tracing::warn;

use super::{Entry, Extraction};
use crate::document::{Attr, DocNode};
use crate::error::LookupError;

const WORD_TABLE_CLASS: &str = "tbl_bywords";
const PINYIN_CLASS: &str = "py";
const TRANSLATION_CLASS: &str = "ru";

pub fn extract<N: DocNode>(body: N, query: &str) -> Result<Extraction, LookupError> {
    let tables = body.find_all("table", Attr::Class(WORD_TABLE_CLASS));
    if tables.is_empty() {
        return single_entry(body, query).map(Extraction::Single);
    }

    let mut originals = Vec::new();
    let mut pinyin = Vec::new();
    let mut translations = Vec::new();

    for table in tables {
        for (count, row) in table.find_all("tr", Attr::Any).into_iter().enumerate() {
            for cell in row.find_all("td", Attr::Any) {
                if let Some(center) = cell.find("center", Attr::Any) {
                    pinyin.push(vec![center.trimmed_text()]);
                }
                if count % 2 == 0 {
                    originals.push(headword(cell));
                } else {
                    translations.push(translation_lines(cell));
                }
            }
        }
    }

    Ok(Extraction::Entries(zip_entries(
        originals,
        pinyin,
        translations,
    )))
}

/// First link's contents, or the whole cell's contents without a link.
fn headword<N: DocNode>(cell: N) -> Vec<String> {
    match cell.find("a", Attr::Any) {
        Some(link) => link.contents(),
        None => cell.contents(),
    }
}

fn translation_lines<N: DocNode>(cell: N) -> Vec<String> {
    let blocks = cell.find_all("div", Attr::Any);
    if blocks.is_empty() {
        vec![cell.trimmed_text()]
    } else {
        blocks.iter().map(DocNode::trimmed_text).collect()
    }
}

/// Zip positionally, truncating to the shortest list.
fn zip_entries(
    originals: Vec<Vec<String>>,
    pinyin: Vec<Vec<String>>,
    translations: Vec<Vec<String>>,
) -> Vec<Entry> {
    if originals.len() != pinyin.len() || originals.len() != translations.len() {
        warn!(
            originals = originals.len(),
            pinyin = pinyin.len(),
            translations = translations.len(),
            "bkrs word table rows are misaligned, truncating to the shortest column"
        );
    }

    originals
        .into_iter()
        .zip(pinyin)
        .zip(translations)
        .map(|((original, pronunciation), translation)| Entry {
            original,
            pronunciation,
            translation,
        })
        .collect()
}

fn single_entry<N: DocNode>(body: N, query: &str) -> Result<Entry, LookupError> {
    let pinyin = body
        .find("div", Attr::Class(PINYIN_CLASS))
        .ok_or_else(|| {
            LookupError::ParseFailed("bkrs page has neither word tables nor a pinyin block".into())
        })?
        .trimmed_text();

    let translation = body
        .find_all("div", Attr::Class(TRANSLATION_CLASS))
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

    fn word_row(headword: &str) -> MemElement {
        MemElement::new("tr").with_child(
            MemElement::new("td")
                .with_child(MemElement::new("a").with_text(headword))
                .with_child(MemElement::new("center").with_text(" nà ")),
        )
    }

    fn translation_row(lines: &[&str]) -> MemElement {
        let mut cell = MemElement::new("td");
        for line in lines {
            cell = cell.with_child(MemElement::new("div").with_text(line));
        }
        MemElement::new("tr").with_child(cell)
    }

    #[test]
    fn test_word_table_pairs_rows() {
        let tree = MemElement::new("body").with_child(
            MemElement::new("table")
                .with_class("tbl_bywords")
                .with_child(word_row("那"))
                .with_child(translation_row(&[" тот ", "там"]))
                .with_child(word_row("不"))
                .with_child(translation_row(&["не"])),
        );

        let Extraction::Entries(entries) = extract(&tree, "那不").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].original, vec!["那"]);
        assert_eq!(entries[0].pronunciation, vec!["nà"]);
        assert_eq!(entries[0].translation, vec!["тот", "там"]);
        assert_eq!(entries[1].original, vec!["不"]);
        assert_eq!(entries[1].translation, vec!["не"]);
    }

    #[test]
    fn test_translation_cell_without_divs_uses_cell_text() {
        let tree = MemElement::new("body").with_child(
            MemElement::new("table")
                .with_class("tbl_bywords")
                .with_child(word_row("那"))
                .with_child(
                    MemElement::new("tr")
                        .with_child(MemElement::new("td").with_text("  тот  ")),
                ),
        );

        let Extraction::Entries(entries) = extract(&tree, "那").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries[0].translation, vec!["тот"]);
    }

    #[test]
    fn test_headword_without_link_uses_cell_contents() {
        let tree = MemElement::new("body").with_child(
            MemElement::new("table")
                .with_class("tbl_bywords")
                .with_child(
                    MemElement::new("tr").with_child(
                        MemElement::new("td")
                            .with_text("哪儿")
                            .with_child(MemElement::new("center").with_text("nǎr")),
                    ),
                )
                .with_child(translation_row(&["где?"])),
        );

        let Extraction::Entries(entries) = extract(&tree, "哪儿").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries[0].original, vec!["哪儿", "nǎr"]);
        assert_eq!(entries[0].pronunciation, vec!["nǎr"]);
    }

    #[test]
    fn test_missing_pinyin_truncates() {
        let tree = MemElement::new("body").with_child(
            MemElement::new("table")
                .with_class("tbl_bywords")
                .with_child(word_row("那"))
                .with_child(translation_row(&["тот"]))
                .with_child(
                    MemElement::new("tr").with_child(
                        MemElement::new("td").with_child(MemElement::new("a").with_text("不")),
                    ),
                )
                .with_child(translation_row(&["не"])),
        );

        let Extraction::Entries(entries) = extract(&tree, "那不").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].original, vec!["那"]);
    }

    #[test]
    fn test_zip_spans_tables() {
        let table = || {
            MemElement::new("table")
                .with_class("tbl_bywords")
                .with_child(word_row("那"))
                .with_child(translation_row(&["тот"]))
                .with_child(word_row("不"))
        };
        // The first table's dangling word row pairs with the second table's
        // translation row.
        let tree = MemElement::new("body")
            .with_child(table())
            .with_child(table());

        let Extraction::Entries(entries) = extract(&tree, "那").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].original, vec!["不"]);
        assert_eq!(entries[1].translation, vec!["тот"]);
    }

    #[test]
    fn test_single_entry_fallback() {
        let tree = MemElement::new("body")
            .with_child(MemElement::new("div").with_class("py").with_text("\n nǎr \n"))
            .with_child(MemElement::new("div").with_class("ru").with_text(" где? "))
            .with_child(MemElement::new("div").with_class("ru").with_text("куда?"));

        let extraction = extract(&tree, "哪儿").unwrap();
        assert_eq!(
            extraction,
            Extraction::Single(Entry {
                original: vec!["哪儿".into()],
                pronunciation: vec!["nǎr".into()],
                translation: vec!["где?".into(), "куда?".into()],
            })
        );
    }

    #[test]
    fn test_single_entry_without_translations() {
        let tree = MemElement::new("body")
            .with_child(MemElement::new("div").with_class("py").with_text("nǎr"));
        let Extraction::Single(entry) = extract(&tree, "哪儿").unwrap() else {
            panic!("expected single-entry layout");
        };
        assert!(entry.translation.is_empty());
    }

    #[test]
    fn test_page_without_pinyin_is_parse_failure() {
        let tree = MemElement::new("body").with_child(MemElement::new("div").with_text("404"));
        let err = extract(&tree, "哪儿").unwrap_err();
        assert!(matches!(err, LookupError::ParseFailed(_)));
    }

    #[test]
    fn test_html_single_entry_page() {
        let doc = HtmlDocument::parse(include_str!("../../tests/fixtures/bkrs_single.html"));
        let extraction = extract(doc.body(), "哪儿").unwrap();
        assert_eq!(
            serde_json::to_value(&extraction).unwrap(),
            serde_json::json!([["哪儿"], ["nǎr"], ["разг. где?, куда? (вм. 哪里 кроме 5)"]])
        );
    }

    #[test]
    fn test_html_word_table_page() {
        let doc = HtmlDocument::parse(include_str!("../../tests/fixtures/bkrs_words.html"));
        let Extraction::Entries(entries) = extract(doc.body(), "那不").unwrap() else {
            panic!("expected multi-entry layout");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].original, vec!["那"]);
        assert_eq!(entries[0].pronunciation, vec!["nà"]);
        assert_eq!(entries[0].translation, vec!["тот, та, то", "там"]);
        assert_eq!(entries[1].original, vec!["不"]);
        assert_eq!(entries[1].pronunciation, vec!["bù"]);
        assert_eq!(entries[1].translation, vec!["не, нет"]);
    }
}
