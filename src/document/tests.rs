#[cfg(test)]
mod tests {
    use crate::constants::DEFAULT_NOTE_TEMPLATE;
    use crate::document::{
        append_journal_section, DailyDocument, FieldValue, JournalEntry, TimePrecision,
    };
    use crate::errors::DocumentError;
    use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone};

    const MIXED_DOC: &str = "---
date: \"2025-12-29T12:39:00+09:00\"
custom_field: keep me   # trailing comment
wake_time: null
reading_min: 0
---

## Memo
Some memo text.

## Journal
- 09:00 Woke up
* 12:00 Lunch
    with friends

## Later
after journal
";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 29).unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn parse(text: &str) -> DailyDocument {
        DailyDocument::parse(date(), text, TimePrecision::Minutes)
    }

    fn entry(h: u32, m: u32, content: &str) -> JournalEntry {
        JournalEntry::new(date(), hm(h, m), content)
    }

    /// Text before and after the Journal section.
    fn outside_journal(doc: &DailyDocument) -> (String, String) {
        let range = doc.journal_range().expect("document should have a journal");
        (
            doc.text()[..range.start].to_string(),
            doc.text()[range.end..].to_string(),
        )
    }

    fn contents(doc: &DailyDocument) -> Vec<String> {
        doc.entries().iter().map(|e| e.content.clone()).collect()
    }

    #[test]
    fn test_parse_mixed_document() {
        let doc = parse(MIXED_DOC);

        assert_eq!(doc.entries().len(), 2);
        assert_eq!(doc.entries()[0].time, hm(9, 0));
        assert_eq!(doc.entries()[0].content, "Woke up");
        assert_eq!(doc.entries()[1].time, hm(12, 0));
        assert_eq!(doc.entries()[1].content, "Lunch\nwith friends");
        assert_eq!(
            doc.get_field_value("custom_field"),
            Some(&FieldValue::from("keep me"))
        );
        assert!(doc.text()[doc.preamble_range()].contains("## Memo"));
    }

    #[test]
    fn test_add_entry_appends_after_last_entry() {
        let doc = parse(MIXED_DOC);
        let updated = doc.add_entry(&entry(21, 0, "Dinner"));

        let expected = MIXED_DOC.replace(
            "- 09:00 Woke up\n* 12:00 Lunch\n    with friends\n",
            "- 09:00 Woke up\n- 12:00 Lunch\n    with friends\n- 21:00 Dinner\n",
        );
        assert_eq!(updated.text(), expected);
        assert_eq!(contents(&updated), vec!["Woke up", "Lunch\nwith friends", "Dinner"]);
    }

    #[test]
    fn test_add_entry_does_not_sort() {
        let doc = parse("## Journal\n- 10:00 late\n");
        let updated = doc.add_entry(&entry(8, 0, "early"));
        assert_eq!(updated.text(), "## Journal\n- 10:00 late\n- 08:00 early\n");
    }

    #[test]
    fn test_mutations_are_local_to_journal() {
        let doc = parse(MIXED_DOC);
        let before = outside_journal(&doc);

        let added = doc.add_entry(&entry(21, 0, "Dinner"));
        assert_eq!(outside_journal(&added), before);

        let updated = added.update_entry(1, "Lunch alone").unwrap();
        assert_eq!(outside_journal(&updated), before);

        let deleted = updated.delete_entry(0).unwrap();
        assert_eq!(outside_journal(&deleted), before);
        assert_eq!(contents(&deleted), vec!["Lunch alone", "Dinner"]);
    }

    #[test]
    fn test_delete_shifts_later_indices_only() {
        let doc = parse("## Journal\n- 08:00 a\n- 09:00 b\n- 10:00 c\n- 11:00 d\n");
        let deleted = doc.delete_entry(1).unwrap();

        assert_eq!(contents(&deleted), vec!["a", "c", "d"]);
        assert_eq!(deleted.entries()[0], doc.entries()[0]);
        assert_eq!(deleted.entries()[1], doc.entries()[2]);
        assert_eq!(deleted.entries()[2], doc.entries()[3]);
    }

    #[test]
    fn test_update_changes_only_that_entry() {
        let doc = parse("## Journal\n- 08:00 a\n- 09:00 b\n- 10:00 c\n");
        let updated = doc.update_entry(1, "b, revised\nwith detail").unwrap();

        assert_eq!(updated.entries()[0], doc.entries()[0]);
        assert_eq!(updated.entries()[2], doc.entries()[2]);
        assert_eq!(updated.entries()[1].time, hm(9, 0));
        assert_eq!(updated.entries()[1].content, "b, revised\nwith detail");
        assert_eq!(
            updated.text(),
            "## Journal\n- 08:00 a\n- 09:00 b, revised\n    with detail\n- 10:00 c\n"
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let doc = parse("## Journal\n- 08:00 a\n");

        match doc.update_entry(1, "x") {
            Err(DocumentError::IndexOutOfRange { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("Expected IndexOutOfRange, got {:?}", other),
        }
        assert!(matches!(
            doc.delete_entry(5),
            Err(DocumentError::IndexOutOfRange { index: 5, len: 1 })
        ));

        let no_journal = parse("just text\n");
        assert!(no_journal.delete_entry(0).is_err());
    }

    #[test]
    fn test_rerender_is_idempotent() {
        let doc = parse(MIXED_DOC);
        let rendered = doc.with_entries(doc.entries());
        assert_eq!(rendered.entries(), doc.entries());

        let again = rendered.with_entries(rendered.entries());
        assert_eq!(again.text(), rendered.text());
    }

    #[test]
    fn test_missing_section_is_created_at_end() {
        let text = "---\na: 1\n---\n\n## Memo\nnotes";
        let doc = parse(text);
        assert!(!doc.has_journal());

        let updated = doc.add_entry(&entry(8, 30, "Coffee"));

        assert!(updated.text().starts_with(text));
        assert_eq!(
            updated.text(),
            "---\na: 1\n---\n\n## Memo\nnotes\n\n## Journal\n- 08:30 Coffee\n"
        );
        let journal_headers = updated
            .layout()
            .headers
            .iter()
            .filter(|h| h.title.ends_with("Journal"))
            .count();
        assert_eq!(journal_headers, 1);
        assert_eq!(contents(&updated), vec!["Coffee"]);
    }

    #[test]
    fn test_missing_section_separator_follows_existing_spacing() {
        let ends_with_newline = parse("## Memo\n").add_entry(&entry(8, 0, "a"));
        assert_eq!(ends_with_newline.text(), "## Memo\n\n## Journal\n- 08:00 a\n");

        let ends_with_blank = parse("## Memo\n\n").add_entry(&entry(8, 0, "a"));
        assert_eq!(ends_with_blank.text(), "## Memo\n\n## Journal\n- 08:00 a\n");

        let empty = parse("").add_entry(&entry(8, 0, "a"));
        assert_eq!(empty.text(), "## Journal\n- 08:00 a\n");
    }

    #[test]
    fn test_stray_content_is_kept_after_entries() {
        let doc = parse("## Journal\nintro\n\n- 09:00 a\n");
        let updated = doc.add_entry(&entry(10, 0, "b"));

        assert_eq!(updated.text(), "## Journal\n- 09:00 a\n- 10:00 b\n\nintro\n");
        assert_eq!(contents(&updated), vec!["a", "b"]);
    }

    #[test]
    fn test_second_list_is_kept_as_filler() {
        let doc = parse("## Journal\n- 09:00 a\n\nnote\n\n- 10:00 b\n");
        assert_eq!(contents(&doc), vec!["a"]);

        let updated = doc.update_entry(0, "A").unwrap();
        assert_eq!(
            updated.text(),
            "## Journal\n- 09:00 A\n\nnote\n\n- 10:00 b\n"
        );
    }

    #[test]
    fn test_non_entry_items_are_preserved() {
        let doc = parse("## Journal\n- 09:00 a\n- buy milk\n- 10:00 b\n");
        assert_eq!(contents(&doc), vec!["a", "b"]);

        let deleted = doc.delete_entry(0).unwrap();
        assert_eq!(deleted.text(), "## Journal\n- 10:00 b\n- buy milk\n");
        assert_eq!(contents(&deleted), vec!["b"]);
    }

    #[test]
    fn test_custom_journal_header_is_kept_verbatim() {
        let doc = parse("## My Daily Journal  \n- 09:00 a\n");
        let updated = doc.add_entry(&entry(10, 0, "b"));
        assert_eq!(
            updated.text(),
            "## My Daily Journal\n- 09:00 a\n- 10:00 b\n"
        );
    }

    #[test]
    fn test_seconds_are_never_dropped() {
        let doc = parse("## Journal\n- 09:00:30 precise\n");
        let updated = doc.add_entry(&entry(10, 0, "later"));
        assert_eq!(
            updated.text(),
            "## Journal\n- 09:00:30 precise\n- 10:00 later\n"
        );

        let doc = DailyDocument::parse(date(), "## Journal\n", TimePrecision::Seconds);
        let updated = doc.add_entry(&entry(10, 0, "later"));
        assert_eq!(updated.text(), "## Journal\n- 10:00:00 later\n");
    }

    #[test]
    fn test_added_entry_is_normalized_and_redated() {
        let other_day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let doc = parse("## Journal\n");
        let updated = doc.add_entry(&JournalEntry::new(other_day, hm(7, 0), "  hi  \n\n"));

        assert_eq!(updated.text(), "## Journal\n- 07:00 hi\n");
        assert_eq!(updated.entries()[0].date, date());
    }

    #[test]
    fn test_field_scenario_on_template_document() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let created_at = offset.with_ymd_and_hms(2025, 12, 29, 12, 39, 0).unwrap();
        let doc = DailyDocument::create(
            date(),
            DEFAULT_NOTE_TEMPLATE,
            created_at,
            TimePrecision::Minutes,
        )
        .unwrap();

        assert!(doc.text().contains("date: \"2025-12-29T12:39:00+09:00\""));
        assert!(doc.has_journal());

        let doc = doc.set_field_value("wake_time", "07:15");
        assert_eq!(doc.get_field_value("wake_time"), Some(&FieldValue::from("07:15")));

        let doc = doc.set_field_value("morning", vec!["toast", "coffee"]);
        assert_eq!(doc.get_field_value("wake_time"), Some(&FieldValue::from("07:15")));
        assert_eq!(
            doc.get_field_value("morning"),
            Some(&FieldValue::from(vec!["toast", "coffee"]))
        );
        assert_eq!(doc.get_field_value("reading_min"), Some(&FieldValue::from("0")));
        assert!(doc.text().contains("reading_min: 0\nexercise_min: 0\n"));
    }

    #[test]
    fn test_unknown_field_survives_other_field_update() {
        let doc = parse(MIXED_DOC);
        let keys_before: Vec<String> = doc
            .frontmatter()
            .keys()
            .iter()
            .map(|k| k.to_string())
            .collect();

        let updated = doc.set_field_value("wake_time", "06:45");

        let keys_after: Vec<String> = updated
            .frontmatter()
            .keys()
            .iter()
            .map(|k| k.to_string())
            .collect();
        assert_eq!(keys_after, keys_before);
        assert!(updated
            .text()
            .contains("custom_field: keep me   # trailing comment\n"));
        assert_eq!(
            updated.text(),
            MIXED_DOC.replace("wake_time: null\n", "wake_time: \"06:45\"\n")
        );
        assert_eq!(updated.entries(), doc.entries());
    }

    #[test]
    fn test_set_fields_in_one_rewrite() {
        let doc = parse(MIXED_DOC);
        let updated = doc.set_field_values(vec![
            ("wake_time".to_string(), FieldValue::from("07:00")),
            ("sleep_time".to_string(), FieldValue::from("23:30")),
        ]);

        assert_eq!(updated.get_field_value("wake_time"), Some(&FieldValue::from("07:00")));
        assert_eq!(updated.get_field_value("sleep_time"), Some(&FieldValue::from("23:30")));
        assert_eq!(
            updated.frontmatter().keys().last().copied(),
            Some("sleep_time")
        );
    }

    #[test]
    fn test_set_field_creates_frontmatter_block() {
        let doc = parse("## Journal\n- 09:00 a\n");
        let updated = doc.set_field_value("wake_time", "07:15");

        assert_eq!(
            updated.text(),
            "---\nwake_time: \"07:15\"\n---\n\n## Journal\n- 09:00 a\n"
        );
        assert_eq!(contents(&updated), vec!["a"]);
    }

    #[test]
    fn test_set_field_to_same_value_is_a_no_op() {
        let doc = parse(MIXED_DOC);
        let updated = doc.set_field_value("wake_time", FieldValue::Null);
        assert_eq!(updated.text(), MIXED_DOC);
    }

    #[test]
    fn test_unterminated_template_is_rejected() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let created_at = offset.with_ymd_and_hms(2025, 12, 29, 0, 0, 0).unwrap();

        let result = DailyDocument::create(
            date(),
            "---\ndate: {{date}}\n\n## Journal\n",
            created_at,
            TimePrecision::Minutes,
        );
        assert!(matches!(result, Err(DocumentError::Template(_))));
    }

    #[test]
    fn test_template_without_journal_gets_one() {
        let offset = FixedOffset::east_opt(-5 * 3600).unwrap();
        let created_at = offset.with_ymd_and_hms(2025, 12, 29, 6, 0, 0).unwrap();

        let doc = DailyDocument::create(date(), "# {{date}}\n", created_at, TimePrecision::Minutes)
            .unwrap();
        assert_eq!(doc.text(), "# 2025-12-29T06:00:00-05:00\n\n## Journal\n");
        assert!(doc.has_journal());
        assert!(doc.entries().is_empty());
    }

    #[test]
    fn test_append_section_to_undecodable_bytes() {
        let bytes = b"notes \xff\xfe end".to_vec();
        let appended =
            append_journal_section(&bytes, &entry(9, 15, " tea "), TimePrecision::Minutes);

        assert!(appended.starts_with(&bytes));
        assert_eq!(&appended[bytes.len()..], b"\n\n## Journal\n- 09:15 tea\n");
    }
}
