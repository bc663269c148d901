use bookscan_core::config_file::load_from_path;
use bookscan_core::{
    BookFormat, BookType, FlawTag, NarrativeType, OcrDocument, OcrPage, ScanConfigBuilder,
    Scanner, ShortenRequest, TitleComponents, extract_edition, extract_isbn, normalize, shorten,
    synthesize,
};

fn text(lines: &[&str]) -> bookscan_core::NormalizedText {
    normalize(&OcrDocument {
        pages: vec![OcrPage {
            lines: lines.iter().map(|l| l.to_string()).collect(),
        }],
    })
}

fn chars(s: &str) -> usize {
    s.chars().count()
}

#[test]
fn labelled_isbn_line() {
    let t = text(&["PENGUIN BOOKS", "ISBN: 978-0-947163-61-7", "$16.00"]);
    let isbn = extract_isbn(&t).unwrap();
    assert_eq!(isbn.as_str(), "9780947163617");
}

#[test]
fn unlabelled_spaced_barcode() {
    let t = text(&["Printed in the USA", "9 780947 163617", "51600"]);
    assert_eq!(extract_isbn(&t).unwrap().as_str(), "9780947163617");
}

#[test]
fn isbn13_preferred_over_isbn10() {
    let t = text(&["ISBN-10: 0-306-40615-2", "EAN 9780306406157"]);
    let isbn = extract_isbn(&t).unwrap();
    assert_eq!(isbn.as_str(), "9780306406157");
    assert_eq!(chars(isbn.as_str()), 13);
}

#[test]
fn isbn10_when_no_isbn13() {
    let t = text(&["ISBN 0-8044-2957-X", "Library of Congress"]);
    assert_eq!(extract_isbn(&t).unwrap().as_str(), "080442957X");
}

#[test]
fn no_isbn_in_plain_prose() {
    let t = text(&["It was a dark and stormy night", "Chapter 1"]);
    assert!(extract_isbn(&t).is_none());
}

#[test]
fn spelled_edition() {
    let t = text(&["CALCULUS", "THIRD EDITION", "James Stewart"]);
    assert_eq!(extract_edition(&t).as_deref(), Some("Third Edition"));
}

#[test]
fn warped_and_stain_flaws() {
    let report = Scanner::new().detect_flaws(&text(&["Back cover WARPED", "small STAIN on spine"]));
    let tags: Vec<FlawTag> = report.tags().collect();
    assert_eq!(tags, vec![FlawTag::Warped, FlawTag::DirtResidue]);
    assert!(report.any_detected());
}

#[test]
fn fiction_title_within_budget() {
    let mut c = TitleComponents::new("The Silent Patient", "Alex Michaelides");
    c.format = BookFormat::from_binding("Hardcover");
    c.book_type = BookType::Book;
    c.narrative = NarrativeType::Fiction;

    let composed = "The Silent Patient by Alex Michaelides Hardcover Book";
    let title = synthesize(&c);
    assert_eq!(title, format!("{composed} Fiction"));
    assert!(chars(&title) <= 80);
}

#[test]
fn textbook_title_sheds_format_and_type() {
    let main = "Organic Chemistry: Structure, Mechanism and Synthesis Workbook";
    let mut c = TitleComponents::new(main, "Jane Smith");
    c.format = BookFormat::Hardcover;
    c.book_type = BookType::Textbook;

    let composed = format!("{main} by Jane Smith Hardcover Textbook");
    assert_eq!(chars(&composed), 95);

    let title = synthesize(&c);
    assert_eq!(title, format!("{main} by Jane Smith HC"));
    assert!(chars(&title) <= 80);
}

#[test]
fn scan_then_title_threads_text_explicitly() {
    let json = r#"{
        "pages": [
            {"lines": ["NORMAL PEOPLE", "A NOVEL", "SECOND EDITION"]},
            {"lines": ["ISBN: 978-1-9848-2217-8", "some foxed pages, highlighting"]}
        ]
    }"#;
    let scanner = Scanner::new();
    let report = scanner.scan_json(json).unwrap();
    assert_eq!(report.isbn_str(), Some("9781984822178"));
    assert_eq!(report.edition.as_deref(), Some("Second Edition"));
    assert!(report.flaws.contains(FlawTag::Foxing));
    assert!(report.flaws.contains(FlawTag::Highlighting));

    // A later pass reuses the report's text instead of any cached state
    let again = scanner.detect_flaws(&report.text);
    assert_eq!(again, report.flaws);

    let mut c = TitleComponents::new("Normal People", "Sally Rooney");
    c.narrative = NarrativeType::Fiction;
    report.fill_edition(&mut c);
    assert_eq!(
        scanner.synthesize_title(&c),
        "Normal People by Sally Rooney Second Edition Paperback Book Fiction"
    );

    let json_out = serde_json::to_value(&report).unwrap();
    assert_eq!(json_out["isbn"]["value"], "9781984822178");
    assert_eq!(json_out["flaws"]["any_detected"], true);
}

const TITLE_WORDS: &[&str] = &[
    "The", "Complete", "Illustrated", "History", "of", "Everything", "Notable", "in",
    "Northern", "European", "Maritime", "Trade", "and", "Its", "Consequences", "Volume",
];

fn components_grid() -> Vec<TitleComponents> {
    let authors = [
        "",
        "Ann Lee",
        "Dr. Maximilian Featherstonehaugh-Worthington, PhD and Others",
        "Bartholomew Alexander Montgomery-Fitzwilliam III",
    ];
    let mut out = Vec::new();
    for n in [1, 3, 6, 9, 12, 16] {
        let main = TITLE_WORDS[..n].join(" ");
        for author in authors {
            for format in [BookFormat::Hardcover, BookFormat::Paperback] {
                for book_type in [BookType::Book, BookType::Cookbook, BookType::Textbook] {
                    for narrative in [NarrativeType::Fiction, NarrativeType::NonFiction] {
                        out.push(TitleComponents {
                            main_title: main.clone(),
                            subtitle: Some("A Subtitle That Only Short Titles Keep".into()),
                            author: author.to_string(),
                            edition: (n % 2 == 0).then(|| "12th Edition".to_string()),
                            format,
                            book_type,
                            keyword: None,
                            narrative,
                        });
                    }
                }
            }
        }
    }
    out
}

#[test]
fn synthesized_titles_always_fit() {
    for c in components_grid() {
        let title = synthesize(&c);
        assert!(!title.is_empty(), "{c:?}");
        assert!(chars(&title) <= 80, "{} chars: {title}", chars(&title));
        if c.narrative == NarrativeType::Fiction {
            assert!(title.to_lowercase().contains("fiction"), "{title}");
        }
    }
}

#[test]
fn shorten_is_idempotent() {
    for c in components_grid() {
        let request = ShortenRequest {
            main_title: c.main_title.clone(),
            author: bookscan_core::primary_author(&c.author),
            format: c.format,
            book_type: c.book_type,
            fiction: c.narrative == NarrativeType::Fiction,
        };
        let long = format!(
            "{} by {} {} {}",
            c.main_title,
            c.author,
            c.format.label(),
            c.book_type.label()
        );
        let once = shorten(&long, &request);
        assert!(chars(&once) <= 80, "{once}");
        assert_eq!(shorten(&once, &request), once);
    }
}

#[test]
fn config_file_drives_scanner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookscan.toml");
    std::fs::write(
        &path,
        r#"
[title]
budget = 50

[[flaws.extra_synonyms]]
term = "dog-eared"
tag = "COVER_CREASE"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap().to_builder().build().unwrap();
    let scanner = Scanner::with_config(config);

    let report = scanner.detect_flaws(&text(&["several DOG-EARED corners"]));
    assert!(report.contains(FlawTag::CoverCrease));

    let mut c = TitleComponents::new("The Silent Patient", "Alex Michaelides");
    c.format = BookFormat::Hardcover;
    let title = scanner.synthesize_title(&c);
    assert!(chars(&title) <= 50, "{title}");
    assert_eq!(title, "The Silent Patient by Alex Michaelides HC Book");
}

#[test]
fn invalid_budget_rejected() {
    assert!(ScanConfigBuilder::new().title_budget(3).build().is_err());
}
