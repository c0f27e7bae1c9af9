use std::path::PathBuf;

use sword2flex::export::{collect_book, export_book};
use sword2flex::source::WebBook;
use sword2flex::{Interlinear, Settings};

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn open_osis() -> Interlinear {
    Settings {
        data_dir: fixtures().join("data"),
        translations: vec![("KJV".to_string(), fixtures().join("KJV.osis.xml"))],
        ..Default::default()
    }
    .open()
    .unwrap()
}

#[test]
fn test_collect_book_extent() {
    let book = collect_book(&open_osis(), "John");
    let keys: Vec<&str> = book.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["1:1", "1:2", "1:3", "2:1", "2:2"]);

    let first = &book["1:1"];
    assert_eq!(first.words.len(), 5);
    assert_eq!(first.words[4].g, "λόγος");
    assert_eq!(first.words[4].strongs, "G3056");
    assert_eq!(first.words[4].gls, "word");
    assert_eq!(first.words[4].l, "λόγος");
    assert_eq!(first.words[4].m, "robinson:N-NSM");
    assert!(first.translation.starts_with("In the beginning was the Word"));
    assert_eq!(book["1:3"].translation, "");

    assert!(collect_book(&open_osis(), "Mark").is_empty());
}

#[test]
fn test_exported_books_serve_as_source() {
    let osis = open_osis();
    let data_dir = tempfile::tempdir().unwrap();
    let web = data_dir.path().join("web");

    let path = export_book(&osis, "John", &web).unwrap();
    assert_eq!(path, web.join("John.json"));
    let written: WebBook = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.len(), 5);

    // No OSIS file and no gloss file here: the chain falls back to web/.
    let mut from_json = Settings {
        data_dir: data_dir.path().to_path_buf(),
        translations: vec![("web".to_string(), web.clone())],
        ..Default::default()
    }
    .open()
    .unwrap();
    assert_eq!(from_json.text_source().id(), "web");
    assert!(from_json.lexicon().is_empty());

    let expected = osis.lookup("John 1:2-2:2").unwrap();
    let actual = from_json.lookup("John 1:2-2:2").unwrap();
    assert_eq!(actual, expected);

    let v = expected.verses[0].verse_ref();
    assert_eq!(from_json.phrase_translation(&v), osis.phrase_translation(&v));

    from_json.set_translation("NONE").unwrap();
    assert_eq!(from_json.phrase_translation(&v), "");
}
