use std::fs;
use std::io::Write;
use tempfile::TempDir;

use docchat_core::loader::DocumentLoader;

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let loader = DocumentLoader::new();
    let chunks = loader.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(chunks[0].content.trim(), "Short text");
    assert_eq!(chunks[0].id, "a:0");
    assert_eq!(chunks[0].total_chunks, 1);
}

#[test]
fn empty_directory_yields_zero_chunks() {
    let tmp = TempDir::new().unwrap();

    let loader = DocumentLoader::new();
    let chunks = loader.process_directory(tmp.path()).expect("process");

    assert!(chunks.is_empty(), "no files, no chunks, no error");
}

#[test]
fn unsupported_extensions_are_skipped() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("notes.txt"), "keep me").unwrap();
    fs::write(dir.join("readme.md"), "keep me too").unwrap();
    fs::write(dir.join("binary.pdf"), "skip me").unwrap();

    let loader = DocumentLoader::new();
    let docs = loader.load_directory(dir).expect("load");

    let mut ids: Vec<&str> = docs.iter().map(|d| d.doc_id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["notes", "readme"]);
}

#[test]
fn subdirectories_are_walked_in_sorted_order() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir(dir.join("b_sub")).unwrap();
    fs::write(dir.join("b_sub/inner.txt"), "inner text").unwrap();
    fs::write(dir.join("a.txt"), "outer text").unwrap();

    let loader = DocumentLoader::new();
    let docs = loader.load_directory(dir).expect("load");

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].doc_id, "a", "top-level file sorts first");
    assert_eq!(docs[1].doc_id, "b_sub/inner");
}

#[test]
fn same_named_files_in_different_subdirs_get_distinct_ids() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::create_dir(dir.join("x")).unwrap();
    fs::create_dir(dir.join("y")).unwrap();
    fs::write(dir.join("x/notes.txt"), "alpha content").unwrap();
    fs::write(dir.join("y/notes.txt"), "bravo content").unwrap();

    let loader = DocumentLoader::new();
    let chunks = loader.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].id, "x/notes:0");
    assert_eq!(chunks[1].id, "y/notes:0");
}

#[test]
fn paragraphs_become_separate_chunks() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("multi.txt"), "first paragraph\n\nsecond paragraph").unwrap();

    let loader = DocumentLoader::new();
    let chunks = loader.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].content, "first paragraph");
    assert_eq!(chunks[1].content, "second paragraph");
    assert_eq!(chunks[0].total_chunks, 2);
    assert_eq!(chunks[1].chunk_index, 1);
}

#[test]
fn oversized_paragraph_splits_with_overlap() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    // ~900 words in one paragraph forces the overlapping-window split.
    let long: String = (0..900).map(|i| format!("word{} ", i)).collect();
    fs::write(dir.join("long.txt"), long.trim()).unwrap();

    let loader = DocumentLoader::new();
    let chunks = loader.process_directory(dir).expect("process");

    assert!(chunks.len() > 1, "long paragraph is split");
    // Consecutive windows share words: the tail of one chunk re-appears at
    // the head of the next.
    let first_words: Vec<&str> = chunks[0].content.split_whitespace().collect();
    let second_words: Vec<&str> = chunks[1].content.split_whitespace().collect();
    assert_eq!(first_words[first_words.len() - 60], second_words[0]);
}
