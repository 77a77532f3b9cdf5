//! Document loader contract tests over real (generated) PDF files.

use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use semantic_spotter::{DocumentLoader, SpotterError};

/// Write a PDF with one page per entry of `page_texts`.
fn write_pdf(path: &Path, page_texts: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

#[test]
fn missing_directory_is_not_found() {
    let loader = DocumentLoader::new(1000, 200).unwrap();
    let err = loader.load_documents(Path::new("/definitely/not/here")).unwrap_err();
    assert!(matches!(err, SpotterError::NotFound { .. }), "got {err:?}");
}

#[test]
fn missing_file_is_not_found() {
    let loader = DocumentLoader::new(1000, 200).unwrap();
    let err = loader.load_single_document(Path::new("/definitely/not/here.pdf")).unwrap_err();
    assert!(matches!(err, SpotterError::NotFound { .. }), "got {err:?}");
}

#[test]
fn an_unparseable_pdf_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.pdf"), b"this is not a pdf").unwrap();

    let loader = DocumentLoader::new(1000, 200).unwrap();
    let err = loader.load_documents(dir.path()).unwrap_err();
    assert!(matches!(err, SpotterError::Pdf { .. }), "got {err:?}");
}

#[test]
fn an_empty_directory_loads_no_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let loader = DocumentLoader::new(1000, 200).unwrap();
    assert!(loader.load_documents(dir.path()).unwrap().is_empty());
}

#[test]
fn invalid_chunking_parameters_are_rejected() {
    let err = DocumentLoader::new(100, 100).unwrap_err();
    assert!(matches!(err, SpotterError::Configuration(_)), "got {err:?}");
    let err = DocumentLoader::new(0, 0).unwrap_err();
    assert!(matches!(err, SpotterError::Configuration(_)), "got {err:?}");
}

#[test]
fn pages_keep_their_source_file_and_page_number() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("policy.pdf");
    write_pdf(
        &path,
        &["Disability coverage pays 60% of salary", "Dental cleanings are covered twice per year"],
    );

    let loader = DocumentLoader::new(1000, 200).unwrap();
    let chunks = loader.load_single_document(&path).unwrap();

    assert!(!chunks.is_empty());
    let disability = chunks
        .iter()
        .find(|c| c.text.contains("60% of salary"))
        .expect("page 1 text missing from chunks");
    assert_eq!(disability.page_number, 1);
    assert!(disability.source_path.ends_with("policy.pdf"));

    let dental = chunks
        .iter()
        .find(|c| c.text.contains("Dental cleanings"))
        .expect("page 2 text missing from chunks");
    assert_eq!(dental.page_number, 2);
}

#[test]
fn directory_loads_are_in_file_name_order_and_non_recursive() {
    let dir = tempfile::tempdir().unwrap();
    // Written out of order on purpose; enumeration must still be sorted.
    write_pdf(&dir.path().join("b_rider.pdf"), &["The rider covers vision exams"]);
    write_pdf(&dir.path().join("a_policy.pdf"), &["Disability coverage pays 60% of salary"]);
    std::fs::write(dir.path().join("notes.txt"), "not a pdf").unwrap();
    let nested = dir.path().join("archive");
    std::fs::create_dir(&nested).unwrap();
    write_pdf(&nested.join("c_old.pdf"), &["An outdated policy"]);

    let loader = DocumentLoader::new(1000, 200).unwrap();
    let chunks = loader.load_documents(dir.path()).unwrap();

    assert!(!chunks.is_empty());
    assert!(chunks.first().unwrap().source_path.ends_with("a_policy.pdf"));
    assert!(chunks.last().unwrap().source_path.ends_with("b_rider.pdf"));
    assert!(chunks.iter().all(|c| !c.source_path.contains("archive")));
    assert!(chunks.iter().all(|c| !c.source_path.ends_with(".txt")));
}
