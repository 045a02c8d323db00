mod common;

use std::fs;

use book_catalog::{Catalog, FieldProblem, FieldValue, LoadError};
use chrono::NaiveDate;
use common::{CATALOG_MISSING_PRICE, sample_catalog_file, write_catalog};

#[test]
fn test_open_sample_catalog() {
    let (_dir, path) = sample_catalog_file();
    let catalog = Catalog::open(&path).unwrap();

    assert_eq!(catalog.source(), Some(path.as_path()));
    assert_eq!(catalog.book_count(), 5);
    assert_eq!(
        catalog.book_ids(),
        vec!["bk101", "bk102", "bk103", "bk105", "bk110"]
    );
}

#[test]
fn test_existing_book_is_found() {
    let (_dir, path) = sample_catalog_file();
    let catalog = Catalog::open(&path).unwrap();

    assert!(catalog.exists("bk101"));
    let info = catalog.info("bk101").unwrap().unwrap();
    assert_eq!(info.price, 44.95);
    assert_eq!(format!("{:.2}", info.price), "44.95");
}

#[test]
fn test_info_matches_source_elements() {
    let (_dir, path) = sample_catalog_file();
    let catalog = Catalog::open(&path).unwrap();

    let info = catalog.info("bk105").unwrap().unwrap();
    let fields = info.fields();
    assert_eq!(fields.len(), 6);
    assert_eq!(fields[0], ("id", FieldValue::Text("bk105".to_string())));
    assert_eq!(
        fields[1],
        ("author", FieldValue::Text("Corets, Eva".to_string()))
    );
    assert_eq!(fields[2], ("genre", FieldValue::Text("Fantasy".to_string())));
    assert_eq!(fields[3], ("price", FieldValue::Decimal(5.95)));
    assert_eq!(
        fields[4],
        (
            "publish_date",
            FieldValue::Date(NaiveDate::from_ymd_opt(2001, 9, 10).unwrap())
        )
    );
    match &fields[5] {
        ("description", FieldValue::Text(description)) => {
            assert!(description.starts_with("The two daughters of Maeve"));
            assert!(description.ends_with("Oberon's Legacy."));
        }
        other => panic!("Unexpected description field: {:?}", other),
    }
}

#[test]
fn test_entity_in_text_is_decoded() {
    let (_dir, path) = sample_catalog_file();
    let catalog = Catalog::open(&path).unwrap();

    let info = catalog.info("bk110").unwrap().unwrap();
    assert_eq!(info.author, "O'Brien, Tim");
}

#[test]
fn test_absent_book() {
    let (_dir, path) = sample_catalog_file();
    let catalog = Catalog::open(&path).unwrap();

    assert!(!catalog.exists("bk999"));
    assert_eq!(catalog.info("bk999").unwrap(), None);
}

#[test]
fn test_empty_id() {
    let (_dir, path) = sample_catalog_file();
    let catalog = Catalog::open(&path).unwrap();

    assert!(!catalog.exists(""));
    assert_eq!(catalog.info("").unwrap(), None);
    assert!(!catalog.exists("   "));
    assert_eq!(catalog.info("   ").unwrap(), None);
}

#[test]
fn test_missing_price_is_malformed() {
    let (_dir, path) = write_catalog("missing-price.xml", CATALOG_MISSING_PRICE);
    let catalog = Catalog::open(&path).unwrap();

    assert!(catalog.info("bk201").unwrap().is_some());

    assert!(catalog.exists("bk202"));
    let err = catalog.info("bk202").unwrap_err();
    assert_eq!(err.id, "bk202");
    assert_eq!(err.field, "price");
    assert_eq!(err.problem, FieldProblem::MissingField);
    assert!(err.to_string().contains("price"));
}

#[test]
fn test_missing_file_fails_construction() {
    let (dir, _path) = sample_catalog_file();
    let result = Catalog::open(dir.path().join("nope.xml"));
    assert!(matches!(result, Err(LoadError::Io { .. })));
}

#[test]
fn test_malformed_file_fails_construction() {
    let (_dir, path) = write_catalog("broken.xml", "<catalog><book id=\"bk1\"></catalog>");
    match Catalog::open(&path) {
        Err(LoadError::Malformed { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("Expected LoadError::Malformed, got {:?}", other),
    }
}

#[test]
fn test_directory_path_fails_construction() {
    let (dir, _path) = sample_catalog_file();
    let result = Catalog::open(dir.path());
    assert!(result.is_err());
}

#[test]
fn test_catalog_unaffected_by_later_file_changes() {
    let (_dir, path) = sample_catalog_file();
    let catalog = Catalog::open(&path).unwrap();

    fs::write(&path, "<catalog/>").unwrap();

    assert!(catalog.exists("bk101"));
    assert_eq!(catalog.book_count(), 5);
}

#[test]
fn test_concurrent_read_only_queries() {
    let (_dir, path) = sample_catalog_file();
    let catalog = Catalog::open(&path).unwrap();
    let expected = catalog.info("bk102").unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    assert!(catalog.exists("bk102"));
                    assert_eq!(catalog.info("bk102").unwrap(), expected);
                }
            });
        }
    });
}
