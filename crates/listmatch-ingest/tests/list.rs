use std::io::Write;

use listmatch_ingest::{IngestError, IngestOptions, read_list_file};
use listmatch_model::ErrorKind;

#[test]
fn reads_first_column_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "name,country").unwrap();
    writeln!(file, "Acme Corp,US").unwrap();
    writeln!(file, "  Globex  ,DE").unwrap();
    writeln!(file, ",FR").unwrap();

    let items = read_list_file(file.path(), IngestOptions::default()).unwrap();
    assert_eq!(items, vec!["name", "Acme Corp", "Globex"]);
}

#[test]
fn reads_tab_separated_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "Acme Corp\t1\r\nGlobex\t2\r\n").unwrap();

    let items = read_list_file(file.path(), IngestOptions::default()).unwrap();
    assert_eq!(items, vec!["Acme Corp", "Globex"]);
}

#[test]
fn blank_file_reports_no_items() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let err = read_list_file(file.path(), IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::NoItems));
    assert_eq!(err.kind(), ErrorKind::Ingestion);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let err = read_list_file(&path, IngestOptions::default()).unwrap_err();
    match &err {
        IngestError::FileRead { path: reported, .. } => assert_eq!(reported, &path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("absent.csv"));
}
