use std::io::Write;

use intake_cli::input::read_table;
use intake_core::ImportSession;
use intake_model::{CanonicalField, DateOrder, ImportTemplate};
use tempfile::NamedTempFile;

fn write_temp(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(bytes).expect("write temp file");
    file
}

#[test]
fn latin1_export_maps_after_repair() {
    let file = write_temp(
        b"Vorname;Nachname;Stra\xDFe;PLZ\r\n\
          Max;Muster;Hauptstr. 1;10115\r\n\
          Erika;Beispiel;Nebenweg 4;80331\r\n",
    );
    let table = read_table(file.path(), None).expect("readable table");
    assert!(table.had_replacements);
    assert_eq!(table.delimiter, b';');
    assert_eq!(table.headers[2], "Stra\u{FFFD}e");
    assert_eq!(table.rows.len(), 2);

    let session = ImportSession::new(table.headers, table.rows);
    assert_eq!(session.display_headers()[2], "Straße");
    let mapping = session.propose_mapping().expect("no overrides");
    assert_eq!(mapping.field_for_column(2), Some(CanonicalField::Address));
    assert_eq!(mapping.field_for_column(3), Some(CanonicalField::PostalCode));
}

#[test]
fn template_json_round_trips_through_session() {
    let template: ImportTemplate = serde_json::from_str(
        r#"{
            "name": "crm-export",
            "column_mappings": { "Kennung": "external_id", "Notiz": null },
            "transform": { "date_order": "month_first" }
        }"#,
    )
    .expect("valid template JSON");
    assert_eq!(template.transform.date_order, DateOrder::MonthFirst);

    let file = write_temp(b"Kennung,Notiz,Nachname\nX-1,call back,Muster\n");
    let table = read_table(file.path(), None).expect("readable table");
    let session = ImportSession::new(table.headers, table.rows)
        .with_template(&template)
        .expect("valid template");
    let mapping = session.propose_mapping().expect("consistent overrides");
    assert_eq!(mapping.field_for_column(0), Some(CanonicalField::ExternalId));
    assert_eq!(mapping.ignored_columns, vec![1]);

    let outcome = session.execute(&mapping);
    let record = &outcome.dedupe.deduped_rows[0];
    assert_eq!(record.external_id.as_deref(), Some("X-1"));
    assert!(record.extensions.is_empty());
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = read_table(&dir.path().join("absent.csv"), None).unwrap_err();
    assert!(error.to_string().contains("absent.csv"));
}
