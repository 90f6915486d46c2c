use intake_map::{
    ColumnMapper, ColumnOverrides, ConfidenceLevel, ConfidenceThresholds, MapperConfig,
    MappingStatus, default_aliases, find_best_mappings,
};
use intake_model::{CanonicalField, ImportTemplate};

fn to_rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect()
}

#[test]
fn test_typical_crm_export() {
    let headers = [
        "Kd-Nr.",
        "Anrede",
        "Vorname",
        "Nachname",
        "Geb.-Datum",
        "Straße",
        "PLZ",
        "Ort",
        "E-Mail",
        "Telefon",
        "Status",
    ];
    let rows = to_rows(&[
        &[
            "K-1001",
            "Herr",
            "Max",
            "Mustermann",
            "01.02.1980",
            "Hauptstraße 1",
            "10115",
            "Berlin",
            "max@example.org",
            "030 1234567",
            "aktiv",
        ],
        &[
            "K-1002",
            "Frau",
            "Erika",
            "Musterfrau",
            "13.05.1975",
            "Nebenweg 4a",
            "80331",
            "München",
            "erika@example.org",
            "+49 89 765432",
            "offen",
        ],
    ]);
    let result = find_best_mappings(CanonicalField::all(), &headers, Some(&rows));

    let expected = [
        CanonicalField::ExternalId,
        CanonicalField::Salutation,
        CanonicalField::FirstName,
        CanonicalField::LastName,
        CanonicalField::BirthDate,
        CanonicalField::Address,
        CanonicalField::PostalCode,
        CanonicalField::City,
        CanonicalField::Email,
        CanonicalField::Phone,
        CanonicalField::Status,
    ];
    for (column, field) in expected.iter().enumerate() {
        assert_eq!(result.field_for_column(column), Some(*field), "column {column}");
    }
    assert!(result.unmapped_columns.is_empty());
    let high = result.filter_by_level(ConfidenceLevel::High, &ConfidenceThresholds::default());
    assert_eq!(high.len(), expected.len());
    assert!(
        result
            .mappings
            .iter()
            .all(|m| m.status == MappingStatus::Auto)
    );
}

#[test]
fn test_template_overrides_bypass_scoring() {
    let template = ImportTemplate::new("weekly")
        .with_mapping("Nr", Some(CanonicalField::ExternalId))
        .with_mapping("Bemerkung", None);
    let headers = ["Nr", "Vorname", "Bemerkung"];
    let overrides = ColumnOverrides::from_template(&template, &headers);
    let result = ColumnMapper::new(default_aliases(), MapperConfig::default())
        .find_best_mappings_with_overrides(CanonicalField::all(), &headers, None, &overrides)
        .expect("consistent overrides");

    assert_eq!(result.field_for_column(0), Some(CanonicalField::ExternalId));
    assert_eq!(result.mappings[0].status, MappingStatus::Override);
    assert_eq!(result.field_for_column(1), Some(CanonicalField::FirstName));
    assert_eq!(result.ignored_columns, vec![2]);
    assert_eq!(result.column_for_field(CanonicalField::Notes), None);
}

#[test]
fn test_strict_thresholds_drop_weak_suggestions() {
    let headers = ["xyz"];
    let rows = to_rows(&[&["max@example.org"], &["erika@example.org"]]);
    let default = find_best_mappings(&[CanonicalField::Email], &headers, Some(&rows));
    assert_eq!(default.field_for_column(0), Some(CanonicalField::Email));
    assert_eq!(default.mappings[0].status, MappingStatus::NeedsConfirmation);

    let strict = ColumnMapper::new(
        default_aliases(),
        MapperConfig::default().with_thresholds(ConfidenceThresholds::strict()),
    )
    .find_best_mappings(&[CanonicalField::Email], &headers, Some(&rows));
    assert_eq!(strict.field_for_column(0), Some(CanonicalField::Email));

    let stricter = ColumnMapper::new(
        default_aliases(),
        MapperConfig::default().with_thresholds(ConfidenceThresholds {
            high: 0.95,
            medium: 0.8,
            low: 0.7,
        }),
    )
    .find_best_mappings(&[CanonicalField::Email], &headers, Some(&rows));
    assert!(stricter.mappings.is_empty());
    assert_eq!(stricter.unmapped_fields, vec![CanonicalField::Email]);
}
