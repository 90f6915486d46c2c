//! Alias dictionary: header spellings known for each canonical field.

use std::collections::HashMap;
use std::sync::LazyLock;

use intake_model::CanonicalField;
use tracing::debug;

use crate::normalize::normalize_header;

/// Built-in aliases, lower-case. Mis-encoded variants are listed on purpose
/// so a header that survives repair still matches on its raw form.
fn builtin_aliases(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::ExternalId => &[
            "id",
            "externe id",
            "external id",
            "kundennummer",
            "kunden nr",
            "kd nr",
            "teilnehmernummer",
            "teilnehmer nr",
            "tn nr",
            "personalnummer",
            "mitgliedsnummer",
            "aktenzeichen",
            "referenz",
            "reference",
            "customer id",
            "customer number",
            "client id",
        ],
        CanonicalField::Salutation => &["anrede", "briefanrede", "salutation"],
        CanonicalField::AcademicTitle => &[
            "titel",
            "akademischer titel",
            "akad grad",
            "title",
            "academic title",
        ],
        CanonicalField::FirstName => &[
            "vorname",
            "vornamen",
            "rufname",
            "first name",
            "given name",
            "forename",
        ],
        CanonicalField::LastName => &[
            "nachname",
            "name",
            "familienname",
            "zuname",
            "last name",
            "surname",
            "family name",
        ],
        CanonicalField::BirthName => &["geburtsname", "geborene", "birth name", "maiden name"],
        CanonicalField::BirthDate => &[
            "geburtsdatum",
            "geb datum",
            "geboren am",
            "geb am",
            "geburtstag",
            "birth date",
            "date of birth",
            "dob",
        ],
        CanonicalField::BirthPlace => &["geburtsort", "birth place", "place of birth"],
        CanonicalField::Gender => &["geschlecht", "m w d", "gender", "sex"],
        CanonicalField::Nationality => &[
            "staatsangehörigkeit",
            "staatsangeh?rigkeit",
            "staatsbürgerschaft",
            "nationalität",
            "nationalit?t",
            "nationality",
            "citizenship",
        ],
        CanonicalField::Email => &[
            "e-mail",
            "email",
            "mail",
            "e-mail-adresse",
            "mailadresse",
            "email address",
        ],
        CanonicalField::Phone => &[
            "telefon",
            "tel",
            "telefonnummer",
            "tel nr",
            "rufnummer",
            "festnetz",
            "phone",
            "phone number",
            "telephone",
        ],
        CanonicalField::Mobile => &[
            "mobil",
            "mobilnummer",
            "mobiltelefon",
            "handy",
            "handynummer",
            "mobile",
            "mobile phone",
            "cell phone",
        ],
        CanonicalField::Fax => &["fax", "telefax", "faxnummer", "fax number"],
        CanonicalField::Address => &[
            "straße",
            "strasse",
            "stra?e",
            "stra\u{FFFD}e",
            "straÃŸe",
            "str",
            "straße und hausnummer",
            "straße nr",
            "adresse",
            "anschrift",
            "wohnadresse",
            "address",
            "street",
            "street address",
        ],
        CanonicalField::HouseNumber => &["hausnummer", "haus nr", "hnr", "nr", "house number"],
        CanonicalField::PostalCode => &[
            "plz",
            "postleitzahl",
            "postal code",
            "postcode",
            "zip",
            "zip code",
        ],
        CanonicalField::City => &["ort", "wohnort", "stadt", "gemeinde", "city", "town"],
        CanonicalField::Country => &["land", "wohnland", "staat", "country"],
        CanonicalField::NationalId => &[
            "sozialversicherungsnummer",
            "sv nummer",
            "sv nr",
            "rentenversicherungsnummer",
            "rv nummer",
            "versicherungsnummer",
            "social security number",
            "ssn",
            "national id",
        ],
        CanonicalField::TaxId => &[
            "steuer id",
            "steuer-identifikationsnummer",
            "steueridentifikationsnummer",
            "steuernummer",
            "idnr",
            "tax id",
            "tin",
        ],
        CanonicalField::Iban => &["iban", "bankverbindung", "kontonummer", "bank account"],
        CanonicalField::Company => &[
            "firma",
            "unternehmen",
            "arbeitgeber",
            "organisation",
            "company",
            "employer",
            "organization",
        ],
        CanonicalField::JobTitle => &[
            "beruf",
            "position",
            "funktion",
            "tätigkeit",
            "t?tigkeit",
            "jobtitel",
            "job title",
            "occupation",
        ],
        CanonicalField::EntryDate => &[
            "eintritt",
            "eintrittsdatum",
            "eintritt am",
            "beginn",
            "startdatum",
            "aufnahmedatum",
            "maßnahmebeginn",
            "entry date",
            "start date",
        ],
        CanonicalField::ExitDate => &[
            "austritt",
            "austrittsdatum",
            "austritt am",
            "ende",
            "enddatum",
            "maßnahmeende",
            "exit date",
            "end date",
        ],
        CanonicalField::FollowUpDate => &[
            "wiedervorlage",
            "wiedervorlagedatum",
            "wv",
            "nachfassen",
            "termin",
            "follow up",
            "follow up date",
        ],
        CanonicalField::Status => &["status", "zustand", "state"],
        CanonicalField::Priority => &[
            "priorität",
            "priorit?t",
            "prioritaet",
            "prio",
            "dringlichkeit",
            "priority",
        ],
        CanonicalField::Offer => &[
            "angebot",
            "maßnahme",
            "ma?nahme",
            "programm",
            "leistung",
            "offer",
            "program",
        ],
        CanonicalField::Notes => &[
            "bemerkung",
            "bemerkungen",
            "notiz",
            "notizen",
            "kommentar",
            "anmerkung",
            "hinweis",
            "notes",
            "note",
            "comment",
            "comments",
        ],
    }
}

/// One alias with its precomputed matching forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasForm {
    pub raw: String,
    pub normalized: String,
    pub compact: String,
    pub tokens: Vec<String>,
}

impl AliasForm {
    fn new(alias: &str) -> Self {
        let header = normalize_header(alias);
        Self {
            raw: alias.trim().to_lowercase(),
            normalized: header.normalized,
            compact: header.compact,
            tokens: header.tokens,
        }
    }
}

/// An alias key claimed by two fields. `kept` is the field lookup returns:
/// the earlier entry within one index, or the earlier lookup stage across
/// indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasCollision {
    pub key: String,
    pub kept: CanonicalField,
    pub dropped: CanonicalField,
}

/// Which index produced an exact hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasKey {
    Raw,
    Normalized,
    Compact,
}

impl AliasKey {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Normalized => "normalized",
            Self::Compact => "compact",
        }
    }
}

/// Immutable alias table with reverse indexes for exact lookup.
///
/// Built once and shared by reference; there is no way to mutate it after
/// construction.
#[derive(Debug, Clone)]
pub struct AliasTable {
    forms: Vec<(CanonicalField, Vec<AliasForm>)>,
    by_raw: HashMap<String, CanonicalField>,
    by_normalized: HashMap<String, CanonicalField>,
    by_compact: HashMap<String, CanonicalField>,
    collisions: Vec<AliasCollision>,
}

impl AliasTable {
    /// The built-in German/English table.
    pub fn builtin() -> Self {
        Self::from_entries(
            CanonicalField::all()
                .iter()
                .map(|field| (*field, builtin_aliases(*field).to_vec())),
        )
    }

    /// Builds a table from `(field, aliases)` pairs. Entry order decides
    /// which field keeps a contested key.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (CanonicalField, Vec<&'a str>)>,
    {
        let mut table = Self {
            forms: Vec::new(),
            by_raw: HashMap::new(),
            by_normalized: HashMap::new(),
            by_compact: HashMap::new(),
            collisions: Vec::new(),
        };
        for (field, aliases) in entries {
            let mut forms = Vec::with_capacity(aliases.len());
            for alias in aliases {
                let form = AliasForm::new(alias);
                if form.normalized.is_empty() {
                    continue;
                }
                insert_key(&mut table.by_raw, &mut table.collisions, &form.raw, field);
                insert_key(
                    &mut table.by_normalized,
                    &mut table.collisions,
                    &form.normalized,
                    field,
                );
                insert_key(
                    &mut table.by_compact,
                    &mut table.collisions,
                    &form.compact,
                    field,
                );
                forms.push(form);
            }
            table.forms.push((field, forms));
        }
        table.record_shadowed_keys();
        debug!(
            fields = table.forms.len(),
            keys = table.by_normalized.len(),
            collisions = table.collisions.len(),
            "alias table built"
        );
        table
    }

    /// Records alias keys that an earlier lookup stage resolves to another
    /// field, so the later field can never be reached through them.
    fn record_shadowed_keys(&mut self) {
        let mut shadowed: Vec<AliasCollision> = Vec::new();
        for (field, forms) in &self.forms {
            for form in forms {
                let earlier = [
                    (&form.normalized, self.by_raw.get(&form.normalized)),
                    (&form.compact, self.by_raw.get(&form.compact)),
                    (&form.compact, self.by_normalized.get(&form.compact)),
                ];
                for (key, winner) in earlier {
                    let Some(&kept) = winner else { continue };
                    if kept == *field
                        || shadowed
                            .iter()
                            .chain(&self.collisions)
                            .any(|c| c.key == *key && c.kept == kept && c.dropped == *field)
                    {
                        continue;
                    }
                    shadowed.push(AliasCollision {
                        key: key.clone(),
                        kept,
                        dropped: *field,
                    });
                }
            }
        }
        self.collisions.extend(shadowed);
    }

    /// Exact lookup by raw, normalized, then compact form.
    pub fn lookup(
        &self,
        raw: &str,
        normalized: &str,
        compact: &str,
    ) -> Option<(CanonicalField, AliasKey)> {
        let raw = raw.trim().to_lowercase();
        if let Some(field) = self.by_raw.get(&raw) {
            return Some((*field, AliasKey::Raw));
        }
        if normalized.is_empty() {
            return None;
        }
        if let Some(field) = self.by_normalized.get(normalized) {
            return Some((*field, AliasKey::Normalized));
        }
        self.by_compact
            .get(compact)
            .map(|field| (*field, AliasKey::Compact))
    }

    /// Exact lookup for an unprocessed header string.
    pub fn lookup_header(&self, header: &str) -> Option<CanonicalField> {
        let normalized = normalize_header(header);
        self.lookup(header, &normalized.normalized, &normalized.compact)
            .map(|(field, _)| field)
    }

    /// Precomputed alias forms for a field.
    pub fn forms(&self, field: CanonicalField) -> &[AliasForm] {
        self.forms
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, forms)| forms.as_slice())
            .unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = CanonicalField> + '_ {
        self.forms.iter().map(|(field, _)| *field)
    }

    pub fn collisions(&self) -> &[AliasCollision] {
        &self.collisions
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn insert_key(
    index: &mut HashMap<String, CanonicalField>,
    collisions: &mut Vec<AliasCollision>,
    key: &str,
    field: CanonicalField,
) {
    if key.is_empty() {
        return;
    }
    match index.get(key) {
        Some(existing) if *existing != field => {
            if !collisions
                .iter()
                .any(|c| c.key == key && c.dropped == field)
            {
                collisions.push(AliasCollision {
                    key: key.to_string(),
                    kept: *existing,
                    dropped: field,
                });
            }
        }
        Some(_) => {}
        None => {
            index.insert(key.to_string(), field);
        }
    }
}

static DEFAULT_ALIASES: LazyLock<AliasTable> = LazyLock::new(AliasTable::builtin);

/// Shared built-in table.
pub fn default_aliases() -> &'static AliasTable {
    &DEFAULT_ALIASES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_no_collisions() {
        let table = AliasTable::builtin();
        assert!(
            table.collisions().is_empty(),
            "collisions: {:?}",
            table.collisions()
        );
    }

    #[test]
    fn test_every_field_has_aliases() {
        let table = default_aliases();
        for field in CanonicalField::all() {
            assert!(!table.forms(*field).is_empty(), "{field} has no aliases");
        }
    }

    #[test]
    fn test_lookup_order() {
        let table = default_aliases();
        assert_eq!(
            table.lookup("stra\u{FFFD}e", "strasse", "strasse"),
            Some((CanonicalField::Address, AliasKey::Raw))
        );
        assert_eq!(
            table.lookup("Straße", "strasse", "strasse"),
            Some((CanonicalField::Address, AliasKey::Raw))
        );
        assert_eq!(
            table.lookup("E_Mail", "e mail", "email"),
            Some((CanonicalField::Email, AliasKey::Normalized))
        );
        assert_eq!(
            table.lookup("Vor name", "vor name", "vorname"),
            Some((CanonicalField::FirstName, AliasKey::Compact))
        );
        assert_eq!(table.lookup("Schuhgröße", "schuhgroesse", "schuhgroesse"), None);
    }

    #[test]
    fn test_lookup_header() {
        let table = default_aliases();
        assert_eq!(table.lookup_header("PLZ"), Some(CanonicalField::PostalCode));
        assert_eq!(table.lookup_header("Geb.-Datum"), Some(CanonicalField::BirthDate));
        assert_eq!(table.lookup_header("firstName"), Some(CanonicalField::FirstName));
        assert_eq!(table.lookup_header("StraÃŸe"), Some(CanonicalField::Address));
        assert_eq!(table.lookup_header(""), None);
    }

    #[test]
    fn test_collision_kept_by_entry_order() {
        let table = AliasTable::from_entries([
            (CanonicalField::Phone, vec!["tel", "telefon"]),
            (CanonicalField::Mobile, vec!["telefon", "handy"]),
        ]);
        assert_eq!(table.lookup_header("Telefon"), Some(CanonicalField::Phone));
        assert_eq!(table.lookup_header("Handy"), Some(CanonicalField::Mobile));
        let collisions = table.collisions();
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].key, "telefon");
        assert_eq!(collisions[0].kept, CanonicalField::Phone);
        assert_eq!(collisions[0].dropped, CanonicalField::Mobile);
    }

    #[test]
    fn test_raw_key_shadowing_later_stage_is_a_collision() {
        let table = AliasTable::from_entries([
            (CanonicalField::Phone, vec!["tel nr"]),
            (CanonicalField::Email, vec!["e.mail"]),
            (CanonicalField::Notes, vec!["telnr", "e mail"]),
        ]);
        assert_eq!(table.lookup_header("telnr"), Some(CanonicalField::Notes));
        assert_eq!(table.lookup_header("e mail"), Some(CanonicalField::Notes));
        assert_eq!(table.lookup_header("Tel Nr"), Some(CanonicalField::Phone));
        let collisions = table.collisions();
        assert!(collisions.contains(&AliasCollision {
            key: "telnr".to_string(),
            kept: CanonicalField::Notes,
            dropped: CanonicalField::Phone,
        }));
        assert!(collisions.contains(&AliasCollision {
            key: "e mail".to_string(),
            kept: CanonicalField::Notes,
            dropped: CanonicalField::Email,
        }));
    }
}
