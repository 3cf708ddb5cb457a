// ── Client-side sort correction ──
//
// The archive's search path does not reliably honor sort parameters, so
// every loaded page is re-sorted locally when a sort is active. Ordering is
// stable: records that compare equal keep the order the archive sent.

use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use holocron_api::Record;
use serde::{Deserialize, Serialize};

pub use holocron_api::SortDirection;

/// Sort value for a measurement reported as `"unknown"`.
const UNKNOWN_MEASURE: f64 = -1.0;

/// Sort value for an unknown birth year. Sorts before every real year.
const UNKNOWN_BIRTH_YEAR: f64 = -1.0e9;

// ── SortField ────────────────────────────────────────────────────────

/// A record field to sort by.
///
/// Names that are not record fields parse into [`SortField::Other`] and
/// compare every record as equal, which leaves the archive order intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortField {
    Name,
    Height,
    Mass,
    HairColor,
    SkinColor,
    EyeColor,
    BirthYear,
    Gender,
    Homeworld,
    Created,
    Edited,
    Url,
    Other(String),
}

impl SortField {
    /// Every real record field, in table column order.
    pub const KNOWN: [SortField; 12] = [
        SortField::Name,
        SortField::Height,
        SortField::Mass,
        SortField::HairColor,
        SortField::SkinColor,
        SortField::EyeColor,
        SortField::BirthYear,
        SortField::Gender,
        SortField::Homeworld,
        SortField::Created,
        SortField::Edited,
        SortField::Url,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name => "name",
            Self::Height => "height",
            Self::Mass => "mass",
            Self::HairColor => "hair_color",
            Self::SkinColor => "skin_color",
            Self::EyeColor => "eye_color",
            Self::BirthYear => "birth_year",
            Self::Gender => "gender",
            Self::Homeworld => "homeworld",
            Self::Created => "created",
            Self::Edited => "edited",
            Self::Url => "url",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for SortField {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = Self::KNOWN
            .into_iter()
            .find(|f| f.as_str() == s)
            .unwrap_or_else(|| Self::Other(s.to_owned()));
        Ok(field)
    }
}

impl From<String> for SortField {
    fn from(s: String) -> Self {
        let Ok(field) = s.parse::<SortField>();
        field
    }
}

impl From<&str> for SortField {
    fn from(s: &str) -> Self {
        let Ok(field) = s.parse::<SortField>();
        field
    }
}

impl From<SortField> for String {
    fn from(field: SortField) -> Self {
        field.as_str().to_owned()
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SortDescriptor ───────────────────────────────────────────────────

/// An active sort: which field, which way.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortDescriptor {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Build from the loose `(field, direction)` strings a table header
    /// emits. An empty field or an empty/unknown direction means no sort.
    pub fn parse(field: &str, direction: &str) -> Option<Self> {
        if field.is_empty() {
            return None;
        }
        let direction = direction.parse().ok()?;
        let Ok(field) = field.parse::<SortField>();
        Some(Self::new(field, direction))
    }

    /// Compare two records under this descriptor.
    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ord = compare_field(&self.field, a, b);
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

impl fmt::Display for SortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

// ── Comparator ───────────────────────────────────────────────────────

/// Sort `records` in place. `None` leaves them untouched.
pub fn sort_records(records: &mut [Record], sort: Option<&SortDescriptor>) {
    if let Some(sort) = sort {
        records.sort_by(|a, b| sort.compare(a, b));
    }
}

/// Ascending comparison of one field.
pub fn compare_field(field: &SortField, a: &Record, b: &Record) -> Ordering {
    match field {
        SortField::Height => measure(&a.height).total_cmp(&measure(&b.height)),
        SortField::Mass => measure(&a.mass).total_cmp(&measure(&b.mass)),
        SortField::BirthYear => birth_year(&a.birth_year).total_cmp(&birth_year(&b.birth_year)),
        other => a.field(other.as_str()).cmp(&b.field(other.as_str())),
    }
}

/// Height or mass as a number. Unknown and unparseable values sort lowest.
fn measure(value: &str) -> f64 {
    if value == "unknown" {
        return UNKNOWN_MEASURE;
    }
    leading_number(value).unwrap_or(UNKNOWN_MEASURE)
}

/// Birth year magnitude with the era suffix dropped (`"41.9BBY"` -> 41.9).
fn birth_year(value: &str) -> f64 {
    if value == "unknown" {
        return UNKNOWN_BIRTH_YEAR;
    }
    leading_number(value).unwrap_or(UNKNOWN_BIRTH_YEAR)
}

/// Parse the numeric prefix of `value`, ignoring thousands separators.
fn leading_number(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in cleaned.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '-' | '+' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    cleaned.get(..end)?.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use holocron_api::fixture::character;
    use pretty_assertions::assert_eq;

    use super::*;

    fn records(values: &[(&str, &str, &str)]) -> Vec<Record> {
        values
            .iter()
            .enumerate()
            .map(|(i, (name, height, birth_year))| {
                character(&(i + 1).to_string(), name, height, "77", birth_year)
                    .properties
                    .unwrap()
            })
            .collect()
    }

    fn heights(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.height.as_str()).collect()
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn height_ascending_puts_unknown_first() {
        let mut rows = records(&[
            ("Luke", "172", "19BBY"),
            ("Chewie", "202", "200BBY"),
            ("Mystery", "unknown", "unknown"),
        ]);
        sort_records(&mut rows, Some(&SortDescriptor::asc(SortField::Height)));
        assert_eq!(heights(&rows), ["unknown", "172", "202"]);
    }

    #[test]
    fn height_descending_puts_unknown_last() {
        let mut rows = records(&[
            ("Luke", "172", "19BBY"),
            ("Chewie", "202", "200BBY"),
            ("Mystery", "unknown", "unknown"),
        ]);
        sort_records(&mut rows, Some(&SortDescriptor::desc(SortField::Height)));
        assert_eq!(heights(&rows), ["202", "172", "unknown"]);
    }

    #[test]
    fn birth_year_ignores_era_suffix() {
        let mut rows = records(&[
            ("Luke", "172", "19BBY"),
            ("Palpatine", "170", "82BBY"),
            ("Leia", "150", "unknown"),
            ("Anakin", "188", "41.9BBY"),
        ]);
        sort_records(&mut rows, Some(&SortDescriptor::asc(SortField::BirthYear)));
        assert_eq!(names(&rows), ["Leia", "Luke", "Anakin", "Palpatine"]);
    }

    #[test]
    fn numeric_sort_is_not_lexical() {
        let mut rows = records(&[("A", "96", ""), ("B", "172", ""), ("C", "1,358", "")]);
        sort_records(&mut rows, Some(&SortDescriptor::asc(SortField::Height)));
        assert_eq!(heights(&rows), ["96", "172", "1,358"]);
    }

    #[test]
    fn text_sort_is_case_sensitive() {
        let mut rows = records(&[("luke", "1", ""), ("Yoda", "2", ""), ("Anakin", "3", "")]);
        sort_records(&mut rows, Some(&SortDescriptor::asc(SortField::Name)));
        assert_eq!(names(&rows), ["Anakin", "Yoda", "luke"]);
    }

    #[test]
    fn ties_keep_archive_order() {
        let mut rows = records(&[
            ("First", "unknown", ""),
            ("Second", "n/a", ""),
            ("Third", "unknown", ""),
        ]);
        sort_records(&mut rows, Some(&SortDescriptor::desc(SortField::Height)));
        assert_eq!(names(&rows), ["First", "Second", "Third"]);
    }

    #[test]
    fn no_sort_is_a_no_op() {
        let mut rows = records(&[("Zed", "1", ""), ("Amy", "2", "")]);
        sort_records(&mut rows, None);
        assert_eq!(names(&rows), ["Zed", "Amy"]);
    }

    #[test]
    fn unknown_field_preserves_order() {
        let mut rows = records(&[("Zed", "1", ""), ("Amy", "2", "")]);
        let sort = SortDescriptor::parse("starship", "asc").unwrap();
        assert_eq!(sort.field, SortField::Other("starship".into()));
        sort_records(&mut rows, Some(&sort));
        assert_eq!(names(&rows), ["Zed", "Amy"]);
    }

    #[test]
    fn parse_treats_blanks_as_no_sort() {
        assert_eq!(SortDescriptor::parse("", "asc"), None);
        assert_eq!(SortDescriptor::parse("name", ""), None);
        assert_eq!(
            SortDescriptor::parse("birth_year", "desc"),
            Some(SortDescriptor::desc(SortField::BirthYear))
        );
    }

    #[test]
    fn leading_number_prefixes() {
        assert_eq!(leading_number("172"), Some(172.0));
        assert_eq!(leading_number("41.9BBY"), Some(41.9));
        assert_eq!(leading_number("1,358"), Some(1358.0));
        assert_eq!(leading_number("n/a"), None);
        assert_eq!(leading_number(""), None);
    }
}
