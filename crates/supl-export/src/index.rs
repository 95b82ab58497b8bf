//! Identifier index: resolves the opaque ids of an export to display names.
//!
//! The index is built once per document and never mutated afterwards.
//! Elements missing a required field are skipped when the index is built,
//! and every accessor falls back to an empty value for unknown ids, so
//! extraction never fails on a dangling reference.

use std::collections::HashMap;

use tracing::debug;

use crate::tree::{Document, Element};

/// Element kinds and fields of the source export.
pub mod kinds {
    pub const SUBJECT: &str = "Predmet";
    pub const ROOM: &str = "Mistnost";
    pub const PERIOD: &str = "VyucovaciHodinaOd";
    pub const TEACHER: &str = "Ucitel";
    pub const TEACHER_ALT: &str = "Ucitel2";
    pub const CLASS: &str = "Trida";
    pub const GROUP: &str = "TridaSkupinaSeminar";
    pub const EVENT_GROUP: &str = "UdalostStudijniSkupina";
    pub const EVENT_GROUP_TEACHERS: &str = "UdalostStudijniSkupiny";
    pub const EVENT_ROOM: &str = "UdalostMistnost";
    pub const EVENT_ROOM_CALENDAR: &str = "KalendarovaUdalostMistnost";
    pub const EVENT_PERSON: &str = "UdalostOsoba";
    pub const ABSENCE_REASON: &str = "SuplovaniDruhAbsence";
}

/// A teacher as listed in the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeacherInfo {
    pub first_name: String,
    pub last_name: String,
    pub abbreviation: String,
}

impl TeacherInfo {
    /// `"Jmeno Prijmeni"`, used in the students report.
    pub fn display_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }

    /// `"Prijmeni Jmeno"`, used in the teachers report.
    pub fn sorted_name(&self) -> String {
        join_name(&self.last_name, &self.first_name)
    }

    /// Returns true for the empty fallback value.
    pub fn is_unknown(&self) -> bool {
        self.first_name.is_empty() && self.last_name.is_empty() && self.abbreviation.is_empty()
    }
}

fn join_name(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}

/// A study group together with the label of its parent class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupInfo {
    /// Name of the parent class; empty if the parent is not a known class.
    pub class: String,
    /// Name of the group itself.
    pub name: String,
}

static EMPTY_TEACHER: TeacherInfo = TeacherInfo {
    first_name: String::new(),
    last_name: String::new(),
    abbreviation: String::new(),
};

static EMPTY_GROUP: GroupInfo = GroupInfo {
    class: String::new(),
    name: String::new(),
};

/// Immutable id → name maps for one export document.
#[derive(Debug, Clone, Default)]
pub struct IdentifierIndex {
    subjects: HashMap<String, String>,
    rooms: HashMap<String, String>,
    periods: HashMap<String, String>,
    teachers: HashMap<String, TeacherInfo>,
    classes: HashMap<String, String>,
    groups: HashMap<String, GroupInfo>,
    group_labels: HashMap<String, String>,
    event_groups: HashMap<String, String>,
    event_rooms: HashMap<String, Vec<String>>,
    event_teachers: HashMap<String, Vec<String>>,
    absence_reasons: HashMap<String, String>,
}

impl IdentifierIndex {
    /// Builds every mapping from the document.
    pub fn build(doc: &Document) -> Self {
        let mut index = Self {
            subjects: pairs(doc, kinds::SUBJECT, "REALIZACE_ID", "Zkratka"),
            rooms: pairs(doc, kinds::ROOM, "MISTNOST_ID", "Zkratka"),
            periods: build_periods(doc),
            teachers: build_teachers(doc),
            classes: pairs(doc, kinds::CLASS, "SKUPINA_ID", "Nazev"),
            absence_reasons: pairs(doc, kinds::ABSENCE_REASON, "SUPL_DRUH_ABSENCE_ID", "Nazev"),
            ..Self::default()
        };

        // Groups refer to classes, so classes must be indexed first.
        index.groups = build_groups(doc, &index.classes);
        index.group_labels = build_group_labels(doc);

        // Students rows are read last so they win over teachers rows.
        for kind in [kinds::EVENT_GROUP_TEACHERS, kinds::EVENT_GROUP] {
            index
                .event_groups
                .extend(pairs(doc, kind, "UDALOST_ID", "SKUPINA_ID"));
        }
        index.event_rooms = build_event_rooms(doc, &index.rooms);
        index.event_teachers = accumulate(doc.elements(kinds::EVENT_PERSON), "OSOBA_ID");

        debug!(
            subjects = index.subjects.len(),
            rooms = index.rooms.len(),
            periods = index.periods.len(),
            teachers = index.teachers.len(),
            classes = index.classes.len(),
            groups = index.groups.len(),
            "built identifier index"
        );
        index
    }

    /// Subject abbreviation for a `REALIZACE_ID`.
    pub fn subject(&self, id: &str) -> &str {
        lookup(&self.subjects, id)
    }

    /// Room abbreviation for a `MISTNOST_ID`.
    pub fn room(&self, id: &str) -> &str {
        lookup(&self.rooms, id)
    }

    /// Static period label for an `OBDOBI_DNE_ID`.
    pub fn period(&self, id: &str) -> &str {
        lookup(&self.periods, id)
    }

    /// Teacher for an `OSOBA_ID`, or an empty teacher.
    pub fn teacher(&self, id: &str) -> &TeacherInfo {
        self.teachers.get(id).unwrap_or(&EMPTY_TEACHER)
    }

    /// Returns true if `id` is a known teacher.
    pub fn has_teacher(&self, id: &str) -> bool {
        self.teachers.contains_key(id)
    }

    /// Class name for a `SKUPINA_ID` of a class.
    pub fn class(&self, id: &str) -> &str {
        lookup(&self.classes, id)
    }

    /// Group and parent class for a `SKUPINA_ID`, or empty values.
    pub fn group(&self, id: &str) -> &GroupInfo {
        self.groups.get(id).unwrap_or(&EMPTY_GROUP)
    }

    /// Nested group label, `"Parent (Group)"` for groups whose parent is
    /// itself a listed group.
    pub fn group_path(&self, id: &str) -> &str {
        lookup(&self.group_labels, id)
    }

    /// Study group attached to an event.
    pub fn event_group(&self, event_id: &str) -> &str {
        lookup(&self.event_groups, event_id)
    }

    /// Room abbreviations of an event, in document order.
    pub fn event_rooms(&self, event_id: &str) -> &[String] {
        self.event_rooms.get(event_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Teacher ids of an event, in document order.
    pub fn event_teachers(&self, event_id: &str) -> &[String] {
        self.event_teachers.get(event_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Absence reason for a `SUPL_DRUH_ABSENCE_ID`.
    pub fn absence_reason(&self, id: &str) -> Option<&str> {
        self.absence_reasons.get(id).map(String::as_str)
    }
}

fn lookup<'a>(map: &'a HashMap<String, String>, key: &str) -> &'a str {
    map.get(key).map_or("", String::as_str)
}

/// Maps `key` to `value` for every `kind` element carrying both fields.
/// Later elements overwrite earlier ones.
fn pairs(doc: &Document, kind: &str, key: &str, value: &str) -> HashMap<String, String> {
    doc.elements(kind)
        .filter_map(|e| Some((e.field(key)?.to_string(), e.field(value)?.to_string())))
        .collect()
}

/// Collects `value` fields per `UDALOST_ID`, keeping document order.
fn accumulate<'a>(
    elements: impl Iterator<Item = &'a Element>,
    value: &str,
) -> HashMap<String, Vec<String>> {
    let mut map: HashMap<String, Vec<String>> = HashMap::new();
    for element in elements {
        if let (Some(event), Some(value)) = (element.field("UDALOST_ID"), element.field(value)) {
            map.entry(event.to_string())
                .or_default()
                .push(value.to_string());
        }
    }
    map
}

fn build_periods(doc: &Document) -> HashMap<String, String> {
    doc.elements(kinds::PERIOD)
        .filter_map(|e| {
            let id = e.field("OBDOBI_DNE_ID")?;
            let name = e.field("Nazev")?;
            let label = match (e.field("HodinaOd"), e.field("HodinaDo")) {
                (Some(from), Some(to)) if from != to => format!("{from}-{to}"),
                _ => name.to_string(),
            };
            Some((id.to_string(), label))
        })
        .collect()
}

fn build_teachers(doc: &Document) -> HashMap<String, TeacherInfo> {
    doc.elements(kinds::TEACHER_ALT)
        .chain(doc.elements(kinds::TEACHER))
        .filter_map(|e| {
            let info = TeacherInfo {
                first_name: e.field("Jmeno")?.to_string(),
                last_name: e.field("Prijmeni")?.to_string(),
                abbreviation: e.field("Zkratka")?.to_string(),
            };
            Some((e.field("OSOBA_ID")?.to_string(), info))
        })
        .collect()
}

fn build_groups(doc: &Document, classes: &HashMap<String, String>) -> HashMap<String, GroupInfo> {
    doc.elements(kinds::GROUP)
        .filter_map(|e| {
            let id = e.field("SKUPINA_ID")?;
            let parent = e.field("SKUPINA_ID_PARENT")?;
            let info = GroupInfo {
                class: lookup(classes, parent).to_string(),
                name: e.field_or_default("Nazev").to_string(),
            };
            Some((id.to_string(), info))
        })
        .collect()
}

/// Labels groups by their position in the group hierarchy. A parent must
/// appear before its children to be used as a prefix.
fn build_group_labels(doc: &Document) -> HashMap<String, String> {
    let mut labels: HashMap<String, String> = HashMap::new();
    for e in doc.elements(kinds::GROUP) {
        let Some(id) = e.field("SKUPINA_ID") else {
            continue;
        };
        let name = e.field_or_default("Nazev");
        let label = match e.field("SKUPINA_ID_PARENT").and_then(|p| labels.get(p)) {
            Some(parent) => format!("{parent} ({name})"),
            None => name.to_string(),
        };
        labels.insert(id.to_string(), label);
    }
    labels
}

/// Resolves the rooms of each event in document order across both room
/// kinds, skipping unknown rooms and repeats.
fn build_event_rooms(
    doc: &Document,
    rooms: &HashMap<String, String>,
) -> HashMap<String, Vec<String>> {
    let raw = accumulate(
        std::iter::once(doc.root())
            .chain(doc.root().descendants())
            .filter(|e| matches!(e.name(), kinds::EVENT_ROOM | kinds::EVENT_ROOM_CALENDAR)),
        "MISTNOST_ID",
    );

    raw.into_iter()
        .map(|(event, ids)| {
            let mut names: Vec<String> = Vec::with_capacity(ids.len());
            for name in ids.iter().map(|id| lookup(rooms, id)) {
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
            (event, names)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, fields: &[(&str, &str)]) -> Element {
        fields
            .iter()
            .fold(Element::new(kind), |e, (name, text)| e.with_field(*name, *text))
    }

    fn doc(rows: Vec<Element>) -> Document {
        Document::from_root(
            rows.into_iter()
                .fold(Element::new("Export"), Element::with_child),
        )
    }

    #[test]
    fn simple_mappings() {
        let index = IdentifierIndex::build(&doc(vec![
            row("Predmet", &[("REALIZACE_ID", "10"), ("Zkratka", "M")]),
            row("Mistnost", &[("MISTNOST_ID", "1"), ("Zkratka", "104")]),
            row("Trida", &[("SKUPINA_ID", "c1"), ("Nazev", "3A")]),
            row(
                "SuplovaniDruhAbsence",
                &[("SUPL_DRUH_ABSENCE_ID", "r1"), ("Nazev", "nemoc")],
            ),
        ]));

        assert_eq!(index.subject("10"), "M");
        assert_eq!(index.room("1"), "104");
        assert_eq!(index.class("c1"), "3A");
        assert_eq!(index.absence_reason("r1"), Some("nemoc"));
    }

    #[test]
    fn unknown_ids_resolve_to_empty() {
        let index = IdentifierIndex::build(&doc(vec![]));
        assert_eq!(index.subject("x"), "");
        assert_eq!(index.period("x"), "");
        assert!(index.teacher("x").is_unknown());
        assert_eq!(index.group("x"), &GroupInfo::default());
        assert!(index.event_rooms("x").is_empty());
        assert!(index.event_teachers("x").is_empty());
        assert_eq!(index.absence_reason("x"), None);
    }

    #[test]
    fn incomplete_elements_are_skipped() {
        let index = IdentifierIndex::build(&doc(vec![
            row("Predmet", &[("REALIZACE_ID", "10")]),
            row("Predmet", &[("Zkratka", "Fy")]),
            row(
                "Ucitel",
                &[("OSOBA_ID", "p1"), ("Jmeno", "Jana"), ("Zkratka", "NOV")],
            ),
        ]));
        assert_eq!(index.subject("10"), "");
        assert!(!index.has_teacher("p1"));
    }

    mod periods {
        use super::*;

        #[test]
        fn multi_hour_period_uses_range_label() {
            let index = IdentifierIndex::build(&doc(vec![
                row(
                    "VyucovaciHodinaOd",
                    &[("OBDOBI_DNE_ID", "a"), ("Nazev", "3"), ("HodinaOd", "3"), ("HodinaDo", "3")],
                ),
                row(
                    "VyucovaciHodinaOd",
                    &[("OBDOBI_DNE_ID", "b"), ("Nazev", "3"), ("HodinaOd", "3"), ("HodinaDo", "5")],
                ),
                row("VyucovaciHodinaOd", &[("OBDOBI_DNE_ID", "c"), ("Nazev", "7")]),
            ]));

            assert_eq!(index.period("a"), "3");
            assert_eq!(index.period("b"), "3-5");
            assert_eq!(index.period("c"), "7");
        }
    }

    mod teachers {
        use super::*;

        fn teacher(kind: &str, id: &str, first: &str, last: &str, abbr: &str) -> Element {
            row(
                kind,
                &[("OSOBA_ID", id), ("Jmeno", first), ("Prijmeni", last), ("Zkratka", abbr)],
            )
        }

        #[test]
        fn both_kinds_are_merged() {
            let index = IdentifierIndex::build(&doc(vec![
                teacher("Ucitel", "p1", "Jana", "Nováková", "NOV"),
                teacher("Ucitel2", "p2", "Petr", "Malý", "MAL"),
            ]));

            assert_eq!(index.teacher("p1").display_name(), "Jana Nováková");
            assert_eq!(index.teacher("p1").sorted_name(), "Nováková Jana");
            assert_eq!(index.teacher("p2").abbreviation, "MAL");
        }

        #[test]
        fn primary_kind_wins_on_duplicate_id() {
            let index = IdentifierIndex::build(&doc(vec![
                teacher("Ucitel", "p1", "Jana", "Nováková", "NOV"),
                teacher("Ucitel2", "p1", "J.", "Nováková", "NOV2"),
            ]));
            assert_eq!(index.teacher("p1").abbreviation, "NOV");
        }

        #[test]
        fn names_join_without_stray_spaces() {
            assert_eq!(join_name("", "Malý"), "Malý");
            assert_eq!(join_name("Petr", ""), "Petr");
            assert_eq!(join_name("", ""), "");
        }
    }

    mod groups {
        use super::*;

        fn index() -> IdentifierIndex {
            IdentifierIndex::build(&doc(vec![
                row(
                    "TridaSkupinaSeminar",
                    &[("SKUPINA_ID", "g1"), ("SKUPINA_ID_PARENT", "c1"), ("Nazev", "Seminar B")],
                ),
                row("Trida", &[("SKUPINA_ID", "c1"), ("Nazev", "3A")]),
                row(
                    "TridaSkupinaSeminar",
                    &[("SKUPINA_ID", "g0"), ("Nazev", "3A")],
                ),
                row(
                    "TridaSkupinaSeminar",
                    &[("SKUPINA_ID", "g2"), ("SKUPINA_ID_PARENT", "g0"), ("Nazev", "Aj1")],
                ),
                row(
                    "TridaSkupinaSeminar",
                    &[("SKUPINA_ID", "g3"), ("SKUPINA_ID_PARENT", "zz")],
                ),
            ]))
        }

        #[test]
        fn group_resolves_parent_class_regardless_of_order() {
            let index = index();
            let group = index.group("g1");
            assert_eq!(group.class, "3A");
            assert_eq!(group.name, "Seminar B");
        }

        #[test]
        fn group_without_parent_is_not_a_group() {
            assert_eq!(index().group("g0"), &GroupInfo::default());
        }

        #[test]
        fn group_with_unknown_parent_has_empty_class() {
            let index = index();
            assert_eq!(index.group("g3").class, "");
            assert_eq!(index.group("g3").name, "");
        }

        #[test]
        fn group_path_nests_under_listed_parent() {
            let index = index();
            assert_eq!(index.group_path("g0"), "3A");
            assert_eq!(index.group_path("g2"), "3A (Aj1)");
            assert_eq!(index.group_path("g1"), "Seminar B");
        }
    }

    mod events {
        use super::*;

        #[test]
        fn event_groups_from_both_kinds() {
            let index = IdentifierIndex::build(&doc(vec![
                row("UdalostStudijniSkupina", &[("UDALOST_ID", "e1"), ("SKUPINA_ID", "g1")]),
                row("UdalostStudijniSkupiny", &[("UDALOST_ID", "e2"), ("SKUPINA_ID", "g2")]),
            ]));
            assert_eq!(index.event_group("e1"), "g1");
            assert_eq!(index.event_group("e2"), "g2");
        }

        #[test]
        fn students_event_group_wins_over_teachers_one() {
            let index = IdentifierIndex::build(&doc(vec![
                row("UdalostStudijniSkupina", &[("UDALOST_ID", "e1"), ("SKUPINA_ID", "g1")]),
                row("UdalostStudijniSkupiny", &[("UDALOST_ID", "e1"), ("SKUPINA_ID", "g9")]),
            ]));
            assert_eq!(index.event_group("e1"), "g1");
        }

        #[test]
        fn event_rooms_interleave_both_kinds_in_document_order() {
            let index = IdentifierIndex::build(&doc(vec![
                row("Mistnost", &[("MISTNOST_ID", "1"), ("Zkratka", "104")]),
                row("Mistnost", &[("MISTNOST_ID", "2"), ("Zkratka", "Tv")]),
                row("Mistnost", &[("MISTNOST_ID", "3"), ("Zkratka", "Lab")]),
                row("UdalostMistnost", &[("UDALOST_ID", "e1"), ("MISTNOST_ID", "1")]),
                row(
                    "KalendarovaUdalostMistnost",
                    &[("UDALOST_ID", "e1"), ("MISTNOST_ID", "2")],
                ),
                row("UdalostMistnost", &[("UDALOST_ID", "e1"), ("MISTNOST_ID", "3")]),
                row(
                    "KalendarovaUdalostMistnost",
                    &[("UDALOST_ID", "e1"), ("MISTNOST_ID", "2")],
                ),
            ]));
            assert_eq!(index.event_rooms("e1"), ["104", "Tv", "Lab"]);
        }

        #[test]
        fn event_rooms_accumulate_in_order_and_skip_unknown() {
            let index = IdentifierIndex::build(&doc(vec![
                row("Mistnost", &[("MISTNOST_ID", "1"), ("Zkratka", "104")]),
                row("Mistnost", &[("MISTNOST_ID", "2"), ("Zkratka", "Tv")]),
                row("UdalostMistnost", &[("UDALOST_ID", "e1"), ("MISTNOST_ID", "2")]),
                row("UdalostMistnost", &[("UDALOST_ID", "e1"), ("MISTNOST_ID", "9")]),
                row("UdalostMistnost", &[("UDALOST_ID", "e1"), ("MISTNOST_ID", "1")]),
                row(
                    "KalendarovaUdalostMistnost",
                    &[("UDALOST_ID", "e1"), ("MISTNOST_ID", "1")],
                ),
                row(
                    "KalendarovaUdalostMistnost",
                    &[("UDALOST_ID", "e2"), ("MISTNOST_ID", "1")],
                ),
            ]));
            assert_eq!(index.event_rooms("e1"), ["Tv", "104"]);
            assert_eq!(index.event_rooms("e2"), ["104"]);
        }

        #[test]
        fn event_teachers_accumulate_in_order() {
            let index = IdentifierIndex::build(&doc(vec![
                row("UdalostOsoba", &[("UDALOST_ID", "e1"), ("OSOBA_ID", "p2")]),
                row("UdalostOsoba", &[("UDALOST_ID", "e1"), ("OSOBA_ID", "p1")]),
                row("UdalostOsoba", &[("UDALOST_ID", "e1")]),
            ]));
            assert_eq!(index.event_teachers("e1"), ["p2", "p1"]);
        }
    }
}
