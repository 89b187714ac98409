//! Domain models for proposal targets, observation templates and visit status.
//!
//! This module provides the data structures shared by the APT and VSR parsers,
//! the summary builder and the reconciliation comparator. Every optional value
//! is an `Option`; `None` is the one canonical absent marker and placeholder
//! text such as `"X"` never survives past the parsers.

use serde::Serialize;
use std::fmt;

use crate::parsing::text::normalize_identifier;
use crate::time::ScheduleDate;

/// The instrument observation templates understood by the extractors.
///
/// A template is selected from the local tag name of the element found under
/// an observation's `<Template>` node, never from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TemplateKind {
    NirissSoss,
    NircamGrismTimeSeries,
    NirspecBrightObjectTimeSeries,
    MiriLrs,
    MiriImaging,
    MiriMrs,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::NirissSoss,
        TemplateKind::NircamGrismTimeSeries,
        TemplateKind::NirspecBrightObjectTimeSeries,
        TemplateKind::MiriLrs,
        TemplateKind::MiriImaging,
        TemplateKind::MiriMrs,
    ];

    /// Resolves a template element's local tag name.
    ///
    /// Matching is exact: `"MiriLRSExtra"` or `"NirissSossCalibration"` are not templates.
    ///
    /// # Examples
    ///
    /// ```
    /// use trexolists::core::domain::TemplateKind;
    ///
    /// assert_eq!(TemplateKind::from_tag("MiriMRS"), Some(TemplateKind::MiriMrs));
    /// assert_eq!(TemplateKind::from_tag("NircamImaging"), None);
    /// ```
    pub fn from_tag(local_name: &str) -> Option<Self> {
        match local_name {
            "NirissSoss" => Some(TemplateKind::NirissSoss),
            "NircamGrismTimeSeries" => Some(TemplateKind::NircamGrismTimeSeries),
            "NirspecBrightObjectTimeSeries" => Some(TemplateKind::NirspecBrightObjectTimeSeries),
            "MiriLRS" => Some(TemplateKind::MiriLrs),
            "MiriImaging" => Some(TemplateKind::MiriImaging),
            "MiriMRS" => Some(TemplateKind::MiriMrs),
            _ => None,
        }
    }

    /// The tag name this template carries in APT documents.
    pub fn tag(&self) -> &'static str {
        match self {
            TemplateKind::NirissSoss => "NirissSoss",
            TemplateKind::NircamGrismTimeSeries => "NircamGrismTimeSeries",
            TemplateKind::NirspecBrightObjectTimeSeries => "NirspecBrightObjectTimeSeries",
            TemplateKind::MiriLrs => "MiriLRS",
            TemplateKind::MiriImaging => "MiriImaging",
            TemplateKind::MiriMrs => "MiriMRS",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Fields that only exist for particular template variants.
///
/// Carrying them inside the variant makes it impossible to populate, say, a
/// grating on a MIRI imaging record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum TemplateDetails {
    NirissSoss,
    NircamGrismTimeSeries { long_pupil_filter: Option<String> },
    NirspecBrightObjectTimeSeries { grating: Option<String> },
    MiriLrs,
    MiriImaging { filter: Option<String> },
    MiriMrs { detector: Option<String> },
}

impl TemplateDetails {
    pub fn kind(&self) -> TemplateKind {
        match self {
            TemplateDetails::NirissSoss => TemplateKind::NirissSoss,
            TemplateDetails::NircamGrismTimeSeries { .. } => TemplateKind::NircamGrismTimeSeries,
            TemplateDetails::NirspecBrightObjectTimeSeries { .. } => {
                TemplateKind::NirspecBrightObjectTimeSeries
            }
            TemplateDetails::MiriLrs => TemplateKind::MiriLrs,
            TemplateDetails::MiriImaging { .. } => TemplateKind::MiriImaging,
            TemplateDetails::MiriMrs { .. } => TemplateKind::MiriMrs,
        }
    }

    /// Short observing-mode label as shown in the reference tables.
    ///
    /// The time-series and LRS modes have fixed labels; imaging reports its
    /// filter and MRS its detector, so those can be absent.
    pub fn mode_label(&self) -> Option<&str> {
        match self {
            TemplateDetails::NirissSoss => Some("SOSS"),
            TemplateDetails::NircamGrismTimeSeries { .. } => Some("GTS"),
            TemplateDetails::NirspecBrightObjectTimeSeries { .. } => Some("BOTS"),
            TemplateDetails::MiriLrs => Some("LRS"),
            TemplateDetails::MiriImaging { filter } => filter.as_deref(),
            TemplateDetails::MiriMrs { detector } => detector.as_deref(),
        }
    }

    /// Grating or grism-side filter, for the variants that define one.
    pub fn optical_element(&self) -> Option<&str> {
        match self {
            TemplateDetails::NircamGrismTimeSeries { long_pupil_filter } => {
                long_pupil_filter.as_deref()
            }
            TemplateDetails::NirspecBrightObjectTimeSeries { grating } => grating.as_deref(),
            _ => None,
        }
    }
}

/// One instrument template instance extracted from an APT observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRecord {
    pub subarray: Option<String>,
    pub readout_pattern: Option<String>,
    pub groups: Option<u32>,
    pub details: TemplateDetails,
}

impl ObservationRecord {
    pub fn template_kind(&self) -> TemplateKind {
        self.details.kind()
    }
}

/// `PeriodZeroPhase` special requirement of an observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PhaseConstraint {
    pub zero_phase: Option<String>,
    pub period: Option<String>,
    pub phase_start: Option<String>,
    pub phase_end: Option<String>,
}

/// One `Observation` entry of an APT data request.
///
/// `template` is `None` when the observation uses a template outside the
/// supported set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationRequest {
    pub proposal_id: String,
    pub group_label: String,
    pub number: Option<String>,
    pub target_number: Option<String>,
    pub target_name: Option<String>,
    pub label: Option<String>,
    pub instrument: Option<String>,
    pub science_duration: Option<String>,
    pub coordinated_parallel: Option<String>,
    pub phase: Option<PhaseConstraint>,
    pub time_series: bool,
    pub template: Option<ObservationRecord>,
}

/// Fields of the APT `ProposalInformation` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProposalInfo {
    pub phase: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub proposal_id: Option<String>,
    pub stsci_edit_number: Option<String>,
    pub category: Option<String>,
    pub size: Option<String>,
    pub proprietary_period: Option<String>,
    pub cycle: Option<String>,
    pub allocated_time: Option<String>,
    pub charged_time: Option<String>,
    pub observing_description: Option<String>,
    pub pi_last_name: Option<String>,
}

/// A fixed target as listed in the APT `Targets` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Target {
    pub number: Option<String>,
    pub name: Option<String>,
    pub archive_name: Option<String>,
    pub target_id: Option<String>,
    pub comments: Option<String>,
    pub ra_proper_motion: Option<String>,
    pub dec_proper_motion: Option<String>,
    pub ra_proper_motion_units: Option<String>,
    pub dec_proper_motion_units: Option<String>,
    pub epoch: Option<String>,
    pub annual_parallax: Option<String>,
    pub extended: Option<String>,
    pub category: Option<String>,
    pub keywords: Option<String>,
    pub equatorial_coordinates: Option<String>,
    pub background_target_req: Option<String>,
    pub target_confirmation_run: Option<String>,
}

/// Identifies a (proposal, host, planet) triple.
///
/// `target_number` is the APT target number observations refer to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetPlanet {
    pub proposal_id: String,
    pub target_number: Option<String>,
    pub target_name: String,
    pub planet_letter: Option<String>,
}

/// Relation from one visit to another (`repeatedBy` / `repeatOf`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepeatLink {
    pub program: Option<String>,
    pub observation: Option<String>,
    pub visit: Option<String>,
    pub problem_id: Option<String>,
}

/// One `visit` element of a VSR document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VisitStatusRecord {
    pub observation: Option<String>,
    pub visit: Option<String>,
    pub status: Option<String>,
    pub target: Option<String>,
    pub configuration: Option<String>,
    pub hours: Option<String>,
    pub long_range_plan_status: Option<String>,
    pub plan_window: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Parsed `start_time`; absent when unscheduled or unreadable.
    pub scheduled: Option<ScheduleDate>,
    pub repeated_by: Option<RepeatLink>,
    pub repeat_of: Option<RepeatLink>,
}

impl VisitStatusRecord {
    /// `"<observation>:<visit>"`, the identifier used in logs and reports.
    pub fn visit_id(&self) -> String {
        format!(
            "{}:{}",
            self.observation.as_deref().unwrap_or("?"),
            self.visit.as_deref().unwrap_or("?")
        )
    }
}

/// Restricts parsing to a single host star and optionally names its planet.
///
/// Names are compared after identifier normalization, so spacing and case
/// differences are irrelevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFilter {
    pub name: String,
    pub planet_letter: Option<String>,
}

impl TargetFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            planet_letter: None,
        }
    }

    pub fn with_planet(mut self, letter: impl Into<String>) -> Self {
        self.planet_letter = Some(letter.into());
        self
    }

    /// True if `candidate` names the filtered host, with or without a planet suffix.
    pub fn matches(&self, candidate: &str) -> bool {
        let wanted = normalize_identifier(Some(&self.name));
        if wanted.is_none() {
            return false;
        }
        let (host, _) = split_planet_designation(candidate);
        normalize_identifier(Some(candidate)) == wanted || normalize_identifier(Some(host)) == wanted
    }

    /// Like [`matches`](Self::matches), but a candidate carrying its own
    /// planet letter must also agree with the filter's letter, if one is set.
    ///
    /// `"TOI-700 d"` passes `TOI-700` alone but not `TOI-700` / `b`.
    pub fn matches_planet(&self, candidate: &str) -> bool {
        if !self.matches(candidate) {
            return false;
        }
        let (_, designated) = split_planet_designation(candidate);
        match (self.planet_letter.as_deref(), designated) {
            (Some(wanted), Some(letter)) => wanted.trim().eq_ignore_ascii_case(letter),
            _ => true,
        }
    }
}

/// Splits a trailing planet letter off a target name.
///
/// Recognizes a separate lowercase letter (`"55 Cnc e"`) and a letter glued to
/// a catalogue number (`"GJ 1214b"`). Anything else is returned unchanged.
///
/// # Examples
///
/// ```
/// use trexolists::core::domain::split_planet_designation;
///
/// assert_eq!(split_planet_designation("WASP-1 b"), ("WASP-1", Some("b")));
/// assert_eq!(split_planet_designation("GJ 1214b"), ("GJ 1214", Some("b")));
/// assert_eq!(split_planet_designation("WASP-96"), ("WASP-96", None));
/// ```
pub fn split_planet_designation(name: &str) -> (&str, Option<&str>) {
    let trimmed = name.trim();
    let is_letter = |c: char| ('b'..='z').contains(&c);

    if let Some((host, last)) = trimmed.rsplit_once(char::is_whitespace) {
        let mut chars = last.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if is_letter(c) && !host.trim().is_empty() {
                return (host.trim_end(), Some(last));
            }
        }
    }

    let mut tail = trimmed.char_indices().rev();
    if let (Some((idx, last)), Some((_, before))) = (tail.next(), tail.next()) {
        if is_letter(last) && before.is_ascii_digit() {
            return (&trimmed[..idx], Some(&trimmed[idx..]));
        }
    }

    (trimmed, None)
}

/// A single cell value in a summary or reference row.
///
/// `Absent` is the canonical "no value" marker for every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Absent,
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    /// Builds a text cell, mapping placeholder or blank text to `Absent`.
    pub fn text(raw: Option<&str>) -> Self {
        crate::parsing::text::normalize_text(raw)
            .map(FieldValue::Text)
            .unwrap_or(FieldValue::Absent)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        FieldValue::text(value.as_deref())
    }
}

impl From<Option<u32>> for FieldValue {
    fn from(value: Option<u32>) -> Self {
        value
            .map(|v| FieldValue::Integer(i64::from(v)))
            .unwrap_or(FieldValue::Absent)
    }
}

impl From<Option<f64>> for FieldValue {
    fn from(value: Option<f64>) -> Self {
        value.map(FieldValue::Number).unwrap_or(FieldValue::Absent)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => f.write_str("<absent>"),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Number(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

/// An ordered, name-addressed row of cells.
///
/// Used for both derived summaries and externally loaded reference rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecordRow {
    cells: Vec<(String, FieldValue)>,
}

impl RecordRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a column, replacing an earlier value of the same name in place.
    pub fn insert(&mut self, column: impl Into<String>, value: FieldValue) {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for RecordRow {
    fn from_iter<I: IntoIterator<Item = (K, FieldValue)>>(iter: I) -> Self {
        let mut row = RecordRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

/// Column names of a [`SummaryRecord`], in output order.
pub const SUMMARY_COLUMNS: [&str; 20] = [
    "star_name",
    "planet_letter",
    "program",
    "cycle",
    "obs",
    "visit_status",
    "template_kind",
    "observing_mode",
    "subarray",
    "readout_pattern",
    "groups",
    "optical_element",
    "start_ut_decimal",
    "start_ut_formatted",
    "hours",
    "pi_name",
    "proprietary_period",
    "ra",
    "dec",
    "plan_window",
];

/// Flat per-observation summary: one template instance, its target/planet,
/// proposal information and matching visit status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub star_name: Option<String>,
    pub planet_letter: Option<String>,
    pub program: String,
    pub cycle: Option<String>,
    pub obs: Option<String>,
    pub visit_status: Option<String>,
    pub template_kind: TemplateKind,
    pub observing_mode: Option<String>,
    pub subarray: Option<String>,
    pub readout_pattern: Option<String>,
    pub groups: Option<u32>,
    pub optical_element: Option<String>,
    pub start_ut_decimal: Option<f64>,
    pub start_ut_formatted: Option<String>,
    pub hours: Option<f64>,
    pub pi_name: Option<String>,
    pub proprietary_period: Option<String>,
    pub ra: Option<String>,
    pub dec: Option<String>,
    pub plan_window: Option<String>,
}

impl SummaryRecord {
    /// Converts the record into a row with exactly [`SUMMARY_COLUMNS`].
    pub fn to_row(&self) -> RecordRow {
        let values: [FieldValue; 20] = [
            self.star_name.clone().into(),
            self.planet_letter.clone().into(),
            FieldValue::text(Some(&self.program)),
            self.cycle.clone().into(),
            self.obs.clone().into(),
            self.visit_status.clone().into(),
            FieldValue::Text(self.template_kind.tag().to_string()),
            self.observing_mode.clone().into(),
            self.subarray.clone().into(),
            self.readout_pattern.clone().into(),
            self.groups.into(),
            self.optical_element.clone().into(),
            self.start_ut_decimal.into(),
            self.start_ut_formatted.clone().into(),
            self.hours.into(),
            self.pi_name.clone().into(),
            self.proprietary_period.clone().into(),
            self.ra.clone().into(),
            self.dec.clone().into(),
            self.plan_window.clone().into(),
        ];
        SUMMARY_COLUMNS.iter().copied().zip(values).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_kind_tag_roundtrip() {
        for kind in TemplateKind::ALL {
            assert_eq!(TemplateKind::from_tag(kind.tag()), Some(kind));
        }
    }

    #[test]
    fn test_template_kind_requires_exact_tag() {
        assert_eq!(TemplateKind::from_tag("NirissSossExtra"), None);
        assert_eq!(TemplateKind::from_tag("nirisssoss"), None);
        assert_eq!(TemplateKind::from_tag("LRS"), None);
    }

    #[test]
    fn test_optical_element_only_for_grating_variants() {
        let imaging = TemplateDetails::MiriImaging {
            filter: Some("F1500W".to_string()),
        };
        assert_eq!(imaging.optical_element(), None);
        assert_eq!(imaging.mode_label(), Some("F1500W"));

        let bots = TemplateDetails::NirspecBrightObjectTimeSeries {
            grating: Some("G395H".to_string()),
        };
        assert_eq!(bots.optical_element(), Some("G395H"));
        assert_eq!(bots.mode_label(), Some("BOTS"));
    }

    #[test]
    fn test_split_planet_designation() {
        assert_eq!(split_planet_designation("55 Cnc e"), ("55 Cnc", Some("e")));
        assert_eq!(split_planet_designation("K2-18b"), ("K2-18", Some("b")));
        assert_eq!(split_planet_designation("HD 189733"), ("HD 189733", None));
        assert_eq!(split_planet_designation("TRAPPIST-1 A"), ("TRAPPIST-1 A", None));
        assert_eq!(split_planet_designation("b"), ("b", None));
    }

    #[test]
    fn test_target_filter_matches_host_and_planet_forms() {
        let filter = TargetFilter::new("WASP-96");
        assert!(filter.matches("WASP-96"));
        assert!(filter.matches(" WASP -96"));
        assert!(filter.matches("wasp-96 b"));
        assert!(!filter.matches("WASP-961"));
    }

    #[test]
    fn test_target_filter_rejects_other_designated_planet() {
        let filter = TargetFilter::new("TOI-700").with_planet("b");
        assert!(filter.matches_planet("TOI-700 b"));
        assert!(filter.matches_planet("TOI-700"));
        assert!(!filter.matches_planet("TOI-700 d"));
        assert!(filter.matches("TOI-700 d"));

        let host_only = TargetFilter::new("TOI-700");
        assert!(host_only.matches_planet("TOI-700 d"));
    }

    #[test]
    fn test_record_row_insert_replaces() {
        let mut row = RecordRow::new();
        row.insert("groups", FieldValue::Integer(4));
        row.insert("groups", FieldValue::Integer(5));
        assert_eq!(row.len(), 1);
        assert_eq!(row.get("groups"), Some(&FieldValue::Integer(5)));
    }

    #[test]
    fn test_field_value_text_maps_placeholder_to_absent() {
        assert_eq!(FieldValue::text(Some(" x ")), FieldValue::Absent);
        assert_eq!(FieldValue::text(None), FieldValue::Absent);
        assert_eq!(
            FieldValue::text(Some(" NRSRAPID ")),
            FieldValue::Text("NRSRAPID".to_string())
        );
    }
}
