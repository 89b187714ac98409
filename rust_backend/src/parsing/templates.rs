//! Extractors for the supported instrument observation templates.
//!
//! Each extractor takes the template element found under an observation's
//! `<Template>` node and produces an [`ObservationRecord`]. The caller picks
//! the extractor from the element's tag with [`TemplateKind::from_tag`];
//! [`extract`] re-checks the tag so a mismatched subtree is an error rather
//! than a silently empty record.

use crate::core::domain::{ObservationRecord, TemplateDetails, TemplateKind};
use crate::core::error::ExtractError;
use crate::parsing::xml_tree::XmlNode;

/// Subarray, readout pattern and group count shared by most templates.
#[derive(Debug, Default)]
struct CommonFields {
    subarray: Option<String>,
    readout_pattern: Option<String>,
    groups: Option<u32>,
}

/// Extracts the record for `kind` from its template element.
pub fn extract(kind: TemplateKind, node: &XmlNode) -> Result<ObservationRecord, ExtractError> {
    if node.local_name() != kind.tag() {
        return Err(ExtractError::UnexpectedTag {
            expected: kind.tag().to_string(),
            found: node.name.clone(),
        });
    }

    match kind {
        TemplateKind::NirissSoss => niriss_soss(node),
        TemplateKind::NircamGrismTimeSeries => nircam_grism_time_series(node),
        TemplateKind::NirspecBrightObjectTimeSeries => nirspec_bright_object_time_series(node),
        TemplateKind::MiriLrs => miri_lrs(node),
        TemplateKind::MiriImaging => miri_imaging(node),
        TemplateKind::MiriMrs => miri_mrs(node),
    }
}

/// Resolves the template element's kind from its tag and extracts it.
///
/// Returns `Ok(None)` for templates outside the supported set.
pub fn extract_any(node: &XmlNode) -> Result<Option<ObservationRecord>, ExtractError> {
    match TemplateKind::from_tag(node.local_name()) {
        Some(kind) => extract(kind, node).map(Some),
        None => Ok(None),
    }
}

fn common_fields(
    kind: TemplateKind,
    node: &XmlNode,
    readout_tag: &str,
    groups_tag: &str,
) -> Result<CommonFields, ExtractError> {
    Ok(CommonFields {
        subarray: node.child_text("Subarray"),
        readout_pattern: node.child_text(readout_tag),
        groups: parse_groups(kind, node.child_text(groups_tag))?,
    })
}

/// Group counts are integers; integral decimals such as `"4.0"` are accepted.
fn parse_groups(kind: TemplateKind, raw: Option<String>) -> Result<Option<u32>, ExtractError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(value) = raw.parse::<u32>() {
        return Ok(Some(value));
    }
    match raw.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) => {
            Ok(Some(value as u32))
        }
        _ => Err(ExtractError::InvalidValue {
            kind: kind.tag().to_string(),
            field: "Groups".to_string(),
            value: raw,
        }),
    }
}

fn record(common: CommonFields, details: TemplateDetails) -> ObservationRecord {
    ObservationRecord {
        subarray: common.subarray,
        readout_pattern: common.readout_pattern,
        groups: common.groups,
        details,
    }
}

fn niriss_soss(node: &XmlNode) -> Result<ObservationRecord, ExtractError> {
    let kind = TemplateKind::NirissSoss;
    let mut common = match node.child("Exposure") {
        Some(exposure) => common_fields(kind, exposure, "ReadoutPattern", "Groups")?,
        None => CommonFields::default(),
    };
    common.subarray = node.child_text("Subarray");
    Ok(record(common, TemplateDetails::NirissSoss))
}

fn nircam_grism_time_series(node: &XmlNode) -> Result<ObservationRecord, ExtractError> {
    let common = common_fields(
        TemplateKind::NircamGrismTimeSeries,
        node,
        "ReadoutPattern",
        "Groups",
    )?;
    Ok(record(
        common,
        TemplateDetails::NircamGrismTimeSeries {
            long_pupil_filter: node.child_text("LongPupilFilter"),
        },
    ))
}

fn nirspec_bright_object_time_series(node: &XmlNode) -> Result<ObservationRecord, ExtractError> {
    let common = common_fields(
        TemplateKind::NirspecBrightObjectTimeSeries,
        node,
        "ReadoutPattern",
        "Groups",
    )?;
    Ok(record(
        common,
        TemplateDetails::NirspecBrightObjectTimeSeries {
            grating: node.child_text("Grating"),
        },
    ))
}

fn miri_lrs(node: &XmlNode) -> Result<ObservationRecord, ExtractError> {
    let common = common_fields(TemplateKind::MiriLrs, node, "ReadoutPattern", "Groups")?;
    Ok(record(common, TemplateDetails::MiriLrs))
}

/// Exposure parameters live under `Filters/FilterConfig`; the first
/// configuration is reported.
fn miri_imaging(node: &XmlNode) -> Result<ObservationRecord, ExtractError> {
    let kind = TemplateKind::MiriImaging;
    let config = node.path(&["Filters", "FilterConfig"]);

    let mut common = match config {
        Some(config) => common_fields(kind, config, "ReadoutPattern", "Groups")?,
        None => CommonFields::default(),
    };
    common.subarray = node.child_text("Subarray");

    Ok(record(
        common,
        TemplateDetails::MiriImaging {
            filter: config.and_then(|c| c.child_text("Filter")),
        },
    ))
}

/// MRS uses the long-wavelength channel settings of the first exposure.
fn miri_mrs(node: &XmlNode) -> Result<ObservationRecord, ExtractError> {
    let kind = TemplateKind::MiriMrs;
    let mut common = match node.path(&["ExposureList", "Exposure"]) {
        Some(exposure) => common_fields(kind, exposure, "ReadoutPatternLong", "GroupsLong")?,
        None => CommonFields::default(),
    };
    common.subarray = node.child_text("Subarray");

    Ok(record(
        common,
        TemplateDetails::MiriMrs {
            detector: node.child_text("Detector"),
        },
    ))
}
