//! Parser for APT proposal exports.
//!
//! An APT document lists the proposal information, its fixed targets and the
//! observations grouped under `DataRequests`. Elements live in the
//! `http://www.stsci.edu/JWST/APT` namespace while template contents use an
//! instrument-specific prefix, so all lookups go through local-name matching.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;
use std::path::Path;

use crate::core::domain::{
    split_planet_designation, ObservationRecord, ObservationRequest, PhaseConstraint,
    ProposalInfo, Target, TargetFilter, TargetPlanet,
};
use crate::core::error::{DocumentError, DocumentResult};
use crate::parsing::templates;
use crate::parsing::xml_tree::XmlNode;

/// Namespace of APT proposal documents.
pub const APT_NAMESPACE: &str = "http://www.stsci.edu/JWST/APT";

/// Group label used when an observation group has none.
pub const DEFAULT_GROUP_LABEL: &str = "NONE";

/// Everything extracted from one APT document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AptDocument {
    pub proposal: ProposalInfo,
    pub targets: Vec<Target>,
    pub target_planets: Vec<TargetPlanet>,
    pub requests: Vec<ObservationRequest>,
}

impl AptDocument {
    /// Target whose number is `number`.
    pub fn target_by_number(&self, number: &str) -> Option<&Target> {
        self.targets
            .iter()
            .find(|t| t.number.as_deref() == Some(number))
    }

    pub fn target_by_name(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name.as_deref() == Some(name))
    }
}

/// Parses APT content from a string.
pub fn parse_apt_str(
    xml: &str,
    proposal_id: &str,
    filter: Option<&TargetFilter>,
) -> DocumentResult<AptDocument> {
    let root = XmlNode::parse(xml)?;
    parse_apt(&root, proposal_id, filter)
}

/// Reads and parses an APT file from disk.
pub fn parse_apt_file(
    path: &Path,
    proposal_id: &str,
    filter: Option<&TargetFilter>,
) -> Result<AptDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read APT file: {}", path.display()))?;
    parse_apt_str(&content, proposal_id, filter)
        .with_context(|| format!("Failed to parse APT file: {}", path.display()))
}

/// Extracts proposal information, targets and observations from an APT root.
///
/// With a `filter`, targets and observations for other hosts, or for a
/// planet letter other than the filter's, are dropped before any template is
/// extracted. A target's own planet designation takes precedence over the
/// filter's letter.
///
/// An observation whose template holds an unreadable value is logged and
/// left out; the rest of the document is still returned.
pub fn parse_apt(
    root: &XmlNode,
    proposal_id: &str,
    filter: Option<&TargetFilter>,
) -> DocumentResult<AptDocument> {
    let proposal = root
        .child("ProposalInformation")
        .map(parse_proposal_information)
        .unwrap_or_default();

    let targets: Vec<Target> = root
        .child("Targets")
        .map(|node| {
            node.children_named("Target")
                .map(parse_target)
                .filter(|t| passes_filter(t.name.as_deref(), filter))
                .collect()
        })
        .unwrap_or_default();

    let target_planets = targets
        .iter()
        .filter_map(|t| target_planet(t, proposal_id, filter))
        .collect();

    let mut requests = Vec::new();
    if let Some(data_requests) = root.child("DataRequests") {
        for group in data_requests.children_named("ObservationGroup") {
            let group_label = group
                .child_text("Label")
                .unwrap_or_else(|| DEFAULT_GROUP_LABEL.to_string());
            for observation in group.children_named("Observation") {
                match parse_observation(observation, proposal_id, &group_label, filter) {
                    Ok(Some(request)) => requests.push(request),
                    Ok(None) => {}
                    Err(err) => warn!("APT {}: skipping {}", proposal_id, err),
                }
            }
        }
    }

    debug!(
        "APT {}: {} targets, {} observations",
        proposal_id,
        targets.len(),
        requests.len()
    );

    Ok(AptDocument {
        proposal,
        targets,
        target_planets,
        requests,
    })
}

fn passes_filter(name: Option<&str>, filter: Option<&TargetFilter>) -> bool {
    match (filter, name) {
        (None, _) => true,
        (Some(filter), Some(name)) => filter.matches_planet(name),
        (Some(_), None) => false,
    }
}

fn parse_proposal_information(node: &XmlNode) -> ProposalInfo {
    ProposalInfo {
        phase: node.child_text("ProposalPhase"),
        title: node.child_text("Title"),
        abstract_text: node.child_text("Abstract"),
        proposal_id: node.child_text("ProposalID"),
        stsci_edit_number: node.child_text("StsciEditNumber"),
        category: node.child_text("ProposalCategory"),
        size: node.child_text("ProposalSize"),
        proprietary_period: node.child_text("ProprietaryPeriod"),
        cycle: node.child_text("Cycle"),
        allocated_time: node.child_text("AllocatedTime"),
        charged_time: node.child_text("ChargedTime"),
        observing_description: node.child_text("ObservingDescription"),
        pi_last_name: node.path_text(&["PrincipalInvestigator", "InvestigatorAddress", "LastName"]),
    }
}

fn parse_target(node: &XmlNode) -> Target {
    Target {
        number: node.child_text("Number"),
        name: node.child_text("TargetName"),
        archive_name: node.child_text("TargetArchiveName"),
        target_id: node.child_text("TargetID"),
        comments: node.child_text("Comments"),
        ra_proper_motion: node.child_text("RAProperMotion"),
        dec_proper_motion: node.child_text("DecProperMotion"),
        ra_proper_motion_units: node.child_text("RAProperMotionUnits"),
        dec_proper_motion_units: node.child_text("DecProperMotionUnits"),
        epoch: node.child_text("Epoch"),
        annual_parallax: node.child_text("AnnualParallax"),
        extended: node.child_text("Extended"),
        category: node.child_text("Category"),
        keywords: node.child_text("Keywords"),
        equatorial_coordinates: node
            .child("EquatorialCoordinates")
            .and_then(|c| c.attribute_text("Value")),
        background_target_req: node.child_text("BackgroundTargetReq"),
        target_confirmation_run: node.child_text("TargetConfirmationRun"),
    }
}

fn target_planet(
    target: &Target,
    proposal_id: &str,
    filter: Option<&TargetFilter>,
) -> Option<TargetPlanet> {
    let name = target.name.as_deref()?;
    let (host, designated) = split_planet_designation(name);
    let planet_letter = designated
        .map(str::to_string)
        .or_else(|| filter.and_then(|f| f.planet_letter.clone()));

    Some(TargetPlanet {
        proposal_id: proposal_id.to_string(),
        target_number: target.number.clone(),
        target_name: host.to_string(),
        planet_letter,
    })
}

/// Splits an observation `TargetID` of the form `"<number> <name>"`.
///
/// A value without a leading number is returned as the name alone.
pub fn split_target_id(raw: &str) -> (Option<String>, Option<String>) {
    let trimmed = raw.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((number, name)) if number.chars().all(|c| c.is_ascii_digit()) => (
            Some(number.to_string()),
            Some(name.trim().to_string()).filter(|n| !n.is_empty()),
        ),
        _ if trimmed.chars().all(|c| c.is_ascii_digit()) && !trimmed.is_empty() => {
            (Some(trimmed.to_string()), None)
        }
        _ => (None, Some(trimmed.to_string()).filter(|n| !n.is_empty())),
    }
}

fn parse_observation(
    node: &XmlNode,
    proposal_id: &str,
    group_label: &str,
    filter: Option<&TargetFilter>,
) -> DocumentResult<Option<ObservationRequest>> {
    let (target_number, target_name) = node
        .child_text("TargetID")
        .map(|raw| split_target_id(&raw))
        .unwrap_or((None, None));

    if !passes_filter(target_name.as_deref(), filter) {
        return Ok(None);
    }

    let number = node.child_text("Number");
    let template = match node.child("Template") {
        Some(template_node) => extract_first_template(template_node, number.as_deref())?,
        None => None,
    };

    let special = node.child("SpecialRequirements");
    let phase = special
        .and_then(|s| s.child("PeriodZeroPhase"))
        .map(|p| PhaseConstraint {
            zero_phase: p.attribute_text("ZeroPhase"),
            period: p.attribute_text("Period"),
            phase_start: p.attribute_text("PhaseStart"),
            phase_end: p.attribute_text("PhaseEnd"),
        });
    let time_series = special
        .map(|s| s.child("TimeSeriesObservation").is_some())
        .unwrap_or(false);

    Ok(Some(ObservationRequest {
        proposal_id: proposal_id.to_string(),
        group_label: group_label.to_string(),
        number,
        target_number,
        target_name,
        label: node.child_text("Label"),
        instrument: node.child_text("Instrument"),
        science_duration: node.child_text("ScienceDuration"),
        coordinated_parallel: node.child_text("CoordinatedParallel"),
        phase,
        time_series,
        template,
    }))
}

/// The first recognized template under `<Template>` is used.
fn extract_first_template(
    template_node: &XmlNode,
    observation: Option<&str>,
) -> DocumentResult<Option<ObservationRecord>> {
    for candidate in &template_node.children {
        match templates::extract_any(candidate) {
            Ok(Some(record)) => return Ok(Some(record)),
            Ok(None) => debug!(
                "Skipping unsupported template <{}> in observation {}",
                candidate.local_name(),
                observation.unwrap_or("?")
            ),
            Err(source) => {
                return Err(DocumentError::Template {
                    observation: observation.unwrap_or("?").to_string(),
                    source,
                })
            }
        }
    }
    Ok(None)
}
