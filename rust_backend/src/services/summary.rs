//! Builds flat per-observation summaries from parsed APT and VSR documents.

use log::debug;

use crate::core::domain::{
    split_planet_designation, ObservationRequest, SummaryRecord, Target, TargetFilter,
    TargetPlanet, VisitStatusRecord,
};
use crate::parsing::apt_parser::AptDocument;
use crate::parsing::vsr_parser::VsrDocument;

/// One summary per observation that uses a supported template.
///
/// Each observation is joined to its target (by target number, falling back
/// to the name) and, when a visit report is given, to the first visit with
/// the same observation number whose target agrees.
pub fn build_summaries(apt: &AptDocument, vsr: Option<&VsrDocument>) -> Vec<SummaryRecord> {
    apt.requests
        .iter()
        .filter_map(|request| {
            let record = summarize(apt, vsr, request);
            if record.is_none() {
                debug!(
                    "Observation {} has no supported template",
                    request.number.as_deref().unwrap_or("?")
                );
            }
            record
        })
        .collect()
}

fn summarize(
    apt: &AptDocument,
    vsr: Option<&VsrDocument>,
    request: &ObservationRequest,
) -> Option<SummaryRecord> {
    let template = request.template.as_ref()?;
    let target = find_target(apt, request);
    let planet = find_target_planet(apt, request, target);

    let star_name = planet
        .map(|p| p.target_name.clone())
        .or_else(|| {
            request
                .target_name
                .as_deref()
                .map(|name| split_planet_designation(name).0.to_string())
        });

    let visit = match (vsr, request.number.as_deref()) {
        (Some(vsr), Some(number)) => find_visit(vsr, number, star_name.as_deref()),
        _ => None,
    };

    let (ra, dec) = target
        .and_then(|t| t.equatorial_coordinates.as_deref())
        .and_then(split_equatorial_coordinates)
        .map(|(ra, dec)| (Some(ra), Some(dec)))
        .unwrap_or((None, None));

    let scheduled = visit.and_then(|v| v.scheduled.as_ref());

    Some(SummaryRecord {
        star_name,
        planet_letter: planet.and_then(|p| p.planet_letter.clone()),
        program: apt
            .proposal
            .proposal_id
            .clone()
            .unwrap_or_else(|| request.proposal_id.clone()),
        cycle: apt.proposal.cycle.clone(),
        obs: request.number.clone(),
        visit_status: visit.and_then(|v| v.status.clone()),
        template_kind: template.template_kind(),
        observing_mode: observing_mode(
            request.instrument.as_deref(),
            template.details.mode_label(),
        ),
        subarray: template.subarray.clone(),
        readout_pattern: template.readout_pattern.clone(),
        groups: template.groups,
        optical_element: template.details.optical_element().map(str::to_string),
        start_ut_decimal: scheduled.map(|s| s.decimal_year_rounded()),
        start_ut_formatted: scheduled.map(|s| s.formatted.clone()),
        hours: visit
            .and_then(|v| v.hours.as_deref())
            .and_then(|h| h.parse::<f64>().ok()),
        pi_name: apt.proposal.pi_last_name.clone(),
        proprietary_period: apt.proposal.proprietary_period.clone(),
        ra,
        dec,
        plan_window: visit.and_then(|v| v.plan_window.clone()),
    })
}

fn find_target<'a>(apt: &'a AptDocument, request: &ObservationRequest) -> Option<&'a Target> {
    request
        .target_number
        .as_deref()
        .and_then(|number| apt.target_by_number(number))
        .or_else(|| {
            request
                .target_name
                .as_deref()
                .and_then(|name| apt.target_by_name(name))
        })
}

fn find_target_planet<'a>(
    apt: &'a AptDocument,
    request: &ObservationRequest,
    target: Option<&Target>,
) -> Option<&'a TargetPlanet> {
    let number = target
        .and_then(|t| t.number.as_deref())
        .or(request.target_number.as_deref());
    apt.target_planets
        .iter()
        .find(|p| number.is_some() && p.target_number.as_deref() == number)
}

fn find_visit<'a>(
    vsr: &'a VsrDocument,
    observation: &str,
    star_name: Option<&str>,
) -> Option<&'a VisitStatusRecord> {
    vsr.visits.iter().find(|visit| {
        visit.observation.as_deref() == Some(observation)
            && match (visit.target.as_deref(), star_name) {
                (Some(visit_target), Some(star)) => TargetFilter::new(star).matches(visit_target),
                _ => true,
            }
    })
}

/// `"<instrument> <mode>"`, or whichever of the two is present.
fn observing_mode(instrument: Option<&str>, mode: Option<&str>) -> Option<String> {
    match (instrument, mode) {
        (Some(instrument), Some(mode)) => Some(format!("{} {}", instrument, mode)),
        (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
        (None, None) => None,
    }
}

/// Splits `"00 04 11.1377 -47 21 38.32"` into `("00:04:11.1377", "-47:21:38.32")`.
///
/// Fewer than six components yields `None`.
pub fn split_equatorial_coordinates(value: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() < 6 {
        return None;
    }
    Some((parts[..3].join(":"), parts[3..6].join(":")))
}
