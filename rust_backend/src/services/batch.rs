//! Runs the parse-and-summarize pipeline over a list of programs.
//!
//! Each program is processed independently: a missing or broken document
//! only affects that program's outcome.

use log::{info, warn};
use serde::Serialize;

use crate::core::domain::{SummaryRecord, TargetFilter};
use crate::core::error::PipelineError;
use crate::io::loaders::{DocumentKind, DocumentSource};
use crate::io::reference::ReferenceTable;
use crate::parsing::{parse_apt_str, parse_vsr_str};
use crate::services::compare::{reconcile, CompareOptions, Reconciliation};
use crate::services::summary::build_summaries;

/// Result of one program in a batch run.
#[derive(Debug)]
pub struct ProgramOutcome {
    pub program_id: u32,
    pub result: Result<Vec<SummaryRecord>, PipelineError>,
}

/// A summary paired with its reference row comparison, if a row was found.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryCheck {
    pub summary: SummaryRecord,
    pub reconciliation: Option<Reconciliation>,
}

/// Fetches, parses and summarizes one program.
///
/// A program without an APT document yields no summaries; a missing VSR
/// document only leaves the visit columns absent.
pub fn process_program(
    source: &dyn DocumentSource,
    program_id: u32,
    filter: Option<&TargetFilter>,
) -> Result<Vec<SummaryRecord>, PipelineError> {
    let program = program_id.to_string();

    let Some(apt_xml) = source.fetch(DocumentKind::Apt, program_id)? else {
        info!("No APT document for program {}", program_id);
        return Ok(Vec::new());
    };
    let apt = parse_apt_str(&apt_xml, &program, filter).map_err(|err| PipelineError::Document {
        kind: DocumentKind::Apt,
        source: err,
    })?;

    let vsr = match source.fetch(DocumentKind::Vsr, program_id)? {
        Some(xml) => Some(parse_vsr_str(&xml, filter).map_err(|err| {
            PipelineError::Document {
                kind: DocumentKind::Vsr,
                source: err,
            }
        })?),
        None => {
            info!("No VSR document for program {}", program_id);
            None
        }
    };

    Ok(build_summaries(&apt, vsr.as_ref()))
}

/// Processes every program in order, isolating failures per program.
pub fn process_programs(
    source: &dyn DocumentSource,
    program_ids: &[u32],
    filter: Option<&TargetFilter>,
) -> Vec<ProgramOutcome> {
    program_ids
        .iter()
        .map(|&program_id| {
            let result = process_program(source, program_id, filter);
            match &result {
                Ok(summaries) => info!(
                    "Program {}: {} summaries",
                    program_id,
                    summaries.len()
                ),
                Err(err) => warn!("Program {} failed: {}", program_id, err),
            }
            ProgramOutcome { program_id, result }
        })
        .collect()
}

/// Looks up each successful summary in `table` and reconciles it.
pub fn reconcile_outcomes(
    outcomes: &[ProgramOutcome],
    table: &ReferenceTable,
    options: &CompareOptions,
) -> Vec<SummaryCheck> {
    outcomes
        .iter()
        .filter_map(|outcome| outcome.result.as_ref().ok())
        .flatten()
        .map(|summary| {
            let reference = summary.star_name.as_deref().and_then(|host| {
                table.find(host, summary.planet_letter.as_deref(), &summary.program)
            });
            if reference.is_none() {
                warn!(
                    "No reference row for {} {} in program {}",
                    summary.star_name.as_deref().unwrap_or("?"),
                    summary.planet_letter.as_deref().unwrap_or("?"),
                    summary.program
                );
            }
            SummaryCheck {
                summary: summary.clone(),
                reconciliation: reference.map(|row| reconcile(row, &summary.to_row(), options)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DocumentError;
    use crate::io::loaders::MemorySource;

    const APT: &str = r#"<JwstProposal xmlns="http://www.stsci.edu/JWST/APT">
  <ProposalInformation><ProposalID>42</ProposalID></ProposalInformation>
  <Targets><Target><Number>1</Number><TargetName>WASP-1</TargetName></Target></Targets>
  <DataRequests><ObservationGroup><Observation>
    <Number>1</Number><TargetID>1 WASP-1</TargetID><Instrument>MIRI</Instrument>
    <Template><MiriLRS><Groups>4</Groups></MiriLRS></Template>
  </Observation></ObservationGroup></DataRequests>
</JwstProposal>"#;

    #[test]
    fn test_failures_are_isolated_per_program() {
        let source = MemorySource::new()
            .with(DocumentKind::Apt, 42, APT)
            .with(DocumentKind::Apt, 43, "<JwstProposal><Targets></JwstProposal>");

        let outcomes = process_programs(&source, &[42, 43, 44], None);
        assert_eq!(outcomes.len(), 3);

        let summaries = outcomes[0].result.as_ref().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].observing_mode.as_deref(), Some("MIRI LRS"));

        assert!(matches!(
            outcomes[1].result,
            Err(PipelineError::Document {
                kind: DocumentKind::Apt,
                source: DocumentError::Xml(_)
            })
        ));
        assert!(outcomes[2].result.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_broken_visit_report_fails_program() {
        let source = MemorySource::new()
            .with(DocumentKind::Apt, 42, APT)
            .with(DocumentKind::Vsr, 42, "<report><visit></report>");
        let result = process_program(&source, 42, None);
        assert!(matches!(
            result,
            Err(PipelineError::Document {
                kind: DocumentKind::Vsr,
                ..
            })
        ));
    }
}
