//! Parser for visit status reports (VSR).
//!
//! A VSR document has no namespace. Its root carries `observatory` and `id`
//! attributes and one `visit` element per scheduled or executed visit.

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Serialize;
use std::path::Path;

use crate::core::domain::{RepeatLink, TargetFilter, VisitStatusRecord};
use crate::core::error::DocumentResult;
use crate::parsing::xml_tree::XmlNode;
use crate::time::parse_vsr_date;

/// Header fields and visits of one VSR document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VsrDocument {
    pub observatory: Option<String>,
    pub id: Option<String>,
    pub title: Option<String>,
    pub report_time: Option<String>,
    pub visits: Vec<VisitStatusRecord>,
}

impl VsrDocument {
    pub fn visits_for_observation<'a>(
        &'a self,
        observation: &'a str,
    ) -> impl Iterator<Item = &'a VisitStatusRecord> + 'a {
        self.visits
            .iter()
            .filter(move |v| v.observation.as_deref() == Some(observation))
    }
}

pub fn parse_vsr_str(xml: &str, filter: Option<&TargetFilter>) -> DocumentResult<VsrDocument> {
    let root = XmlNode::parse(xml)?;
    Ok(parse_vsr(&root, filter))
}

/// Reads and parses a VSR file from disk.
pub fn parse_vsr_file(path: &Path, filter: Option<&TargetFilter>) -> Result<VsrDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read VSR file: {}", path.display()))?;
    parse_vsr_str(&content, filter)
        .with_context(|| format!("Failed to parse VSR file: {}", path.display()))
}

/// Extracts the report header and visits, keeping only visits whose target
/// matches `filter` when one is given.
pub fn parse_vsr(root: &XmlNode, filter: Option<&TargetFilter>) -> VsrDocument {
    let visits: Vec<VisitStatusRecord> = root
        .children_named("visit")
        .filter(|node| match filter {
            Some(filter) => node
                .child_text("target")
                .map(|target| filter.matches_planet(&target))
                .unwrap_or(false),
            None => true,
        })
        .map(parse_visit)
        .collect();

    debug!(
        "VSR {}: {} visits",
        root.attribute("id").unwrap_or("?"),
        visits.len()
    );

    VsrDocument {
        observatory: root.attribute_text("observatory"),
        id: root.attribute_text("id"),
        title: root.child_text("title"),
        report_time: root.child_text("reportTime"),
        visits,
    }
}

fn parse_visit(node: &XmlNode) -> VisitStatusRecord {
    let mut record = VisitStatusRecord {
        observation: node.attribute_text("observation"),
        visit: node.attribute_text("visit"),
        status: node.child_text("status"),
        target: node.child_text("target"),
        configuration: node.child_text("configuration"),
        hours: node.child_text("hours"),
        long_range_plan_status: node.child_text("longRangePlanStatus"),
        plan_window: node.child_text("planWindow"),
        start_time: node.child_text("startTime"),
        end_time: node.child_text("endTime"),
        scheduled: None,
        repeated_by: node.child("repeatedBy").map(parse_repeat_link),
        repeat_of: node.child("repeatOf").map(parse_repeat_link),
    };

    if let Some(start) = record.start_time.as_deref() {
        match parse_vsr_date(start) {
            Ok(date) => record.scheduled = Some(date),
            Err(err) => warn!("Visit {}: {}", record.visit_id(), err),
        }
    }

    record
}

fn parse_repeat_link(node: &XmlNode) -> RepeatLink {
    RepeatLink {
        program: node.child_text("program"),
        observation: node.child_text("observation"),
        visit: node.child_text("visit"),
        problem_id: node.child_text("problemID"),
    }
}
