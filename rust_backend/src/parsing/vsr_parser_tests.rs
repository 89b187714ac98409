#[cfg(test)]
mod tests {
    use crate::core::domain::TargetFilter;
    use crate::core::error::DocumentError;
    use crate::parsing::vsr_parser::{parse_vsr_file, parse_vsr_str};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VSR: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<report observatory="JWST" id="1201">
  <title>Transiting exoplanet atmospheres</title>
  <reportTime>Jan 20, 2024 12:00:00</reportTime>
  <visit observation="1" visit="1">
    <status>Archived</status>
    <target>WASP-1</target>
    <configuration>NIRSpec Bright Object Time Series</configuration>
    <hours>7.51</hours>
    <longRangePlanStatus>Executed</longRangePlanStatus>
    <startTime>Jun 21, 2022 02:41:18</startTime>
    <endTime>Jun 21, 2022 10:11:54</endTime>
    <repeatedBy>
      <program>1201</program>
      <observation>3</observation>
      <visit>1</visit>
      <problemID>88123</problemID>
    </repeatedBy>
  </visit>
  <visit observation="2" visit="1">
    <status>Scheduled</status>
    <target>HAT-P-26</target>
    <planWindow>X</planWindow>
    <startTime>15-JAN-2024</startTime>
  </visit>
  <visit observation="3" visit="1">
    <status>Flight Ready</status>
    <target>WASP 1</target>
    <planWindow>Mar 1, 2024 - Mar 20, 2024</planWindow>
    <startTime>sometime next spring</startTime>
    <repeatOf>
      <program>1201</program>
      <observation>1</observation>
      <visit>1</visit>
    </repeatOf>
  </visit>
</report>"#;

    #[test]
    fn test_parse_header() {
        let doc = parse_vsr_str(VSR, None).unwrap();
        assert_eq!(doc.observatory.as_deref(), Some("JWST"));
        assert_eq!(doc.id.as_deref(), Some("1201"));
        assert_eq!(doc.title.as_deref(), Some("Transiting exoplanet atmospheres"));
        assert_eq!(doc.report_time.as_deref(), Some("Jan 20, 2024 12:00:00"));
        assert_eq!(doc.visits.len(), 3);
    }

    #[test]
    fn test_parse_executed_visit() {
        let doc = parse_vsr_str(VSR, None).unwrap();
        let visit = &doc.visits[0];
        assert_eq!(visit.visit_id(), "1:1");
        assert_eq!(visit.status.as_deref(), Some("Archived"));
        assert_eq!(visit.hours.as_deref(), Some("7.51"));
        assert_eq!(visit.long_range_plan_status.as_deref(), Some("Executed"));
        assert_eq!(visit.plan_window, None);

        let scheduled = visit.scheduled.as_ref().unwrap();
        assert_eq!(scheduled.formatted, "2022-06-21--02:41:18");
        assert_eq!(scheduled.decimal_year_rounded(), 2022.469);

        let repeated_by = visit.repeated_by.as_ref().unwrap();
        assert_eq!(repeated_by.observation.as_deref(), Some("3"));
        assert_eq!(repeated_by.problem_id.as_deref(), Some("88123"));
        assert!(visit.repeat_of.is_none());
    }

    #[test]
    fn test_scheduled_visit_without_repeats() {
        let doc = parse_vsr_str(VSR, None).unwrap();
        let visit = &doc.visits[1];
        assert_eq!(visit.status.as_deref(), Some("Scheduled"));
        assert_eq!(visit.plan_window, None);
        assert!(visit.repeated_by.is_none());
        assert!(visit.repeat_of.is_none());

        let scheduled = visit.scheduled.as_ref().unwrap();
        assert!((scheduled.decimal_year - 2024.04).abs() < 0.005);
        assert_eq!(scheduled.formatted, "2024-01-15--00:00:00");
    }

    #[test]
    fn test_unparseable_start_time_is_absent() {
        let doc = parse_vsr_str(VSR, None).unwrap();
        let visit = &doc.visits[2];
        assert_eq!(visit.start_time.as_deref(), Some("sometime next spring"));
        assert!(visit.scheduled.is_none());
        assert_eq!(
            visit.plan_window.as_deref(),
            Some("Mar 1, 2024 - Mar 20, 2024")
        );
        let repeat_of = visit.repeat_of.as_ref().unwrap();
        assert_eq!(repeat_of.observation.as_deref(), Some("1"));
        assert_eq!(repeat_of.problem_id, None);
    }

    #[test]
    fn test_filter_ignores_whitespace_in_target() {
        let filter = TargetFilter::new("WASP-1");
        let doc = parse_vsr_str(VSR, Some(&filter)).unwrap();
        let observations: Vec<_> = doc
            .visits
            .iter()
            .map(|v| v.observation.as_deref().unwrap())
            .collect();
        assert_eq!(observations, vec!["1"]);

        let spaced = TargetFilter::new("WASP 1");
        let doc = parse_vsr_str(VSR, Some(&spaced)).unwrap();
        assert_eq!(doc.visits.len(), 1);
        assert_eq!(doc.visits[0].observation.as_deref(), Some("3"));
    }

    #[test]
    fn test_visits_for_observation() {
        let doc = parse_vsr_str(VSR, None).unwrap();
        assert_eq!(doc.visits_for_observation("2").count(), 1);
        assert_eq!(doc.visits_for_observation("9").count(), 0);
    }

    #[test]
    fn test_empty_report() {
        let doc = parse_vsr_str("<report/>", None).unwrap();
        assert!(doc.visits.is_empty());
        assert_eq!(doc.observatory, None);
    }

    #[test]
    fn test_malformed_report() {
        let err = parse_vsr_str("<report><visit></report>", None).unwrap_err();
        assert!(matches!(err, DocumentError::Xml(_)));
    }

    #[test]
    fn test_parse_vsr_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(VSR.as_bytes()).unwrap();
        let doc = parse_vsr_file(file.path(), None).unwrap();
        assert_eq!(doc.visits.len(), 3);
    }
}
