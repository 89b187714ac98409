#[cfg(test)]
mod tests {
    use crate::core::domain::{FieldValue, RecordRow};
    use crate::services::compare::{reconcile, values_equal, CompareOptions};

    fn text(value: &str) -> FieldValue {
        FieldValue::Text(value.to_string())
    }

    #[test]
    fn test_absent_values() {
        assert!(values_equal(&FieldValue::Absent, &FieldValue::Absent));
        assert!(!values_equal(&FieldValue::Absent, &text("SUB80")));
        assert!(!values_equal(&FieldValue::Integer(0), &FieldValue::Absent));
    }

    #[test]
    fn test_numeric_text_compares_as_number() {
        assert!(values_equal(&text("10"), &text("10.00")));
        assert!(values_equal(&text(" 4 "), &FieldValue::Integer(4)));
        assert!(values_equal(&FieldValue::Number(7.51), &text("7.51")));
        assert!(!values_equal(&text("10"), &text("10.5")));
    }

    #[test]
    fn test_text_is_trimmed_and_case_sensitive() {
        assert!(values_equal(&text("NRSRAPID "), &text("NRSRAPID")));
        assert!(!values_equal(&text("nrsrapid"), &text("NRSRAPID")));
    }

    #[test]
    fn test_mixed_types_are_unequal() {
        assert!(!values_equal(&text("four"), &FieldValue::Integer(4)));
        assert!(!values_equal(&FieldValue::Number(f64::NAN), &FieldValue::Number(f64::NAN)));
        assert!(!values_equal(&text("NaN"), &FieldValue::Number(f64::NAN)));
    }

    #[test]
    fn test_reconcile_groups_and_readout() {
        let reference: RecordRow = [
            ("groups", text("4")),
            ("readout_pattern", text("NRSRAPID")),
        ]
        .into_iter()
        .collect();
        let derived: RecordRow = [
            ("groups", FieldValue::Integer(4)),
            ("readout_pattern", text("NRSRAPID")),
        ]
        .into_iter()
        .collect();

        let result = reconcile(&reference, &derived, &CompareOptions::default());
        assert!(result.is_consistent());
        assert!(result.mismatched_columns().is_empty());
        assert_eq!(result.columns.len(), 2);
    }

    #[test]
    fn test_reconcile_reports_mismatches_and_missing_columns() {
        let reference: RecordRow = [
            ("subarray", text("SUB2048")),
            ("hours", text("7.5")),
            ("pl_orbper", text("3.42")),
        ]
        .into_iter()
        .collect();
        let derived: RecordRow = [
            ("subarray", text("SUB80")),
            ("hours", FieldValue::Number(7.5)),
            ("pl_orbper", FieldValue::Absent),
            ("plan_window", FieldValue::Absent),
        ]
        .into_iter()
        .collect();

        let result = reconcile(&reference, &derived, &CompareOptions::default());
        assert_eq!(result.mismatched_columns(), vec!["subarray"]);
        assert_eq!(result.missing_in_reference, vec!["plan_window".to_string()]);
        assert!(result.columns.iter().all(|c| c.column != "pl_orbper"));

        let mismatch = &result.columns[0];
        assert_eq!(mismatch.reference, text("SUB2048"));
        assert_eq!(mismatch.derived, text("SUB80"));
    }

    #[test]
    fn test_custom_skip_prefixes() {
        let reference: RecordRow = [("pl_orbper", text("3.42"))].into_iter().collect();
        let derived: RecordRow = [("pl_orbper", text("3.40"))].into_iter().collect();

        let options = CompareOptions {
            skip_prefixes: Vec::new(),
        };
        let result = reconcile(&reference, &derived, &options);
        assert_eq!(result.mismatched_columns(), vec!["pl_orbper"]);
    }
}
