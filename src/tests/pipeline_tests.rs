// src/tests/pipeline_tests.rs
use super::utils::{respond, MockTransport};
use crate::domain::{DateWindow, ModDate, Report};
use crate::gis::query::{ATTRIBUTE_LAYER, MODIFICATION_LAYER};
use crate::gis::{GisError, QueryResponse};
use crate::pipeline::{Pipeline, PipelineOutcome, Stage};
use chrono::NaiveDate;
use serde_json::{json, Value};

fn window() -> DateWindow {
    DateWindow::new(
        NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
    )
}

/// Serves fixed rows per layer.
fn county(modifications: Value, attributes: Value) -> MockTransport {
    MockTransport::new(move |q| match q.layer {
        MODIFICATION_LAYER => respond(modifications.clone()),
        ATTRIBUTE_LAYER => respond(attributes.clone()),
        other => panic!("unexpected layer {other}"),
    })
}

fn expect_report(outcome: PipelineOutcome) -> Report {
    match outcome {
        PipelineOutcome::Report(report) => report,
        PipelineOutcome::NothingToReport { .. } => panic!("expected a report"),
    }
}

fn ppis(report: &Report) -> Vec<String> {
    report.entries.iter().map(|e| e.ppi().unwrap()).collect()
}

#[test]
fn empty_modification_log_short_circuits() {
    let transport = county(json!([]), json!([{ "PPI": "never" }]));

    let outcome = Pipeline::new(&transport, 1).run(window()).unwrap();

    assert!(matches!(outcome, PipelineOutcome::NothingToReport { .. }));
    assert_eq!(transport.calls_to(MODIFICATION_LAYER), 1);
    assert_eq!(transport.calls_to(ATTRIBUTE_LAYER), 0);
}

#[test]
fn missing_features_field_counts_as_empty() {
    let transport = MockTransport::new(|q| {
        assert_eq!(q.layer, MODIFICATION_LAYER);
        Ok(QueryResponse::default())
    });

    let outcome = Pipeline::new(&transport, 1).run(window()).unwrap();

    assert!(matches!(outcome, PipelineOutcome::NothingToReport { .. }));
    assert_eq!(transport.calls_to(ATTRIBUTE_LAYER), 0);
}

#[test]
fn primary_query_uses_source_flag_and_window() {
    let transport = county(json!([]), json!([]));

    Pipeline::new(&transport, 1).run(window()).unwrap();

    let query = transport.last_call_to(MODIFICATION_LAYER).unwrap();
    assert_eq!(
        query.where_clause,
        "SOURCE=1 AND MODDATE >= DATE '2025-04-01' AND MODDATE < DATE '2025-05-01'"
    );
}

#[test]
fn joins_sorts_and_counts() {
    // Modification dates 5, 3, 5 (seconds) plus one attribute row with no log entry.
    let transport = county(
        json!([
            { "PPI": "P1", "MODDATE": 5000 },
            { "PPI": "P2", "MODDATE": 3000 },
            { "PPI": "P3", "MODDATE": 5000 }
        ]),
        json!([
            { "PPI": "P4", "Schedule": 4 },
            { "PPI": "P1", "Schedule": 1 },
            { "PPI": "P2", "Schedule": 2 },
            { "PPI": "P3", "Schedule": 3 }
        ]),
    );

    let report = expect_report(Pipeline::new(&transport, 1).run(window()).unwrap());

    assert_eq!(ppis(&report), ["P1", "P3", "P2", "P4"]);
    assert_eq!(report.summary.modified, 3);
    assert_eq!(report.summary.enriched, 4);
    assert_eq!(report.summary.resolved, 3);
    assert_eq!(report.summary.unresolved, 1);

    let enrichment = transport.last_call_to(ATTRIBUTE_LAYER).unwrap();
    assert_eq!(enrichment.where_clause, "PPI IN ('P1','P2','P3')");

    let last = report.entries.last().unwrap();
    assert_eq!(last.modified, ModDate::NotAvailable);
    assert_eq!(last.attr("MODDATE"), Some(&json!("N/A")));
    assert_eq!(report.entries[0].attr("MODDATE"), Some(&json!("1970-01-01 00:00:05")));
}

#[test]
fn every_attribute_record_yields_one_entry() {
    let transport = county(
        json!([{ "PPI": "A", "MODDATE": 1000 }]),
        json!([
            { "PPI": "A" },
            { "PPI": "A" },
            { "Schedule": 77 },
            { "PPI": "Z", "MODDATE": 999999 }
        ]),
    );

    let report = expect_report(Pipeline::new(&transport, 1).run(window()).unwrap());

    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.summary.resolved, 2);
    assert_eq!(report.summary.unresolved, 2);
    // The upstream MODDATE on an attribute row is replaced, never trusted.
    let z = report
        .entries
        .iter()
        .find(|e| e.ppi().as_deref() == Some("Z"))
        .unwrap();
    assert_eq!(z.attr("MODDATE"), Some(&json!("N/A")));
}

#[test]
fn duplicate_ppis_take_the_last_date() {
    let transport = county(
        json!([
            { "PPI": "A", "MODDATE": 1000 },
            { "PPI": "B", "MODDATE": 2000 },
            { "PPI": "A", "MODDATE": 9000 }
        ]),
        json!([{ "PPI": "B" }, { "PPI": "A" }]),
    );

    let report = expect_report(Pipeline::new(&transport, 1).run(window()).unwrap());

    assert_eq!(ppis(&report), ["A", "B"]);
    assert_eq!(report.entries[0].modified, ModDate::from_millis(9000));
    assert_eq!(
        transport.last_call_to(ATTRIBUTE_LAYER).unwrap().where_clause,
        "PPI IN ('A','B')"
    );
}

#[test]
fn invalid_dates_are_kept_distinct_from_missing() {
    let transport = county(
        json!([
            { "PPI": "bad", "MODDATE": "garbage" },
            { "PPI": "none", "MODDATE": null },
            { "PPI": "ok", "MODDATE": 86_400_000 }
        ]),
        json!([{ "PPI": "bad" }, { "PPI": "none" }, { "PPI": "ok" }]),
    );

    let report = expect_report(Pipeline::new(&transport, 1).run(window()).unwrap());

    assert_eq!(ppis(&report), ["ok", "bad", "none"]);
    assert_eq!(report.entries[1].attr("MODDATE"), Some(&json!("Invalid Date")));
    assert_eq!(report.entries[2].attr("MODDATE"), Some(&json!("N/A")));
    // Both had a log entry, so both count as resolved joins.
    assert_eq!(report.summary.resolved, 3);
}

#[test]
fn rows_without_ppi_are_skipped() {
    let transport = county(json!([{ "MODDATE": 1000 }, { "PPI": null }]), json!([]));

    let outcome = Pipeline::new(&transport, 1).run(window()).unwrap();

    assert!(matches!(outcome, PipelineOutcome::NothingToReport { .. }));
    assert_eq!(transport.calls_to(ATTRIBUTE_LAYER), 0);
}

#[test]
fn unreachable_primary_stage_is_reported_as_transport_failure() {
    let transport =
        MockTransport::new(|_| Err(GisError::Unreachable("connection refused".into())));

    let err = Pipeline::new(&transport, 1).run(window()).unwrap_err();

    assert_eq!(err.stage, Stage::Modifications);
    assert!(err.source.is_transport());
    assert!(err.to_string().contains("modification-log fetch"));
    assert_eq!(transport.calls_to(ATTRIBUTE_LAYER), 0);
}

#[test]
fn service_error_in_enrichment_is_not_a_transport_failure() {
    let transport = MockTransport::new(|q| match q.layer {
        MODIFICATION_LAYER => respond(json!([{ "PPI": "A", "MODDATE": 1 }])),
        _ => Ok(serde_json::from_str(
            r#"{ "error": { "code": 400, "message": "Invalid query" } }"#,
        )
        .unwrap()),
    });

    let err = Pipeline::new(&transport, 1).run(window()).unwrap_err();

    assert_eq!(err.stage, Stage::Attributes);
    assert!(!err.source.is_transport());
    assert!(matches!(err.source, GisError::Service { code: 400, .. }));
}

#[test]
fn http_status_failure_names_the_stage() {
    let transport = MockTransport::new(|q| match q.layer {
        MODIFICATION_LAYER => respond(json!([{ "PPI": "A", "MODDATE": 1 }])),
        _ => Err(GisError::Status {
            status: 502,
            body: "Bad Gateway".into(),
        }),
    });

    let err = Pipeline::new(&transport, 1).run(window()).unwrap_err();

    assert_eq!(err.stage, Stage::Attributes);
    assert!(err.source.is_transport());
    assert!(err.to_string().contains("attribute enrichment"));
}

#[test]
fn primary_stage_hands_back_raw_rows_before_enrichment() {
    let transport = county(
        json!([{ "PPI": "A", "MODDATE": 1, "OPERATOR": "jdoe" }]),
        json!([{ "PPI": "A" }]),
    );
    let pipeline = Pipeline::new(&transport, 1);

    let fetched = pipeline.fetch_modifications(window()).unwrap();

    assert_eq!(fetched.rows().len(), 1);
    assert_eq!(fetched.rows()[0].attributes["OPERATOR"], "jdoe");
    assert_eq!(transport.calls_to(ATTRIBUTE_LAYER), 0);

    let report = expect_report(pipeline.finish(fetched).unwrap());
    assert_eq!(ppis(&report), ["A"]);
    assert_eq!(transport.calls_to(ATTRIBUTE_LAYER), 1);
}

#[test]
fn nothing_to_report_carries_the_window() {
    let transport = county(json!([]), json!([]));

    match Pipeline::new(&transport, 1).run(window()).unwrap() {
        PipelineOutcome::NothingToReport { window: w } => assert_eq!(w, window()),
        PipelineOutcome::Report(_) => panic!("expected nothing to report"),
    }
}
