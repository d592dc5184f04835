//! Integration scenarios for the usage accountant: the three calculation
//! modes, billing, explicit saves, ledger summaries, and the HTTP surface.

mod common {
    use std::sync::{Arc, Mutex};

    use aquaaid::engine::store::{StoreError, UsageRecordStore};
    use aquaaid::engine::usage::{UsageRecord, UsageService};

    #[derive(Default)]
    pub(super) struct MemoryUsage {
        rows: Mutex<Vec<UsageRecord>>,
    }

    impl UsageRecordStore for MemoryUsage {
        fn insert(&self, record: UsageRecord) -> Result<UsageRecord, StoreError> {
            self.rows
                .lock()
                .expect("usage mutex poisoned")
                .push(record.clone());
            Ok(record)
        }

        fn list(&self) -> Result<Vec<UsageRecord>, StoreError> {
            Ok(self.rows.lock().expect("usage mutex poisoned").clone())
        }
    }

    pub(super) fn build_service() -> (Arc<UsageService<MemoryUsage>>, Arc<MemoryUsage>) {
        let store = Arc::new(MemoryUsage::default());
        (Arc::new(UsageService::new(store.clone())), store)
    }
}

mod calculations {
    use super::common::*;
    use aquaaid::engine::usage::{
        Activity, CalculationMode, CalculationRequest, UsageServiceError, UsageValidationError,
    };

    #[test]
    fn direct_liters_win_over_the_activity_pair() {
        let (service, _) = build_service();
        let calculation = service
            .calculate(&CalculationRequest {
                liters: Some(20.0),
                activity: Some(Activity::Shower),
                duration_minutes: Some(5.0),
                ..CalculationRequest::default()
            })
            .expect("calculation succeeds");

        assert_eq!(calculation.mode, CalculationMode::Direct);
        assert_eq!(calculation.volume_liters, 20.0);
    }

    #[test]
    fn shower_for_five_minutes_is_forty_five_liters() {
        let (service, _) = build_service();
        let calculation = service
            .calculate(&CalculationRequest {
                activity: Some(Activity::Shower),
                duration_minutes: Some(5.0),
                ..CalculationRequest::default()
            })
            .expect("calculation succeeds");

        assert_eq!(calculation.volume_liters, 45.0);
        assert_eq!(calculation.activity_type, "shower");
        assert_eq!(calculation.duration_minutes, Some(5));
    }

    #[test]
    fn meter_delta_converts_and_bills() {
        let (service, _) = build_service();
        let calculation = service
            .calculate(&CalculationRequest {
                meter_before: Some(1234.567),
                meter_after: Some(1235.123),
                ..CalculationRequest::default()
            })
            .expect("calculation succeeds");

        assert!((calculation.volume_liters - 556.0).abs() < 1e-6);
        assert_eq!(calculation.activity_type, "Meter Reading");

        let bill = calculation.bill.expect("meter mode carries a bill");
        assert!((bill.units_used - 0.556).abs() < 1e-9);
        assert!((bill.total_shillings - 111.2).abs() < 1e-9);
    }

    #[test]
    fn regressed_meter_readings_are_rejected() {
        let (service, _) = build_service();
        let error = service
            .calculate(&CalculationRequest {
                meter_before: Some(10.0),
                meter_after: Some(5.0),
                ..CalculationRequest::default()
            })
            .expect_err("regression rejected");

        assert!(matches!(
            error,
            UsageServiceError::Validation(UsageValidationError::MeterReadingsOutOfOrder)
        ));
        assert_eq!(error.to_string(), "after reading must be ≥ before reading");
    }

    #[test]
    fn monthly_projection_multiplies_by_thirty() {
        let (service, _) = build_service();
        let calculation = service
            .calculate(&CalculationRequest {
                daily_liters: Some(150.0),
                ..CalculationRequest::default()
            })
            .expect("calculation succeeds");

        assert_eq!(calculation.volume_liters, 4500.0);
        assert_eq!(calculation.activity_type, "Monthly Calculation");
    }

    #[test]
    fn mixing_input_groups_is_rejected() {
        let (service, _) = build_service();
        let error = service
            .calculate(&CalculationRequest {
                daily_liters: Some(150.0),
                meter_before: Some(1.0),
                meter_after: Some(2.0),
                ..CalculationRequest::default()
            })
            .expect_err("ambiguous request rejected");

        assert!(matches!(
            error,
            UsageServiceError::Validation(UsageValidationError::AmbiguousInput)
        ));
    }

    #[test]
    fn billing_uses_the_flat_tariff() {
        let (service, _) = build_service();
        let bill = service.bill(1000.0, 1050.0).expect("bill succeeds");
        assert_eq!(bill.units_used, 50.0);
        assert_eq!(bill.total_shillings, 10_000.0);

        let error = service.bill(1050.0, 1000.0).expect_err("regression rejected");
        assert!(matches!(
            error,
            UsageServiceError::Validation(UsageValidationError::BillReadingsOutOfOrder)
        ));
    }
}

mod saving {
    use super::common::*;
    use aquaaid::engine::usage::{
        SaveUsageRequest, UsageServiceError, UsageValidationError,
    };

    #[test]
    fn save_defaults_the_label_to_manual_entry() {
        let (service, _) = build_service();
        let record = service
            .save(SaveUsageRequest {
                usage_liters: Some(20.0),
                activity_type: None,
                duration_minutes: None,
            })
            .expect("save succeeds");

        assert_eq!(record.usage_liters, 20.0);
        assert_eq!(record.activity_type, "Manual Entry");
        assert_eq!(record.duration_minutes, None);
    }

    #[test]
    fn save_without_a_volume_is_rejected() {
        let (service, store) = build_service();
        let error = service
            .save(SaveUsageRequest::default())
            .expect_err("missing volume rejected");

        assert!(matches!(
            error,
            UsageServiceError::Validation(UsageValidationError::MissingVolume)
        ));
        assert_eq!(error.to_string(), "calculate a water volume before saving");

        use aquaaid::engine::store::UsageRecordStore as _;
        assert!(store.list().expect("list succeeds").is_empty());
    }

    #[test]
    fn zero_volume_counts_as_uncalculated() {
        let (service, _) = build_service();
        let error = service
            .save(SaveUsageRequest {
                usage_liters: Some(0.0),
                activity_type: Some("shower".to_string()),
                duration_minutes: Some(5),
            })
            .expect_err("zero volume rejected");

        assert!(matches!(
            error,
            UsageServiceError::Validation(UsageValidationError::MissingVolume)
        ));
    }

    #[test]
    fn records_come_back_in_insertion_order() {
        let (service, _) = build_service();
        service
            .save(SaveUsageRequest {
                usage_liters: Some(45.0),
                activity_type: Some("shower".to_string()),
                duration_minutes: Some(5),
            })
            .expect("save succeeds");
        service
            .save(SaveUsageRequest {
                usage_liters: Some(556.0),
                activity_type: Some("Meter Reading".to_string()),
                duration_minutes: None,
            })
            .expect("save succeeds");

        let records = service.records().expect("records listed");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].activity_type, "shower");
        assert_eq!(records[1].activity_type, "Meter Reading");
    }
}

mod summaries {
    use super::common::*;
    use aquaaid::engine::usage::{SaveUsageRequest, UsageDataSource, UsageServiceError};

    const LEDGER: &str = "activity_type,usage_liters,duration_minutes\n\
                          shower,45.0,5\n\
                          shower,27.0,3\n\
                          bath,160.0,\n";

    #[test]
    fn csv_summary_totals_match_the_rows() {
        let (service, _) = build_service();
        let (summary, source) = service.summary(Some(LEDGER)).expect("summary succeeds");

        assert_eq!(source, UsageDataSource::Csv);
        assert_eq!(summary.record_count, 3);
        assert_eq!(summary.total_liters, 232.0);
        assert_eq!(summary.cubic_meters, 0.232);
        assert_eq!(summary.by_activity[0].activity_type, "bath");
        assert_eq!(summary.by_activity[1].activity_type, "shower");
        assert_eq!(summary.by_activity[1].record_count, 2);
    }

    #[test]
    fn store_summary_covers_saved_records() {
        let (service, _) = build_service();
        service
            .save(SaveUsageRequest {
                usage_liters: Some(45.0),
                activity_type: Some("shower".to_string()),
                duration_minutes: Some(5),
            })
            .expect("save succeeds");

        let (summary, source) = service.summary(None).expect("summary succeeds");
        assert_eq!(source, UsageDataSource::Store);
        assert_eq!(summary.record_count, 1);
        assert_eq!(summary.total_liters, 45.0);
    }

    #[test]
    fn bad_volume_rows_fail_the_import() {
        let (service, _) = build_service();
        let ledger = "activity_type,usage_liters,duration_minutes\n\
                      shower,0,5\n";
        let error = service
            .summary(Some(ledger))
            .expect_err("zero volume row rejected");

        assert!(matches!(error, UsageServiceError::Ledger(_)));
    }
}

mod routing {
    use super::common::*;
    use aquaaid::engine::usage::usage_router;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn build_router() -> axum::Router {
        let (service, _) = build_service();
        usage_router(service)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("serialize")))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn post_calculation_returns_volume_and_bill() {
        let router = build_router();
        let response = router
            .oneshot(post_json(
                "/api/v1/usage/calculations",
                json!({ "meter_before": 1000.0, "meter_after": 1002.0 }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json_body(response).await;
        assert_eq!(payload["mode"], "meter");
        assert_eq!(payload["volume_liters"], 2000.0);
        assert_eq!(payload["activity_type"], "Meter Reading");
        assert_eq!(payload["bill"]["units_used"], 2.0);
        assert_eq!(payload["bill"]["total_shillings"], 400.0);
    }

    #[tokio::test]
    async fn ambiguous_calculation_returns_422() {
        let router = build_router();
        let response = router
            .oneshot(post_json(
                "/api/v1/usage/calculations",
                json!({ "liters": 10.0, "daily_liters": 150.0 }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let payload = json_body(response).await;
        assert_eq!(
            payload["error"],
            "request mixes calculation modes; provide exactly one input group"
        );
    }

    #[tokio::test]
    async fn saved_records_round_trip_through_the_api() {
        let router = build_router();
        let response = router
            .clone()
            .oneshot(post_json(
                "/api/v1/usage/records",
                json!({ "usage_liters": 45.0, "activity_type": "shower", "duration_minutes": 5 }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/usage/records")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json_body(response).await;
        let records = payload.as_array().expect("array of records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["activity_type"], "shower");
        assert_eq!(records[0]["usage_liters"], 45.0);
    }

    #[tokio::test]
    async fn activities_endpoint_lists_the_rate_table() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/usage/activities")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json_body(response).await;
        let rates = payload.as_array().expect("array of rates");
        assert_eq!(rates.len(), 10);
        assert_eq!(rates[0]["activity"], "shower");
        assert_eq!(rates[0]["liters"], 9.0);
        assert_eq!(rates[0]["unit"], "L/min");
        assert_eq!(rates[1]["activity"], "bath");
        assert_eq!(rates[1]["unit"], "L");
    }

    #[tokio::test]
    async fn summary_endpoint_accepts_an_inline_ledger() {
        let router = build_router();
        let response = router
            .oneshot(post_json(
                "/api/v1/usage/summary",
                json!({
                    "csv": "activity_type,usage_liters,duration_minutes\nshower,45.0,5\n"
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);

        let payload = json_body(response).await;
        assert_eq!(payload["source"], "csv");
        assert_eq!(payload["summary"]["record_count"], 1);
        assert_eq!(payload["summary"]["total_liters"], 45.0);
    }

    #[tokio::test]
    async fn summary_endpoint_rejects_a_bad_ledger() {
        let router = build_router();
        let response = router
            .oneshot(post_json(
                "/api/v1/usage/summary",
                json!({
                    "csv": "activity_type,usage_liters,duration_minutes\nshower,-1,5\n"
                }),
            ))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
