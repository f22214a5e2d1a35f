//! Gatekeeper end-to-end scenarios against an in-memory audit sink.
//!
//! Every test drives the full pipeline (principal, permission, company
//! scope, body, audit) and asserts on the records the sink received
//! after an orderly shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use serde_json::json;

use comanda_guard::authz::registry::{MANAGE_INVENTORY, MANAGE_ORDERS};
use comanda_guard::{
    AppError, AppResult, AuditOutcome, AuditPolicy, CompanyScopePolicy, ErrorCode, Gatekeeper,
    GuardConfig, MemoryAuditSink, OperationParams, OperationPolicy, Principal, Role,
};

fn gatekeeper(sink: Arc<MemoryAuditSink>) -> Gatekeeper {
    Gatekeeper::new(GuardConfig::with_overrides(16, true), sink)
}

/// Order creation: permission + company scope + audit, all declared.
fn order_policy() -> OperationPolicy {
    OperationPolicy::new()
        .require(MANAGE_ORDERS)
        .with_company_scope(CompanyScopePolicy::new().bound_to("company_id"))
        .with_audit(AuditPolicy::new("CREATE", "Order").describe("Create a new order"))
}

#[tokio::test]
async fn test_allowed_operation_runs_body_and_records_success() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let mesero = Principal::new("emp-7", Role::Mesero, 5);

    let executed = Arc::new(AtomicBool::new(false));
    let flag = executed.clone();

    let result = gk
        .execute(
            &mesero,
            &order_policy(),
            OperationParams::new().with("company_id", json!(5)),
            || async move {
                flag.store(true, Ordering::SeqCst);
                Ok("order-301")
            },
        )
        .await;

    assert_eq!(result.expect("mesero in own company must be allowed"), "order-301");
    assert!(executed.load(Ordering::SeqCst));

    gk.shutdown().await;

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action, "CREATE");
    assert_eq!(records[0].entity, "Order");
    assert_eq!(records[0].actor_id.as_deref(), Some("emp-7"));
    assert_eq!(records[0].description, "Create a new order");
    assert_eq!(records[0].outcome, AuditOutcome::Success);
    // Snapshot not requested by the policy
    assert!(records[0].parameters.is_none());
}

#[tokio::test]
async fn test_permission_denied_skips_body_and_records_denial() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let cajero = Principal::new("emp-2", Role::Cajero, 5);

    let policy = OperationPolicy::new()
        .require(MANAGE_INVENTORY)
        .with_audit(AuditPolicy::new("ADJUST", "Inventory"));

    let executed = Arc::new(AtomicBool::new(false));
    let flag = executed.clone();

    let err = gk
        .execute(&cajero, &policy, OperationParams::new(), || async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await
        .expect_err("cajero must not adjust inventory");

    assert_eq!(err.code, ErrorCode::PermissionDenied);
    assert!(!executed.load(Ordering::SeqCst), "body must never run on deny");

    gk.shutdown().await;

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].actor_id.as_deref(), Some("emp-2"));
    match &records[0].outcome {
        AuditOutcome::Denied { reason } => assert_eq!(reason, "Permission denied"),
        other => panic!("expected denied outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_admin_cannot_cross_companies() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let admin = Principal::new("emp-1", Role::Admin, 5);

    let err = gk
        .execute(
            &admin,
            &order_policy(),
            OperationParams::new().with("company_id", json!(9)),
            || async { Ok(()) },
        )
        .await
        .expect_err("admin has no cross-company bypass");

    assert_eq!(err.code, ErrorCode::CompanyScopeDenied);

    gk.shutdown().await;

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    match &records[0].outcome {
        AuditOutcome::Denied { reason } => {
            assert_eq!(reason, "No access to this company's data");
        }
        other => panic!("expected denied outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_super_admin_crosses_companies() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let root = Principal::new("root", Role::SuperAdmin, 1);

    let result = gk
        .execute(
            &root,
            &order_policy(),
            OperationParams::new().with("company_id", json!(9)),
            || async { Ok("ok") },
        )
        .await;

    assert_eq!(result.expect("super admin spans all companies"), "ok");

    gk.shutdown().await;
    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].outcome, AuditOutcome::Success);
}

#[tokio::test]
async fn test_absent_principal_denied_even_without_requirements() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let nobody: Option<Principal> = None;

    let executed = Arc::new(AtomicBool::new(false));
    let flag = executed.clone();

    let err = gk
        .execute(
            &nobody,
            &OperationPolicy::new(),
            OperationParams::new(),
            || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            },
        )
        .await
        .expect_err("an empty requirement set still needs authentication");

    assert_eq!(err.code, ErrorCode::NotAuthenticated);
    assert!(!executed.load(Ordering::SeqCst));

    gk.shutdown().await;
    assert!(sink.is_empty().await, "no audit metadata, no records");
}

#[tokio::test]
async fn test_unauthenticated_audited_attempt_has_no_actor() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let nobody: Option<Principal> = None;

    let policy = OperationPolicy::new()
        .require(MANAGE_ORDERS)
        .with_audit(AuditPolicy::new("CREATE", "Order"));

    let err = gk
        .execute(&nobody, &policy, OperationParams::new(), || async {
            Ok(())
        })
        .await
        .expect_err("anonymous attempt must be denied");

    assert_eq!(err.code, ErrorCode::NotAuthenticated);

    gk.shutdown().await;

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert!(records[0].actor_id.is_none());
    assert!(matches!(records[0].outcome, AuditOutcome::Denied { .. }));
}

#[tokio::test]
async fn test_unresolvable_company_binding_fails_closed() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let admin = Principal::new("emp-1", Role::Admin, 5);

    let executed = Arc::new(AtomicBool::new(false));
    let flag = executed.clone();

    // Policy binds the target to "company_id" but the params don't carry it
    let err = gk
        .execute(
            &admin,
            &order_policy(),
            OperationParams::new().with("table", json!("T1")),
            || async move {
                flag.store(true, Ordering::SeqCst);
                Ok(())
            },
        )
        .await
        .expect_err("unresolvable target must be denied");

    assert_eq!(err.code, ErrorCode::CompanyScopeUnresolved);
    assert!(!executed.load(Ordering::SeqCst));

    gk.shutdown().await;
    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert!(matches!(records[0].outcome, AuditOutcome::Denied { .. }));
}

#[tokio::test]
async fn test_failing_body_propagates_and_records_failure() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let cajero = Principal::new("emp-2", Role::Cajero, 5);

    let policy = OperationPolicy::new()
        .require(MANAGE_ORDERS)
        .with_audit(AuditPolicy::new("SETTLE", "Order"));

    let result: AppResult<()> = gk
        .execute(&cajero, &policy, OperationParams::new(), || async {
            Err(AppError::internal("printer offline"))
        })
        .await;

    let err = result.expect_err("body failure must propagate unchanged");
    assert_eq!(err.code, ErrorCode::InternalError);
    assert_eq!(err.message, "printer offline");

    gk.shutdown().await;

    let records = sink.records().await;
    assert_eq!(records.len(), 1, "exactly one record per attempt");
    match &records[0].outcome {
        AuditOutcome::Failed { error } => assert_eq!(error, "printer offline"),
        other => panic!("expected failed outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn test_no_audit_metadata_means_no_records() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let mesero = Principal::new("emp-7", Role::Mesero, 5);

    let plain = OperationPolicy::new().require(MANAGE_ORDERS);

    // Allowed attempt
    gk.execute(&mesero, &plain, OperationParams::new(), || async { Ok(()) })
        .await
        .expect("mesero manages orders");

    // Denied attempt
    let denied = OperationPolicy::new().require(MANAGE_INVENTORY);
    let err = gk
        .execute(&mesero, &denied, OperationParams::new(), || async { Ok(()) })
        .await
        .expect_err("mesero must not manage inventory");
    assert_eq!(err.code, ErrorCode::PermissionDenied);

    gk.shutdown().await;
    assert!(sink.is_empty().await);
}

#[tokio::test]
async fn test_authenticated_only_policy_allows_any_role() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let cocinero = Principal::new("emp-9", Role::Cocinero, 5);

    let result = gk
        .execute(
            &cocinero,
            &OperationPolicy::new(),
            OperationParams::new(),
            || async { Ok(42) },
        )
        .await;

    assert_eq!(result.expect("authenticated principal suffices"), 42);
    gk.shutdown().await;
}

#[tokio::test]
async fn test_audit_disabled_produces_no_records() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = Gatekeeper::new(GuardConfig::with_overrides(16, false), sink.clone());
    let mesero = Principal::new("emp-7", Role::Mesero, 5);

    gk.execute(
        &mesero,
        &order_policy(),
        OperationParams::new().with("company_id", json!(5)),
        || async { Ok(()) },
    )
    .await
    .expect("call is still allowed with audit disabled");

    gk.shutdown().await;
    assert!(sink.is_empty().await);
}

#[tokio::test]
async fn test_parameter_snapshot_when_requested() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let mesero = Principal::new("emp-7", Role::Mesero, 5);

    let policy = OperationPolicy::new()
        .require(MANAGE_ORDERS)
        .with_audit(AuditPolicy::new("CREATE", "Order").with_parameters());

    gk.execute(
        &mesero,
        &policy,
        OperationParams::new()
            .with("company_id", json!(5))
            .with("table", json!("T3")),
        || async { Ok(()) },
    )
    .await
    .expect("mesero creates an order");

    gk.shutdown().await;

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(
        records[0].parameters,
        Some(json!({ "company_id": 5, "table": "T3" }))
    );
}

#[tokio::test]
async fn test_one_record_per_attempt_in_order() {
    let sink = Arc::new(MemoryAuditSink::new());
    let gk = gatekeeper(sink.clone());
    let counter = Arc::new(AtomicU32::new(0));

    let mesero = Principal::new("emp-7", Role::Mesero, 5);
    let policy = OperationPolicy::new()
        .require(MANAGE_ORDERS)
        .with_audit(AuditPolicy::new("CREATE", "Order"));

    // Attempt 1: allowed
    let c = counter.clone();
    gk.execute(&mesero, &policy, OperationParams::new(), || async move {
        c.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .await
    .expect("first attempt allowed");

    // Attempt 2: denied (cocinero lacks MANAGE_ORDERS)
    let cocinero = Principal::new("emp-9", Role::Cocinero, 5);
    let c = counter.clone();
    let _ = gk
        .execute(&cocinero, &policy, OperationParams::new(), || async move {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .await
        .expect_err("second attempt denied");

    // Attempt 3: body fails
    let result: AppResult<()> = gk
        .execute(&mesero, &policy, OperationParams::new(), || async {
            Err(AppError::internal("boom"))
        })
        .await;
    result.expect_err("third attempt fails in the body");

    assert_eq!(counter.load(Ordering::SeqCst), 1, "only the allowed body ran");

    gk.shutdown().await;

    let records = sink.records().await;
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].outcome, AuditOutcome::Success);
    assert!(matches!(records[1].outcome, AuditOutcome::Denied { .. }));
    assert!(matches!(records[2].outcome, AuditOutcome::Failed { .. }));
}
