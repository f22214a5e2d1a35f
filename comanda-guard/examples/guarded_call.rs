//! Comanda 守护管线演示
//!
//! 场景：
//! 1. **Mesero 下单**：权限 + 本公司作用域，放行并产生审计记录。
//! 2. **Cajero 调库存**：权限不足，用策略里配置的文案拒绝。
//! 3. **Admin 跨公司**：公司作用域拒绝。
//! 4. **SUPER_ADMIN 跨公司**：全局放行。
//!
//! 审计记录通过 `TracingAuditSink` 打到 target = "audit" 的日志里，
//! 拒绝还会出现在 target = "security" 的日志里。
//!
//! 运行：`cargo run -p comanda-guard --example guarded_call`

use std::sync::Arc;

use serde_json::json;

use comanda_guard::authz::registry::{MANAGE_INVENTORY, MANAGE_ORDERS};
use comanda_guard::{
    AuditPolicy, CompanyScopePolicy, Gatekeeper, GuardConfig, OperationParams, OperationPolicy,
    Principal, Role, TracingAuditSink,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let gatekeeper = Gatekeeper::new(GuardConfig::default(), Arc::new(TracingAuditSink));

    let create_order = OperationPolicy::new()
        .require(MANAGE_ORDERS)
        .with_company_scope(CompanyScopePolicy::new().bound_to("company_id"))
        .with_audit(
            AuditPolicy::new("CREATE", "Order")
                .describe("Create a new order")
                .with_parameters(),
        );

    let adjust_stock = OperationPolicy::new()
        .require(MANAGE_INVENTORY)
        .with_denial_message("Solo gerencia puede ajustar inventario")
        .with_audit(AuditPolicy::new("ADJUST", "Inventory"));

    println!("--- 场景 1：Mesero 下单（放行）---");
    let mesero = Principal::new("emp-7", Role::Mesero, 5);
    let result = gatekeeper
        .execute(
            &mesero,
            &create_order,
            OperationParams::new()
                .with("company_id", json!(5))
                .with("table", json!("T3")),
            || async { Ok("order-301".to_string()) },
        )
        .await;
    match result {
        Ok(order) => println!("✅ 下单成功：{}", order),
        Err(e) => println!("❌ 意外拒绝：{}", e),
    }

    println!("\n--- 场景 2：Cajero 调库存（权限拒绝）---");
    let cajero = Principal::new("emp-2", Role::Cajero, 5);
    let result = gatekeeper
        .execute(&cajero, &adjust_stock, OperationParams::new(), || async {
            Ok(())
        })
        .await;
    match result {
        Ok(_) => println!("❌ 不应放行！"),
        Err(e) => println!("✅ 已拒绝（code {}）：{}", e.code, e.message),
    }

    println!("\n--- 场景 3：Admin 跨公司（作用域拒绝）---");
    let admin = Principal::new("emp-1", Role::Admin, 5);
    let result = gatekeeper
        .execute(
            &admin,
            &create_order,
            OperationParams::new().with("company_id", json!(9)),
            || async { Ok("order-302".to_string()) },
        )
        .await;
    match result {
        Ok(_) => println!("❌ 不应放行！"),
        Err(e) => println!("✅ 已拒绝（code {}）：{}", e.code, e.message),
    }

    println!("\n--- 场景 4：SUPER_ADMIN 跨公司（全局放行）---");
    let root = Principal::new("root", Role::SuperAdmin, 1);
    let result = gatekeeper
        .execute(
            &root,
            &create_order,
            OperationParams::new().with("company_id", json!(9)),
            || async { Ok("order-303".to_string()) },
        )
        .await;
    match result {
        Ok(order) => println!("✅ 放行：{}", order),
        Err(e) => println!("❌ 意外拒绝：{}", e),
    }

    // 有序关闭，清空审计队列
    gatekeeper.shutdown().await;

    Ok(())
}
