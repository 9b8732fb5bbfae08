use super::{Harness, SuiteError, login};
use crate::api_client::{ApiClient, ApiRequest, ApiResponse};
use crate::domain::{
    DateRange, InventoryCheck, LeaseProductDraft, LeaseProductFilter, LeaseProductUpdate,
    Pagination, Service, generate_unique_code,
};
use crate::endpoints::{ADMIN_LEASE_PRODUCTS, LEASE_PRODUCT_INVENTORY_CHECK, LEASE_PRODUCTS, item};

/// Inventory is checked for a window starting this many days from today.
pub(super) const INVENTORY_START_OFFSET_DAYS: u64 = 40;
pub(super) const INVENTORY_WINDOW_DAYS: u64 = 10;
pub(super) const INVENTORY_QUANTITY: i64 = 2;

/// Returns the new product's `data.id`.
#[tracing::instrument(name = "Creating lease product", skip(client, draft), fields(code = %draft.product_code))]
pub(super) async fn create_lease_product(
    client: &ApiClient,
    draft: &LeaseProductDraft,
) -> Option<i64> {
    client.reporter().section("🏗️ Create lease product");
    let response = client
        .call(ApiRequest::post(ADMIN_LEASE_PRODUCTS).json(draft))
        .await;
    match response.i64_at("/data/id") {
        Some(id) => {
            client
                .reporter()
                .success(format!("Lease product created, ID: {}", id));
            Some(id)
        }
        None => {
            client.reporter().failure("Lease product creation failed");
            None
        }
    }
}

pub(super) async fn list_lease_products(
    client: &ApiClient,
    query: impl serde::Serialize,
) -> ApiResponse {
    client.reporter().section("📋 List lease products");
    client
        .call(ApiRequest::get(LEASE_PRODUCTS).query(query))
        .await
}

pub(super) async fn lease_product_detail(client: &ApiClient, code: &str) -> ApiResponse {
    client
        .reporter()
        .section(format!("🔍 Lease product detail - {}", code));
    client.call(ApiRequest::get(item(LEASE_PRODUCTS, code))).await
}

pub(super) async fn update_lease_product(
    client: &ApiClient,
    code: &str,
    update: &LeaseProductUpdate,
) -> ApiResponse {
    client
        .reporter()
        .section(format!("✏️ Update lease product - {}", code));
    client
        .call(ApiRequest::put(item(ADMIN_LEASE_PRODUCTS, code)).json(update))
        .await
}

pub(super) async fn check_inventory(client: &ApiClient, check: &InventoryCheck) -> ApiResponse {
    client.reporter().section("📦 Check inventory availability");
    client
        .call(ApiRequest::post(LEASE_PRODUCT_INVENTORY_CHECK).json(check))
        .await
}

pub(super) async fn delete_lease_product(client: &ApiClient, code: &str) -> ApiResponse {
    client
        .reporter()
        .section(format!("🗑️ Delete lease product - {}", code));
    client
        .call(ApiRequest::delete(item(ADMIN_LEASE_PRODUCTS, code)))
        .await
}

/// Create, inspect, update and delete a lease product as the administrator.
#[tracing::instrument(name = "Running lease product suite", skip(harness))]
pub async fn run_lease_product_suite(harness: &Harness) -> Result<(), SuiteError> {
    let reporter = harness.reporter();
    let pacer = harness.pacer();
    let settings = harness.settings();
    reporter.stage(format!(
        "🌟 Lease product service (leaseproduct)\n🔍 Address: {}",
        settings.services.leaseproduct
    ));

    let admin = settings
        .accounts
        .admin()
        .ok_or(SuiteError::MissingAccount("back-office administrator"))?;
    let mut oauser = harness.client(Service::OaUser)?;
    if !login(&mut oauser, admin).await {
        reporter.failure("Could not obtain an administrator token, aborting");
        return Err(SuiteError::step("Administrator login"));
    }

    let mut client = harness.client(Service::LeaseProduct)?;
    if let Some(token) = oauser.token() {
        client.set_token(token.clone());
    }

    reporter.line("\n🔸 Step 1: create lease product");
    let code = generate_unique_code("LP");
    let draft = LeaseProductDraft::fixture().with_code(&code);
    if create_lease_product(&client, &draft).await.is_none() {
        reporter.failure("Product creation failed, skipping the remaining steps");
        return Err(SuiteError::step("Lease product creation"));
    }
    pacer.between_requests().await;

    reporter.line("\n🔸 Step 2: list products");
    list_lease_products(&client, Pagination::default()).await;
    pacer.between_requests().await;

    reporter.line("\n🔸 Step 3: product detail");
    lease_product_detail(&client, &code).await;
    pacer.between_requests().await;

    reporter.line("\n🔸 Step 4: update product");
    update_lease_product(&client, &code, &LeaseProductUpdate::fixture()).await;
    pacer.between_requests().await;

    reporter.line("\n🔸 Step 5: check inventory availability");
    let window = DateRange::from_today(INVENTORY_START_OFFSET_DAYS, INVENTORY_WINDOW_DAYS);
    check_inventory(&client, &InventoryCheck::new(&code, INVENTORY_QUANTITY, window)).await;
    pacer.between_requests().await;

    reporter.line("\n🔸 Step 6: filtered listing");
    list_lease_products(&client, LeaseProductFilter::fixture()).await;
    pacer.between_requests().await;

    reporter.line("\n🔸 Step 7: delete product");
    delete_lease_product(&client, &code).await;

    reporter.line(format!("\n{}", "=".repeat(60)));
    reporter.success("Lease product service tests finished!");
    reporter.rule();
    Ok(())
}
