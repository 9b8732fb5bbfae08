//! End-to-end pass over all six services.
//!
//! Setup signs in an administrator and a consumer and makes sure one lease
//! and one loan product exist. The phases after it only use what setup put
//! into the [`RunState`].

use super::lease_products::{
    INVENTORY_QUANTITY, INVENTORY_START_OFFSET_DAYS, INVENTORY_WINDOW_DAYS, check_inventory,
    delete_lease_product, lease_product_detail, list_lease_products, update_lease_product,
};
use super::{Harness, SuiteError, fetch_user_info, logout, register_or_login, update_user_info, update_user_status};
use crate::api_client::{ApiClient, ApiRequest, ApiResponse};
use crate::domain::{
    CancelRequest, DateRange, InventoryCheck, LeaseApplicationDraft, LeaseApplicationUpdate,
    LeaseApproval, LeaseProductDraft, LeaseProductUpdate, LoanApplicationDraft,
    LoanApplicationUpdate, LoanApproval, LoanProductDraft, LoanProductUpdate,
    PRODUCT_STATUS_ACTIVE, Pagination, ProductStatusUpdate, Service, UserStatus,
    consumer_profile_update, generate_unique_code,
};
use crate::endpoints::{
    ADMIN_LEASE_APPLICATIONS, ADMIN_LEASE_PRODUCTS, ADMIN_LOAN_APPLICATIONS, ADMIN_LOAN_PRODUCTS,
    LEASE_APPLICATIONS, LEASE_PRODUCTS, LOAN_APPLICATIONS, LOAN_PRODUCTS, item, item_action,
};
use crate::run_state::{ProductRef, RunState};
use secrecy::Secret;
use serde::Serialize;
use serde_json::{Value, json};

/// How many listed products setup looks through before creating its own.
const PRODUCT_SCAN_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullRunOptions {
    /// Delete the products setup prepared once the run is over.
    pub cleanup: bool,
}

struct ProductRoutes {
    kind: &'static str,
    code_prefix: &'static str,
    list: &'static str,
    admin: &'static str,
}

const LEASE_PRODUCT_ROUTES: ProductRoutes = ProductRoutes {
    kind: "lease",
    code_prefix: "LP",
    list: LEASE_PRODUCTS,
    admin: ADMIN_LEASE_PRODUCTS,
};

const LOAN_PRODUCT_ROUTES: ProductRoutes = ProductRoutes {
    kind: "loan",
    code_prefix: "LN",
    list: LOAN_PRODUCTS,
    admin: ADMIN_LOAN_PRODUCTS,
};

#[tracing::instrument(name = "Running all modules", skip(harness))]
pub async fn run_all_modules(harness: &Harness, options: FullRunOptions) -> Result<(), SuiteError> {
    let reporter = harness.reporter();
    let pacer = harness.pacer();
    reporter.line("🚀 Starting the full API test run");
    reporter.line("Make sure the services under test are running:");
    for service in Service::ALL {
        reporter.line(format!(
            "- {} service: {}",
            service.key(),
            harness.settings().services.base_url(service)
        ));
    }

    let mut state = RunState::default();
    if let Err(e) = setup(harness, &mut state).await {
        reporter.failure("Setup failed, stopping the run");
        return Err(e);
    }

    exercise_user_services(harness, &state).await?;
    pacer.between_phases().await;

    exercise_product_services(harness, &state).await?;
    pacer.between_phases().await;

    let mut failed = Vec::new();
    if let Err(e) = exercise_lease_business(harness, &mut state).await {
        reporter.failure(format!("Lease business flow stopped: {}", e));
        failed.push("lease business".to_string());
    }
    pacer.between_phases().await;
    if let Err(e) = exercise_loan_business(harness, &mut state).await {
        reporter.failure(format!("Loan business flow stopped: {}", e));
        failed.push("loan business".to_string());
    }
    if failed.is_empty() {
        reporter.line("\n✅ All business flows passed");
    }

    if options.cleanup {
        cleanup(harness, &state).await?;
    }

    state.report(reporter);
    if !failed.is_empty() {
        return Err(SuiteError::PhasesFailed(failed));
    }
    reporter.line(format!("\n{}", "=".repeat(60)));
    reporter.line("🎉 All tests finished!");
    reporter.rule();
    Ok(())
}

/// Sign in both sides and make sure a lease and a loan product are available.
#[tracing::instrument(name = "Preparing test data", skip(harness, state))]
async fn setup(harness: &Harness, state: &mut RunState) -> Result<(), SuiteError> {
    let reporter = harness.reporter();
    let accounts = &harness.settings().accounts;
    reporter.stage("🏗️ Setup: preparing test data");

    let admin = accounts
        .admin()
        .ok_or(SuiteError::MissingAccount("back-office administrator"))?;
    let mut admin_client = harness.client(Service::OaUser)?;
    if !register_or_login(&mut admin_client, admin).await {
        reporter.failure("Administrator login failed");
        return Err(SuiteError::step("Administrator login"));
    }
    let admin_token = admin_client
        .token()
        .cloned()
        .ok_or_else(|| SuiteError::step("Administrator login"))?;
    state.admin_token = Some(admin_token.clone());

    let mut user_client = harness.client(Service::AppUser)?;
    if !register_or_login(&mut user_client, &accounts.app_user).await {
        reporter.failure("Consumer login failed");
        return Err(SuiteError::step("Consumer login"));
    }
    reporter.success("Consumer logged in");
    state.user_token = user_client.token().cloned();

    reporter.section("🏗️ Preparing lease product");
    let lease_client = authorized(harness, Service::LeaseProduct, Some(&admin_token))?;
    let lease_product = prepare_product(&lease_client, &LEASE_PRODUCT_ROUTES, |code| {
        LeaseProductDraft::fixture().with_code(code)
    })
    .await?;
    state.lease_product = Some(lease_product);

    reporter.section("🏗️ Preparing loan product");
    let loan_client = authorized(harness, Service::LoanProduct, Some(&admin_token))?;
    let loan_product = prepare_product(&loan_client, &LOAN_PRODUCT_ROUTES, |code| {
        LoanProductDraft::fixture().with_code(code)
    })
    .await?;
    state.loan_product = Some(loan_product);

    reporter.line("\n🎉 Setup complete!");
    Ok(())
}

/// Reuse the first listed active product, or create one with a fresh code.
async fn prepare_product<D: Serialize>(
    client: &ApiClient,
    routes: &ProductRoutes,
    draft: impl FnOnce(&str) -> D,
) -> Result<ProductRef, SuiteError> {
    let reporter = client.reporter();
    let listed = client
        .call(ApiRequest::get(routes.list).query(Pagination::first(PRODUCT_SCAN_PAGE_SIZE)))
        .await;
    if let Some(product) = find_active_product(&listed) {
        reporter.success(format!(
            "Reusing existing {} product, ID: {}, code: {}",
            routes.kind, product.id, product.code
        ));
        return Ok(product);
    }

    let code = generate_unique_code(routes.code_prefix);
    let created = client
        .call(ApiRequest::post(routes.admin).json(draft(&code)))
        .await;
    match created.i64_at("/data/id") {
        Some(id) => {
            reporter.success(format!(
                "{} product created, ID: {}, code: {}",
                capitalize(routes.kind),
                id,
                code
            ));
            Ok(ProductRef { id, code })
        }
        None => {
            reporter.failure(format!("{} product creation failed", capitalize(routes.kind)));
            Err(SuiteError::step(format!("Creating {} product", routes.kind)))
        }
    }
}

/// First entry of `list` with `status == 1` that carries an id and a code.
fn find_active_product(response: &ApiResponse) -> Option<ProductRef> {
    response
        .get("list")?
        .as_array()?
        .iter()
        .filter(|product| product.get("status").and_then(Value::as_i64) == Some(PRODUCT_STATUS_ACTIVE))
        .find_map(|product| {
            Some(ProductRef {
                id: product.get("id")?.as_i64()?,
                code: product.get("product_code")?.as_str()?.to_string(),
            })
        })
}

#[tracing::instrument(name = "Exercising user services", skip(harness, state))]
async fn exercise_user_services(harness: &Harness, state: &RunState) -> Result<(), SuiteError> {
    let reporter = harness.reporter();
    let pacer = harness.pacer();
    let accounts = &harness.settings().accounts;
    reporter.stage("🌟 Phase 1: user services");

    reporter.subsection("Consumer user service (appuser)");
    let client = authorized(harness, Service::AppUser, state.user_token.as_ref())?;
    let info = fetch_user_info(&client, &accounts.app_user).await;
    pacer.between_requests().await;
    if let Some(update) = info.get("user_info").and_then(consumer_profile_update) {
        update_user_info(&client, &update).await;
        pacer.between_requests().await;
    }

    reporter.subsection("Back-office user service (oauser)");
    for account in &accounts.oa_users {
        let mut client = harness.client(Service::OaUser)?;
        if !register_or_login(&mut client, account).await {
            continue;
        }
        pacer.between_requests().await;
        fetch_user_info(&client, account).await;
        pacer.between_requests().await;
        update_user_status(&client, account, UserStatus::Normal).await;
        pacer.between_requests().await;
        logout(&mut client).await;
        pacer.between_requests().await;
    }
    Ok(())
}

#[tracing::instrument(name = "Exercising product services", skip(harness, state))]
async fn exercise_product_services(harness: &Harness, state: &RunState) -> Result<(), SuiteError> {
    let reporter = harness.reporter();
    let pacer = harness.pacer();
    reporter.stage("🌟 Phase 2: product management services");

    reporter.subsection("Lease product service (leaseproduct)");
    let client = authorized(harness, Service::LeaseProduct, state.admin_token.as_ref())?;
    list_lease_products(&client, Pagination::default()).await;
    pacer.between_requests().await;
    if let Some(product) = &state.lease_product {
        lease_product_detail(&client, &product.code).await;
        pacer.between_requests().await;
        // The product is kept for the business phases, only the update is exercised.
        update_lease_product(&client, &product.code, &LeaseProductUpdate::fixture()).await;
        pacer.between_requests().await;
        let window = DateRange::from_today(INVENTORY_START_OFFSET_DAYS, INVENTORY_WINDOW_DAYS);
        check_inventory(&client, &InventoryCheck::new(&product.code, INVENTORY_QUANTITY, window)).await;
        pacer.between_requests().await;
    }

    reporter.subsection("Loan product service (loanproduct)");
    let client = authorized(harness, Service::LoanProduct, state.admin_token.as_ref())?;
    reporter.section("📋 List loan products");
    client
        .call(ApiRequest::get(LOAN_PRODUCTS).query(Pagination::default()))
        .await;
    pacer.between_requests().await;
    if let Some(product) = &state.loan_product {
        reporter.section(format!("🔍 Loan product detail - {}", product.id));
        client.call(ApiRequest::get(item(LOAN_PRODUCTS, product.id))).await;
        pacer.between_requests().await;

        reporter.section(format!("✏️ Update loan product - {}", product.id));
        client
            .call(ApiRequest::put(item(ADMIN_LOAN_PRODUCTS, product.id)).json(LoanProductUpdate::fixture()))
            .await;
        pacer.between_requests().await;

        reporter.section(format!("🔄 Update loan product status - {}", product.id));
        client
            .call(
                ApiRequest::put(item_action(ADMIN_LOAN_PRODUCTS, product.id, "status"))
                    .json(ProductStatusUpdate { status: PRODUCT_STATUS_ACTIVE }),
            )
            .await;
        pacer.between_requests().await;
    }
    Ok(())
}

/// Paths and payloads of one application flow (lease or loan).
struct ApplicationFlow<D, U, A> {
    kind: &'static str,
    service: Service,
    applications: &'static str,
    admin_applications: &'static str,
    cancel_draft: D,
    approve_draft: D,
    update: U,
    approval: A,
}

/// Identifiers the flow produced; filled in as far as the flow got.
#[derive(Default)]
struct FlowIds {
    for_cancel: Option<String>,
    for_approve: Option<String>,
}

impl<D: Serialize, U: Serialize, A: Serialize> ApplicationFlow<D, U, A> {
    /// Cancel flow, then approve flow. Stops at the first application that
    /// could not be created.
    async fn run(
        &self,
        harness: &Harness,
        state: &RunState,
        ids: &mut FlowIds,
    ) -> Result<(), SuiteError> {
        let reporter = harness.reporter();
        let pacer = harness.pacer();
        let client = authorized(harness, self.service, state.user_token.as_ref())?;

        let for_cancel = self
            .create(&client, &self.cancel_draft, "cancel flow")
            .await?;
        ids.for_cancel = Some(for_cancel.clone());
        pacer.between_requests().await;

        reporter.section(format!("❌ Cancel {} application - {}", self.kind, for_cancel));
        let cancelled = client
            .call(
                ApiRequest::post(item_action(self.applications, &for_cancel, "cancel"))
                    .json(CancelRequest::fixture()),
            )
            .await;
        if !cancelled.is_failed() {
            reporter.success("Cancel request completed");
        }
        pacer.between_requests().await;

        let for_approve = self
            .create(&client, &self.approve_draft, "approval flow")
            .await?;
        ids.for_approve = Some(for_approve.clone());
        pacer.between_requests().await;

        reporter.section(format!("📋 My {} applications", self.kind));
        client
            .call(ApiRequest::get(self.applications).query(Pagination::default()))
            .await;
        pacer.between_requests().await;

        reporter.section(format!("🔍 {} application detail - {}", capitalize(self.kind), for_approve));
        client
            .call(ApiRequest::get(item(self.applications, &for_approve)))
            .await;
        pacer.between_requests().await;

        reporter.section(format!("✏️ Update {} application - {}", self.kind, for_approve));
        client
            .call(ApiRequest::put(item(self.applications, &for_approve)).json(&self.update))
            .await;
        pacer.between_requests().await;

        let admin = authorized(harness, self.service, state.admin_token.as_ref())?;
        reporter.section(format!("👨‍💼 All {} applications (admin)", self.kind));
        admin
            .call(ApiRequest::get(self.admin_applications).query(Pagination::default()))
            .await;
        pacer.between_requests().await;

        reporter.section(format!("✅ Approve {} application - {}", self.kind, for_approve));
        admin
            .call(
                ApiRequest::post(item_action(self.admin_applications, &for_approve, "approve"))
                    .json(&self.approval),
            )
            .await;
        pacer.between_requests().await;

        reporter.section(format!("🔍 {} application detail (admin) - {}", capitalize(self.kind), for_approve));
        admin
            .call(ApiRequest::get(item(self.admin_applications, &for_approve)))
            .await;
        pacer.between_requests().await;

        reporter.section(format!("📜 {} approval history - {}", capitalize(self.kind), for_approve));
        admin
            .call(
                ApiRequest::get(item_action(self.admin_applications, &for_approve, "approvals"))
                    .query(json!({ "application_id": for_approve })),
            )
            .await;
        pacer.between_requests().await;
        Ok(())
    }

    async fn create(&self, client: &ApiClient, draft: &D, purpose: &str) -> Result<String, SuiteError> {
        let reporter = client.reporter();
        reporter.section(format!("📝 Create {} application ({})", self.kind, purpose));
        let response = client
            .call(ApiRequest::post(self.applications).json(draft))
            .await;
        match response.text_at("/application_id") {
            Some(id) => {
                reporter.success(format!("{} application created, ID: {}", capitalize(self.kind), id));
                Ok(id)
            }
            None => {
                reporter.failure(format!("{} application creation failed", capitalize(self.kind)));
                Err(SuiteError::step(format!("Creating {} application for the {}", self.kind, purpose)))
            }
        }
    }
}

#[tracing::instrument(name = "Exercising lease business", skip(harness, state))]
async fn exercise_lease_business(harness: &Harness, state: &mut RunState) -> Result<(), SuiteError> {
    harness.reporter().stage("🌟 Phase 3: lease business flow");
    let product = state
        .lease_product
        .clone()
        .ok_or_else(|| SuiteError::step("Lease product preparation"))?;
    let approve_draft =
        LeaseApplicationDraft::fixture(product.id, &product.code, "测试租赁申请（待审批）");
    let flow = ApplicationFlow {
        kind: "lease",
        service: Service::Lease,
        applications: LEASE_APPLICATIONS,
        admin_applications: ADMIN_LEASE_APPLICATIONS,
        cancel_draft: LeaseApplicationDraft::fixture(product.id, &product.code, "测试租赁申请（待取消）"),
        approval: LeaseApproval::approve(&approve_draft),
        approve_draft,
        update: LeaseApplicationUpdate::fixture(),
    };

    let mut ids = FlowIds::default();
    let outcome = flow.run(harness, state, &mut ids).await;
    state.lease_application_for_cancel = ids.for_cancel;
    state.lease_application_for_approve = ids.for_approve;
    outcome
}

#[tracing::instrument(name = "Exercising loan business", skip(harness, state))]
async fn exercise_loan_business(harness: &Harness, state: &mut RunState) -> Result<(), SuiteError> {
    harness.reporter().stage("🌟 Phase 4: loan business flow");
    let product = state
        .loan_product
        .clone()
        .ok_or_else(|| SuiteError::step("Loan product preparation"))?;
    let approve_draft = LoanApplicationDraft::fixture(product.id, "测试贷款申请（待审批）");
    let flow = ApplicationFlow {
        kind: "loan",
        service: Service::Loan,
        applications: LOAN_APPLICATIONS,
        admin_applications: ADMIN_LOAN_APPLICATIONS,
        cancel_draft: LoanApplicationDraft::fixture(product.id, "测试贷款申请（待取消）"),
        approval: LoanApproval::approve(&approve_draft),
        approve_draft,
        update: LoanApplicationUpdate::fixture(),
    };

    let mut ids = FlowIds::default();
    let outcome = flow.run(harness, state, &mut ids).await;
    state.loan_application_for_cancel = ids.for_cancel;
    state.loan_application_for_approve = ids.for_approve;
    outcome
}

#[tracing::instrument(name = "Cleaning up test data", skip(harness, state))]
async fn cleanup(harness: &Harness, state: &RunState) -> Result<(), SuiteError> {
    let reporter = harness.reporter();
    reporter.stage("🧹 Cleaning up test data");
    let Some(admin_token) = state.admin_token.as_ref() else {
        reporter.warning("No administrator token, nothing to clean up");
        return Ok(());
    };

    if let Some(product) = &state.lease_product {
        let client = authorized(harness, Service::LeaseProduct, Some(admin_token))?;
        delete_lease_product(&client, &product.code).await;
        reporter.success(format!("Removed lease product {}", product.code));
    }
    if let Some(product) = &state.loan_product {
        let client = authorized(harness, Service::LoanProduct, Some(admin_token))?;
        reporter.section(format!("🗑️ Delete loan product - {}", product.id));
        client
            .call(ApiRequest::delete(item(ADMIN_LOAN_PRODUCTS, product.id)))
            .await;
        reporter.success(format!("Removed loan product {}", product.id));
    }
    Ok(())
}

/// Client for `service` carrying `token` when there is one.
fn authorized(
    harness: &Harness,
    service: Service,
    token: Option<&Secret<String>>,
) -> Result<ApiClient, SuiteError> {
    let mut client = harness.client(service)?;
    if let Some(token) = token {
        client.set_token(token.clone());
    }
    Ok(client)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
