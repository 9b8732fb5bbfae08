use super::{Harness, SuiteError, change_password, login, logout, register_or_login};
use crate::api_client::{ApiClient, ApiRequest, ApiResponse};
use crate::domain::{Service, TestAccount, UserStatus, consumer_profile_update, staff_profile_update};
use crate::endpoints::{USER_DELETE, USER_INFO, USER_STATUS};
use serde_json::Value;

#[tracing::instrument(
    name = "Fetching user info",
    skip(client, account),
    fields(service = %client.service_name(), phone = %account.phone)
)]
pub async fn fetch_user_info(client: &ApiClient, account: &TestAccount) -> ApiResponse {
    client
        .reporter()
        .section(format!("👤 Get user info - {}", account.phone));
    client
        .call(ApiRequest::get(USER_INFO).json(account.phone_query()))
        .await
}

#[tracing::instrument(name = "Updating user info", skip(client, update), fields(service = %client.service_name()))]
pub async fn update_user_info(client: &ApiClient, update: &Value) -> ApiResponse {
    client.reporter().section("✏️ Update user info");
    client.call(ApiRequest::put(USER_INFO).json(update)).await
}

#[tracing::instrument(
    name = "Updating user status",
    skip(client, account),
    fields(service = %client.service_name(), phone = %account.phone)
)]
pub async fn update_user_status(
    client: &ApiClient,
    account: &TestAccount,
    status: UserStatus,
) -> ApiResponse {
    client
        .reporter()
        .section(format!("🔄 Update user status - {} -> {}", account.phone, status));
    client
        .call(ApiRequest::put(USER_STATUS).json(account.status_update(status)))
        .await
}

#[tracing::instrument(
    name = "Deleting user",
    skip(client, account),
    fields(service = %client.service_name(), phone = %account.phone)
)]
pub async fn delete_user(client: &ApiClient, account: &TestAccount) -> ApiResponse {
    client
        .reporter()
        .section(format!("🗑️ Delete user - {}", account.phone));
    client
        .call(ApiRequest::post(USER_DELETE).json(account.phone_query()))
        .await
}

/// Consumer then back-office account lifecycles.
#[tracing::instrument(name = "Running user suite", skip(harness))]
pub async fn run_user_suite(harness: &Harness) -> Result<(), SuiteError> {
    let reporter = harness.reporter();
    let accounts = &harness.settings().accounts;

    reporter.stage(
        "🌟 Consumer user service (appuser)\n🔍 No status field and no status management on this side",
    );
    let mut client = harness.client(Service::AppUser)?;
    exercise_lifecycle(harness, &mut client, &accounts.app_user).await;

    harness.pacer().between_phases().await;

    reporter.stage(
        "🌟 Back-office user service (oauser)\n🔍 Status field and status management are supported",
    );
    let mut tested = 0;
    for account in &accounts.oa_users {
        reporter.subsection(format!(
            "Account: {} (role: {})",
            account.phone,
            account.role.as_deref().unwrap_or("-")
        ));
        let mut client = harness.client(Service::OaUser)?;
        if exercise_lifecycle(harness, &mut client, account).await {
            tested += 1;
        }
        reporter.line(format!("\nFinished account {}", account.phone));
        harness.pacer().between_phases().await;
    }
    reporter.success(format!(
        "Back-office user tests finished, {} account(s) exercised",
        tested
    ));
    Ok(())
}

/// Register, inspect, update, rotate the password and finally delete `account`.
///
/// Accounts with a role go through the back-office variant, which adds status
/// management. Returns `false` when the account could not be signed in.
async fn exercise_lifecycle(harness: &Harness, client: &mut ApiClient, account: &TestAccount) -> bool {
    let pacer = harness.pacer();
    let reporter = harness.reporter();
    let is_staff = account.role.is_some();

    if !register_or_login(client, account).await {
        reporter.failure(format!("Could not sign in {}, skipping", account.phone));
        return false;
    }
    pacer.between_requests().await;

    let info = fetch_user_info(client, account).await;
    pacer.between_requests().await;

    let update = info.get("user_info").and_then(|user_info| {
        if is_staff {
            staff_profile_update(user_info, account)
        } else {
            consumer_profile_update(user_info)
        }
    });
    if let Some(update) = update {
        update_user_info(client, &update).await;
        pacer.between_requests().await;
    }

    if is_staff {
        reporter.line("\n🔄 Status management");
        update_user_status(client, account, UserStatus::Disabled).await;
        pacer.between_requests().await;
        update_user_status(client, account, UserStatus::Normal).await;
        pacer.between_requests().await;
    }

    let new_password = account.rotated_password();
    change_password(client, account, &new_password).await;
    pacer.between_requests().await;

    logout(client).await;
    pacer.between_requests().await;

    let rotated = account.with_password(new_password);
    if login(client, &rotated).await {
        pacer.between_requests().await;
        delete_user(client, &rotated).await;
    } else {
        reporter.warning("Login with the new password failed, deleting with the original one");
        if login(client, account).await {
            pacer.between_requests().await;
            delete_user(client, account).await;
        }
    }
    true
}
