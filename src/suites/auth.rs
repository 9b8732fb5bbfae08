use crate::api_client::{ApiClient, ApiRequest, ApiResponse};
use crate::domain::TestAccount;
use crate::endpoints::{AUTH_LOGIN, AUTH_LOGOUT, AUTH_PASSWORD, AUTH_REGISTER};
use secrecy::Secret;
use serde_json::Value;

/// Phrases the user services answer with when a phone is already registered.
const ALREADY_REGISTERED: [&str; 2] = ["用户已存在", "already exists"];

#[tracing::instrument(
    name = "Logging in",
    skip(client, account),
    fields(service = %client.service_name(), phone = %account.phone)
)]
pub async fn login(client: &mut ApiClient, account: &TestAccount) -> bool {
    client
        .reporter()
        .section(format!("🔐 Login - {}", account.phone));
    let response = client
        .call(ApiRequest::post(AUTH_LOGIN).json(account.login_request()))
        .await;
    if adopt_token(client, &response) {
        client.reporter().success("Logged in, token set");
        true
    } else {
        client.reporter().failure("Login failed");
        false
    }
}

/// Register `account`, or log in when the phone is already taken.
#[tracing::instrument(
    name = "Registering or logging in",
    skip(client, account),
    fields(service = %client.service_name(), phone = %account.phone)
)]
pub async fn register_or_login(client: &mut ApiClient, account: &TestAccount) -> bool {
    let reporter = client.reporter().clone();
    reporter.section(format!("🔐 Register or login - {}", account.phone));
    let response = client
        .call(ApiRequest::post(AUTH_REGISTER).json(account.register_request()))
        .await;
    if adopt_token(client, &response) {
        reporter.success("Registered, token set");
        return true;
    }
    if ALREADY_REGISTERED
        .iter()
        .any(|phrase| response.mentions(phrase))
    {
        reporter.info("User already exists, logging in...");
        return login(client, account).await;
    }
    reporter.failure(format!("Registration failed: {}", response.body()));
    false
}

#[tracing::instrument(name = "Logging out", skip(client), fields(service = %client.service_name()))]
pub async fn logout(client: &mut ApiClient) -> ApiResponse {
    client.reporter().section("🚪 Logout");
    let response = client.call(ApiRequest::post(AUTH_LOGOUT)).await;
    client.clear_token();
    response
}

#[tracing::instrument(
    name = "Changing password",
    skip(client, account, new_password),
    fields(service = %client.service_name(), phone = %account.phone)
)]
pub async fn change_password(
    client: &ApiClient,
    account: &TestAccount,
    new_password: &Secret<String>,
) -> ApiResponse {
    client
        .reporter()
        .section(format!("🔑 Change password - {}", account.phone));
    client
        .call(ApiRequest::post(AUTH_PASSWORD).json(account.change_password_request(new_password)))
        .await
}

fn adopt_token(client: &mut ApiClient, response: &ApiResponse) -> bool {
    match response.get("token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => {
            client.set_token(Secret::new(token.to_string()));
            true
        }
        _ => false,
    }
}
