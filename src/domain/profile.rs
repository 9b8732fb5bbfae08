//! Profile updates are built from the `user_info` the service just returned,
//! so unknown fields round-trip untouched.

use crate::domain::{TestAccount, UserStatus};
use serde_json::{Map, Value, json};

/// Fields the consumer service does not accept on update.
const CONSUMER_READ_ONLY_FIELDS: [&str; 2] = ["status", "role"];

/// Build the `PUT /api/v1/user/info` body for a consumer account.
///
/// Returns `None` when `user_info` is not a JSON object.
pub fn consumer_profile_update(user_info: &Value) -> Option<Value> {
    let mut info = user_info.as_object()?.clone();
    merge(
        &mut info,
        json!({
            "name": "测试用户更新",
            "nickname": "测试昵称",
            "age": 25,
            "gender": 1,
            "occupation": "软件工程师",
            "address": "北京市朝阳区",
            "income": 15000.00
        }),
    );
    for field in CONSUMER_READ_ONLY_FIELDS {
        info.remove(field);
    }
    Some(json!({ "user_info": info }))
}

/// Build the `PUT /api/v1/user/info` body for a back-office account.
///
/// The back-office service requires `status`; it defaults to normal.
pub fn staff_profile_update(user_info: &Value, account: &TestAccount) -> Option<Value> {
    let mut info = user_info.as_object()?.clone();
    let role = account.role.clone().unwrap_or_default();
    merge(
        &mut info,
        json!({
            "name": format!("管理员-{}", account.phone_suffix()),
            "nickname": format!("管理员昵称-{}", role),
            "age": 30,
            "gender": 1,
            "role": role
        }),
    );
    info.entry("status")
        .or_insert_with(|| json!(u8::from(UserStatus::Normal)));
    Some(json!({ "user_info": info }))
}

fn merge(target: &mut Map<String, Value>, overrides: Value) {
    if let Value::Object(overrides) = overrides {
        target.extend(overrides);
    }
}
