use secrecy::{ExposeSecret, Secret};

/// Credentials of a user the smoke tests register or log in with.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct TestAccount {
    pub phone: String,
    pub password: Secret<String>,
    /// Only back-office accounts carry a role.
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(serde::Serialize, Debug)]
pub struct LoginRequest<'a> {
    phone: &'a str,
    password: &'a str,
}

#[derive(serde::Serialize, Debug)]
pub struct RegisterRequest<'a> {
    phone: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
}

#[derive(serde::Serialize, Debug)]
pub struct ChangePasswordRequest<'a> {
    phone: &'a str,
    old_password: &'a str,
    new_password: &'a str,
}

#[derive(serde::Serialize, Debug)]
pub struct PhoneQuery<'a> {
    pub phone: &'a str,
}

#[derive(serde::Serialize, Debug)]
pub struct UserStatusUpdate<'a> {
    phone: &'a str,
    status: UserStatus,
}

/// Account status understood by the back-office user service.
#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(into = "u8")]
pub enum UserStatus {
    Normal,
    Disabled,
}

impl From<UserStatus> for u8 {
    fn from(value: UserStatus) -> Self {
        match value {
            UserStatus::Normal => 1,
            UserStatus::Disabled => 2,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

impl TestAccount {
    pub fn new(phone: impl Into<String>, password: impl Into<String>, role: Option<&str>) -> Self {
        Self {
            phone: phone.into(),
            password: Secret::new(password.into()),
            role: role.map(str::to_string),
        }
    }

    pub fn login_request(&self) -> LoginRequest<'_> {
        LoginRequest {
            phone: &self.phone,
            password: self.password.expose_secret(),
        }
    }

    pub fn register_request(&self) -> RegisterRequest<'_> {
        RegisterRequest {
            phone: &self.phone,
            password: self.password.expose_secret(),
            role: self.role.as_deref(),
        }
    }

    pub fn change_password_request<'a>(
        &'a self,
        new_password: &'a Secret<String>,
    ) -> ChangePasswordRequest<'a> {
        ChangePasswordRequest {
            phone: &self.phone,
            old_password: self.password.expose_secret(),
            new_password: new_password.expose_secret(),
        }
    }

    pub fn status_update(&self, status: UserStatus) -> UserStatusUpdate<'_> {
        UserStatusUpdate {
            phone: &self.phone,
            status,
        }
    }

    pub fn phone_query(&self) -> PhoneQuery<'_> {
        PhoneQuery { phone: &self.phone }
    }

    /// The same account after a successful password change.
    pub fn with_password(&self, password: Secret<String>) -> Self {
        Self {
            phone: self.phone.clone(),
            password,
            role: self.role.clone(),
        }
    }

    /// Password the lifecycle flows switch to. Back-office accounts derive it
    /// from the current password, consumer accounts use a fixed value.
    pub fn rotated_password(&self) -> Secret<String> {
        match self.role {
            Some(_) => Secret::new(format!("new_{}", self.password.expose_secret())),
            None => Secret::new("new_password_123".to_string()),
        }
    }

    /// Last four digits of the phone number.
    pub fn phone_suffix(&self) -> &str {
        let split = self
            .phone
            .char_indices()
            .rev()
            .nth(3)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.phone[split..]
    }
}
