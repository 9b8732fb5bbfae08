//! Path templates of the services under test

pub const AUTH_REGISTER: &str = "/api/v1/auth/register";
pub const AUTH_LOGIN: &str = "/api/v1/auth/login";
pub const AUTH_LOGOUT: &str = "/api/v1/auth/logout";
pub const AUTH_PASSWORD: &str = "/api/v1/auth/password";

pub const USER_INFO: &str = "/api/v1/user/info";
pub const USER_STATUS: &str = "/api/v1/user/status";
pub const USER_DELETE: &str = "/api/v1/user/delete";

pub const LEASE_PRODUCTS: &str = "/api/v1/leaseproduct/products";
pub const LEASE_PRODUCT_INVENTORY_CHECK: &str = "/api/v1/leaseproduct/products/check-inventory";
pub const ADMIN_LEASE_PRODUCTS: &str = "/api/v1/admin/leaseproduct/products";

pub const LOAN_PRODUCTS: &str = "/api/v1/loanproduct/products";
pub const ADMIN_LOAN_PRODUCTS: &str = "/api/v1/admin/loanproduct/products";

pub const LEASE_APPLICATIONS: &str = "/api/v1/lease/applications";
pub const ADMIN_LEASE_APPLICATIONS: &str = "/api/v1/admin/lease/applications";

pub const LOAN_APPLICATIONS: &str = "/api/v1/loan/applications";
pub const ADMIN_LOAN_APPLICATIONS: &str = "/api/v1/admin/loan/applications";

/// `{collection}/{id}`
pub fn item(collection: &str, id: impl std::fmt::Display) -> String {
    format!("{}/{}", collection, id)
}

/// `{collection}/{id}/{action}`, e.g. `/api/v1/lease/applications/LA1/cancel`
pub fn item_action(collection: &str, id: impl std::fmt::Display, action: &str) -> String {
    format!("{}/{}/{}", collection, id, action)
}
