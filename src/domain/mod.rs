mod account;
mod application;
mod dates;
mod product;
mod profile;
mod service;

pub use account::{TestAccount, UserStatus};
pub use application::{
    ApprovalAction, CancelRequest, LeaseApplicationDraft, LeaseApplicationUpdate, LeaseApproval,
    LoanApplicationDraft, LoanApplicationUpdate, LoanApproval,
};
pub use dates::DateRange;
pub use product::{
    InventoryCheck, LeaseProductDraft, LeaseProductFilter, LeaseProductUpdate, LoanProductDraft,
    LoanProductUpdate, PRODUCT_STATUS_ACTIVE, Pagination, ProductStatusUpdate,
    generate_unique_code,
};
pub use profile::{consumer_profile_update, staff_profile_update};
pub use service::Service;
