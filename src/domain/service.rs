/// The microservices exercised by the smoke tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    AppUser,
    OaUser,
    LeaseProduct,
    Lease,
    LoanProduct,
    Loan,
}

impl Service {
    pub const ALL: [Service; 6] = [
        Service::AppUser,
        Service::OaUser,
        Service::LeaseProduct,
        Service::Lease,
        Service::LoanProduct,
        Service::Loan,
    ];

    /// Label used in request traces, e.g. `[LeaseProduct]`.
    pub fn label(&self) -> &'static str {
        match self {
            Service::AppUser => "AppUser",
            Service::OaUser => "OAUser",
            Service::LeaseProduct => "LeaseProduct",
            Service::Lease => "Lease",
            Service::LoanProduct => "LoanProduct",
            Service::Loan => "Loan",
        }
    }

    /// Configuration key and deployment name.
    pub fn key(&self) -> &'static str {
        match self {
            Service::AppUser => "appuser",
            Service::OaUser => "oauser",
            Service::LeaseProduct => "leaseproduct",
            Service::Lease => "lease",
            Service::LoanProduct => "loanproduct",
            Service::Loan => "loan",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Service::AppUser => "consumer user service",
            Service::OaUser => "back-office user service",
            Service::LeaseProduct => "lease product service",
            Service::Lease => "lease application service",
            Service::LoanProduct => "loan product service",
            Service::Loan => "loan application service",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
