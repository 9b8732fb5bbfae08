use crate::report::Reporter;
use secrecy::Secret;

/// A product the business flows submit applications against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRef {
    pub id: i64,
    pub code: String,
}

/// Identifiers and tokens accumulated while a full run progresses.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub admin_token: Option<Secret<String>>,
    pub user_token: Option<Secret<String>>,
    pub lease_product: Option<ProductRef>,
    pub loan_product: Option<ProductRef>,
    pub lease_application_for_cancel: Option<String>,
    pub lease_application_for_approve: Option<String>,
    pub loan_application_for_cancel: Option<String>,
    pub loan_application_for_approve: Option<String>,
}

impl RunState {
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("- Lease product: {}", describe_product(self.lease_product.as_ref())),
            format!("- Loan product: {}", describe_product(self.loan_product.as_ref())),
            format!(
                "- Cancel flow applications: lease={}, loan={}",
                or_none(&self.lease_application_for_cancel),
                or_none(&self.loan_application_for_cancel)
            ),
            format!(
                "- Approval flow applications: lease={}, loan={}",
                or_none(&self.lease_application_for_approve),
                or_none(&self.loan_application_for_approve)
            ),
        ]
    }

    pub fn report(&self, reporter: &Reporter) {
        reporter.line("\n📊 Test data summary:");
        for line in self.summary_lines() {
            reporter.line(line);
        }
    }
}

fn describe_product(product: Option<&ProductRef>) -> String {
    match product {
        Some(p) => format!("ID={}, code={}", p.id, p.code),
        None => "ID=None, code=None".to_string(),
    }
}

fn or_none(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}
