use crate::domain::DateRange;
use chrono::NaiveDate;

/// Days between today and the start of a fixture lease.
const LEASE_START_OFFSET_DAYS: u64 = 30;
const LEASE_DURATION_DAYS: u64 = 10;

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LeaseApplicationDraft {
    pub product_id: i64,
    pub product_code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub machinery: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: i64,
    pub daily_rate: f64,
    pub total_amount: f64,
    pub deposit: f64,
    pub delivery_address: String,
    pub contact_phone: String,
    pub purpose: String,
}

impl LeaseApplicationDraft {
    /// A ten day lease starting a month from now.
    pub fn fixture(product_id: i64, product_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::for_period(
            product_id,
            product_code,
            name,
            DateRange::from_today(LEASE_START_OFFSET_DAYS, LEASE_DURATION_DAYS),
        )
    }

    pub fn for_period(
        product_id: i64,
        product_code: impl Into<String>,
        name: impl Into<String>,
        period: DateRange,
    ) -> Self {
        let daily_rate = 800.00;
        let duration = period.days();
        Self {
            product_id,
            product_code: product_code.into(),
            name: name.into(),
            kind: "挖掘机".into(),
            machinery: "大型挖掘机".into(),
            start_date: period.start,
            end_date: period.end,
            duration,
            daily_rate,
            total_amount: daily_rate * duration as f64,
            deposit: 10000.00,
            delivery_address: "北京市朝阳区建国路1号".into(),
            contact_phone: "13800138000".into(),
            purpose: "建筑工程施工".into(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LeaseApplicationUpdate {
    pub purpose: String,
    pub delivery_address: String,
    pub contact_phone: String,
}

impl LeaseApplicationUpdate {
    pub fn fixture() -> Self {
        Self {
            purpose: "更新后的使用目的".into(),
            delivery_address: "更新后的地址".into(),
            contact_phone: "13900139000".into(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LoanApplicationDraft {
    pub product_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub duration: i64,
    pub purpose: String,
}

impl LoanApplicationDraft {
    pub fn fixture(product_id: i64, name: impl Into<String>) -> Self {
        Self {
            product_id,
            name: name.into(),
            kind: "信用贷款".into(),
            amount: 100000.00,
            duration: 12,
            purpose: "个人消费".into(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LoanApplicationUpdate {
    pub amount: f64,
    pub duration: i64,
    pub purpose: String,
}

impl LoanApplicationUpdate {
    pub fn fixture() -> Self {
        Self {
            amount: 120000.00,
            duration: 18,
            purpose: "更新后的贷款用途".into(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    pub reason: String,
}

impl CancelRequest {
    pub fn fixture() -> Self {
        Self {
            reason: "测试取消原因".into(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalAction {
    Approve,
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LeaseApproval {
    pub action: ApprovalAction,
    pub suggestions: String,
    pub approved_duration: i64,
    pub approved_amount: f64,
    pub approved_deposit: f64,
}

impl LeaseApproval {
    pub fn approve(draft: &LeaseApplicationDraft) -> Self {
        Self {
            action: ApprovalAction::Approve,
            suggestions: "申请已通过审核".into(),
            approved_duration: draft.duration,
            approved_amount: draft.total_amount,
            approved_deposit: draft.deposit,
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LoanApproval {
    pub action: ApprovalAction,
    pub suggestions: String,
    pub approved_amount: f64,
    pub approved_duration: i64,
    pub interest_rate: f64,
}

impl LoanApproval {
    pub fn approve(draft: &LoanApplicationDraft) -> Self {
        Self {
            action: ApprovalAction::Approve,
            suggestions: "申请已通过审核".into(),
            approved_amount: draft.amount,
            approved_duration: draft.duration,
            interest_rate: 0.08,
        }
    }
}
