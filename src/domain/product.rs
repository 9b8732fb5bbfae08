use crate::domain::DateRange;
use chrono::NaiveDate;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Product status meaning "listed / available".
pub const PRODUCT_STATUS_ACTIVE: i64 = 1;

const UNIQUE_CODE_SUFFIX_LEN: usize = 6;

/// Product code with a random suffix, e.g. `LP7Q2Z0K`.
pub fn generate_unique_code(prefix: &str) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(|b| char::from(b).to_ascii_uppercase())
        .take(UNIQUE_CODE_SUFFIX_LEN)
        .collect();
    format!("{}{}", prefix, suffix)
}

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Pagination {
    pub fn first(size: u32) -> Self {
        Self { page: 1, size }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::first(10)
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LeaseProductDraft {
    pub product_code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub machinery: String,
    pub brand: String,
    pub model: String,
    pub daily_rate: f64,
    pub deposit: f64,
    pub max_duration: i64,
    pub min_duration: i64,
    pub description: String,
    pub inventory_count: i64,
}

impl LeaseProductDraft {
    pub fn fixture() -> Self {
        Self {
            product_code: "LP001".into(),
            name: "挖掘机测试产品".into(),
            kind: "挖掘机".into(),
            machinery: "大型挖掘机".into(),
            brand: "卡特彼勒".into(),
            model: "CAT320D".into(),
            daily_rate: 800.00,
            deposit: 10000.00,
            max_duration: 365,
            min_duration: 1,
            description: "高性能挖掘机，适用于大型工程项目".into(),
            inventory_count: 5,
        }
    }

    pub fn with_code(self, product_code: impl Into<String>) -> Self {
        Self {
            product_code: product_code.into(),
            ..self
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LeaseProductUpdate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub machinery: String,
    pub brand: String,
    pub model: String,
    pub daily_rate: f64,
    pub deposit: f64,
    pub max_duration: i64,
    pub min_duration: i64,
    pub description: String,
    pub status: i64,
}

impl LeaseProductUpdate {
    pub fn fixture() -> Self {
        Self {
            name: "更新后的挖掘机".into(),
            kind: "挖掘机".into(),
            machinery: "大型挖掘机".into(),
            brand: "卡特彼勒".into(),
            model: "CAT320D".into(),
            daily_rate: 850.00,
            deposit: 12000.00,
            max_duration: 300,
            min_duration: 3,
            description: "更新后的产品描述".into(),
            status: PRODUCT_STATUS_ACTIVE,
        }
    }
}

/// Query for the filtered lease product listing.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LeaseProductFilter {
    pub page: u32,
    pub size: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub brand: String,
    pub status: i64,
    pub keyword: String,
}

impl LeaseProductFilter {
    pub fn fixture() -> Self {
        let Pagination { page, size } = Pagination::default();
        Self {
            page,
            size,
            kind: "挖掘机".into(),
            brand: "卡特彼勒".into(),
            status: PRODUCT_STATUS_ACTIVE,
            keyword: "挖掘机".into(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct InventoryCheck {
    pub product_code: String,
    pub quantity: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl InventoryCheck {
    pub fn new(product_code: impl Into<String>, quantity: i64, dates: DateRange) -> Self {
        Self {
            product_code: product_code.into(),
            quantity,
            start_date: dates.start,
            end_date: dates.end,
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LoanProductDraft {
    pub product_code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub max_amount: f64,
    pub min_amount: f64,
    pub max_duration: i64,
    pub min_duration: i64,
    pub interest_rate: f64,
    pub description: String,
}

impl LoanProductDraft {
    pub fn fixture() -> Self {
        Self {
            product_code: "LN001".into(),
            name: "个人信用贷款".into(),
            kind: "信用贷款".into(),
            max_amount: 500000.00,
            min_amount: 10000.00,
            max_duration: 36,
            min_duration: 6,
            interest_rate: 0.08,
            description: "无抵押个人信用贷款产品".into(),
        }
    }

    pub fn with_code(self, product_code: impl Into<String>) -> Self {
        Self {
            product_code: product_code.into(),
            ..self
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub struct LoanProductUpdate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub max_amount: f64,
    pub min_amount: f64,
    pub max_duration: i64,
    pub min_duration: i64,
    pub interest_rate: f64,
    pub description: String,
}

impl LoanProductUpdate {
    pub fn fixture() -> Self {
        Self {
            name: "更新后的信用贷款".into(),
            kind: "信用贷款".into(),
            max_amount: 600000.00,
            min_amount: 5000.00,
            max_duration: 48,
            min_duration: 3,
            interest_rate: 0.085,
            description: "更新后的产品描述".into(),
        }
    }
}

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductStatusUpdate {
    pub status: i64,
}
