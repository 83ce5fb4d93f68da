use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::config::PlanTerms;
use crate::decimal::Money;
use crate::errors::Result;
use crate::plan::InstallmentPlan;
use crate::types::{CustomerId, PlanId, SaleId};

/// input for creating a sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleInput {
    pub customer_id: CustomerId,
    pub total_amount: Money,
    pub line_items: Vec<SaleLineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLineItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Money,
}

/// a sale created by the external sale service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: SaleId,
    pub sale_number: String,
}

/// a payment account exposed by the finance service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentAccount {
    pub id: Uuid,
    pub name: String,
    pub account_type: String,
}

/// stock on hand for a product at one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    pub location_id: Uuid,
    pub quantity: i64,
}

/// external sale processing contract
pub trait SaleService {
    fn create_sale(&mut self, input: &SaleInput) -> Result<SaleRecord>;
}

/// external installment plan persistence contract
pub trait InstallmentService {
    fn create_plan(&mut self, terms: &PlanTerms) -> Result<InstallmentPlan>;
    fn cancel_plan(&mut self, plan_id: PlanId) -> Result<()>;
    fn send_payment_reminder(&mut self, plan_id: PlanId) -> Result<()>;
    fn all_plans(&self) -> Result<Vec<InstallmentPlan>>;
}

/// external payment-account lookup contract
pub trait FinanceAccountService {
    fn payment_methods(&self) -> Result<Vec<PaymentAccount>>;
}

/// external stock lookup contract
///
/// batched on purpose: one call for all product ids, never one call
/// per product
pub trait StockService {
    fn stock_levels(&self, product_ids: &[String]) -> Result<HashMap<String, Vec<StockLevel>>>;
}
