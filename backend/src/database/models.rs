//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database, often used by an ORM. Note that these may differ from
//! API-specific models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub contact_email: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Public onboarding payload: a tenant, its first branch and its admin user
/// are created together.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTenant {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Pharmacy name must be between 1-255 characters"
    ))]
    pub name: String,
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub contact_email: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Branch address must be between 1-255 characters"
    ))]
    pub address: String,
    pub phone: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1-255 characters"
    ))]
    pub username: String,
    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Branch {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBranch {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Branch name must be between 1-255 characters"
    ))]
    pub name: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Address must be between 1-255 characters"
    ))]
    pub address: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateBranch {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Branch name must be between 1-255 characters"
    ))]
    pub name: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Address must be between 1-255 characters"
    ))]
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub tenant_id: String,
    pub branch_id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Staff roles, ordered from widest to narrowest set of permissions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")] // Store as TEXT in SQLite
pub enum UserRole {
    Admin,
    Manager,
    Pharmacist,
    Cashier,
}

impl UserRole {
    /// Managers and admins may run stock, catalog and procurement mutations.
    pub fn is_manager(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Manager)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "Admin"),
            UserRole::Manager => write!(f, "Manager"),
            UserRole::Pharmacist => write!(f, "Pharmacist"),
            UserRole::Cashier => write!(f, "Cashier"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(UserRole::Admin),
            "Manager" => Ok(UserRole::Manager),
            "Pharmacist" => Ok(UserRole::Pharmacist),
            "Cashier" => Ok(UserRole::Cashier),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1, message = "Branch ID is required"))]
    pub branch_id: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Username must be between 1-255 characters"
    ))]
    pub username: String,

    #[validate(
        email(message = "Must be a valid email"),
        length(max = 255, message = "Email too long")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeUserRole {
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: String,
    pub tenant_id: String,
    pub sku: String,
    pub name: String,
    pub generic_name: Option<String>,
    pub category: String,
    /// Dispensing unit, e.g. "tablet", "bottle", "pack of 20".
    pub unit: String,
    pub cost_price_cents: i64,
    pub selling_price_cents: i64,
    /// VAT rate in basis points (750 = 7.5%).
    pub vat_rate_bps: i64,
    pub reorder_level: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 64, message = "SKU must be between 1-64 characters"))]
    pub sku: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1-255 characters"
    ))]
    pub name: String,
    pub generic_name: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Category must be between 1-255 characters"
    ))]
    pub category: String,
    #[validate(length(min = 1, max = 64, message = "Unit must be between 1-64 characters"))]
    pub unit: String,
    #[validate(range(min = 0, message = "Cost price cannot be negative"))]
    pub cost_price_cents: i64,
    #[validate(range(min = 0, message = "Selling price cannot be negative"))]
    pub selling_price_cents: i64,
    #[validate(range(min = 0, max = 10000, message = "VAT rate must be 0-10000 basis points"))]
    pub vat_rate_bps: i64,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProduct {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Product name must be between 1-255 characters"
    ))]
    pub name: Option<String>,
    pub generic_name: Option<String>,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Category must be between 1-255 characters"
    ))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 64, message = "Unit must be between 1-64 characters"))]
    pub unit: Option<String>,
    #[validate(range(min = 0, message = "Cost price cannot be negative"))]
    pub cost_price_cents: Option<i64>,
    #[validate(range(min = 0, message = "Selling price cannot be negative"))]
    pub selling_price_cents: Option<i64>,
    #[validate(range(min = 0, max = 10000, message = "VAT rate must be 0-10000 basis points"))]
    pub vat_rate_bps: Option<i64>,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockLevel {
    pub id: String,
    pub tenant_id: String,
    pub branch_id: String,
    pub product_id: String,
    pub quantity_on_hand: i64,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockMovement {
    pub id: String,
    pub tenant_id: String,
    pub branch_id: String,
    pub product_id: String,
    pub movement_type: MovementType,
    /// Signed quantity: negative for sales, positive for receipts and reversals.
    pub quantity_change: i64,
    /// Receipt number, purchase order reference or adjustment reason.
    pub reference: String,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum MovementType {
    Sale,
    SaleReversal,
    PurchaseReceipt,
    Adjustment,
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovementType::Sale => write!(f, "Sale"),
            MovementType::SaleReversal => write!(f, "SaleReversal"),
            MovementType::PurchaseReceipt => write!(f, "PurchaseReceipt"),
            MovementType::Adjustment => write!(f, "Adjustment"),
        }
    }
}

impl std::str::FromStr for MovementType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sale" => Ok(MovementType::Sale),
            "SaleReversal" => Ok(MovementType::SaleReversal),
            "PurchaseReceipt" => Ok(MovementType::PurchaseReceipt),
            "Adjustment" => Ok(MovementType::Adjustment),
            _ => Err(format!("Invalid movement type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StockAdjustment {
    #[validate(length(min = 1, message = "Branch ID is required"))]
    pub branch_id: String,
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
    #[validate(custom(function = "validate_nonzero_quantity"))]
    pub quantity_change: i64,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Reason must be between 1-255 characters"
    ))]
    pub reason: String,
}

fn validate_nonzero_quantity(quantity_change: i64) -> Result<(), validator::ValidationError> {
    if quantity_change == 0 {
        return Err(validator::ValidationError::new(
            "quantity_change must not be zero",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSupplier {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Supplier name must be between 1-255 characters"
    ))]
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Must be a valid email"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSupplier {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Supplier name must be between 1-255 characters"
    ))]
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "Must be a valid email"))]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseOrder {
    pub id: String,
    pub tenant_id: String,
    pub branch_id: String,
    pub supplier_id: String,
    pub reference: String,
    pub status: PurchaseOrderStatus,
    pub expected_date: Option<NaiveDate>,
    pub created_by: String,
    pub received_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum PurchaseOrderStatus {
    Draft,
    Submitted,
    Received,
    Cancelled,
}

impl std::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PurchaseOrderStatus::Draft => write!(f, "Draft"),
            PurchaseOrderStatus::Submitted => write!(f, "Submitted"),
            PurchaseOrderStatus::Received => write!(f, "Received"),
            PurchaseOrderStatus::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for PurchaseOrderStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(PurchaseOrderStatus::Draft),
            "Submitted" => Ok(PurchaseOrderStatus::Submitted),
            "Received" => Ok(PurchaseOrderStatus::Received),
            "Cancelled" => Ok(PurchaseOrderStatus::Cancelled),
            _ => Err(format!("Invalid purchase order status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PurchaseOrderItem {
    pub id: String,
    pub purchase_order_id: String,
    pub product_id: String,
    pub quantity_ordered: i64,
    pub quantity_received: i64,
    pub unit_cost_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseOrder {
    #[validate(length(min = 1, message = "Branch ID is required"))]
    pub branch_id: String,
    #[validate(length(min = 1, message = "Supplier ID is required"))]
    pub supplier_id: String,
    pub expected_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "At least one order item is required"), nested)]
    pub items: Vec<CreatePurchaseOrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePurchaseOrderItem {
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
    #[validate(range(min = 0, message = "Unit cost cannot be negative"))]
    pub unit_cost_cents: i64,
}

/// Optional per-product received-quantity overrides; items not listed
/// receive exactly the ordered quantity.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReceivePurchaseOrder {
    #[validate(nested)]
    pub items: Option<Vec<ReceivePurchaseOrderItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReceivePurchaseOrderItem {
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
    #[validate(range(min = 0, message = "Received quantity cannot be negative"))]
    pub quantity_received: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: String,
    pub tenant_id: String,
    pub branch_id: String,
    pub receipt_number: String,
    /// Client-chosen idempotency key, unique per tenant.
    pub client_reference: String,
    pub cashier_id: String,
    pub status: SaleStatus,
    pub payment_method: PaymentMethod,
    pub credit_account_id: Option<String>,
    pub subtotal_cents: i64,
    pub vat_cents: i64,
    pub total_cents: i64,
    pub amount_tendered_cents: Option<i64>,
    pub change_due_cents: Option<i64>,
    pub voided_by: Option<String>,
    pub voided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum SaleStatus {
    Completed,
    Voided,
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleStatus::Completed => write!(f, "Completed"),
            SaleStatus::Voided => write!(f, "Voided"),
        }
    }
}

impl std::str::FromStr for SaleStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Completed" => Ok(SaleStatus::Completed),
            "Voided" => Ok(SaleStatus::Voided),
            _ => Err(format!("Invalid sale status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum PaymentMethod {
    Cash,
    Card,
    Credit,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "Cash"),
            PaymentMethod::Card => write!(f, "Card"),
            PaymentMethod::Credit => write!(f, "Credit"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Cash" => Ok(PaymentMethod::Cash),
            "Card" => Ok(PaymentMethod::Card),
            "Credit" => Ok(PaymentMethod::Credit),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub vat_rate_bps: i64,
    pub line_net_cents: i64,
    pub line_vat_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSale {
    #[validate(length(min = 1, message = "Branch ID is required"))]
    pub branch_id: String,
    #[validate(length(
        min = 1,
        max = 64,
        message = "Client reference must be between 1-64 characters"
    ))]
    pub client_reference: String,
    pub payment_method: PaymentMethod,
    pub credit_account_id: Option<String>,
    #[validate(range(min = 0, message = "Amount tendered cannot be negative"))]
    pub amount_tendered_cents: Option<i64>,
    #[validate(length(min = 1, message = "At least one sale item is required"), nested)]
    pub items: Vec<CreateSaleItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSaleItem {
    #[validate(length(min = 1, message = "Product ID is required"))]
    pub product_id: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditAccount {
    pub id: String,
    pub tenant_id: String,
    pub customer_name: String,
    pub phone: String,
    pub credit_limit_cents: i64,
    /// Outstanding debt; never negative.
    pub balance_cents: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCreditAccount {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Customer name must be between 1-255 characters"
    ))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 32, message = "Phone must be between 1-32 characters"))]
    pub phone: String,
    #[validate(range(min = 1, message = "Credit limit must be positive"))]
    pub credit_limit_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCreditLimit {
    #[validate(range(min = 0, message = "Credit limit cannot be negative"))]
    pub credit_limit_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditPayment {
    pub id: String,
    pub tenant_id: String,
    pub credit_account_id: String,
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCreditPayment {
    #[validate(range(min = 1, message = "Payment amount must be positive"))]
    pub amount_cents: i64,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: String,
    pub tenant_id: String,
    pub branch_id: String,
    pub category: ExpenseCategory,
    pub description: String,
    pub amount_cents: i64,
    pub incurred_on: NaiveDate,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "TEXT")]
pub enum ExpenseCategory {
    Utilities,
    Rent,
    Salaries,
    Supplies,
    Maintenance,
    Other,
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseCategory::Utilities => write!(f, "Utilities"),
            ExpenseCategory::Rent => write!(f, "Rent"),
            ExpenseCategory::Salaries => write!(f, "Salaries"),
            ExpenseCategory::Supplies => write!(f, "Supplies"),
            ExpenseCategory::Maintenance => write!(f, "Maintenance"),
            ExpenseCategory::Other => write!(f, "Other"),
        }
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Utilities" => Ok(ExpenseCategory::Utilities),
            "Rent" => Ok(ExpenseCategory::Rent),
            "Salaries" => Ok(ExpenseCategory::Salaries),
            "Supplies" => Ok(ExpenseCategory::Supplies),
            "Maintenance" => Ok(ExpenseCategory::Maintenance),
            "Other" => Ok(ExpenseCategory::Other),
            _ => Err(format!("Invalid expense category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateExpense {
    #[validate(length(min = 1, message = "Branch ID is required"))]
    pub branch_id: String,
    pub category: ExpenseCategory,
    #[validate(length(
        min = 1,
        max = 255,
        message = "Description must be between 1-255 characters"
    ))]
    pub description: String,
    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount_cents: i64,
    pub incurred_on: NaiveDate,
}

// View models for API responses (with joined data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantOnboarding {
    pub tenant: Tenant,
    pub branch: Branch,
    pub admin: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleWithItems {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderWithItems {
    pub purchase_order: PurchaseOrder,
    pub items: Vec<PurchaseOrderItem>,
}

/// Stock row joined with its product, for branch stock and low-stock views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockLevelWithProduct {
    pub product_id: String,
    pub sku: String,
    pub product_name: String,
    pub unit: String,
    pub quantity_on_hand: i64,
    pub reorder_level: i64,
    pub updated_at: DateTime<Utc>,
}

// Report rows. Aggregates are computed in SQL; these are their shapes.

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalesSummary {
    pub sale_count: i64,
    pub voided_count: i64,
    pub gross_cents: i64,
    pub vat_cents: i64,
    pub net_cents: i64,
    pub cash_cents: i64,
    pub card_cents: i64,
    pub credit_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VatDay {
    pub day: String,
    pub taxable_cents: i64,
    pub vat_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VatReport {
    pub days: Vec<VatDay>,
    pub total_taxable_cents: i64,
    pub total_vat_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StockVarianceRow {
    pub product_id: String,
    pub product_name: String,
    pub received_qty: i64,
    pub sold_qty: i64,
    pub returned_qty: i64,
    /// Net manual adjustments; negative values indicate shrinkage.
    pub adjusted_qty: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    pub revenue_cents: i64,
    pub cogs_cents: i64,
    pub expenses_cents: i64,
    pub gross_margin_cents: i64,
    pub net_margin_cents: i64,
}
