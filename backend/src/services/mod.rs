//! Module for core business logic services.
//!
//! Services validate input, enforce tenant scoping through the tenant
//! context, apply business rules and orchestrate repository calls. All
//! tenant-scoped operations obtain their tenant exclusively from
//! [`crate::auth::tenant_context::TenantContext`].

use crate::errors::{ServiceError, ServiceResult};
use validator::Validate;

pub mod branch_service;
pub mod credit_service;
pub mod expense_service;
pub mod inventory_service;
pub mod product_service;
pub mod purchase_order_service;
pub mod report_service;
pub mod sale_service;
pub mod supplier_service;
pub mod tenant_service;
pub mod user_service;

/// Runs validator-derive checks, flattening field errors into one message.
pub(crate) fn validate_dto<T: Validate>(dto: &T) -> ServiceResult<()> {
    if let Err(validation_errors) = dto.validate() {
        let error_messages: Vec<String> = validation_errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    format!(
                        "{}: {}",
                        field,
                        error.message.as_ref().unwrap_or(&"Invalid value".into())
                    )
                })
            })
            .collect();

        return Err(ServiceError::validation(error_messages.join(", ")));
    }

    Ok(())
}
