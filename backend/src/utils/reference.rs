//! Human-readable document references.
//!
//! Receipts and purchase orders get short prefixed codes; uniqueness per
//! tenant is enforced by the database, the random tail just makes collisions
//! unlikely on the first attempt.

use rand::{Rng, distributions::Alphanumeric};

fn random_code(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect::<String>()
        .to_uppercase()
}

/// Receipt number for a new sale, e.g. `RCT-9H3KQ0Z2LM`.
pub fn receipt_number() -> String {
    format!("RCT-{}", random_code(10))
}

/// Reference for a new purchase order, e.g. `PO-X41TB7QD`.
pub fn order_reference() -> String {
    format!("PO-{}", random_code(8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_have_expected_shape() {
        let receipt = receipt_number();
        assert!(receipt.starts_with("RCT-"));
        assert_eq!(receipt.len(), 14);
        assert_eq!(receipt, receipt.to_uppercase());

        let order = order_reference();
        assert!(order.starts_with("PO-"));
        assert_eq!(order.len(), 11);
    }

    #[test]
    fn references_differ_between_calls() {
        assert_ne!(receipt_number(), receipt_number());
    }
}
