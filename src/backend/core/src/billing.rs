//! Monthly billing summary for an organization.

use serde::Serialize;

/// Price of one paid seat.
pub const SEAT_UNIT_PRICE: u64 = 10;

/// Price of one project.
pub const PROJECT_UNIT_PRICE: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingLine {
    pub amount: u64,
    pub unit: u64,
    pub price: u64,
}

impl BillingLine {
    pub fn new(amount: u64, unit: u64) -> Self {
        Self {
            amount,
            unit,
            price: amount * unit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Billing {
    pub seats: BillingLine,
    pub projects: BillingLine,
    pub total: u64,
}

impl Billing {
    /// `seats` counts members whose role is not BILLING.
    pub fn compute(seats: u64, projects: u64) -> Self {
        let seats = BillingLine::new(seats, SEAT_UNIT_PRICE);
        let projects = BillingLine::new(projects, PROJECT_UNIT_PRICE);
        Self {
            total: seats.price + projects.price,
            seats,
            projects,
        }
    }
}
