//! Static billing history
//!
//! Invoices, payment method, and next payment are fixed content. They are not
//! derived from the data service and never feed the dashboard summary.

use serde::Serialize;

/// One invoice row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub id: &'static str,
    pub date: &'static str,
    /// Whole dollars
    pub amount: u32,
    pub status: &'static str,
}

impl Invoice {
    /// Amount as shown in the table (e.g., "$299.00")
    pub fn amount_label(&self) -> String {
        format!("${}.00", self.amount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentMethod {
    pub label: &'static str,
    pub expiry: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextPayment {
    pub date: &'static str,
    pub amount: &'static str,
}

/// Full billing page content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingHistory {
    pub payment_method: PaymentMethod,
    pub next_payment: NextPayment,
    pub invoices: &'static [Invoice],
}

pub const INVOICES: [Invoice; 5] = [
    Invoice {
        id: "INV-001",
        date: "Dec 1, 2024",
        amount: 299,
        status: "Paid",
    },
    Invoice {
        id: "INV-002",
        date: "Nov 1, 2024",
        amount: 299,
        status: "Paid",
    },
    Invoice {
        id: "INV-003",
        date: "Oct 1, 2024",
        amount: 299,
        status: "Paid",
    },
    Invoice {
        id: "INV-004",
        date: "Sep 1, 2024",
        amount: 299,
        status: "Paid",
    },
    Invoice {
        id: "INV-005",
        date: "Aug 1, 2024",
        amount: 299,
        status: "Paid",
    },
];

pub const PAYMENT_METHOD: PaymentMethod = PaymentMethod {
    label: "Visa ending in 4242",
    expiry: "Expires 12/2025",
};

pub const NEXT_PAYMENT: NextPayment = NextPayment {
    date: "January 1, 2025",
    amount: "$299.00",
};

/// The billing page, newest invoice first
pub fn billing_history() -> BillingHistory {
    BillingHistory {
        payment_method: PAYMENT_METHOD,
        next_payment: NEXT_PAYMENT,
        invoices: &INVOICES,
    }
}
