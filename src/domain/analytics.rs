use serde::{Deserialize, Serialize};

use super::{Cents, CustomerBalance, CustomerId};

/// Business-wide view over a set of per-customer balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    /// Sum of positive outstanding balances: what customers owe the business
    pub total_payable: Cents,
    /// Sum of negative outstanding balances: what the business owes back
    pub total_receivable: Cents,
    /// total_payable - total_receivable, always exactly
    pub net_balance: Cents,
    pub top_customers: Vec<TopCustomer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopCustomer {
    pub customer_id: CustomerId,
    pub entry_count: usize,
    pub net_outstanding: Cents,
}

/// Aggregate per-customer balances into a business summary.
///
/// Only customers with more than one ledger entry are ranked: a single entry
/// is a one-off, not an active trading relationship. The ranking is a total
/// order (entry count desc, |outstanding| desc, customer id asc), so the
/// output is identical no matter how the input is ordered.
pub fn aggregate(balances: &[CustomerBalance]) -> AnalyticsSummary {
    let mut total_payable: Cents = 0;
    let mut total_receivable: Cents = 0;

    for balance in balances {
        if balance.net_outstanding > 0 {
            total_payable += balance.net_outstanding;
        } else {
            total_receivable += -balance.net_outstanding;
        }
    }

    let mut top_customers: Vec<TopCustomer> = balances
        .iter()
        .filter(|b| b.entry_count > 1)
        .map(|b| TopCustomer {
            customer_id: b.customer_id,
            entry_count: b.entry_count,
            net_outstanding: b.net_outstanding,
        })
        .collect();

    top_customers.sort_by(|a, b| {
        b.entry_count
            .cmp(&a.entry_count)
            .then(b.net_outstanding.abs().cmp(&a.net_outstanding.abs()))
            .then(a.customer_id.cmp(&b.customer_id))
    });

    AnalyticsSummary {
        total_payable,
        total_receivable,
        net_balance: total_payable - total_receivable,
        top_customers,
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn balance(customer_id: CustomerId, net_outstanding: Cents, entry_count: usize) -> CustomerBalance {
        let mut b = CustomerBalance::zero(customer_id);
        b.net_outstanding = net_outstanding;
        b.entry_count = entry_count;
        if net_outstanding >= 0 {
            b.total_debits = net_outstanding;
        } else {
            b.total_credits = -net_outstanding;
        }
        b
    }

    #[test]
    fn test_empty_set_is_all_zero() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total_payable, 0);
        assert_eq!(summary.total_receivable, 0);
        assert_eq!(summary.net_balance, 0);
        assert!(summary.top_customers.is_empty());
    }

    #[test]
    fn test_totals_split_by_sign() {
        let balances = vec![
            balance(Uuid::new_v4(), 10000, 3),
            balance(Uuid::new_v4(), -4000, 2),
            balance(Uuid::new_v4(), 500, 1),
            balance(Uuid::new_v4(), 0, 2),
        ];

        let summary = aggregate(&balances);
        assert_eq!(summary.total_payable, 10500);
        assert_eq!(summary.total_receivable, 4000);
        assert_eq!(summary.net_balance, 6500);
    }

    #[test]
    fn test_net_balance_identity() {
        let balances = vec![
            balance(Uuid::new_v4(), 123, 1),
            balance(Uuid::new_v4(), -456, 5),
            balance(Uuid::new_v4(), 789, 2),
            balance(Uuid::new_v4(), -1, 0),
        ];

        let summary = aggregate(&balances);
        assert_eq!(
            summary.net_balance,
            summary.total_payable - summary.total_receivable
        );
    }

    #[test]
    fn test_single_entry_customers_not_ranked() {
        let balances = vec![
            balance(Uuid::new_v4(), 99999, 1),
            balance(Uuid::new_v4(), 100, 2),
        ];

        let summary = aggregate(&balances);
        assert_eq!(summary.top_customers.len(), 1);
        assert_eq!(summary.top_customers[0].entry_count, 2);
    }

    #[test]
    fn test_ranking_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let balances = vec![
            balance(a, 5000, 2),
            balance(b, -9000, 4),
            balance(c, 100, 4),
        ];

        let summary = aggregate(&balances);
        let ids: Vec<CustomerId> = summary.top_customers.iter().map(|t| t.customer_id).collect();
        // b and c tie on count; b wins on |outstanding|; a trails on count
        assert_eq!(ids, vec![b, c, a]);
    }

    #[test]
    fn test_full_tie_breaks_on_customer_id() {
        let mut ids = [Uuid::new_v4(), Uuid::new_v4()];
        ids.sort();
        let balances = vec![balance(ids[1], -3000, 3), balance(ids[0], 3000, 3)];

        let summary = aggregate(&balances);
        assert_eq!(summary.top_customers[0].customer_id, ids[0]);
        assert_eq!(summary.top_customers[1].customer_id, ids[1]);
    }

    #[test]
    fn test_order_independence() {
        let balances = vec![
            balance(Uuid::new_v4(), 5000, 2),
            balance(Uuid::new_v4(), -9000, 4),
            balance(Uuid::new_v4(), 100, 4),
            balance(Uuid::new_v4(), 42, 1),
        ];

        let forward = aggregate(&balances);
        let mut reversed = balances.clone();
        reversed.reverse();
        let backward = aggregate(&reversed);

        assert_eq!(forward, backward);
    }
}
