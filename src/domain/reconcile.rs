use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{parse_cents, Cents, Customer, CustomerBalance, CustomerId};

/// An externally claimed outstanding balance, e.g. one row of an auditor's
/// spreadsheet. Keyed by free-text customer name, not by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingClaim {
    pub customer_name: String,
    pub claimed_cents: Cents,
}

/// A claims row that could not be turned into an `OutstandingClaim`.
/// Recovered locally: the row is skipped and the rest of the batch continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedRow {
    TooFewFields { line: usize },
    EmptyName { line: usize },
    BadAmount { line: usize, value: String },
}

impl MalformedRow {
    pub fn line(&self) -> usize {
        match self {
            MalformedRow::TooFewFields { line }
            | MalformedRow::EmptyName { line }
            | MalformedRow::BadAmount { line, .. } => *line,
        }
    }
}

impl std::fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedRow::TooFewFields { line } => {
                write!(f, "line {}: expected at least two fields", line)
            }
            MalformedRow::EmptyName { line } => {
                write!(f, "line {}: customer name is empty", line)
            }
            MalformedRow::BadAmount { line, value } => {
                write!(f, "line {}: cannot parse amount '{}'", line, value)
            }
        }
    }
}

impl std::error::Error for MalformedRow {}

/// Lazy row-by-row parser over a claims table exported from a spreadsheet.
///
/// The format is hand-edited comma-separated text, so each row is judged on
/// its own: a malformed row yields an error item and parsing continues with
/// the next line. A leading header row is skipped when the first field of the
/// first row case-insensitively contains "customer" or "name".
pub struct ClaimRows<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    at_first_row: bool,
}

impl<'a> ClaimRows<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self {
            lines: raw.lines().enumerate(),
            at_first_row: true,
        }
    }
}

impl Iterator for ClaimRows<'_> {
    type Item = Result<OutstandingClaim, MalformedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (index, line) = self.lines.next()?;
            if line.trim().is_empty() {
                continue;
            }

            let first_row = std::mem::replace(&mut self.at_first_row, false);
            if first_row && is_header(line) {
                continue;
            }

            return Some(parse_row(line, index + 1));
        }
    }
}

/// Parse the whole claims table, keeping the well-formed rows.
pub fn parse_claims(raw: &str) -> Vec<OutstandingClaim> {
    ClaimRows::new(raw).filter_map(Result::ok).collect()
}

fn is_header(line: &str) -> bool {
    let first = scrub(split_fields(line).0);
    let lowered = first.to_lowercase();
    lowered.contains("customer") || lowered.contains("name")
}

/// Split a row into its first field and the second field, honoring quotes so
/// that a quoted field may contain commas (e.g. `"$1,200.50"`).
fn split_fields(line: &str) -> (&str, Option<&str>) {
    let (first, rest) = match quoted_field_end(line) {
        Some(i) => (&line[..i], &line[i + 1..]),
        None => return (line, None),
    };
    let second = match quoted_field_end(rest) {
        Some(i) => &rest[..i],
        None => rest,
    };
    (first, Some(second))
}

/// Byte offset of the comma ending the field at the start of `s`, if any.
fn quoted_field_end(s: &str) -> Option<usize> {
    let mut in_quotes = false;
    for (i, c) in s.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// Strip surrounding whitespace and any quote characters from a field.
fn scrub(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}

fn parse_row(line: &str, line_number: usize) -> Result<OutstandingClaim, MalformedRow> {
    let (name_field, amount_field) = split_fields(line);
    let Some(amount_field) = amount_field else {
        return Err(MalformedRow::TooFewFields { line: line_number });
    };

    let customer_name = scrub(name_field);
    if customer_name.is_empty() {
        return Err(MalformedRow::EmptyName { line: line_number });
    }

    // Currency symbols and thousands separators are spreadsheet noise
    let cleaned = scrub(amount_field).replace(['$', ','], "");
    let claimed_cents = parse_cents(&cleaned).map_err(|_| MalformedRow::BadAmount {
        line: line_number,
        value: amount_field.trim().to_string(),
    })?;

    Ok(OutstandingClaim {
        customer_name,
        claimed_cents,
    })
}

/// Outcome of comparing one claim or one computed balance during
/// reconciliation. Unmatched items on either side are reported, never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reconciliation {
    Matched {
        customer_id: CustomerId,
        customer_name: String,
        computed_cents: Cents,
        claimed_cents: Cents,
        /// claimed - computed; zero means reconciled
        delta_cents: Cents,
    },
    /// The claim names nobody in the customer directory
    UnmatchedClaim {
        customer_name: String,
        claimed_cents: Cents,
    },
    /// A computed balance no claim spoke for
    UnmatchedBalance {
        customer_id: CustomerId,
        customer_name: String,
        computed_cents: Cents,
    },
}

impl Reconciliation {
    /// True only for a matched pair with zero delta.
    pub fn is_reconciled(&self) -> bool {
        matches!(self, Reconciliation::Matched { delta_cents: 0, .. })
    }
}

/// Diff externally claimed outstanding balances against computed ones.
///
/// Claims are matched to customers by case-insensitive exact name, then to
/// that customer's computed balance. Matched rows come out in claim order;
/// unmatched balances follow, sorted by customer id for determinism.
pub fn reconcile(
    claims: &[OutstandingClaim],
    balances: &[CustomerBalance],
    directory: &[Customer],
) -> Vec<Reconciliation> {
    let by_name: HashMap<String, &Customer> = directory
        .iter()
        .map(|c| (c.name.to_lowercase(), c))
        .collect();
    let computed: HashMap<CustomerId, &CustomerBalance> =
        balances.iter().map(|b| (b.customer_id, b)).collect();

    let mut results = Vec::with_capacity(claims.len() + balances.len());
    let mut claimed_ids: HashSet<CustomerId> = HashSet::new();

    for claim in claims {
        let customer = by_name.get(&claim.customer_name.to_lowercase());
        let matched = customer.and_then(|c| computed.get(&c.id).map(|b| (*c, *b)));

        match matched {
            Some((customer, balance)) => {
                claimed_ids.insert(customer.id);
                results.push(Reconciliation::Matched {
                    customer_id: customer.id,
                    customer_name: customer.name.clone(),
                    computed_cents: balance.net_outstanding,
                    claimed_cents: claim.claimed_cents,
                    delta_cents: claim.claimed_cents - balance.net_outstanding,
                });
            }
            None => results.push(Reconciliation::UnmatchedClaim {
                customer_name: claim.customer_name.clone(),
                claimed_cents: claim.claimed_cents,
            }),
        }
    }

    let mut unclaimed: Vec<&CustomerBalance> = balances
        .iter()
        .filter(|b| !claimed_ids.contains(&b.customer_id))
        .collect();
    unclaimed.sort_by_key(|b| b.customer_id);

    for balance in unclaimed {
        let customer_name = directory
            .iter()
            .find(|c| c.id == balance.customer_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| balance.customer_id.to_string());
        results.push(Reconciliation::UnmatchedBalance {
            customer_id: balance.customer_id,
            customer_name,
            computed_cents: balance.net_outstanding,
        });
    }

    results
}
