//! CSV format handling for ledger records and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to ledger records
//! - Settlement and balance report serialization
//!
//! Input columns: `type,group,id,from,to,amount,split,note`
//!
//! | type    | id          | from  | to    | amount | split            | note         |
//! |---------|-------------|-------|-------|--------|------------------|--------------|
//! | member  | member id   |       |       |        |                  | display name |
//! | expense | expense id? | payer |       | yes    | `a;b` or empty   | description  |
//! | payment |             | from  | to    | yes    |                  | note         |
//!
//! All functions are pure (no I/O beyond the writer they are handed).

use crate::core::engine::GroupReport;
use crate::types::{
    ExpenseRecord, LedgerEntry, LedgerRecord, Member, MemberId, PaymentRecord, SettleError,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// Group assigned to rows with an empty `group` column
pub const DEFAULT_GROUP: &str = "default";

/// Separator between participant ids in the `split` column
pub const SPLIT_SEPARATOR: char = ';';

/// CSV record structure for deserialization
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub split: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<'a>(
    value: &'a Option<String>,
    record_type: &str,
    group: &str,
    field: &str,
) -> Result<&'a str, SettleError> {
    non_empty(value).ok_or_else(|| SettleError::missing_field(record_type, group, field))
}

fn parse_amount(value: &Option<String>, record_type: &str, group: &str) -> Result<Decimal, SettleError> {
    let raw = required(value, record_type, group, "amount")?;
    Decimal::from_str(raw).map_err(|_| SettleError::invalid_amount(raw, group))
}

/// Convert a CsvRecord to a LedgerRecord
///
/// This function:
/// - Parses the (case-insensitive) record type
/// - Parses amounts into Decimal
/// - Splits the `split` column into participant ids
/// - Validates that every column the row type needs is present
///
/// Amount sign is not checked here; that is a validation finding, not a
/// parse error.
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerRecord, SettleError> {
    let group = non_empty(&csv_record.group)
        .unwrap_or(DEFAULT_GROUP)
        .to_string();
    let record_type = csv_record.record_type.trim().to_lowercase();

    let entry = match record_type.as_str() {
        "member" => {
            let id = required(&csv_record.id, &record_type, &group, "id")?;
            let display_name = non_empty(&csv_record.note).unwrap_or(id);
            LedgerEntry::Member(Member::new(id, display_name))
        }
        "expense" => {
            let payer = required(&csv_record.from, &record_type, &group, "from")?;
            let amount = parse_amount(&csv_record.amount, &record_type, &group)?;
            let participants: Vec<MemberId> = non_empty(&csv_record.split)
                .map(|split| {
                    split
                        .split(SPLIT_SEPARATOR)
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(MemberId::from)
                        .collect()
                })
                .unwrap_or_default();

            let mut expense = ExpenseRecord::new(payer, amount).split_among(participants);
            expense.id = non_empty(&csv_record.id).map(str::to_string);
            expense.description = non_empty(&csv_record.note).unwrap_or_default().to_string();
            LedgerEntry::Expense(expense)
        }
        "payment" => {
            let from = required(&csv_record.from, &record_type, &group, "from")?;
            let to = required(&csv_record.to, &record_type, &group, "to")?;
            let amount = parse_amount(&csv_record.amount, &record_type, &group)?;

            let mut payment = PaymentRecord::new(from, to, amount);
            payment.note = non_empty(&csv_record.note).map(str::to_string);
            LedgerEntry::Payment(payment)
        }
        _ => {
            return Err(SettleError::invalid_record_type(
                &csv_record.record_type,
                &group,
            ))
        }
    };

    Ok(LedgerRecord { group, entry })
}

/// Format an amount at fixed precision, never printing negative zero
fn format_amount(amount: Decimal, dp: u32) -> String {
    let rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let rounded = if rounded.is_zero() { Decimal::ZERO } else { rounded };
    format!("{:.*}", dp as usize, rounded)
}

/// Write settlements for every group
///
/// Columns: `group,from,to,amount`. Groups are written in the order given,
/// settlements in engine order.
pub fn write_settlements_csv(reports: &[GroupReport], output: &mut dyn Write) -> Result<(), SettleError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["group", "from", "to", "amount"])?;

    for report in reports {
        for settlement in &report.settlements {
            writer.write_record([
                report.group_id.as_str(),
                settlement.from_id.as_str(),
                settlement.to_id.as_str(),
                format_amount(settlement.amount, 0).as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Write balances for every group
///
/// Columns: `group,member,paid,share,adjustment,net`, two decimal places.
pub fn write_balances_csv(reports: &[GroupReport], output: &mut dyn Write) -> Result<(), SettleError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["group", "member", "paid", "share", "adjustment", "net"])?;

    for report in reports {
        for balance in &report.balances {
            writer.write_record([
                report.group_id.as_str(),
                balance.member_id.as_str(),
                format_amount(balance.paid, 2).as_str(),
                format_amount(balance.share, 2).as_str(),
                format_amount(balance.adjustment, 2).as_str(),
                format_amount(balance.net, 2).as_str(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
