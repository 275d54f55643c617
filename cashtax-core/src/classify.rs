//! Deterministic rules mapping CashApp transaction types onto TokenTax rows.
//!
//! Rules are tried in `RULE_ORDER`; the first whose label test matches
//! decides the mapping. Several labels share the "Bitcoin" prefix, so the
//! order matters.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::amount::{magnitude, parse_amount};
use crate::date::normalize_date;
use crate::records::{field, target, Category, SourceRecord, TargetRecord, TargetSchema};

pub const COMPLETE_STATUS: &str = "COMPLETE";
pub const EXCHANGE_NAME: &str = "CashApp";
const FIAT: &str = "USD";
const DEFAULT_ASSET: &str = "BTC";

/// The mapping a transaction-type label selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Rule {
    TradeBuy,
    TradeSell,
    CryptoDeposit,
    FiatWithdrawal,
    CryptoWithdrawal,
    Rewards,
    P2p,
}

/// Priority order, highest first.
pub const RULE_ORDER: [Rule; 7] = [
    Rule::TradeBuy,
    Rule::TradeSell,
    Rule::CryptoDeposit,
    Rule::FiatWithdrawal,
    Rule::CryptoWithdrawal,
    Rule::Rewards,
    Rule::P2p,
];

impl Rule {
    /// First rule in priority order whose label test matches.
    pub fn for_label(label: &str) -> Option<Rule> {
        RULE_ORDER.into_iter().find(|r| r.matches(label))
    }

    pub fn matches(&self, label: &str) -> bool {
        match self {
            Rule::TradeBuy => {
                label.contains("Bitcoin")
                    && (label.contains("Buy") || label.contains("Recurring Buy"))
            }
            Rule::TradeSell => label.contains("Bitcoin Sell") || label.contains("Bitcoin Sale"),
            Rule::CryptoDeposit => label == "Deposits",
            Rule::FiatWithdrawal => label == "Withdrawal",
            Rule::CryptoWithdrawal => label.contains("Bitcoin Withdrawal"),
            Rule::Rewards => label.contains("Loyalty Rewards") || label.contains("Rewards"),
            Rule::P2p => label.contains("P2P"),
        }
    }

    /// Summary label used when tallying converted rows.
    pub fn label(&self) -> &'static str {
        match self {
            Rule::TradeBuy => "Trade (Buy)",
            Rule::TradeSell => "Trade (Sell)",
            Rule::CryptoDeposit => "Deposit (Crypto)",
            Rule::FiatWithdrawal => "Withdrawal (Fiat)",
            Rule::CryptoWithdrawal => "Withdrawal (Crypto)",
            Rule::Rewards => "Income (Rewards)",
            Rule::P2p => "P2P",
        }
    }
}

/// What happened to one source row.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Emit { record: TargetRecord, rule: Rule },
    /// Not completed, or no crypto leg to report.
    SkipIncomplete,
    /// Transaction type no rule knows; carries the original label.
    SkipUnrecognized(String),
}

/// Classify one CashApp row against the target schema.
///
/// Errors only on a malformed amount in a field the selected rule reads.
pub fn classify(src: &SourceRecord, schema: &TargetSchema) -> Result<Classification> {
    if src.status() != COMPLETE_STATUS {
        return Ok(Classification::SkipIncomplete);
    }

    let mut row = TargetRecord::blank(schema);
    row.set(target::DATE, normalize_date(src.get(field::DATE)));
    row.set(target::EXCHANGE, EXCHANGE_NAME);
    row.set(target::COMMENT, src.get(field::NOTES));
    row.set(target::GROUP, "");

    let label = src.transaction_type();
    let Some(rule) = Rule::for_label(label) else {
        log::warn!("skipping unknown transaction type: {label}");
        return Ok(Classification::SkipUnrecognized(label.to_string()));
    };

    let Some(category) = fill(rule, src, &mut row)? else {
        log::debug!("{label}: no crypto leg, skipping");
        return Ok(Classification::SkipIncomplete);
    };
    row.set(target::TYPE, category.as_str());

    if row.kind().is_empty() {
        log::warn!("{label}: mapped to {category} but the row has no Type, dropping");
        return Ok(Classification::SkipIncomplete);
    }
    log::debug!("{label} -> {}", rule.label());
    Ok(Classification::Emit { record: row, rule })
}

/// Populate the rule's buy/sell/fee columns. `None` means the row carries
/// nothing taxable.
fn fill(rule: Rule, src: &SourceRecord, row: &mut TargetRecord) -> Result<Option<Category>> {
    let asset_amount = src.get(field::ASSET_AMOUNT).trim();

    let category = match rule {
        Rule::TradeBuy => {
            row.set(target::BUY_AMOUNT, without_commas(asset_amount));
            row.set(target::BUY_CURRENCY, asset_or(src, DEFAULT_ASSET));
            row.set(target::SELL_AMOUNT, money(src, field::AMOUNT)?);
            row.set(target::SELL_CURRENCY, FIAT);
            row.set(target::FEE_AMOUNT, money(src, field::FEE)?);
            row.set(target::FEE_CURRENCY, FIAT);
            Category::Trade
        }
        Rule::TradeSell => {
            row.set(target::BUY_AMOUNT, money(src, field::AMOUNT)?);
            row.set(target::BUY_CURRENCY, FIAT);
            row.set(target::SELL_AMOUNT, unsigned(asset_amount));
            row.set(target::SELL_CURRENCY, asset_or(src, DEFAULT_ASSET));
            row.set(target::FEE_AMOUNT, money(src, field::FEE)?);
            row.set(target::FEE_CURRENCY, FIAT);
            Category::Trade
        }
        Rule::CryptoDeposit => {
            let asset_type = src.get(field::ASSET_TYPE).trim();
            if asset_amount.is_empty() || asset_type.is_empty() {
                return Ok(None);
            }
            row.set(target::BUY_AMOUNT, without_commas(asset_amount));
            row.set(target::BUY_CURRENCY, asset_type);
            Category::Deposit
        }
        Rule::FiatWithdrawal => {
            row.set(target::SELL_AMOUNT, money(src, field::NET_AMOUNT)?);
            row.set(target::SELL_CURRENCY, FIAT);
            row.set(target::FEE_AMOUNT, money(src, field::FEE)?);
            row.set(target::FEE_CURRENCY, FIAT);
            Category::Withdrawal
        }
        Rule::CryptoWithdrawal => {
            // Network fee is charged in the withdrawn asset.
            let asset = asset_or(src, DEFAULT_ASSET);
            row.set(target::SELL_AMOUNT, unsigned(asset_amount));
            row.set(target::SELL_CURRENCY, asset);
            row.set(target::FEE_AMOUNT, money(src, field::FEE)?);
            row.set(target::FEE_CURRENCY, asset);
            Category::Withdrawal
        }
        Rule::Rewards => {
            if asset_amount.is_empty() || asset_amount == "0" {
                return Ok(None);
            }
            row.set(target::BUY_AMOUNT, without_commas(asset_amount));
            row.set(target::BUY_CURRENCY, asset_or(src, FIAT));
            Category::Income
        }
        Rule::P2p => {
            let amount = parse_amount(src.get(field::AMOUNT))
                .with_context(|| format!("field '{}'", field::AMOUNT))?;
            if asset_amount.is_empty() {
                return Ok(None);
            }
            if amount < 0.0 {
                row.set(target::SELL_AMOUNT, unsigned(asset_amount));
                row.set(target::SELL_CURRENCY, asset_or(src, DEFAULT_ASSET));
                Category::Gift
            } else {
                row.set(target::BUY_AMOUNT, without_commas(asset_amount));
                row.set(target::BUY_CURRENCY, asset_or(src, DEFAULT_ASSET));
                Category::Income
            }
        }
    };
    Ok(Some(category))
}

fn money(src: &SourceRecord, name: &str) -> Result<String> {
    magnitude(src.get(name)).with_context(|| format!("field '{name}'"))
}

fn asset_or<'a>(src: &'a SourceRecord, default: &'a str) -> &'a str {
    match src.get(field::ASSET_TYPE).trim() {
        "" => default,
        asset => asset,
    }
}

fn without_commas(s: &str) -> String {
    s.replace(',', "").trim().to_string()
}

fn unsigned(s: &str) -> String {
    s.replace([',', '-'], "").trim().to_string()
}
