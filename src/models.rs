// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::Period;
use crate::error::ValidationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Expense,
    Income,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Expense => f.write_str("expense"),
            Kind::Income => f.write_str("income"),
        }
    }
}

impl FromStr for Kind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Kind::Expense),
            "income" => Ok(Kind::Income),
            other => Err(ValidationError::UnknownValue {
                field: "kind",
                value: other.to_string(),
            }),
        }
    }
}

/// One income or expense record, as handed to the aggregation engine.
///
/// `date` stays the raw `YYYY-MM-DD` string received from storage or a
/// snapshot; a value that does not parse places the record in no period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub amount: Decimal,
    pub category: String,
    pub kind: Kind,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_recurring_fixed: bool,
    #[serde(default)]
    pub is_settled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl Transaction {
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()
    }

    pub fn period(&self) -> Option<Period> {
        self.day().map(Period::of)
    }

    pub fn in_period(&self, period: Period) -> bool {
        self.day().is_some_and(|d| period.contains(d))
    }

    pub fn is_expense(&self) -> bool {
        self.kind == Kind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == Kind::Income
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.day().is_none() {
            return Err(ValidationError::InvalidDate(self.date.clone()));
        }
        check_fields(
            self.amount,
            &self.category,
            self.installment_index,
            self.installment_count,
        )
    }
}

fn check_fields(
    amount: Decimal,
    category: &str,
    index: Option<u32>,
    count: Option<u32>,
) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if category.trim().is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    match (index, count) {
        (None, None) => Ok(()),
        (Some(index), Some(count)) if index >= 1 && index <= count => Ok(()),
        (Some(index), Some(count)) => Err(ValidationError::InstallmentOutOfRange { index, count }),
        _ => Err(ValidationError::IncompleteInstallment),
    }
}

/// A transaction that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: Decimal,
    pub category: String,
    pub kind: Kind,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub is_recurring_fixed: bool,
    pub is_settled: bool,
    pub installment_count: Option<u32>,
    pub installment_index: Option<u32>,
    pub account: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_fields(
            self.amount,
            &self.category,
            self.installment_index,
            self.installment_count,
        )
    }

    pub fn into_transaction(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            amount: self.amount,
            category: self.category,
            kind: self.kind,
            date: self.date.format(DATE_FORMAT).to_string(),
            description: self.description,
            is_recurring_fixed: self.is_recurring_fixed,
            is_settled: self.is_settled,
            installment_count: self.installment_count,
            installment_index: self.installment_index,
            account: self.account,
        }
    }
}

/// Which list a category is offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryGroup {
    Fixed,
    Variable,
    Income,
}

impl CategoryGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryGroup::Fixed => "fixed",
            CategoryGroup::Variable => "variable",
            CategoryGroup::Income => "income",
        }
    }
}

impl FromStr for CategoryGroup {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(CategoryGroup::Fixed),
            "variable" => Ok(CategoryGroup::Variable),
            "income" => Ok(CategoryGroup::Income),
            other => Err(ValidationError::UnknownValue {
                field: "category group",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub group: CategoryGroup,
    pub color: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    CreditCard,
    Cash,
    Investment,
}

impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Checking => "checking",
            AccountKind::Savings => "savings",
            AccountKind::CreditCard => "credit_card",
            AccountKind::Cash => "cash",
            AccountKind::Investment => "investment",
        }
    }
}

impl FromStr for AccountKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "checking" => Ok(AccountKind::Checking),
            "savings" => Ok(AccountKind::Savings),
            "credit_card" | "card" => Ok(AccountKind::CreditCard),
            "cash" => Ok(AccountKind::Cash),
            "investment" => Ok(AccountKind::Investment),
            other => Err(ValidationError::UnknownValue {
                field: "account type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub kind: AccountKind,
    pub limit: Decimal,
    pub balance: Decimal,
    pub color: String,
    pub icon: String,
    pub active: bool,
}

/// A savings goal ("caixinha") paid off in equal installments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub paid_amount: Decimal,
    pub installments_total: u32,
    pub installments_paid: u32,
    pub start_date: NaiveDate,
}

impl SavingsGoal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.target_amount <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveTarget(self.target_amount));
        }
        if self.installments_total == 0 {
            return Err(ValidationError::ZeroInstallments);
        }
        Ok(())
    }
}
