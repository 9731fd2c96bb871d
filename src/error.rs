// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed errors for the domain layer. Command handlers wrap these in `anyhow`.

use rust_decimal::Decimal;

/// A `YYYY-MM` string that does not name a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error("invalid month '{0}', expected YYYY-MM")]
    Format(String),
    #[error("month number {0} out of range 1-12")]
    MonthOutOfRange(u32),
}

/// A record that breaks a transaction or goal invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("installment {index} is outside 1..={count}")]
    InstallmentOutOfRange { index: u32, count: u32 },
    #[error("installment index and count must be given together")]
    IncompleteInstallment,
    #[error("installment count must be at least 1")]
    ZeroInstallments,
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("goal target must be positive, got {0}")]
    NonPositiveTarget(Decimal),
    #[error("goal '{0}' is already completed")]
    GoalCompleted(String),
    #[error("unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },
}
