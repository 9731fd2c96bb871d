// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::engine::{
    Period, account_availability, expand_installments, goal_progress, pay_installment,
    roll_forward_fixed,
};
use fintrack::error::{PeriodError, ValidationError};
use fintrack::models::{Account, AccountKind, Kind, SavingsGoal, Transaction, TransactionDraft};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn draft(date: &str, description: Option<&str>) -> TransactionDraft {
    TransactionDraft {
        amount: dec("250"),
        category: "Shopping".into(),
        kind: Kind::Expense,
        date: day(date),
        description: description.map(String::from),
        is_recurring_fixed: false,
        is_settled: true,
        installment_count: None,
        installment_index: None,
        account: Some("Visa".into()),
    }
}

#[test]
fn period_parsing_and_arithmetic() {
    let p: Period = "2024-02".parse().unwrap();
    assert_eq!(p.days(), 29);
    assert_eq!("2023-02".parse::<Period>().unwrap().days(), 28);
    assert_eq!(p.shift(-3).to_string(), "2023-11");
    assert_eq!("2024-12".parse::<Period>().unwrap().next().to_string(), "2025-01");
    assert_eq!("2024-01".parse::<Period>().unwrap().prev().to_string(), "2023-12");
    assert_eq!(p.last_day(), Some(day("2024-02-29")));
    assert_eq!(p.date(31), Some(day("2024-02-29")));
    assert!(p.contains(day("2024-02-01")));
    assert!(!p.contains(day("2024-03-01")));

    assert_eq!("2024-13".parse::<Period>(), Err(PeriodError::MonthOutOfRange(13)));
    assert!(matches!("2024-3".parse::<Period>(), Err(PeriodError::Format(_))));
    assert!(matches!("march".parse::<Period>(), Err(PeriodError::Format(_))));
}

#[test]
fn period_serializes_as_month_string() {
    let p: Period = "2024-07".parse().unwrap();
    assert_eq!(serde_json::to_string(&p).unwrap(), "\"2024-07\"");
    let back: Period = serde_json::from_str("\"2024-07\"").unwrap();
    assert_eq!(back, p);
    assert!(serde_json::from_str::<Period>("\"2024-7\"").is_err());
}

#[test]
fn installments_follow_months_and_clamp_short_ones() {
    let parts = expand_installments(draft("2024-01-31", Some("TV")), 3).unwrap();
    let dates: Vec<NaiveDate> = parts.iter().map(|d| d.date).collect();
    assert_eq!(
        dates,
        [day("2024-01-31"), day("2024-02-29"), day("2024-03-31")]
    );
    let descriptions: Vec<&str> = parts
        .iter()
        .map(|d| d.description.as_deref().unwrap())
        .collect();
    assert_eq!(descriptions, ["TV (1/3)", "TV (2/3)", "TV (3/3)"]);
    for (i, part) in parts.iter().enumerate() {
        assert_eq!(part.installment_index, Some(i as u32 + 1));
        assert_eq!(part.installment_count, Some(3));
        assert_eq!(part.amount, dec("250"));
        assert!(!part.is_settled);
        assert_eq!(part.account.as_deref(), Some("Visa"));
    }
}

#[test]
fn installments_without_description_are_numbered() {
    let parts = expand_installments(draft("2024-11-10", None), 2).unwrap();
    assert_eq!(parts[1].description.as_deref(), Some("Installment 2/2"));
    assert_eq!(parts[1].date, day("2024-12-10"));
}

#[test]
fn single_installment_keeps_the_draft() {
    let d = draft("2024-05-05", Some("Shoes"));
    let parts = expand_installments(d.clone(), 1).unwrap();
    assert_eq!(parts, vec![d]);
}

#[test]
fn zero_installments_is_rejected() {
    assert_eq!(
        expand_installments(draft("2024-05-05", None), 0),
        Err(ValidationError::ZeroInstallments)
    );
}

fn stored(id: &str, category: &str, date: &str, fixed: bool, kind: Kind) -> Transaction {
    Transaction {
        id: id.into(),
        amount: dec("100"),
        category: category.into(),
        kind,
        date: date.into(),
        description: Some(category.to_lowercase()),
        is_recurring_fixed: fixed,
        is_settled: true,
        installment_count: None,
        installment_index: None,
        account: None,
    }
}

#[test]
fn roll_forward_copies_last_months_fixed_expenses() {
    let txs = vec![
        stored("1", "Rent", "2024-01-31", true, Kind::Expense),
        stored("2", "Internet", "2024-01-10", true, Kind::Expense),
        stored("3", "Market", "2024-01-12", false, Kind::Expense),
        stored("4", "Salary", "2024-01-05", true, Kind::Income),
        stored("5", "Rent", "2023-12-31", true, Kind::Expense),
    ];
    let target: Period = "2024-02".parse().unwrap();
    let drafts = roll_forward_fixed(&txs, target);
    assert_eq!(drafts.len(), 2);
    assert_eq!(drafts[0].category, "Rent");
    assert_eq!(drafts[0].date, day("2024-02-29"));
    assert_eq!(drafts[1].category, "Internet");
    assert_eq!(drafts[1].date, day("2024-02-10"));
    assert!(drafts.iter().all(|d| d.is_recurring_fixed && !d.is_settled));
}

#[test]
fn roll_forward_skips_months_that_already_have_fixed_expenses() {
    let txs = vec![
        stored("1", "Rent", "2024-01-31", true, Kind::Expense),
        stored("2", "Rent", "2024-02-29", true, Kind::Expense),
    ];
    assert!(roll_forward_fixed(&txs, "2024-02".parse().unwrap()).is_empty());
}

fn goal(target: &str, total: u32) -> SavingsGoal {
    SavingsGoal {
        id: 1,
        name: "Trip".into(),
        target_amount: dec(target),
        paid_amount: Decimal::ZERO,
        installments_total: total,
        installments_paid: 0,
        start_date: day("2024-01-01"),
    }
}

#[test]
fn goal_is_paid_in_equal_installments() {
    let g = goal("1000", 3);
    let p = goal_progress(&g);
    assert_eq!(p.installment_amount, dec("333.33"));
    assert_eq!(p.remaining_installments, 3);
    assert_eq!(p.percent, Decimal::ZERO);
    assert!(!p.completed);

    let g = pay_installment(&g).unwrap();
    assert_eq!(g.paid_amount, dec("333.33"));
    assert_eq!(goal_progress(&g).percent, dec("33.3"));

    let g = pay_installment(&pay_installment(&g).unwrap()).unwrap();
    let p = goal_progress(&g);
    assert!(p.completed);
    assert_eq!(p.remaining_installments, 0);
    assert_eq!(g.paid_amount, dec("999.99"));

    assert_eq!(
        pay_installment(&g).unwrap_err(),
        ValidationError::GoalCompleted("Trip".into())
    );
}

#[test]
fn goal_validation() {
    assert_eq!(
        goal("0", 3).validate(),
        Err(ValidationError::NonPositiveTarget(Decimal::ZERO))
    );
    assert_eq!(goal("10", 0).validate(), Err(ValidationError::ZeroInstallments));
    assert!(goal("10", 1).validate().is_ok());
}

fn account(kind: AccountKind, limit: &str, balance: &str) -> Account {
    Account {
        id: 1,
        name: "Visa".into(),
        kind,
        limit: dec(limit),
        balance: dec(balance),
        color: "#000000".into(),
        icon: "credit-card".into(),
        active: true,
    }
}

fn on_account(amount: &str, kind: Kind, settled: bool, account: Option<&str>) -> Transaction {
    Transaction {
        id: amount.into(),
        amount: dec(amount),
        category: "Shopping".into(),
        kind,
        date: "2024-03-01".into(),
        description: None,
        is_recurring_fixed: false,
        is_settled: settled,
        installment_count: None,
        installment_index: None,
        account: account.map(String::from),
    }
}

fn card_activity() -> Vec<Transaction> {
    vec![
        on_account("300", Kind::Expense, false, Some("Visa")),
        on_account("200", Kind::Expense, true, Some("Visa")),
        on_account("50", Kind::Income, false, Some("Visa")),
        on_account("700", Kind::Expense, false, Some("Other")),
        on_account("90", Kind::Expense, false, None),
    ]
}

#[test]
fn credit_card_availability_uses_the_limit() {
    let a = account_availability(&account(AccountKind::CreditCard, "1000", "0"), &card_activity());
    assert_eq!(a.unpaid_total, dec("250"));
    assert_eq!(a.available, dec("750"));
    assert_eq!(a.percent_used, Some(dec("25.0")));

    let no_limit =
        account_availability(&account(AccountKind::CreditCard, "0", "0"), &card_activity());
    assert_eq!(no_limit.percent_used, None);
}

#[test]
fn bank_account_availability_uses_the_balance() {
    let a = account_availability(&account(AccountKind::Checking, "0", "500"), &card_activity());
    assert_eq!(a.available, dec("250"));
    assert_eq!(a.percent_used, None);
}

#[test]
fn transaction_validation() {
    let mut t = on_account("10", Kind::Expense, false, None);
    assert!(t.validate().is_ok());
    t.installment_index = Some(4);
    t.installment_count = Some(3);
    assert_eq!(
        t.validate(),
        Err(ValidationError::InstallmentOutOfRange { index: 4, count: 3 })
    );
    t.installment_count = None;
    assert_eq!(t.validate(), Err(ValidationError::IncompleteInstallment));
    t.installment_index = None;
    t.amount = Decimal::ZERO;
    assert_eq!(t.validate(), Err(ValidationError::NonPositiveAmount(Decimal::ZERO)));
    t.amount = dec("1");
    t.date = "2024-02-30".into();
    assert!(matches!(t.validate(), Err(ValidationError::InvalidDate(_))));
}
