use crate::core::directory::ParticipantDirectory;
use crate::core::ledger::NetBalances;
use crate::core::party::ParticipantId;
use crate::optimization::settlement::Transfer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const UNKNOWN_NAME: &str = "Unknown";

/// Where a participant stands once balances are rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceStatus {
    GetsBack,
    OwesMoney,
    Settled,
}

impl BalanceStatus {
    pub fn from_balance(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            BalanceStatus::GetsBack
        } else if balance < Decimal::ZERO {
            BalanceStatus::OwesMoney
        } else {
            BalanceStatus::Settled
        }
    }
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BalanceStatus::GetsBack => "gets back",
            BalanceStatus::OwesMoney => "owes",
            BalanceStatus::Settled => "settled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceLine {
    pub participant: ParticipantId,
    pub name: String,
    pub balance: Decimal,
    pub status: BalanceStatus,
}

/// Per-participant balances with display names, largest creditor first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceReport {
    pub balances: Vec<BalanceLine>,
}

impl BalanceReport {
    pub fn build<D: ParticipantDirectory + ?Sized>(balances: &NetBalances, directory: &D) -> Self {
        let mut lines: Vec<BalanceLine> = balances
            .iter()
            .map(|(id, balance)| BalanceLine {
                participant: id.clone(),
                name: resolve_name(directory, id),
                balance,
                status: BalanceStatus::from_balance(balance),
            })
            .collect();
        lines.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.participant.cmp(&b.participant))
        });
        Self { balances: lines }
    }

    pub fn line(&self, participant: &ParticipantId) -> Option<&BalanceLine> {
        self.balances.iter().find(|l| &l.participant == participant)
    }
}

impl std::fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Balances ===")?;
        for line in &self.balances {
            writeln!(
                f,
                "  {:<20} {:>12}  [{}]",
                line.name, line.balance, line.status
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementLine {
    pub from: ParticipantId,
    pub from_name: String,
    pub to: ParticipantId,
    pub to_name: String,
    pub amount: Decimal,
}

/// Transfers with display names plus totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    pub settlements: Vec<SettlementLine>,
    pub total_transactions: usize,
    pub total_settled: Decimal,
}

impl SettlementReport {
    pub fn build<D: ParticipantDirectory + ?Sized>(transfers: &[Transfer], directory: &D) -> Self {
        let settlements: Vec<SettlementLine> = transfers
            .iter()
            .map(|t| SettlementLine {
                from: t.from.clone(),
                from_name: resolve_name(directory, &t.from),
                to: t.to.clone(),
                to_name: resolve_name(directory, &t.to),
                amount: t.amount,
            })
            .collect();
        Self {
            total_transactions: settlements.len(),
            total_settled: settlements.iter().map(|s| s.amount).sum(),
            settlements,
        }
    }
}

impl std::fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Settlement ===")?;
        if self.settlements.is_empty() {
            return writeln!(f, "  All settled up.");
        }
        for s in &self.settlements {
            writeln!(f, "  {} pays {} {}", s.from_name, s.to_name, s.amount)?;
        }
        writeln!(f, "Transactions:  {}", self.total_transactions)?;
        writeln!(f, "Total settled: {}", self.total_settled)
    }
}

fn resolve_name<D: ParticipantDirectory + ?Sized>(directory: &D, id: &ParticipantId) -> String {
    directory
        .display_name(id)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::settlement::SettlementOptimizer;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn directory() -> HashMap<ParticipantId, String> {
        [("a", "Alice"), ("b", "Bob"), ("c", "Carol")]
            .into_iter()
            .map(|(id, name)| (ParticipantId::new(id), name.to_string()))
            .collect()
    }

    fn sample_balances() -> NetBalances {
        vec![
            (ParticipantId::new("a"), dec!(60.00)),
            (ParticipantId::new("b"), dec!(-30.00)),
            (ParticipantId::new("c"), dec!(-30.00)),
            (ParticipantId::new("d"), Decimal::ZERO),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_balance_report_sorted_desc() {
        let report = BalanceReport::build(&sample_balances(), &directory());
        let order: Vec<&str> = report
            .balances
            .iter()
            .map(|l| l.participant.as_str())
            .collect();
        assert_eq!(order, vec!["a", "d", "b", "c"]);
        assert_eq!(report.balances[0].status, BalanceStatus::GetsBack);
        assert_eq!(report.balances[1].status, BalanceStatus::Settled);
        assert_eq!(report.balances[2].status, BalanceStatus::OwesMoney);
    }

    #[test]
    fn test_unknown_names() {
        let report = BalanceReport::build(&sample_balances(), &directory());
        let d = report.line(&ParticipantId::new("d")).unwrap();
        assert_eq!(d.name, "Unknown");
    }

    #[test]
    fn test_settlement_report_totals() {
        let transfers = SettlementOptimizer::settle(&sample_balances());
        let report = SettlementReport::build(&transfers, &directory());
        assert_eq!(report.total_transactions, 2);
        assert_eq!(report.total_settled, dec!(60.00));
        assert!(report.settlements.iter().all(|s| s.to_name == "Alice"));
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&BalanceStatus::OwesMoney).unwrap();
        assert_eq!(json, "\"OWES_MONEY\"");
    }
}
