//! settleup-engine CLI
//!
//! Split, balance and settle a group's expenses from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Show each participant's net balance
//! settleup-engine balances --input ledger.json
//!
//! # Compute the transfers that settle the group
//! settleup-engine settle --input ledger.json --format json
//!
//! # Generate a random ledger for testing
//! settleup-engine generate --participants 8 --expenses 40
//! ```
//!
//! Set `RUST_LOG=debug` to trace splits and transfers.

use rust_decimal::Decimal;
use settleup_engine::core::error::SettleError;
use settleup_engine::core::expense::{ExpenseDraft, ExpenseSet, SplitEntry, SplitRule};
use settleup_engine::core::group::Group;
use settleup_engine::core::party::{Participant, ParticipantId};
use settleup_engine::optimization::balance::BalanceAggregator;
use settleup_engine::optimization::report::{BalanceReport, SettlementReport};
use settleup_engine::optimization::settlement::SettlementOptimizer;
use settleup_engine::simulation::random_group::{generate_random_ledger, LedgerConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"settleup-engine — shared-expense splitting and debt simplification

USAGE:
    settleup-engine <COMMAND> [OPTIONS]

COMMANDS:
    balances    Show every participant's net balance
    settle      Compute the transfers that settle all debts
    generate    Generate a random ledger (for testing)
    help        Show this message

OPTIONS (balances, settle):
    --input <FILE>      Path to JSON ledger file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (generate):
    --participants <N>  Number of participants (default: 10)
    --expenses <N>      Number of expenses (default: 30)
    --output <FILE>     Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG            Log filter, e.g. info or debug

EXAMPLES:
    settleup-engine balances --input ledger.json
    settleup-engine settle --input ledger.json --format json
    settleup-engine generate --participants 5 --expenses 20 --output ledger.json"#
    );
}

/// JSON schema for an input ledger.
#[derive(serde::Deserialize, serde::Serialize)]
struct LedgerFile {
    #[serde(default = "default_group_name")]
    group: String,
    participants: Vec<Participant>,
    expenses: Vec<ExpenseInput>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct ExpenseInput {
    description: String,
    total: String,
    payer: String,
    rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    splits: Option<Vec<SplitInput>>,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct SplitInput {
    participant: String,
    amount: String,
}

fn default_group_name() -> String {
    "group".to_string()
}

/// JSON output for the `settle` command.
#[derive(serde::Serialize)]
struct SettleOutput {
    group: String,
    conserved: bool,
    balances: BalanceReport,
    settlement: SettlementReport,
}

fn parse_amount(raw: &str) -> Decimal {
    raw.trim().parse().unwrap_or_else(|e| {
        eprintln!("Invalid amount '{}': {}", raw, e);
        process::exit(1);
    })
}

fn to_draft(input: &ExpenseInput) -> Result<ExpenseDraft, SettleError> {
    let rule: SplitRule = input.rule.parse()?;
    let splits: Option<Vec<SplitEntry>> = input.splits.as_ref().map(|entries| {
        entries
            .iter()
            .map(|s| SplitEntry::new(ParticipantId::new(&s.participant), parse_amount(&s.amount)))
            .collect()
    });
    Ok(ExpenseDraft {
        description: input.description.clone(),
        total: parse_amount(&input.total),
        payer: ParticipantId::new(&input.payer),
        rule,
        splits,
    })
}

fn load_ledger(path: &str) -> (Group, ExpenseSet) {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: LedgerFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "group": "Trip",
  "participants": [{{ "id": "a", "name": "Alice" }}, {{ "id": "b", "name": "Bob" }}],
  "expenses": [
    {{ "description": "Dinner", "total": "90.00", "payer": "a", "rule": "EQUAL" }},
    {{ "description": "Taxi", "total": "20.00", "payer": "b", "rule": "EXACT",
      "splits": [{{ "participant": "a", "amount": "20.00" }}] }}
  ]
}}"#
        );
        process::exit(1);
    });

    let group = Group::from_participants(file.group, file.participants).unwrap_or_else(|e| {
        eprintln!("Invalid group: {}", e);
        process::exit(1);
    });

    let mut set = ExpenseSet::new();
    for (i, input) in file.expenses.iter().enumerate() {
        let record = to_draft(input)
            .and_then(|draft| settleup_engine::split::record_expense(&group, &draft))
            .unwrap_or_else(|e| {
                eprintln!("Expense #{} ('{}') rejected: {}", i + 1, input.description, e);
                process::exit(1);
            });
        set.add(record);
    }
    (group, set)
}

/// Parse `--input` / `--format` shared by `balances` and `settle`.
fn parse_input_args(args: &[String]) -> (String, String) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });
    (path, format)
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    });
    println!("{}", json);
}

fn cmd_balances(args: &[String]) {
    let (path, format) = parse_input_args(args);
    let (group, set) = load_ledger(&path);
    let balances = BalanceAggregator::aggregate(set.expenses());
    let report = BalanceReport::build(&balances, &group);

    if format == "json" {
        print_json(&report);
    } else {
        println!(
            "Group: {} ({} expenses, {} spent)",
            group.name(),
            set.len(),
            set.gross_total()
        );
        println!("{}", report);
    }
}

fn cmd_settle(args: &[String]) {
    let (path, format) = parse_input_args(args);
    let (group, set) = load_ledger(&path);
    let balances = BalanceAggregator::aggregate(set.expenses());
    let conserved = SettlementOptimizer::validate_conservation(&balances);
    let transfers = SettlementOptimizer::settle(&balances);

    let output = SettleOutput {
        group: group.name().to_string(),
        conserved,
        balances: BalanceReport::build(&balances, &group),
        settlement: SettlementReport::build(&transfers, &group),
    };

    if format == "json" {
        print_json(&output);
    } else {
        println!("{}", output.balances);
        println!("{}", output.settlement);
        if !conserved {
            eprintln!("Warning: balances do not sum to zero ({})", balances.total());
        }
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = LedgerConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--participants requires a number");
                        process::exit(1);
                    });
            }
            "--expenses" => {
                i += 1;
                config.expense_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--expenses requires a number");
                        process::exit(1);
                    });
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let ledger = generate_random_ledger(&config).unwrap_or_else(|e| {
        eprintln!("Error generating ledger: {}", e);
        process::exit(1);
    });

    let output = LedgerFile {
        group: ledger.group.name().to_string(),
        participants: ledger.group.members().to_vec(),
        expenses: ledger
            .expenses
            .expenses()
            .iter()
            .map(|e| ExpenseInput {
                description: e.description().to_string(),
                total: e.total().to_string(),
                payer: e.payer().to_string(),
                rule: e.rule().to_string(),
                splits: (e.rule() == SplitRule::Exact).then(|| {
                    e.splits()
                        .iter()
                        .map(|s| SplitInput {
                            participant: s.participant.to_string(),
                            amount: s.amount.to_string(),
                        })
                        .collect()
                }),
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| {
        eprintln!("Error serializing ledger: {}", e);
        process::exit(1);
    });

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            ledger.expenses.len(),
            ledger.group.len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
