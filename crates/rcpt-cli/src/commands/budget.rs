//! Budget command - manage per-owner budget plans.

use clap::{Args, Subcommand};
use console::style;
use rust_decimal::Decimal;

use rcpt_core::models::config::RcptConfig;
use rcpt_core::{BudgetBook, BudgetPlan, BudgetStrategy, JsonFileStore, OwnerId, TransactionStore};

/// Arguments for the budget command.
#[derive(Args)]
pub struct BudgetArgs {
    #[command(subcommand)]
    command: BudgetCommand,
}

#[derive(Subcommand)]
enum BudgetCommand {
    /// Create a budget plan
    Init(InitArgs),

    /// Show a budget plan with spending per category
    Show {
        /// User whose plan is shown
        #[arg(long, required = true)]
        owner: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct InitArgs {
    /// User the plan belongs to
    #[arg(long, required = true)]
    owner: String,

    /// Total budget
    #[arg(long, required = true)]
    total: Decimal,

    /// Category allocation as NAME:PERCENT, may be repeated
    #[arg(long = "category", value_parser = parse_allocation)]
    categories: Vec<(String, Decimal)>,

    /// Budgeting strategy (50/30/20, Zero-based, Envelope, Custom)
    #[arg(long, default_value = "Custom", value_parser = parse_strategy)]
    strategy: BudgetStrategy,

    /// Emergency fund goal
    #[arg(long, default_value = "0")]
    emergency_fund: Decimal,

    /// Monthly savings target
    #[arg(long, default_value = "0")]
    savings_target: Decimal,

    /// Disable budget alerts
    #[arg(long)]
    no_alerts: bool,

    /// Replace an existing plan
    #[arg(long)]
    force: bool,
}

pub fn run(args: BudgetArgs, config: &RcptConfig) -> anyhow::Result<()> {
    match args.command {
        BudgetCommand::Init(init_args) => init_budget(init_args, config),
        BudgetCommand::Show { owner, json } => show_budget(&owner, json, config),
    }
}

fn parse_allocation(s: &str) -> Result<(String, Decimal), String> {
    let (name, percentage) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected NAME:PERCENT, got '{}'", s))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("category name is empty".to_string());
    }
    let percentage: Decimal = percentage
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("invalid percentage in '{}'", s))?;
    Ok((name.to_string(), percentage))
}

fn parse_strategy(s: &str) -> Result<BudgetStrategy, String> {
    BudgetStrategy::from_str(s).ok_or_else(|| format!("unknown strategy '{}'", s))
}

fn init_budget(args: InitArgs, config: &RcptConfig) -> anyhow::Result<()> {
    let owner = OwnerId::new(args.owner);
    let mut book = BudgetBook::load(config.storage.budgets_path())?;

    if book.get(&owner).is_some() && !args.force {
        anyhow::bail!(
            "Budget plan for {} already exists. Use --force to replace it.",
            owner
        );
    }

    let mut plan = BudgetPlan::try_new(owner.clone(), args.total)?;
    plan.strategy = args.strategy;
    plan.emergency_fund_goal = args.emergency_fund;
    plan.monthly_savings_target = args.savings_target;
    plan.alerts_enabled = !args.no_alerts;
    for (name, percentage) in args.categories {
        plan.add_category(name, percentage)?;
    }

    book.put(plan)?;
    book.save()?;

    println!(
        "{} Created budget plan for {} at {}",
        style("✓").green(),
        owner,
        book.path().display()
    );
    Ok(())
}

fn show_budget(owner: &str, json: bool, config: &RcptConfig) -> anyhow::Result<()> {
    let owner = OwnerId::new(owner);
    let book = BudgetBook::load(config.storage.budgets_path())?;
    let plan = book
        .get(&owner)
        .ok_or_else(|| anyhow::anyhow!("No budget plan for {}. Run 'rcpt budget init' first.", owner))?;

    let store = JsonFileStore::open(config.storage.transactions_path());
    let transactions = store.list(&owner)?;
    let report = plan.report(&transactions);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Budget for {}", style(&report.owner_id).bold());
    println!("  Remaining total: {}", report.total_budget);
    if plan.emergency_fund_goal > Decimal::ZERO {
        println!("  Emergency fund goal: {}", plan.emergency_fund_goal);
    }
    if plan.monthly_savings_target > Decimal::ZERO {
        println!("  Monthly savings target: {}", plan.monthly_savings_target);
    }
    println!();

    for line in &report.categories {
        let marker = if line.over_limit && plan.alerts_enabled {
            style("!").red()
        } else {
            style(" ").dim()
        };
        println!(
            "{} {:<16} spent {:>10} of {:>10}  remaining {:>10}",
            marker, line.category, line.spent, line.limit, line.remaining
        );
    }

    if report.unbudgeted > Decimal::ZERO {
        println!();
        println!("  Unbudgeted spending: {}", report.unbudgeted);
    }

    Ok(())
}
