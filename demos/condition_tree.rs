//! Builds a few filters and checks them against a record given on the
//! command line.
//!
//! ```text
//! cargo run --example condition_tree -- --age 20 --status active --debug
//! ```

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use condtree::{
    Comparison, ComparisonOperator, Operand, Operation, OperationFactory, Record, Value,
};

/// Evaluate sample condition trees against one record
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Age of the record
    #[arg(short, long, default_value = "20")]
    age: i64,

    /// Status of the record
    #[arg(short, long, default_value = "active")]
    status: String,

    /// Operator used to compare the age against 18
    #[arg(short = 'o', long, default_value = ">")]
    age_operator: String,

    /// Operation kind joining the two comparisons
    #[arg(short = 'k', long, default_value = "and")]
    kind: String,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let record = Record::new()
        .with("age", args.age)
        .with("status", args.status.as_str());
    println!("Record: {}", record);

    let age_operator: ComparisonOperator = args
        .age_operator
        .parse()
        .context("Failed to parse age operator")?;

    let filter = OperationFactory::create(
        &args.kind,
        [
            Operand::condition(Comparison::new("age", age_operator, 18)),
            Operand::condition(Comparison::eq("status", "active")),
        ],
    )
    .with_context(|| format!("Failed to build '{}' filter", args.kind))?;
    report("filter", &filter, &record);

    // Appending a same-kind operation flattens it into the receiver
    let extra = OperationFactory::create(
        &args.kind,
        [Operand::condition(Comparison::ne("status", "banned"))],
    )?;
    filter.append(Operand::from(extra))?;
    report("flattened", &filter, &record);

    let negated = Operation::not(Operand::from(filter.clone()))?;
    report("negated", &negated, &record);

    let guarded = Operation::and([
        Operand::from(Operation::null()),
        Operand::condition(Comparison::eq("deleted_at", Value::Null)),
    ])?;
    report("guarded", &guarded, &record);

    if let Err(err) = negated.append(Operand::condition(Comparison::eq("age", 1))) {
        println!("NOT rejected a second operand: {}", err);
    }

    Ok(())
}

fn report(label: &str, filter: &Operation<Comparison>, record: &Record) {
    println!(
        "{:>10}: {} -> matches={} valid={} negated={}",
        label,
        filter,
        filter.matches(record),
        filter.is_valid(),
        filter.negated()
    );
}
