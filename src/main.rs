use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use transaction_fetcher::{
    JsonFileLoader, Transaction, TransactionLoader, TransactionQueryEngine, TransactionSnapshot,
};

/// Answers analytical queries over a JSON file of transactions
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Location of the JSON transactions file
    #[arg(short, long, env = "TRANSACTIONS_FILE", default_value = "transactions.json")]
    file: PathBuf,

    #[command(subcommand)]
    query: Query,
}

#[derive(Subcommand)]
enum Query {
    /// Sum of the amounts of all transfers
    TotalAmount,
    /// Sum of the amounts of all transfers sent by a client
    TotalAmountSentBy { sender: String },
    /// Highest transaction amount
    MaxAmount,
    /// Number of clients that sent or received a transfer
    UniqueClients,
    /// Whether a client has at least one compliance issue not solved yet
    OpenIssues { client: String },
    /// All transactions grouped by beneficiary, as CSV
    ByBeneficiary,
    /// Identifiers of all open compliance issues
    UnsolvedIssueIds,
    /// Messages of all solved compliance issues
    SolvedIssueMessages,
    /// The 3 transfers with the highest amount, as CSV
    Top3,
    /// Sender with the highest total sent amount
    TopSender,
}

fn main() -> Result<()> {
    SimpleLogger::new().with_level(LevelFilter::Warn).env().init()?;

    let cli = Cli::parse();
    log::debug!("Application started");

    let loader = JsonFileLoader::new(cli.file);
    let transactions = loader
        .all_transactions()
        .with_context(|| format!("Loading transactions failed from {:?}", loader.path()))?;
    log::info!("Loaded {} transactions", transactions.len());

    let engine = TransactionQueryEngine::new(&transactions);
    run_query(&engine, cli.query)?;

    log::debug!("Application finished");
    Ok(())
}

fn run_query(engine: &TransactionQueryEngine<'_>, query: Query) -> Result<()> {
    match query {
        Query::TotalAmount => println!("{}", engine.total_amount()),
        Query::TotalAmountSentBy { sender } => {
            println!("{}", engine.total_amount_sent_by(&sender))
        }
        Query::MaxAmount => println!("{}", engine.max_amount()),
        Query::UniqueClients => println!("{}", engine.count_unique_clients()),
        Query::OpenIssues { client } => {
            println!("{}", engine.has_open_compliance_issues(&client))
        }
        Query::ByBeneficiary => {
            let groups = engine.transactions_by_beneficiary_name();
            write_to_std_out(groups.into_values().flatten())?
        }
        Query::UnsolvedIssueIds => engine
            .unsolved_issue_ids()
            .iter()
            .for_each(|id| println!("{id}")),
        Query::SolvedIssueMessages => engine
            .all_solved_issue_messages()
            .iter()
            .for_each(|message| println!("{message}")),
        Query::Top3 => write_to_std_out(engine.top3_transactions_by_amount())?,
        Query::TopSender => {
            if let Some(sender) = engine.top_sender() {
                println!("{sender}");
            }
        }
    }
    Ok(())
}

fn write_to_std_out<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());

    log::debug!("Starting transaction snapshot serialisation");
    for tx in transactions {
        let snapshot = TransactionSnapshot::from(tx);
        log::debug!("Serialising transaction snapshot: {snapshot:?}");
        wtr.serialize(snapshot)?;
    }

    log::debug!("Transaction snapshot serialisation done -> Flushing to stdout");
    wtr.flush()?;

    Ok(())
}
