use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

use crate::application::{LedgerService, Section};
use crate::domain::{format_cents, parse_cents, EntryType, PaymentMethod, Reconciliation};
use crate::io::{ClaimImporter, Exporter};

/// Tallybook - customer ledger with reconciliation and analytics
#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "Track customer credit/debit ledgers, reconcile them, and see who owes what")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "tallybook.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init {
        /// Name of the business whose books this database holds
        #[arg(default_value = "My Business")]
        business: String,
    },

    /// Customer management commands
    #[command(subcommand)]
    Customer(CustomerCommands),

    /// Record a credit entry (reduces what the customer owes)
    Credit {
        /// Customer name
        customer: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Description of the entry
        #[arg(short, long)]
        description: Option<String>,

        /// Receipt/invoice image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Date of the entry (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a debit entry (increases what the customer owes)
    Debit {
        /// Customer name
        customer: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Description of the entry
        #[arg(short, long)]
        description: Option<String>,

        /// Receipt/invoice image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Date of the entry (YYYY-MM-DD, defaults to now)
        #[arg(long)]
        date: Option<String>,
    },

    /// Record a payment against a customer's outstanding balance
    Payment {
        /// Customer name
        customer: String,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Payment method: cash, card, bank_transfer, other
        #[arg(short, long, default_value = "cash")]
        method: String,

        /// External reference (receipt number, transaction id)
        #[arg(short, long)]
        reference: Option<String>,
    },

    /// Show a customer's balance, or every customer's balance
    Balance {
        /// Customer name (omit for all customers)
        customer: Option<String>,
    },

    /// Show the business analytics dashboard
    Dashboard,

    /// Reconcile an external outstanding-balances file against the ledger
    Reconcile {
        /// Path to the claims file (comma-separated: name, amount)
        file: String,

        /// Also write the reconciliation report to a CSV file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Plan payment reminders for customers who owe the business
    Reminders,

    /// Export data
    #[command(subcommand)]
    Export(ExportCommands),
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// Add a new customer
    Add {
        /// Customer name
        name: String,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,

        /// Relationship type (e.g., "regular", "wholesale")
        #[arg(short, long)]
        relationship: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,
    },

    /// List all customers
    List,
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export per-customer balances to CSV
    Balances {
        /// Output file path
        #[arg(short, long, default_value = "balances.csv")]
        output: String,
    },

    /// Export the whole ledger as a JSON snapshot
    Snapshot {
        /// Output file path
        #[arg(short, long, default_value = "tallybook.json")]
        output: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init { business } => {
                LedgerService::init(&self.database, &business).await?;
                println!("Database initialized: {} ({})", self.database, business);
            }

            Commands::Customer(customer_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_customer_command(&service, customer_cmd).await?;
            }

            Commands::Credit {
                customer,
                amount,
                description,
                image_url,
                date,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                record_entry(
                    &service,
                    &customer,
                    EntryType::Credit,
                    &amount,
                    description,
                    image_url,
                    date,
                )
                .await?;
            }

            Commands::Debit {
                customer,
                amount,
                description,
                image_url,
                date,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                record_entry(
                    &service,
                    &customer,
                    EntryType::Debit,
                    &amount,
                    description,
                    image_url,
                    date,
                )
                .await?;
            }

            Commands::Payment {
                customer,
                amount,
                method,
                reference,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let method = PaymentMethod::from_str(&method)
                    .with_context(|| format!("Unknown payment method '{}'", method))?;

                let payment = service
                    .record_payment(&customer, amount_cents, method, reference)
                    .await?;
                println!(
                    "Recorded payment: {} from {} ({})",
                    format_cents(payment.amount_cents),
                    customer,
                    payment.method
                );
            }

            Commands::Balance { customer } => {
                let service = LedgerService::connect(&self.database).await?;
                run_balance_command(&service, customer).await?;
            }

            Commands::Dashboard => {
                let service = LedgerService::connect(&self.database).await?;
                run_dashboard_command(&service).await?;
            }

            Commands::Reconcile { file, output } => {
                let service = LedgerService::connect(&self.database).await?;
                run_reconcile_command(&service, &file, output).await?;
            }

            Commands::Reminders => {
                let service = LedgerService::connect(&self.database).await?;
                run_reminders_command(&service).await?;
            }

            Commands::Export(export_cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_export_command(&service, export_cmd).await?;
            }
        }

        Ok(())
    }
}

async fn run_customer_command(service: &LedgerService, cmd: CustomerCommands) -> Result<()> {
    match cmd {
        CustomerCommands::Add {
            name,
            email,
            phone,
            relationship,
            notes,
        } => {
            let customer = service
                .create_customer(name, email, phone, relationship, notes)
                .await?;
            println!("Added customer: {} ({})", customer.name, customer.id);
        }

        CustomerCommands::List => {
            let customers = service.list_customers().await?;
            if customers.is_empty() {
                println!("No customers yet.");
                return Ok(());
            }
            for customer in customers {
                let contact = customer
                    .email
                    .or(customer.phone_number)
                    .unwrap_or_else(|| "-".to_string());
                println!("{:<30} {}", customer.name, contact);
            }
        }
    }
    Ok(())
}

async fn record_entry(
    service: &LedgerService,
    customer: &str,
    entry_type: EntryType,
    amount: &str,
    description: Option<String>,
    image_url: Option<String>,
    date: Option<String>,
) -> Result<()> {
    let amount_cents =
        parse_cents(amount).context("Invalid amount format. Use '50.00' or '50'")?;

    let created_at = match date {
        Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))?
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc(),
        None => Utc::now(),
    };

    let entry = service
        .record_entry(
            customer,
            entry_type,
            amount_cents,
            description,
            image_url,
            created_at,
        )
        .await?;

    println!(
        "Recorded {}: {} for {} ({})",
        entry.entry_type,
        format_cents(entry.amount_cents),
        customer,
        entry.id
    );
    Ok(())
}

async fn run_balance_command(service: &LedgerService, customer: Option<String>) -> Result<()> {
    match customer {
        Some(name) => {
            let balance = service.customer_balance(&name).await?;
            println!("Balance for {}:", name);
            println!("  Debits:      {:>12}", format_cents(balance.total_debits));
            println!("  Credits:     {:>12}", format_cents(balance.total_credits));
            println!("  Payments:    {:>12}", format_cents(balance.total_payments));
            println!(
                "  Outstanding: {:>12}  ({})",
                format_cents(balance.net_outstanding),
                describe_outstanding(balance.net_outstanding)
            );
        }
        None => {
            let customers = service.list_customers().await?;
            let balances = service.business_balances().await?;
            if balances.is_empty() {
                println!("No customers yet.");
                return Ok(());
            }
            for (customer, balance) in customers.iter().zip(&balances) {
                println!(
                    "{:<30} {:>12}",
                    customer.name,
                    format_cents(balance.net_outstanding)
                );
            }
        }
    }
    Ok(())
}

fn describe_outstanding(cents: i64) -> &'static str {
    if cents > 0 {
        "customer owes business"
    } else if cents < 0 {
        "business owes customer"
    } else {
        "settled"
    }
}

async fn run_dashboard_command(service: &LedgerService) -> Result<()> {
    let dashboard = service.load_dashboard().await;

    println!("=== {} ===", service.business().name);
    print_money_section("Total payable   ", &dashboard.payables);
    print_money_section("Total receivable", &dashboard.receivables);
    match dashboard.net_balance() {
        Some(net) => println!("Net balance     : {}", format_cents(net)),
        None => println!("Net balance     : unavailable"),
    }

    match &dashboard.top_customers {
        Section::Loaded(top) if top.is_empty() => {
            println!("\nNo customers with repeat activity yet.");
        }
        Section::Loaded(top) => {
            let customers = service.list_customers().await?;
            println!("\nTop customers:");
            for ranked in top.iter().take(10) {
                let name = customers
                    .iter()
                    .find(|c| c.id == ranked.customer_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("(unknown)");
                println!(
                    "  {:<30} {:>3} entries  {:>12}",
                    name,
                    ranked.entry_count,
                    format_cents(ranked.net_outstanding)
                );
            }
        }
        Section::Unavailable(reason) => {
            println!("\nTop customers unavailable: {}", reason);
        }
    }

    Ok(())
}

fn print_money_section(label: &str, section: &Section<i64>) {
    match section {
        Section::Loaded(cents) => println!("{}: {}", label, format_cents(*cents)),
        Section::Unavailable(reason) => println!("{}: unavailable ({})", label, reason),
    }
}

async fn run_reconcile_command(
    service: &LedgerService,
    path: &str,
    output: Option<String>,
) -> Result<()> {
    let file =
        File::open(path).with_context(|| format!("Cannot open claims file '{}'", path))?;
    let import = ClaimImporter::import(file)?;

    println!(
        "Parsed {} claim(s), skipped {} malformed row(s)",
        import.imported, import.skipped
    );
    for error in &import.errors {
        println!("  skipped {}", error.error);
    }

    let results = service.reconcile_with(&import.claims).await?;
    if results.is_empty() {
        println!("Nothing to reconcile.");
        return Ok(());
    }

    println!();
    for result in &results {
        match result {
            Reconciliation::Matched {
                customer_name,
                computed_cents,
                claimed_cents,
                delta_cents,
                ..
            } => {
                if *delta_cents == 0 {
                    println!("  OK   {:<30} {}", customer_name, format_cents(*computed_cents));
                } else {
                    println!(
                        "  DIFF {:<30} computed {} vs claimed {} (delta {})",
                        customer_name,
                        format_cents(*computed_cents),
                        format_cents(*claimed_cents),
                        format_cents(*delta_cents)
                    );
                }
            }
            Reconciliation::UnmatchedClaim {
                customer_name,
                claimed_cents,
            } => {
                println!(
                    "  ?    {:<30} claimed {} but no such customer",
                    customer_name,
                    format_cents(*claimed_cents)
                );
            }
            Reconciliation::UnmatchedBalance {
                customer_name,
                computed_cents,
                ..
            } => {
                println!(
                    "  ?    {:<30} computed {} but no claim",
                    customer_name,
                    format_cents(*computed_cents)
                );
            }
        }
    }

    let discrepancies = results.iter().filter(|r| !r.is_reconciled()).count();
    println!(
        "\n{} of {} line(s) need review",
        discrepancies,
        results.len()
    );

    if let Some(output) = output {
        let file = File::create(&output)
            .with_context(|| format!("Cannot create output file '{}'", output))?;
        let count = Exporter::new(service).export_reconciliation_csv(&results, file)?;
        println!("Wrote {} report line(s) to {}", count, output);
    }

    Ok(())
}

async fn run_reminders_command(service: &LedgerService) -> Result<()> {
    let plan = service.reminder_plan().await?;
    if plan.to_notify.is_empty() {
        println!("No outstanding balances to remind about.");
        return Ok(());
    }

    let customers = service.list_customers().await?;
    println!("Customers to notify:");
    for id in &plan.to_notify {
        if let Some(customer) = customers.iter().find(|c| c.id == *id) {
            let contact = customer.email.as_deref().unwrap_or("(no email)");
            println!("  {:<30} {}", customer.name, contact);
        }
    }
    println!(
        "\n{} reminder(s) planned. Hand this plan to your dispatcher.",
        plan.to_notify.len()
    );
    Ok(())
}

async fn run_export_command(service: &LedgerService, cmd: ExportCommands) -> Result<()> {
    let exporter = Exporter::new(service);
    match cmd {
        ExportCommands::Balances { output } => {
            let file = File::create(&output)
                .with_context(|| format!("Cannot create output file '{}'", output))?;
            let count = exporter.export_balances_csv(file).await?;
            println!("Exported {} balance(s) to {}", count, output);
        }

        ExportCommands::Snapshot { output } => {
            let mut file = File::create(&output)
                .with_context(|| format!("Cannot create output file '{}'", output))?;
            exporter.export_snapshot_json(&mut file).await?;
            file.flush()?;
            println!("Exported snapshot to {}", output);
        }
    }
    Ok(())
}
