use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fdx::core::application::{ApplicantDetails, ApplicationReview, ApplicationStatus};
use fdx::core::catalog::{BankChanges, ProductChanges};
use fdx::core::filter::FilterCriteria;
use fdx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Bank fields. On edit, omitted flags keep the stored value and an empty
/// value clears it.
#[derive(Args)]
struct BankArgs {
    /// Bank name (required when adding)
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    website: Option<String>,
    /// Contact phone number
    #[arg(long)]
    contact: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl From<BankArgs> for BankChanges {
    fn from(args: BankArgs) -> Self {
        BankChanges {
            name: args.name,
            description: args.description,
            website: args.website,
            contact_number: args.contact,
            email: args.email,
        }
    }
}

/// Product fields. Bank, name, type, rate and tenure are required when adding.
#[derive(Args)]
struct ProductArgs {
    /// ID of the bank offering the product
    #[arg(long = "bank")]
    bank_id: Option<i64>,
    #[arg(long)]
    name: Option<String>,
    /// Product type, e.g. "Fixed Deposit"
    #[arg(short = 't', long = "type")]
    product_type: Option<String>,
    /// Annual interest rate in percent
    #[arg(short, long)]
    rate: Option<f64>,
    #[arg(long)]
    min_deposit: Option<f64>,
    /// Maximum deposit; 0 removes the limit
    #[arg(long)]
    max_deposit: Option<f64>,
    /// Tenure, e.g. "12 months"
    #[arg(long)]
    tenure: Option<String>,
    #[arg(long)]
    overview: Option<String>,
    /// Key feature; repeat for several
    #[arg(long = "feature")]
    features: Vec<String>,
    #[arg(long)]
    withdrawal_rules: Option<String>,
    #[arg(long)]
    eligibility: Option<String>,
    /// Required document; repeat for several
    #[arg(long = "document")]
    documents: Vec<String>,
    /// Compounding frequency, e.g. "Quarterly"
    #[arg(long)]
    compounding: Option<String>,
    #[arg(long)]
    penalty: Option<String>,
}

/// Joins repeated flag values into the backend's `|`-separated form.
fn pipe_list(items: Vec<String>) -> Option<String> {
    (!items.is_empty()).then(|| items.join("|"))
}

impl From<ProductArgs> for ProductChanges {
    fn from(args: ProductArgs) -> Self {
        ProductChanges {
            bank_id: args.bank_id,
            name: args.name,
            product_type: args.product_type,
            interest_rate: args.rate,
            min_deposit: args.min_deposit,
            max_deposit: args.max_deposit,
            tenure: args.tenure,
            product_overview: args.overview,
            key_features: pipe_list(args.features),
            withdrawal_rules: args.withdrawal_rules,
            eligibility_criteria: args.eligibility,
            required_documents: pipe_list(args.documents),
            compounding_frequency: args.compounding,
            premature_withdrawal_penalty: args.penalty,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List deposit products, optionally filtered
    Products {
        /// Part of the bank name (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
        /// Exact product type, e.g. "Fixed Deposit"
        #[arg(short = 't', long = "type")]
        product_type: Option<String>,
        /// Tenure bucket, e.g. "12 months"
        #[arg(long)]
        tenure: Option<String>,
    },
    /// Show a product with estimated returns
    Product { id: i64 },
    /// Estimate maturity amounts without contacting the backend
    Estimate {
        /// Annual interest rate in percent, e.g. 7.5
        #[arg(short, long)]
        rate: f64,
        /// Tenure, e.g. "24 months" or "5 years"
        #[arg(long)]
        tenure: String,
        /// Deposit amount; repeat for several. Defaults to the configured amounts
        #[arg(short, long = "principal")]
        principals: Vec<f64>,
    },
    /// List banks
    Banks,
    /// List applications
    Applications {
        /// Only show applications with this status
        #[arg(short, long)]
        status: Option<ApplicationStatus>,
    },
    /// Show one application
    Application { id: i64 },
    /// Apply for a product
    Apply {
        product_id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        /// Deposit amount
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        email: Option<String>,
        /// National ID number
        #[arg(long)]
        nid: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Approve or reject an application
    Review {
        id: i64,
        /// approve, reject or pending
        status: ApplicationStatus,
        /// Name of the reviewer
        #[arg(long = "by", default_value = "Admin")]
        reviewed_by: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Add a bank
    AddBank(BankArgs),
    /// Change a bank's details
    EditBank {
        id: i64,
        #[command(flatten)]
        bank: BankArgs,
    },
    /// Add a deposit product
    AddProduct(ProductArgs),
    /// Change a product's details
    EditProduct {
        id: i64,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Delete a bank and its products
    DeleteBank { id: i64 },
    /// Delete a product
    DeleteProduct { id: i64 },
}

impl From<Commands> for fdx::AppCommand {
    fn from(cmd: Commands) -> fdx::AppCommand {
        match cmd {
            Commands::Products {
                search,
                product_type,
                tenure,
            } => fdx::AppCommand::Products(FilterCriteria {
                search,
                product_type,
                tenure,
            }),
            Commands::Product { id } => fdx::AppCommand::Product { id },
            Commands::Estimate {
                rate,
                tenure,
                principals,
            } => fdx::AppCommand::Estimate {
                rate,
                tenure,
                principals,
            },
            Commands::Banks => fdx::AppCommand::Banks,
            Commands::Applications { status } => fdx::AppCommand::Applications { status },
            Commands::Application { id } => fdx::AppCommand::Application { id },
            Commands::Apply {
                product_id,
                name,
                phone,
                amount,
                email,
                nid,
                address,
                notes,
            } => fdx::AppCommand::Apply {
                product_id,
                applicant: ApplicantDetails {
                    name,
                    phone,
                    email,
                    nid_number: nid,
                    address,
                    deposit_amount: amount,
                    notes,
                },
            },
            Commands::Review {
                id,
                status,
                reviewed_by,
                notes,
            } => fdx::AppCommand::Review {
                id,
                review: ApplicationReview {
                    status: Some(status),
                    notes,
                    reviewed_by: Some(reviewed_by),
                },
            },
            Commands::AddBank(bank) => fdx::AppCommand::AddBank(bank.into()),
            Commands::EditBank { id, bank } => fdx::AppCommand::EditBank {
                id,
                changes: bank.into(),
            },
            Commands::AddProduct(product) => fdx::AppCommand::AddProduct(product.into()),
            Commands::EditProduct { id, product } => fdx::AppCommand::EditProduct {
                id,
                changes: product.into(),
            },
            Commands::DeleteBank { id } => fdx::AppCommand::DeleteBank { id },
            Commands::DeleteProduct { id } => fdx::AppCommand::DeleteProduct { id },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fdx::cli::setup::setup(),
        Some(cmd) => fdx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
