use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;

#[derive(Parser)]
#[command(name = "pos-cli")]
#[command(about = "A point-of-sale terminal for cafes and small shops")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a .env style configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Product catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Price a list of lines without touching the catalog
    Quote {
        /// Lines as PRICExQTY or PRICExQTY@DISCOUNT, e.g. 35000x2 100000x1@10%
        #[arg(required = true)]
        lines: Vec<String>,
        /// Order discount, e.g. 10% or 5000
        #[arg(short, long)]
        discount: Option<String>,
        /// Flat surcharge added after tax
        #[arg(short, long)]
        surcharge: Option<String>,
    },
    /// Stock levels and adjustments
    Inventory {
        #[command(subcommand)]
        command: InventoryCommands,
    },
    /// Supplier directory
    Suppliers {
        #[command(subcommand)]
        command: SupplierCommands,
    },
    /// Purchase orders
    Purchases {
        #[command(subcommand)]
        command: PurchaseCommands,
    },
    /// House account customers
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Sales summary
    Dashboard {
        /// Only count today's sales
        #[arg(short, long)]
        today: bool,
    },
    /// Interactive register session
    Session,
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List products a page at a time
    List {
        /// Filter by category
        #[arg(long)]
        category: Option<Category>,
        /// Filter by stock status
        #[arg(short, long)]
        status: Option<StockLevel>,
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Products per page
        #[arg(long, default_value_t = 20)]
        page_size: usize,
    },
    /// Search products by name or SKU
    Search {
        /// Search query
        query: String,
    },
    /// Show detailed information about a product
    Show {
        /// Product SKU
        sku: String,
    },
    /// Add a new product (prompts for anything not given)
    Add {
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        cost: Option<f64>,
        #[arg(long)]
        stock: Option<u32>,
    },
    /// Export the catalog
    Export {
        /// Output format
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
        /// Output file path
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Import products from a CSV file
    Import {
        /// Input file path
        #[arg(short, long)]
        file: String,
    },
}

#[derive(Subcommand)]
pub enum InventoryCommands {
    /// Show stock for every product
    List,
    /// Adjust stock for a product
    Adjust {
        /// Product SKU
        sku: String,
        /// Change in units, negative to remove stock
        #[arg(allow_hyphen_values = true)]
        delta: i64,
        /// Reason for the change
        #[arg(short, long, default_value = "correction")]
        reason: Reason,
        /// Free text note
        #[arg(short, long)]
        note: Option<String>,
    },
    /// Products at or below their alert level
    Low,
}

#[derive(Subcommand)]
pub enum SupplierCommands {
    /// List suppliers
    List,
}

#[derive(Subcommand)]
pub enum PurchaseCommands {
    /// List purchase orders
    List {
        /// Only orders not yet received or cancelled
        #[arg(short, long)]
        open: bool,
    },
}

#[derive(Subcommand)]
pub enum CustomerCommands {
    /// List customers and what they owe
    List {
        /// Filter by name or phone
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Category {
    Coffee,
    Tea,
    Bakery,
    Snack,
    Meal,
    Beverage,
    Grocery,
    Other,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Coffee => write!(f, "coffee"),
            Category::Tea => write!(f, "tea"),
            Category::Bakery => write!(f, "bakery"),
            Category::Snack => write!(f, "snack"),
            Category::Meal => write!(f, "meal"),
            Category::Beverage => write!(f, "beverage"),
            Category::Grocery => write!(f, "grocery"),
            Category::Other => write!(f, "other"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StockLevel {
    InStock,
    Low,
    Out,
}

impl fmt::Display for StockLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockLevel::InStock => write!(f, "in_stock"),
            StockLevel::Low => write!(f, "low"),
            StockLevel::Out => write!(f, "out"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Reason {
    Restock,
    Damage,
    Correction,
    Return,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Restock => write!(f, "restock"),
            Reason::Damage => write!(f, "damage"),
            Reason::Correction => write!(f, "correction"),
            Reason::Return => write!(f, "return"),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
        }
    }
}
