use anyhow::{Context, Result};
use chrono::{Local, Utc};
use console::{style, Emoji};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Select};
use std::fmt;
use tracing::{error, info, warn};

use crate::{
    cli::args::*,
    io::{self, json::ExportBundle},
    models::{
        cart::Discount,
        inventory::AdjustmentReason,
        product::{Product, ProductCategory, ProductFilter, StockStatus, StoreProductRequest},
        sale::PaymentMethod,
    },
    pricing::{compute_order_totals, format_currency, CurrencyFormat},
    services::{
        cart_service, catalog_service, customer_service, dashboard_service, draft_service,
        inventory_service, procurement_service, CheckoutError,
    },
    store::{seed_state, Command, Coordinator, StoreError},
    utils::{
        config::Config,
        formatting::*,
        validation::{parse_amount, parse_discount, parse_quote_line},
    },
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

#[derive(Clone, Copy, PartialEq)]
enum SessionAction {
    AddItem,
    ChangeQuantity,
    RemoveLine,
    LineDiscount,
    OrderDiscount,
    Surcharge,
    AttachCustomer,
    SplitOrder,
    SaveDraft,
    ResumeDraft,
    Checkout,
    ClearCart,
    Quit,
}

impl SessionAction {
    const ALL: [SessionAction; 13] = [
        SessionAction::AddItem,
        SessionAction::ChangeQuantity,
        SessionAction::RemoveLine,
        SessionAction::LineDiscount,
        SessionAction::OrderDiscount,
        SessionAction::Surcharge,
        SessionAction::AttachCustomer,
        SessionAction::SplitOrder,
        SessionAction::SaveDraft,
        SessionAction::ResumeDraft,
        SessionAction::Checkout,
        SessionAction::ClearCart,
        SessionAction::Quit,
    ];
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionAction::AddItem => "Add item",
            SessionAction::ChangeQuantity => "Change quantity",
            SessionAction::RemoveLine => "Remove line",
            SessionAction::LineDiscount => "Line discount",
            SessionAction::OrderDiscount => "Order discount",
            SessionAction::Surcharge => "Surcharge",
            SessionAction::AttachCustomer => "Attach customer",
            SessionAction::SplitOrder => "Split order",
            SessionAction::SaveDraft => "Save as draft",
            SessionAction::ResumeDraft => "Resume draft",
            SessionAction::Checkout => "Checkout",
            SessionAction::ClearCart => "Clear cart",
            SessionAction::Quit => "Quit",
        };
        write!(f, "{}", label)
    }
}

const PAYMENT_CHOICES: [&str; 4] = ["Cash", "Card", "Transfer", "House account (credit)"];

pub struct CliApp {
    store: Coordinator,
    config: Config,
    currency: CurrencyFormat,
}

impl CliApp {
    pub fn new(config: Config) -> Result<Self> {
        let state = seed_state(config.store_settings(), Utc::now())
            .context("Failed to build the demo store")?;
        let currency = config.currency();

        info!(
            "Store '{}' ready with {} products",
            state.settings.store_name,
            state.products.len()
        );

        Ok(Self {
            store: Coordinator::new(state),
            config,
            currency,
        })
    }

    pub async fn run(&mut self, args: Args) -> Result<()> {
        match args.command {
            Commands::Catalog { command } => self.handle_catalog_command(command).await,
            Commands::Quote {
                lines,
                discount,
                surcharge,
            } => self.handle_quote(lines, discount, surcharge),
            Commands::Inventory { command } => self.handle_inventory_command(command),
            Commands::Suppliers { command } => self.handle_supplier_command(command),
            Commands::Purchases { command } => self.handle_purchase_command(command),
            Commands::Customers { command } => self.handle_customer_command(command),
            Commands::Dashboard { today } => self.handle_dashboard(today),
            Commands::Session => self.handle_session(),
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn resolve_sku(&self, sku: &str) -> Option<&Product> {
        let product = self.store.state().product_by_sku(sku);
        if product.is_none() {
            println!("{} No product with SKU '{}'", CROSS, style(sku).red());
        }
        product
    }

    // Applies a command and reports a rejection to the user.
    fn apply(&mut self, command: Command) -> bool {
        match self.store.dispatch(command) {
            Ok(_) => true,
            Err(e) => {
                println!("{} {}", CROSS, style(&e).red());
                error!("Command failed: {}", e);
                false
            }
        }
    }

    // Catalog Commands
    async fn handle_catalog_command(&mut self, command: CatalogCommands) -> Result<()> {
        match command {
            CatalogCommands::List {
                category,
                status,
                page,
                page_size,
            } => self.handle_list_products(category, status, page, page_size).await,
            CatalogCommands::Search { query } => {
                let filter = ProductFilter::new().with_search(query.clone());
                let products = catalog_service::search(self.store.state(), &filter);
                if products.is_empty() {
                    println!("{} No products match '{}'", INFO, query);
                } else {
                    println!(
                        "{} {}",
                        INFO,
                        style(format!("Found {} products", products.len())).bold()
                    );
                    println!("{}", format_product_table(&products, &self.currency));
                }
                Ok(())
            }
            CatalogCommands::Show { sku } => {
                let state = self.store.state();
                if let Some(product) = self.resolve_sku(&sku) {
                    println!("{} {}", INFO, style("Product Details").bold().cyan());
                    println!("{}", format_product_detail(product, &self.currency));

                    let history = inventory_service::history(state, &product.id);
                    if !history.is_empty() {
                        println!("{}", style("Stock history").bold());
                        println!("{}", format_adjustment_table(state, &history));
                    }
                }
                Ok(())
            }
            CatalogCommands::Add {
                sku,
                name,
                category,
                price,
                cost,
                stock,
            } => self.handle_add_product(sku, name, category, price, cost, stock),
            CatalogCommands::Export { format, output } => self.handle_export(format, output).await,
            CatalogCommands::Import { file } => self.handle_import(file).await,
        }
    }

    async fn handle_list_products(
        &self,
        category: Option<Category>,
        status: Option<StockLevel>,
        page: usize,
        page_size: usize,
    ) -> Result<()> {
        let state = self.store.state();

        if category.is_some() || status.is_some() {
            let mut filter = ProductFilter::new();
            if let Some(category) = category {
                filter = filter.with_category(to_model_category(category));
            }
            if let Some(status) = status {
                filter = filter.with_stock_status(match status {
                    StockLevel::InStock => StockStatus::InStock,
                    StockLevel::Low => StockStatus::LowStock,
                    StockLevel::Out => StockStatus::OutOfStock,
                });
            }

            let products = catalog_service::search(state, &filter);
            if products.is_empty() {
                println!("{} No products found", INFO);
            } else {
                println!("{}", format_product_table(&products, &self.currency));
            }
            return Ok(());
        }

        let page_size = page_size.max(1);
        let offset = page.saturating_sub(1) * page_size;
        let products =
            catalog_service::load_more(state, offset, page_size, self.config.latency()).await;

        if products.is_empty() {
            println!("{} No products on page {}", INFO, page);
            return Ok(());
        }

        let refs: Vec<&Product> = products.iter().collect();
        println!("{}", format_product_table(&refs, &self.currency));
        let pages = (state.products.len() + page_size - 1) / page_size;
        println!(
            "{}",
            style(format!("Page {} of {} ({} products)", page, pages, state.products.len())).dim()
        );
        if page < pages {
            println!(
                "Use {} for more",
                style(format!("pos-cli catalog list --page {}", page + 1)).cyan()
            );
        }
        Ok(())
    }

    fn handle_add_product(
        &mut self,
        sku: Option<String>,
        name: Option<String>,
        category: Option<Category>,
        price: Option<f64>,
        cost: Option<f64>,
        stock: Option<u32>,
    ) -> Result<()> {
        let theme = ColorfulTheme::default();

        let sku = match sku {
            Some(sku) => sku,
            None => Input::with_theme(&theme)
                .with_prompt("SKU")
                .interact_text()?,
        };
        let name = match name {
            Some(name) => name,
            None => Input::with_theme(&theme)
                .with_prompt("Name")
                .interact_text()?,
        };
        let category = match category {
            Some(category) => to_model_category(category),
            None => {
                let index = Select::with_theme(&theme)
                    .with_prompt("Category")
                    .items(&ProductCategory::ALL)
                    .default(0)
                    .interact()?;
                ProductCategory::ALL[index]
            }
        };
        let price = match price {
            Some(price) => price,
            None => prompt_amount(&theme, "Price")?,
        };
        let cost = match cost {
            Some(cost) => cost,
            None => prompt_amount(&theme, "Cost")?,
        };
        let stock = match stock {
            Some(stock) => stock,
            None => Input::with_theme(&theme)
                .with_prompt("Opening stock")
                .default(0u32)
                .interact_text()?,
        };

        let request = StoreProductRequest {
            sku: sku.trim().to_uppercase(),
            name,
            category,
            price,
            cost,
            stock,
            low_stock_threshold: None,
            icon: None,
            supplier_id: None,
        };
        let sku = request.sku.clone();

        if self.apply(Command::AddProduct(request)) {
            println!("{} Product added successfully!", CHECKMARK);
            if let Some(product) = self.store.state().product_by_sku(&sku) {
                println!("{}", format_product_detail(product, &self.currency));
                info!("Product added: {}", product.sku);
            }
        }
        Ok(())
    }

    async fn handle_export(&self, format: ExportFormat, output: Option<String>) -> Result<()> {
        let state = self.store.state();
        let path = output.unwrap_or_else(|| format!("products.{}", format));

        // Stand-in for the upload round trip.
        tokio::time::sleep(self.config.latency()).await;

        let result = match format {
            ExportFormat::Csv => io::csv::write_products(&path, &state.products)
                .await
                .map_err(anyhow::Error::from),
            ExportFormat::Json => {
                let bundle = ExportBundle::from_state(state, Utc::now());
                io::json::write_bundle(&path, &bundle).await
            }
        };

        match result {
            Ok(()) => {
                println!(
                    "{} Exported {} products to {}",
                    CHECKMARK,
                    state.products.len(),
                    style(&path).green()
                );
            }
            Err(e) => {
                println!("{} Export failed: {}", CROSS, style(&e).red());
                error!("Export to {} failed: {}", path, e);
            }
        }
        Ok(())
    }

    async fn handle_import(&mut self, file: String) -> Result<()> {
        let rows = match io::csv::read_products(&file).await {
            Ok(rows) => rows,
            Err(e) => {
                println!("{} Could not read {}: {}", CROSS, file, style(&e).red());
                error!("Import from {} failed: {}", file, e);
                return Ok(());
            }
        };

        let before = self.store.state().products.len();
        let row_count = rows.len();
        if self.apply(Command::ImportProducts(rows)) {
            let state = self.store.state();
            let created = state.products.len() - before;
            println!(
                "{} Imported {} rows ({} new, {} updated)",
                CHECKMARK,
                row_count,
                created,
                row_count - created
            );
            let products: Vec<&Product> = state.products.iter().collect();
            println!("{}", format_product_table(&products, &self.currency));
        }
        Ok(())
    }

    fn handle_quote(
        &self,
        lines: Vec<String>,
        discount: Option<String>,
        surcharge: Option<String>,
    ) -> Result<()> {
        let lines = lines
            .iter()
            .map(|line| parse_quote_line(line))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid quote line")?;
        let discount = discount.as_deref().and_then(parse_discount);
        let surcharge = surcharge.as_deref().and_then(parse_amount).unwrap_or(0.0);

        let totals = compute_order_totals(&lines, discount.as_ref(), surcharge);

        println!("{} {}", INFO, style("Quote").bold().cyan());
        println!("{}", format_quote_table(&lines, &self.currency));
        if let Some(discount) = discount {
            println!("Order discount: {}", style(discount).yellow());
        }
        println!("{}", format_totals(&totals, &self.currency));
        Ok(())
    }

    // Inventory Commands
    fn handle_inventory_command(&mut self, command: InventoryCommands) -> Result<()> {
        match command {
            InventoryCommands::List => {
                let state = self.store.state();
                let products: Vec<&Product> = state.products.iter().collect();
                println!("{}", format_product_table(&products, &self.currency));
                println!(
                    "Stock value at cost: {}",
                    style(format_currency(
                        inventory_service::stock_value(state),
                        &self.currency
                    ))
                    .green()
                );
            }
            InventoryCommands::Adjust {
                sku,
                delta,
                reason,
                note,
            } => {
                let product_id = match self.resolve_sku(&sku) {
                    Some(product) => product.id,
                    None => return Ok(()),
                };
                let reason = match reason {
                    Reason::Restock => AdjustmentReason::Restock,
                    Reason::Damage => AdjustmentReason::Damage,
                    Reason::Correction => AdjustmentReason::Correction,
                    Reason::Return => AdjustmentReason::Return,
                };

                if self.apply(Command::AdjustStock {
                    product_id,
                    delta,
                    reason,
                    note,
                    at: Utc::now(),
                }) {
                    if let Some(product) = self.store.state().product(&product_id) {
                        println!(
                            "{} {} stock is now {}",
                            CHECKMARK,
                            style(&product.name).green(),
                            style(product.stock).bold()
                        );
                    }
                }
            }
            InventoryCommands::Low => {
                let products = inventory_service::low_stock(self.store.state());
                if products.is_empty() {
                    println!("{} Every product is above its alert level", CHECKMARK);
                } else {
                    println!(
                        "{} {}",
                        WARNING,
                        style(format!("{} products need restocking", products.len())).yellow()
                    );
                    println!("{}", format_product_table(&products, &self.currency));
                }
            }
        }
        Ok(())
    }

    fn handle_supplier_command(&self, command: SupplierCommands) -> Result<()> {
        match command {
            SupplierCommands::List => {
                let suppliers = &self.store.state().suppliers;
                if suppliers.is_empty() {
                    println!("{} No suppliers", INFO);
                } else {
                    println!("{}", format_supplier_table(suppliers));
                }
            }
        }
        Ok(())
    }

    fn handle_purchase_command(&self, command: PurchaseCommands) -> Result<()> {
        match command {
            PurchaseCommands::List { open } => {
                let state = self.store.state();
                let orders = if open {
                    procurement_service::outstanding(state)
                } else {
                    state.purchase_orders.iter().collect()
                };

                if orders.is_empty() {
                    println!("{} No purchase orders", INFO);
                } else {
                    println!(
                        "{}",
                        format_purchase_order_table(state, &orders, &self.currency)
                    );
                }
            }
        }
        Ok(())
    }

    fn handle_customer_command(&self, command: CustomerCommands) -> Result<()> {
        match command {
            CustomerCommands::List { search } => {
                let customers =
                    customer_service::search(self.store.state(), search.as_deref().unwrap_or(""));
                if customers.is_empty() {
                    println!("{} No customers found", INFO);
                } else {
                    println!("{}", format_customer_table(&customers, &self.currency));
                }
            }
        }
        Ok(())
    }

    fn handle_dashboard(&self, today: bool) -> Result<()> {
        let state = self.store.state();
        let day = today.then(|| Local::now().date_naive());
        let summary = dashboard_service::summarize(state, day);

        println!(
            "{} {}",
            INFO,
            style(format!("{} dashboard", state.settings.store_name)).bold().cyan()
        );
        println!("{}", format_dashboard(&summary, &self.currency));

        let recent: Vec<_> = state
            .sales
            .iter()
            .rev()
            .filter(|sale| day.map_or(true, |d| dashboard_service::sale_day(sale) == d))
            .take(10)
            .collect();
        if !recent.is_empty() {
            println!("{}", style("Recent sales").bold());
            println!("{}", format_sale_table(&recent, &self.currency));
        }
        Ok(())
    }

    fn handle_config_command(&self, command: ConfigCommands) -> Result<()> {
        match command {
            ConfigCommands::Show => {
                println!("{} {}", INFO, style("Configuration").bold().cyan());
                println!("Store: {}", style(&self.config.store_name).green());
                println!("Currency: {}", style(&self.config.currency_code).green());
                println!("Environment: {}", style(&self.config.environment).green());
                println!("Log level: {}", style(&self.config.log_level).green());
                println!(
                    "Simulated latency: {}",
                    style(format!("{} ms", self.config.simulated_latency_ms)).green()
                );
                println!(
                    "Low stock threshold: {}",
                    style(self.config.low_stock_threshold).green()
                );
            }
        }
        Ok(())
    }

    // Register session
    fn handle_session(&mut self) -> Result<()> {
        println!(
            "{} {}",
            ROCKET,
            style(format!("{} register", self.store.state().settings.store_name))
                .bold()
                .cyan()
        );
        let theme = ColorfulTheme::default();

        loop {
            self.print_cart();

            let choice = Select::with_theme(&theme)
                .with_prompt("Action")
                .items(&SessionAction::ALL)
                .default(0)
                .interact()?;

            match SessionAction::ALL[choice] {
                SessionAction::AddItem => self.session_add_item(&theme)?,
                SessionAction::ChangeQuantity => {
                    if let Some(index) = self.pick_line(&theme)? {
                        let quantity: u32 = Input::with_theme(&theme)
                            .with_prompt("Quantity (0 removes the line)")
                            .interact_text()?;
                        self.apply(Command::SetQuantity { index, quantity });
                    }
                }
                SessionAction::RemoveLine => {
                    if let Some(index) = self.pick_line(&theme)? {
                        self.apply(Command::RemoveLine { index });
                    }
                }
                SessionAction::LineDiscount => {
                    if let Some(index) = self.pick_line(&theme)? {
                        let discount =
                            prompt_discount(&theme, "Line discount (10% or 5000, blank for none)")?;
                        self.apply(Command::SetLineDiscount { index, discount });
                    }
                }
                SessionAction::OrderDiscount => {
                    let discount =
                        prompt_discount(&theme, "Order discount (10% or 5000, blank for none)")?;
                    self.apply(Command::SetOrderDiscount(discount));
                }
                SessionAction::Surcharge => {
                    let text: String = Input::with_theme(&theme)
                        .with_prompt("Surcharge (blank for none)")
                        .allow_empty(true)
                        .interact_text()?;
                    self.apply(Command::SetSurcharge(parse_amount(&text).unwrap_or(0.0)));
                }
                SessionAction::AttachCustomer => self.session_attach_customer(&theme)?,
                SessionAction::SplitOrder => self.session_split_order(&theme)?,
                SessionAction::SaveDraft => {
                    let label: String = Input::with_theme(&theme)
                        .with_prompt("Draft label")
                        .allow_empty(true)
                        .interact_text()?;
                    if self.apply(Command::SaveDraft {
                        label,
                        at: Utc::now(),
                    }) {
                        println!("{} Cart parked as a draft", CHECKMARK);
                    }
                }
                SessionAction::ResumeDraft => self.session_resume_draft(&theme)?,
                SessionAction::Checkout => self.session_checkout(&theme)?,
                SessionAction::ClearCart => {
                    let confirm = Confirm::with_theme(&theme)
                        .with_prompt("Discard every line in the cart?")
                        .default(false)
                        .interact()?;
                    if confirm {
                        self.apply(Command::ClearCart);
                    }
                }
                SessionAction::Quit => {
                    let state = self.store.state();
                    if !state.cart.is_empty() {
                        println!("{} Leaving with an unfinished cart", WARNING);
                        warn!("Session ended with {} cart lines", state.cart.lines.len());
                    }
                    info!(
                        "Session closed after {} commands, {} sales on record",
                        self.store.revision(),
                        state.sales.len()
                    );
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_cart(&self) {
        let state = self.store.state();
        println!();
        if state.cart.is_empty() {
            println!("{} {}", CART, style("Cart is empty").dim());
            return;
        }

        println!("{} {}", CART, style("Current cart").bold());
        println!("{}", format_cart_table(&state.cart, &self.currency));
        if let Some(customer) = state.cart.customer_id.and_then(|id| state.customer(&id)) {
            println!("Customer: {}", style(&customer.name).cyan());
        }
        if let Some(discount) = state.cart.order_discount {
            println!("Order discount: {}", style(discount).yellow());
        }
        println!(
            "{}",
            format_totals(&cart_service::totals(state), &self.currency)
        );
    }

    fn pick_line(&self, theme: &ColorfulTheme) -> Result<Option<usize>> {
        let lines = &self.store.state().cart.lines;
        if lines.is_empty() {
            println!("{} Cart is empty", WARNING);
            return Ok(None);
        }

        let items: Vec<String> = lines
            .iter()
            .map(|line| format!("{} x{}", line.name, line.quantity))
            .collect();
        let index = Select::with_theme(theme)
            .with_prompt("Line")
            .items(&items)
            .default(0)
            .interact()?;
        Ok(Some(index))
    }

    fn session_add_item(&mut self, theme: &ColorfulTheme) -> Result<()> {
        let query: String = Input::with_theme(theme)
            .with_prompt("SKU or name")
            .interact_text()?;

        let state = self.store.state();
        let product_id = match state.product_by_sku(&query) {
            Some(product) => product.id,
            None => {
                let matches =
                    catalog_service::search(state, &ProductFilter::new().with_search(query.clone()));
                match matches.len() {
                    0 => {
                        println!("{} Nothing matches '{}'", CROSS, style(&query).red());
                        return Ok(());
                    }
                    1 => matches[0].id,
                    _ => {
                        let items: Vec<String> = matches
                            .iter()
                            .map(|p| {
                                format!(
                                    "{} {} ({}, {} left)",
                                    icon_glyph(p.icon),
                                    p.name,
                                    format_currency(p.price, &self.currency),
                                    p.stock
                                )
                            })
                            .collect();
                        let index = Select::with_theme(theme)
                            .with_prompt("Product")
                            .items(&items)
                            .default(0)
                            .interact()?;
                        matches[index].id
                    }
                }
            }
        };

        let quantity: u32 = Input::with_theme(theme)
            .with_prompt("Quantity")
            .default(1)
            .interact_text()?;
        self.apply(Command::AddToCart {
            product_id,
            quantity,
        });
        Ok(())
    }

    fn session_attach_customer(&mut self, theme: &ColorfulTheme) -> Result<()> {
        let state = self.store.state();
        let mut items = vec!["(walk-in, no customer)".to_string()];
        items.extend(state.customers.iter().map(|customer| {
            format!(
                "{} (owes {})",
                customer.name,
                format_currency(customer.credit_balance, &self.currency)
            )
        }));

        let index = Select::with_theme(theme)
            .with_prompt("Customer")
            .items(&items)
            .default(0)
            .interact()?;
        let customer_id = index
            .checked_sub(1)
            .map(|i| state.customers[i].id);
        self.apply(Command::AttachCustomer(customer_id));
        Ok(())
    }

    fn session_split_order(&mut self, theme: &ColorfulTheme) -> Result<()> {
        let lines = &self.store.state().cart.lines;
        if lines.len() < 2 {
            println!("{} Need at least two lines to split", WARNING);
            return Ok(());
        }

        let items: Vec<String> = lines
            .iter()
            .map(|line| format!("{} x{}", line.name, line.quantity))
            .collect();
        let indices = MultiSelect::with_theme(theme)
            .with_prompt("Lines to move out (space to select)")
            .items(&items)
            .interact()?;
        let label: String = Input::with_theme(theme)
            .with_prompt("Label for the split order")
            .allow_empty(true)
            .interact_text()?;

        if self.apply(Command::SplitOrder {
            indices,
            label,
            at: Utc::now(),
        }) {
            println!("{} Selected lines moved to a draft", CHECKMARK);
        }
        Ok(())
    }

    fn session_resume_draft(&mut self, theme: &ColorfulTheme) -> Result<()> {
        let drafts = draft_service::list_drafts(self.store.state());
        if drafts.is_empty() {
            println!("{} No drafts saved", INFO);
            return Ok(());
        }

        println!("{}", format_draft_table(&drafts));
        let items: Vec<String> = drafts
            .iter()
            .map(|draft| format!("{} ({} items)", draft.label, draft.cart.item_count()))
            .collect();
        let index = Select::with_theme(theme)
            .with_prompt("Draft")
            .items(&items)
            .default(0)
            .interact()?;
        let id = drafts[index].id;
        self.apply(Command::ResumeDraft(id));
        Ok(())
    }

    fn session_checkout(&mut self, theme: &ColorfulTheme) -> Result<()> {
        let choice = Select::with_theme(theme)
            .with_prompt("Payment method")
            .items(&PAYMENT_CHOICES)
            .default(0)
            .interact()?;

        let payment = match choice {
            0 => {
                let text: String = Input::with_theme(theme)
                    .with_prompt("Cash tendered")
                    .interact_text()?;
                match parse_amount(&text) {
                    Some(tendered) => PaymentMethod::Cash { tendered },
                    None => {
                        println!("{} '{}' is not an amount", CROSS, style(text).red());
                        return Ok(());
                    }
                }
            }
            1 => PaymentMethod::Card,
            2 => PaymentMethod::Transfer,
            _ => PaymentMethod::Credit,
        };

        match self.store.dispatch(Command::Checkout {
            payment,
            at: Utc::now(),
        }) {
            Ok(state) => {
                if let Some(sale) = state.last_sale() {
                    println!("{} Payment accepted", CHECKMARK);
                    println!("{}", format_receipt(sale, &self.currency));
                    info!("Sale {} completed", sale.receipt_number());
                }
            }
            Err(StoreError::Checkout(CheckoutError::InsufficientCash { total, tendered })) => {
                println!(
                    "{} {}",
                    CROSS,
                    style(format!(
                        "Insufficient cash: {} tendered, {} due",
                        format_currency(tendered, &self.currency),
                        format_currency(total, &self.currency)
                    ))
                    .red()
                    .bold()
                );
                warn!("Checkout blocked, tendered {} of {}", tendered, total);
                Confirm::with_theme(theme)
                    .with_prompt("Payment rejected. Return to the cart?")
                    .default(true)
                    .show_default(false)
                    .interact()?;
            }
            Err(e) => {
                println!("{} Checkout failed: {}", CROSS, style(&e).red());
                error!("Checkout failed: {}", e);
            }
        }
        Ok(())
    }
}

fn to_model_category(category: Category) -> ProductCategory {
    match category {
        Category::Coffee => ProductCategory::Coffee,
        Category::Tea => ProductCategory::Tea,
        Category::Bakery => ProductCategory::Bakery,
        Category::Snack => ProductCategory::Snack,
        Category::Meal => ProductCategory::Meal,
        Category::Beverage => ProductCategory::Beverage,
        Category::Grocery => ProductCategory::Grocery,
        Category::Other => ProductCategory::Other,
    }
}

fn prompt_amount(theme: &ColorfulTheme, prompt: &str) -> Result<f64> {
    let text: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), &str> {
            if parse_amount(input).is_some() {
                Ok(())
            } else {
                Err("Enter a non-negative number")
            }
        })
        .interact_text()?;
    Ok(parse_amount(&text).unwrap_or(0.0))
}

fn prompt_discount(theme: &ColorfulTheme, prompt: &str) -> Result<Option<Discount>> {
    let text: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(parse_discount(&text))
}
