use chrono::{DateTime, Local, Utc};
use console::style;
use tabled::{
    settings::{Alignment, Style},
    Table, Tabled,
};

use crate::{
    models::{
        cart::{Cart, CartLine},
        customer::Customer,
        draft::DraftOrder,
        inventory::StockAdjustment,
        product::{Product, ProductIcon, StockStatus},
        sale::Sale,
        supplier::{PurchaseOrder, PurchaseOrderStatus, Supplier},
    },
    pricing::{compute_line_total, format_currency, CurrencyFormat, Totals},
    services::DashboardSummary,
    store::AppState,
};

#[derive(Tabled)]
struct ProductTableRow {
    #[tabled(rename = "SKU")]
    sku: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: u32,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct CartTableRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Item")]
    name: String,
    #[tabled(rename = "Unit Price")]
    unit_price: String,
    #[tabled(rename = "Qty")]
    quantity: u32,
    #[tabled(rename = "Discount")]
    discount: String,
    #[tabled(rename = "Line Total")]
    line_total: String,
}

#[derive(Tabled)]
struct SaleTableRow {
    #[tabled(rename = "Receipt")]
    receipt: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Items")]
    items: u32,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Total")]
    total: String,
}

#[derive(Tabled)]
struct SupplierTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Contact")]
    contact: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Email")]
    email: String,
}

#[derive(Tabled)]
struct PurchaseOrderTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Supplier")]
    supplier: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Units")]
    units: u32,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Created")]
    created: String,
}

#[derive(Tabled)]
struct AdjustmentTableRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Change")]
    delta: String,
    #[tabled(rename = "Reason")]
    reason: String,
    #[tabled(rename = "Note")]
    note: String,
}

#[derive(Tabled)]
struct CustomerTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Owes")]
    balance: String,
}

#[derive(Tabled)]
struct DraftTableRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Items")]
    items: u32,
    #[tabled(rename = "Saved")]
    saved: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());
    table.to_string()
}

fn short_id(id: &uuid::Uuid) -> String {
    format!("{:.8}", id.to_string())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

pub fn format_product_table(products: &[&Product], currency: &CurrencyFormat) -> String {
    render(
        products
            .iter()
            .map(|product| ProductTableRow {
                sku: product.sku.clone(),
                name: format!("{} {}", icon_glyph(product.icon), truncate(&product.name, 30)),
                category: product.category.to_string(),
                price: format_currency(product.price, currency),
                stock: product.stock,
                status: format_stock_status(product.stock_status()),
            })
            .collect(),
    )
}

pub fn format_cart_table(cart: &Cart, currency: &CurrencyFormat) -> String {
    render(
        cart.lines
            .iter()
            .enumerate()
            .map(|(index, line)| cart_row(index, line, currency))
            .collect(),
    )
}

/// Cart lines as shown by `quote`, where lines have no product name.
pub fn format_quote_table(lines: &[CartLine], currency: &CurrencyFormat) -> String {
    render(
        lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let mut row = cart_row(index, line, currency);
                if row.name.is_empty() {
                    row.name = format!("Line {}", index + 1);
                }
                row
            })
            .collect(),
    )
}

fn cart_row(index: usize, line: &CartLine, currency: &CurrencyFormat) -> CartTableRow {
    CartTableRow {
        index: index + 1,
        name: truncate(&line.name, 30),
        unit_price: format_currency(line.unit_price, currency),
        quantity: line.quantity,
        discount: line
            .line_discount
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string()),
        line_total: format_currency(compute_line_total(line), currency),
    }
}

pub fn format_totals(totals: &Totals, currency: &CurrencyFormat) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{:>12}: {}\n",
        "Subtotal",
        format_currency(totals.subtotal, currency)
    ));
    if totals.discount_amount != 0.0 {
        output.push_str(&format!(
            "{:>12}: {}\n",
            "Discount",
            style(format!("-{}", format_currency(totals.discount_amount, currency))).yellow()
        ));
    }
    output.push_str(&format!(
        "{:>12}: {}\n",
        "Tax (10%)",
        format_currency(totals.tax, currency)
    ));
    if totals.surcharge != 0.0 {
        output.push_str(&format!(
            "{:>12}: {}\n",
            "Surcharge",
            format_currency(totals.surcharge, currency)
        ));
    }
    output.push_str(&format!(
        "{:>12}: {}\n",
        "Total",
        style(format_currency(totals.total, currency)).green().bold()
    ));

    output
}

pub fn format_sale_table(sales: &[&Sale], currency: &CurrencyFormat) -> String {
    render(
        sales
            .iter()
            .map(|sale| SaleTableRow {
                receipt: sale.receipt_number(),
                time: format_date(&sale.created_at),
                items: sale.item_count(),
                payment: sale.payment.to_string(),
                total: format_currency(sale.totals.total, currency),
            })
            .collect(),
    )
}

pub fn format_receipt(sale: &Sale, currency: &CurrencyFormat) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}  {}\n",
        style("Receipt").bold(),
        style(sale.receipt_number()).cyan(),
        style(format_date(&sale.created_at)).dim()
    ));
    output.push_str(&format_cart_table(
        &Cart {
            lines: sale.lines.clone(),
            ..Default::default()
        },
        currency,
    ));
    output.push('\n');
    output.push_str(&format_totals(&sale.totals, currency));
    output.push_str(&format!("{:>12}: {}\n", "Paid by", sale.payment));
    if sale.change > 0.0 {
        output.push_str(&format!(
            "{:>12}: {}\n",
            "Change",
            style(format_currency(sale.change, currency)).cyan()
        ));
    }

    output
}

pub fn format_supplier_table(suppliers: &[Supplier]) -> String {
    render(
        suppliers
            .iter()
            .map(|supplier| SupplierTableRow {
                id: short_id(&supplier.id),
                name: supplier.name.clone(),
                contact: supplier.contact_name.clone().unwrap_or_else(|| "-".to_string()),
                phone: supplier.phone.clone().unwrap_or_else(|| "-".to_string()),
                email: supplier.email.clone().unwrap_or_else(|| "-".to_string()),
            })
            .collect(),
    )
}

pub fn format_purchase_order_table(
    state: &AppState,
    orders: &[&PurchaseOrder],
    currency: &CurrencyFormat,
) -> String {
    render(
        orders
            .iter()
            .map(|order| PurchaseOrderTableRow {
                id: short_id(&order.id),
                supplier: state
                    .supplier(&order.supplier_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "(removed)".to_string()),
                status: format_po_status(order.status),
                units: order.unit_count(),
                value: format_currency(order.total_cost(), currency),
                created: format_date_short(&order.created_at),
            })
            .collect(),
    )
}

pub fn format_adjustment_table(state: &AppState, adjustments: &[&StockAdjustment]) -> String {
    render(
        adjustments
            .iter()
            .map(|adjustment| AdjustmentTableRow {
                when: format_date(&adjustment.created_at),
                product: state
                    .product(&adjustment.product_id)
                    .map(|p| p.sku.clone())
                    .unwrap_or_else(|| short_id(&adjustment.product_id)),
                delta: if adjustment.delta > 0 {
                    style(format!("+{}", adjustment.delta)).green().to_string()
                } else {
                    style(adjustment.delta.to_string()).red().to_string()
                },
                reason: adjustment.reason.to_string(),
                note: adjustment.note.clone().unwrap_or_default(),
            })
            .collect(),
    )
}

pub fn format_customer_table(customers: &[&Customer], currency: &CurrencyFormat) -> String {
    render(
        customers
            .iter()
            .map(|customer| CustomerTableRow {
                id: short_id(&customer.id),
                name: customer.name.clone(),
                phone: customer.phone.clone().unwrap_or_else(|| "-".to_string()),
                balance: format_currency(customer.credit_balance, currency),
            })
            .collect(),
    )
}

pub fn format_draft_table(drafts: &[&DraftOrder]) -> String {
    render(
        drafts
            .iter()
            .map(|draft| DraftTableRow {
                id: short_id(&draft.id),
                label: draft.label.clone(),
                items: draft.cart.item_count(),
                saved: format_date(&draft.created_at),
            })
            .collect(),
    )
}

pub fn format_product_detail(product: &Product, currency: &CurrencyFormat) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", style("ID").bold(), style(&product.id).cyan()));
    output.push_str(&format!("{}: {}\n", style("SKU").bold(), style(&product.sku).cyan()));
    output.push_str(&format!(
        "{}: {} {}\n",
        style("Name").bold(),
        icon_glyph(product.icon),
        style(&product.name).green()
    ));
    output.push_str(&format!("{}: {}\n", style("Category").bold(), product.category));
    output.push_str(&format!(
        "{}: {}\n",
        style("Price").bold(),
        format_currency(product.price, currency)
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Cost").bold(),
        style(format_currency(product.cost, currency)).dim()
    ));
    if let Some(margin) = product.margin_percent() {
        output.push_str(&format!("{}: {:.1}%\n", style("Margin").bold(), margin));
    }
    output.push_str(&format!(
        "{}: {} ({}, alert at {})\n",
        style("Stock").bold(),
        product.stock,
        format_stock_status(product.stock_status()),
        product.low_stock_threshold
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Created").bold(),
        style(format_date(&product.created_at)).dim()
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Updated").bold(),
        style(format_date(&product.updated_at)).dim()
    ));

    output
}

pub fn format_dashboard(summary: &DashboardSummary, currency: &CurrencyFormat) -> String {
    let mut output = String::new();

    let period = summary
        .day
        .map(|day| day.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "all time".to_string());
    output.push_str(&format!("{}: {}\n", style("Period").bold(), style(period).cyan()));
    output.push_str(&format!(
        "{}: {}\n",
        style("Revenue").bold(),
        style(format_currency(summary.revenue, currency)).green()
    ));
    output.push_str(&format!("{}: {}\n", style("Orders").bold(), summary.order_count));
    output.push_str(&format!(
        "{}: {}\n",
        style("Average order").bold(),
        format_currency(summary.average_order_value, currency)
    ));
    output.push_str(&format!("{}: {}\n", style("Items sold").bold(), summary.items_sold));

    let low_stock = if summary.low_stock_count > 0 {
        style(summary.low_stock_count.to_string()).red()
    } else {
        style(summary.low_stock_count.to_string()).green()
    };
    output.push_str(&format!("{}: {}\n", style("Low stock").bold(), low_stock));
    output.push_str(&format!(
        "{}: {}\n",
        style("Stock value").bold(),
        format_currency(summary.stock_value, currency)
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Outstanding credit").bold(),
        style(format_currency(summary.outstanding_credit, currency)).yellow()
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Open purchase orders").bold(),
        summary.open_purchase_orders
    ));

    if !summary.top_products.is_empty() {
        output.push_str(&format!("\n{}\n", style("Top products").bold().underlined()));
        for (rank, product) in summary.top_products.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} x{} ({})\n",
                rank + 1,
                product.name,
                product.quantity,
                format_currency(product.revenue, currency)
            ));
        }
    }

    output
}

pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn format_date_short(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%m/%d").to_string()
}

fn format_stock_status(status: StockStatus) -> String {
    match status {
        StockStatus::InStock => style("In Stock").green().to_string(),
        StockStatus::LowStock => style("Low").yellow().to_string(),
        StockStatus::OutOfStock => style("Out").red().to_string(),
    }
}

fn format_po_status(status: PurchaseOrderStatus) -> String {
    match status {
        PurchaseOrderStatus::Draft => style("Draft").dim().to_string(),
        PurchaseOrderStatus::Ordered => style("Ordered").cyan().to_string(),
        PurchaseOrderStatus::Received => style("Received").green().to_string(),
        PurchaseOrderStatus::Cancelled => style("Cancelled").red().to_string(),
    }
}

pub fn icon_glyph(icon: ProductIcon) -> &'static str {
    match icon {
        ProductIcon::Cup => "☕",
        ProductIcon::Leaf => "🍵",
        ProductIcon::Croissant => "🥐",
        ProductIcon::Cookie => "🍪",
        ProductIcon::Bowl => "🍚",
        ProductIcon::Bottle => "🥤",
        ProductIcon::Basket => "🧺",
        ProductIcon::Generic => "📦",
    }
}
