use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use dumbbers_admin::admin::{paise_to_rupees, DEFAULT_PAGE_LIMIT};
use dumbbers_admin::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "dumbbers-admin", version)]
#[command(about = "Admin console for the Dumbbers store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL. Defaults to DUMBBERS_API_BASE or the hosted backend.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Session file. Defaults to DUMBBERS_SESSION_FILE or ~/.dumbbers-admin/session.json.
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    /// Output debug logs to stderr
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in with an admin account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DUMBBERS_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored credential
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Order and product totals
    Dashboard,
    /// Browse orders
    #[command(subcommand)]
    Orders(OrdersCommand),
    /// Manage the product catalog
    #[command(subcommand)]
    Products(ProductsCommand),
}

#[derive(Subcommand, Debug)]
enum OrdersCommand {
    /// List orders
    List {
        #[arg(long)]
        status: Option<OrderStatus>,
        /// Customer object id
        #[arg(long)]
        user: Option<String>,
        /// Earliest order date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Latest order date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        #[command(flatten)]
        paging: Paging,
    },
    /// Show one order
    Show { id: String },
}

#[derive(Subcommand, Debug)]
enum ProductsCommand {
    /// List products
    List {
        /// Search name, brand and tags
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        gender: Option<Gender>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        active: Option<bool>,
        #[command(flatten)]
        paging: Paging,
    },
    /// Show one product as JSON
    Show { id: String },
    /// Create a product from a JSON file
    Create {
        file: PathBuf,
        #[command(flatten)]
        edit: EditOptions,
    },
    /// Replace a product with the contents of a JSON file
    Update {
        id: String,
        file: PathBuf,
        #[command(flatten)]
        edit: EditOptions,
    },
    /// Delete a product
    Delete {
        id: String,
        /// Skip the confirmation refusal
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct Paging {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: u32,
}

#[derive(Args, Debug)]
struct EditOptions {
    /// Copy the first variant's MRP and price to every variant
    #[arg(long)]
    sync_pricing: bool,
}

struct CliNavigator;

impl Navigator for CliNavigator {
    fn navigate(&self, route: Route) {
        match route {
            Route::Login => log::info!("not signed in as an admin"),
            other => log::debug!("navigating to {}", other),
        }
    }
}

fn init_logging(debug: bool) {
    if debug {
        pretty_env_logger::formatted_builder()
            .filter_level(LevelFilter::Debug)
            .init();
    } else {
        pretty_env_logger::init();
    }
}

fn build_console(cli: &Cli) -> anyhow::Result<Console> {
    let mut options = ClientOptions::from_env();
    if let Some(base_url) = &cli.base_url {
        options = options.with_base_url(base_url);
    }
    if let Some(path) = &cli.session_file {
        options = options.with_session_file(path);
    }
    let session = Session::file(&options.session_file);
    Ok(Console::new_with_options(options, session)?)
}

async fn require_admin(console: &Console) -> anyhow::Result<User> {
    let mut mount = console.gate().mount(Arc::new(CliNavigator));
    match mount.settled().await {
        GateState::Ok(user) => Ok(user),
        _ => bail!("admin access required; run `dumbbers-admin login`"),
    }
}

fn read_product(path: &Path, edit: &EditOptions) -> anyhow::Result<Product> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut product: Product = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a product document", path.display()))?;

    if edit.sync_pricing {
        if let Some((mrp, price)) = product.variants.first().map(|v| (v.mrp, v.price)) {
            product.sync_pricing(mrp, price);
        }
    }
    product.clean_images();
    product.validate()?;
    Ok(product)
}

fn print_orders(page: &Page<Order>, requested: u32, limit: u32) {
    println!(
        "{:<26} {:<16} {:>10} {:>5} {:<8} {}",
        "ID", "STATUS", "AMOUNT", "ITEMS", "PAYMENT", "CREATED"
    );
    for order in &page.items {
        println!(
            "{:<26} {:<16} {:>10} {:>5} {:<8} {}",
            order.id,
            order.status,
            format!("₹{}", paise_to_rupees(order.amount_paise)),
            order.item_count(),
            if order.has_payment() { "Paid" } else { "-" },
            order
                .created_at
                .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default()
        );
    }
    if page.items.is_empty() {
        println!("No orders found");
    }
    println!(
        "{} orders, page {} / {}",
        page.total,
        page.current_page(requested),
        page.page_count(limit)
    );
}

fn print_order(order: &Order) {
    println!("Order {}", order.id);
    println!("Status:   {}", order.status);
    println!("Total:    ₹{}", paise_to_rupees(order.amount_paise));
    if let Some(at) = order.created_at {
        println!("Created:  {}", at.format("%Y-%m-%d %H:%M"));
    }

    println!();
    if order.items.is_empty() {
        println!("No items found in this order");
    }
    for item in &order.items {
        println!(
            "  {} ({} / {}) {} x ₹{} = ₹{}",
            item.name,
            item.size,
            item.color,
            item.quantity,
            item.price.round(),
            item.line_total().round()
        );
    }

    println!();
    match &order.shipping_address {
        Some(address) => {
            println!("Ship to:  {}", address.name);
            println!("          {}", address.line1);
            if let Some(line2) = address.line2.as_deref().filter(|l| !l.is_empty()) {
                println!("          {}", line2);
            }
            println!("          {}, {} {}", address.city, address.state, address.pincode);
            println!("Phone:    {}", address.phone);
        }
        None => println!("No shipping address"),
    }

    println!();
    println!("Subtotal: ₹{}", paise_to_rupees(order.subtotal_paise));
    println!("Tax:      ₹{}", paise_to_rupees(order.tax_paise));
    println!("Shipping: ₹{}", paise_to_rupees(order.shipping_paise));
    if order.discount_percent > 0.0 {
        println!(
            "Discount ({}%): -₹{}",
            order.discount_percent,
            paise_to_rupees(order.discount_paise())
        );
    }
    println!("Total:    ₹{}", paise_to_rupees(order.amount_paise));
}

fn print_products(page: &Page<Product>, requested: u32, limit: u32) {
    println!(
        "{:<26} {:<32} {:<12} {:<7} {:>8} {}",
        "ID", "NAME", "CATEGORY", "GENDER", "VARIANTS", "ACTIVE"
    );
    for product in &page.items {
        println!(
            "{:<26} {:<32} {:<12} {:<7} {:>8} {}",
            product.id.as_deref().unwrap_or("-"),
            product.name,
            product.category,
            product.gender,
            product.variants.len(),
            if product.is_active.unwrap_or(false) { "Yes" } else { "No" }
        );
    }
    if page.items.is_empty() {
        println!("No products");
    }
    println!(
        "{} products, page {} / {}",
        page.total,
        page.current_page(requested),
        page.page_count(limit)
    );
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let console = build_console(&cli)?;
    let navigator = CliNavigator;

    match cli.command {
        Command::Login { email, password } => {
            console.sign_in(&email, &password, &navigator).await?;
            println!("Signed in as {}", email);
        }
        Command::Logout => {
            console.logout(&navigator)?;
            println!("Signed out");
        }
        Command::Whoami => {
            let user = require_admin(&console).await?;
            println!(
                "{} ({})",
                user.email.as_deref().unwrap_or("<unknown>"),
                user.role.as_deref().unwrap_or("<none>")
            );
        }
        Command::Dashboard => {
            require_admin(&console).await?;
            let stats = console.admin().dashboard_stats().await?;
            println!("Total orders: {}", stats.orders_count);
            println!("Products:     {}", stats.products_count);
        }
        Command::Orders(command) => {
            require_admin(&console).await?;
            match command {
                OrdersCommand::List {
                    status,
                    user,
                    from,
                    to,
                    paging,
                } => {
                    let filters = OrderFilters {
                        page: Some(paging.page),
                        limit: Some(paging.limit),
                        status,
                        user,
                        from,
                        to,
                    };
                    let page = console.admin().list_orders(&filters).await?;
                    print_orders(&page, paging.page, paging.limit);
                }
                OrdersCommand::Show { id } => {
                    let order = console.admin().get_order(&id).await?;
                    print_order(&order);
                }
            }
        }
        Command::Products(command) => {
            require_admin(&console).await?;
            let admin = console.admin();
            match command {
                ProductsCommand::List {
                    q,
                    category,
                    gender,
                    brand,
                    active,
                    paging,
                } => {
                    let filters = ProductFilters {
                        page: Some(paging.page),
                        limit: Some(paging.limit),
                        q,
                        category,
                        gender,
                        brand,
                        is_active: active,
                    };
                    let page = admin.list_products(&filters).await?;
                    print_products(&page, paging.page, paging.limit);
                }
                ProductsCommand::Show { id } => {
                    let product = admin.get_product(&id).await?;
                    println!("{}", serde_json::to_string_pretty(&product)?);
                }
                ProductsCommand::Create { file, edit } => {
                    let product = read_product(&file, &edit)?;
                    let created = admin.create_product(&product).await?;
                    match created.and_then(|p| p.id) {
                        Some(id) => println!("Created product {}", id),
                        None => println!("Created product {}", product.slug),
                    }
                }
                ProductsCommand::Update { id, file, edit } => {
                    let product = read_product(&file, &edit)?;
                    admin.update_product(&id, &product).await?;
                    println!("Saved product {}", id);
                }
                ProductsCommand::Delete { id, yes } => {
                    if !yes {
                        bail!("refusing to delete {} without --yes", id);
                    }
                    admin.delete_product(&id).await?;
                    println!("Deleted product {}", id);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.debug);
    run(cli).await
}
