//! A terminal front end for the storefront.
//!
//! Reads commands from stdin; `help` lists them. The backend URL comes from
//! `STOREFRONT_URL` (default `http://localhost:8000`) and log verbosity from
//! `RUST_LOG`.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::{self, BufRead, Write as _};

use owo_colors::OwoColorize;
use storefront_sdk::format::{format_price, format_time};
use storefront_sdk::models::{Message, Product};
use storefront_sdk::{CatalogLoader, ChatSession, NavBar, Storefront};

const HELP: &str = "\
commands:
  products                 list all products
  category <name>          filter by category
  color <name>             filter by color
  facets                   list categories and colors
  add <id> [qty]           add a product to the cart
  remove <id>              remove a product from the cart
  qty <id> <n>             set a product's quantity (0 removes)
  cart                     show the cart
  clear                    empty the cart
  chat <text>              ask the shopping assistant
  ping                     re-test the API connection
  reset                    clear the conversation
  quit                     exit";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let base_url =
        env::var("STOREFRONT_URL").unwrap_or_else(|_| storefront_sdk::config::DEFAULT_BASE_URL.to_string());

    let shop = match Storefront::builder().base_url(base_url).build() {
        Ok(shop) => shop,
        Err(e) => {
            error!("could not start storefront: {}", e);
            return;
        }
    };
    info!(%shop, "storefront ready");
    println!("{}", shop.dimmed());

    let navbar = shop.navbar();
    let mut catalog = shop.catalog();
    let mut chat = shop.open_chat();
    print_messages(chat.messages());
    println!("{}", HELP.dimmed());

    let stdin = io::stdin();
    loop {
        print!("[{} 🛒 {}] > ", chat.status(), navbar.item_count());
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!("could not read stdin: {}", e);
                break;
            }
        }

        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            "products" => {
                catalog.load_products();
                print_catalog(&catalog);
            }
            "category" => {
                catalog.filter_by_category(rest);
                print_catalog(&catalog);
            }
            "color" => {
                catalog.filter_by_color(rest);
                print_catalog(&catalog);
            }
            "facets" => {
                catalog.load_categories();
                println!("categories:    {}", catalog.categories().join(", "));
                println!("subcategories: {}", catalog.subcategories().join(", "));
                println!("colors:        {}", catalog.colors().join(", "));
            }
            "add" => {
                let mut args = rest.split_whitespace();
                let id = args.next().and_then(|s| s.parse::<i64>().ok());
                let qty = args.next().and_then(|s| s.parse::<u32>().ok()).unwrap_or(1);
                match id.and_then(|id| find_product(&catalog, &chat, id)) {
                    Some(product) => shop.cart().add_to_cart(&product, qty),
                    None => println!("{}", "unknown product; run `products` or `chat` first".red()),
                }
            }
            "remove" => match rest.parse::<i64>() {
                Ok(id) => shop.cart().remove_from_cart(id),
                Err(_) => println!("{}", "usage: remove <id>".red()),
            },
            "qty" => {
                let mut args = rest.split_whitespace();
                match (
                    args.next().and_then(|s| s.parse::<i64>().ok()),
                    args.next().and_then(|s| s.parse::<i64>().ok()),
                ) {
                    (Some(id), Some(n)) => shop.cart().update_quantity(id, n),
                    _ => println!("{}", "usage: qty <id> <n>".red()),
                }
            }
            "cart" => print_cart(&navbar),
            "clear" => shop.cart().clear_cart(),
            "chat" => {
                let before = chat.messages().len();
                chat.send_message(rest);
                print_messages(&chat.messages()[before..]);
            }
            "ping" => {
                let before = chat.messages().len();
                chat.test_connection();
                print_messages(&chat.messages()[before..]);
            }
            "reset" => {
                chat.clear_chat();
                print_messages(chat.messages());
            }
            other => println!("{} {}", "unknown command:".red(), other),
        }
    }
}

/// Look the product up in the catalog, then among the assistant's
/// recommendations.
fn find_product(catalog: &CatalogLoader, chat: &ChatSession, id: i64) -> Option<Product> {
    catalog.product(id).cloned().or_else(|| {
        chat.messages()
            .iter()
            .rev()
            .flat_map(|m| m.products.iter())
            .find(|p| p.id == id)
            .cloned()
    })
}

fn print_catalog(catalog: &CatalogLoader) {
    if let Some(err) = catalog.error() {
        println!("{}", err.red());
        return;
    }
    for p in catalog.products() {
        print_product(p, catalog.cart_quantity(p.id));
    }
    println!("{}", format!("{} product(s)", catalog.products().len()).dimmed());
}

fn print_product(p: &Product, in_cart: u32) {
    let stock = if p.in_stock() {
        String::new()
    } else {
        " out of stock".to_string()
    };
    let badge = if in_cart > 0 {
        format!(" (×{} in cart)", in_cart)
    } else {
        String::new()
    };
    println!(
        "  #{:<4} {} {} [{} / {} / {}]{}{}",
        p.id,
        p.name.bold(),
        format_price(p.price, &p.currency).green(),
        p.category,
        p.subcategory,
        p.color,
        stock.red(),
        badge.cyan()
    );
}

fn print_cart(navbar: &NavBar) {
    let items = navbar.cart_items();
    if items.is_empty() {
        println!("{}", "cart is empty".dimmed());
        return;
    }
    let currency = items[0].product.currency.clone();
    for item in &items {
        println!(
            "  #{:<4} {} × {} = {}",
            item.product.id,
            item.product.name,
            item.quantity,
            format_price(item.subtotal(), &item.product.currency)
        );
    }
    println!(
        "  {} item(s), total {}",
        navbar.item_count(),
        format_price(navbar.cart_total_price(), &currency).bold()
    );
}

fn print_messages(messages: &[Message]) {
    for m in messages {
        let who = if m.is_user() { "vous" } else { "assistant" };
        let header = format!("[{}] {}:", format_time(&m.timestamp), who);
        if m.is_error {
            println!("{} {}", header.dimmed(), m.content.red());
        } else {
            println!("{} {}", header.dimmed(), m.content);
        }
        for p in &m.products {
            print_product(p, 0);
        }
        for q in &m.questions {
            println!("  {}", q.yellow());
        }
    }
}
