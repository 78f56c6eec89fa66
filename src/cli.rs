use crate::api::{ApiClient, ApiError, PageQuery};
use crate::cart::{CartItem, CartStore};
use crate::models::auth::{ChangePasswordRequest, LoginRequest, ProfileUpdate, RegisterRequest};
use crate::models::booking::{BookingRequest, BookingStatus};
use crate::models::court::{CourtRequest, CourtSearch, CourtStatus};
use crate::models::payment::{PaymentRequest, PaymentType};
use crate::models::shop::{
    CategoryRequest, CreateOrderRequest, OrderPaymentMethod, OrderStatus, ProductRequest,
    ProductSearch, ProductStatus, ShippingDetails, UpdateOrderStatusRequest,
};
use crate::models::user::{UserCreateRequest, UserSearch, UserUpdateRequest};
use crate::models::Role;
use crate::routes::{self, Route};
use crate::services::bookings::{BookingService, DashboardScope};
use crate::services::courts::CourtService;
use crate::services::orders::OrderService;
use crate::services::products::ProductService;
use crate::services::reviews::ReviewService;
use crate::services::upload::DEFAULT_FOLDER;
use crate::session::{evaluate, GateOutcome, SessionSnapshot, SessionStore};
use crate::{render, theme};
use anyhow::{anyhow, bail, Context as _, Result};
use chrono::Utc;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub struct Context {
    pub api: ApiClient,
    pub session: SessionStore,
    pub cart: RefCell<CartStore>,
    pub session_id: String,
    pub history_path: Option<PathBuf>,
}

impl Context {
    pub fn new(api: ApiClient, session_id: &str) -> Self {
        let storage = api.storage().clone();
        Self {
            session: SessionStore::new(storage.clone()),
            cart: RefCell::new(CartStore::load(storage)),
            api,
            session_id: session_id.to_string(),
            history_path: None,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot(Utc::now())
    }

    fn note(&self, f: impl FnOnce(&mut crate::activity::ActivityLog) -> Result<()>) {
        if let Some(activity) = self.api.activity() {
            if let Err(e) = f(&mut activity.borrow_mut()) {
                eprintln!("Warning: activity log write failed: {}", e);
            }
        }
    }

    fn note_cart(&self, op: &str, product_id: Option<i64>) {
        let cart = self.cart.borrow();
        let (count, total) = (cart.cart().item_count(), cart.cart().total_amount());
        self.note(|log| log.cart_mutation(op, product_id, count, total));
    }
}

/// What the caller should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub fn run_once(ctx: &Context, line: &str) -> Result<()> {
    dispatch(ctx, line).map(|_| ())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    if let Some(path) = &ctx.history_path {
        let _ = rl.load_history(path);
    }

    println!("courtside - type help for commands, exit to quit");
    if let Some(user) = signed_in_user(&ctx.snapshot()) {
        println!("Signed in as {}", render::user_line(&user));
    }

    loop {
        let prompt = match signed_in_user(&ctx.snapshot()) {
            Some(user) => format!("{}@courtside> ", user.email),
            None => "courtside> ".to_string(),
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match dispatch(&ctx, line) {
                    Ok(Flow::Exit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    if let Some(path) = &ctx.history_path {
        if let Err(e) = rl.save_history(path) {
            eprintln!("Warning: could not save history: {}", e);
        }
    }
    Ok(())
}

fn signed_in_user(snapshot: &SessionSnapshot) -> Option<crate::models::User> {
    snapshot
        .user
        .clone()
        .filter(|_| snapshot.is_authenticated())
}

/// Parse one command line, run it through the session gate, then its handler
pub fn dispatch(ctx: &Context, line: &str) -> Result<Flow> {
    let words = shell_words::split(line).map_err(|e| anyhow!("Could not parse input: {}", e))?;
    let Some((name, rest)) = words.split_first() else {
        return Ok(Flow::Continue);
    };

    let route = routes::find(name)
        .ok_or_else(|| anyhow!("Unknown command: {} (type help for commands)", name))?;

    let outcome = evaluate(route.guard, &ctx.snapshot());
    let result = match outcome {
        GateOutcome::Render => Words::parse(rest).and_then(|args| run(ctx, route, &args)),
        GateOutcome::Loading => Err(anyhow!("Session is still loading, try again")),
        GateOutcome::RedirectLogin => Err(anyhow!(
            "Please log in first: login <email-or-phone> <password>"
        )),
        GateOutcome::RedirectHome => Err(anyhow!(
            "You do not have access to '{}'. Type menu to see what you can open.",
            route.name
        )),
    };

    let ok = result.is_ok();
    ctx.note(|log| log.command(route.name, outcome.as_str(), ok));
    result
}

fn run(ctx: &Context, route: &Route, args: &Words) -> Result<Flow> {
    match route.name {
        "exit" => return Ok(Flow::Exit),
        "help" => print!("{}", routes::help_text()),
        "theme" => cmd_theme(ctx, args)?,
        "menu" => cmd_menu(ctx),
        "login" => cmd_login(ctx, args)?,
        "register" => cmd_register(ctx, args)?,
        "forgot-password" => cmd_forgot_password(ctx, args)?,
        "logout" => cmd_logout(ctx)?,
        "whoami" => cmd_whoami(ctx),
        "profile" => cmd_profile(ctx, args)?,
        "courts" => cmd_courts(ctx, args)?,
        "search-courts" => cmd_search_courts(ctx, args)?,
        "court" => cmd_court(ctx, args)?,
        "book" => cmd_book(ctx, args)?,
        "bookings" => cmd_bookings(ctx, args)?,
        "booking" => cmd_booking(ctx, args)?,
        "cancel-booking" => cmd_cancel_booking(ctx, args)?,
        "pay" => cmd_pay(ctx, args)?,
        "payment" => cmd_payment(ctx, args)?,
        "confirm-payment" => cmd_confirm_payment(ctx, args)?,
        "products" => cmd_products(ctx, args)?,
        "search-products" => cmd_search_products(ctx, args)?,
        "product" => cmd_product(ctx, args)?,
        "featured" => {
            let products = ctx.api.products().featured().and_then(|r| r.into_data());
            print!("{}", render::products(&products.or_notify("Could not load products")?));
        }
        "bestsellers" => {
            let products = ctx.api.products().best_selling().and_then(|r| r.into_data());
            print!("{}", render::products(&products.or_notify("Could not load products")?));
        }
        "new-arrivals" => {
            let products = ctx.api.products().new_arrivals().and_then(|r| r.into_data());
            print!("{}", render::products(&products.or_notify("Could not load products")?));
        }
        "categories" => {
            let categories = ctx.api.categories().active().and_then(|r| r.into_data());
            print!(
                "{}",
                render::categories(&categories.or_notify("Could not load categories")?)
            );
        }
        "category" => cmd_category(ctx, args)?,
        "reviews" => cmd_reviews(ctx, args)?,
        "cart" => cmd_cart(ctx, args)?,
        "checkout" => cmd_checkout(ctx, args)?,
        "orders" => cmd_orders(ctx, args)?,
        "order" => cmd_order(ctx, args)?,
        "cancel-order" => cmd_cancel_order(ctx, args)?,
        "dashboard" => {
            let scope = if ctx.snapshot().is_admin() {
                DashboardScope::All
            } else {
                DashboardScope::Owned
            };
            let dashboard = ctx.api.bookings().dashboard(scope);
            print!(
                "{}",
                render::dashboard(&dashboard.or_notify("Could not load dashboard")?)
            );
        }
        "admin-bookings" => cmd_admin_bookings(ctx, args)?,
        "admin-courts" => cmd_admin_courts(ctx, args)?,
        "upload" => cmd_upload(ctx, args)?,
        "admin-products" => cmd_admin_products(ctx, args)?,
        "admin-orders" => cmd_admin_orders(ctx, args)?,
        "admin-categories" => cmd_admin_categories(ctx, args)?,
        "admin-reviews" => cmd_admin_reviews(ctx, args)?,
        "admin-users" => cmd_admin_users(ctx, args)?,
        other => bail!("Command '{}' has no handler", other),
    }
    Ok(Flow::Continue)
}

/// Turn a failed backend call into the notification shown to the user
trait Notify<T> {
    fn or_notify(self, fallback: &str) -> Result<T>;
}

impl<T> Notify<T> for std::result::Result<T, ApiError> {
    fn or_notify(self, fallback: &str) -> Result<T> {
        self.map_err(|e| {
            if e.is_auth_failure() {
                anyhow!(
                    "{}: login <email-or-phone> <password>",
                    e.user_message(fallback)
                )
            } else {
                anyhow!(e.user_message(fallback))
            }
        })
    }
}

fn success_message(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Positional words plus `--name value` flags
#[derive(Debug, Default)]
struct Words {
    positional: Vec<String>,
    flags: Vec<(String, String)>,
}

impl Words {
    fn parse(words: &[String]) -> Result<Self> {
        let mut parsed = Words::default();
        let mut iter = words.iter();
        while let Some(word) = iter.next() {
            match word.strip_prefix("--") {
                Some(name) if !name.is_empty() => {
                    let value = iter
                        .next()
                        .ok_or_else(|| anyhow!("Flag --{} needs a value", name))?;
                    parsed.flags.push((name.to_string(), value.clone()));
                }
                _ => parsed.positional.push(word.clone()),
            }
        }
        Ok(parsed)
    }

    fn get(&self, i: usize) -> Option<&str> {
        self.positional.get(i).map(|s| s.as_str())
    }

    fn req(&self, i: usize, what: &str) -> Result<&str> {
        self.get(i).ok_or_else(|| anyhow!("Missing {}", what))
    }

    fn id(&self, i: usize, what: &str) -> Result<i64> {
        let raw = self.req(i, what)?;
        raw.parse()
            .map_err(|_| anyhow!("Invalid {} '{}': expected a number", what, raw))
    }

    fn number<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
        raw.parse()
            .map_err(|_| anyhow!("Invalid {} '{}'", what, raw))
    }

    fn opt_number<T: std::str::FromStr>(&self, i: usize, what: &str) -> Result<Option<T>> {
        self.get(i).map(|raw| Self::number(raw, what)).transpose()
    }

    fn flag(&self, name: &str) -> Option<&str> {
        self.flags
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn flag_number<T: std::str::FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.flag(name)
            .map(|raw| Self::number(raw, &format!("--{}", name)))
            .transpose()
    }

    /// Positional words from `i` on, joined with spaces
    fn rest(&self, i: usize) -> Option<String> {
        let rest = self.positional.get(i..)?;
        if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        }
    }
}

/// Apply a 1-based page number from the user to a default paging
fn paged(defaults: PageQuery, page: Option<u32>) -> PageQuery {
    PageQuery {
        page: page.map(|p| p.saturating_sub(1)).unwrap_or(defaults.page),
        ..defaults
    }
}

fn read_toml<T: DeserializeOwned>(path: &str) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path))?;
    toml::from_str(&content).with_context(|| format!("Could not parse {}", path))
}

fn parse_enum<T>(raw: &str, parse: fn(&str) -> Option<T>, choices: String) -> Result<T> {
    parse(raw).ok_or_else(|| anyhow!("Unknown value '{}', expected one of {}", raw, choices))
}

fn cmd_theme(ctx: &Context, args: &Words) -> Result<()> {
    let storage = ctx.api.storage();
    let current = match args.get(0) {
        None => theme::load(storage),
        Some("toggle") => theme::toggle(storage)?,
        Some(raw) => {
            let t = theme::Theme::parse(raw)
                .ok_or_else(|| anyhow!("Unknown theme '{}', expected light|dark|toggle", raw))?;
            theme::set(storage, t)?;
            t
        }
    };
    println!("Theme: {}", current.as_str());
    Ok(())
}

fn cmd_menu(ctx: &Context) {
    let entries = routes::menu_for(ctx.snapshot().role());
    if entries.is_empty() {
        println!("No back-office sections for your account.");
        return;
    }
    for entry in entries {
        println!("  {:<12} {}", entry.label, entry.command);
    }
}

fn cmd_login(ctx: &Context, args: &Words) -> Result<()> {
    let request = LoginRequest {
        email_or_phone: args.req(0, "email or phone")?.to_string(),
        password: args.req(1, "password")?.to_string(),
    };
    let payload = ctx
        .api
        .auth()
        .login(&request)
        .and_then(|r| r.into_data())
        .or_notify("Login failed")?;
    println!("Welcome, {}", payload.user.full_name);
    Ok(())
}

fn cmd_register(ctx: &Context, args: &Words) -> Result<()> {
    let request = RegisterRequest {
        full_name: args.req(0, "full name")?.to_string(),
        email: args.req(1, "email")?.to_string(),
        phone: args.req(2, "phone")?.to_string(),
        password: args.req(3, "password")?.to_string(),
    };
    let payload = ctx
        .api
        .auth()
        .register(&request)
        .and_then(|r| r.into_data())
        .or_notify("Registration failed")?;
    println!("Account created. Welcome, {}", payload.user.full_name);
    Ok(())
}

fn cmd_forgot_password(ctx: &Context, args: &Words) -> Result<()> {
    let message = ctx
        .api
        .auth()
        .forgot_password(args.req(0, "email")?)
        .and_then(|r| r.into_ack())
        .or_notify("Could not send reset email")?;
    println!(
        "{}",
        success_message(message, "Check your inbox for a reset link")
    );
    Ok(())
}

fn cmd_logout(ctx: &Context) -> Result<()> {
    ctx.api.auth().logout()?;
    ctx.cart.borrow_mut().clear()?;
    ctx.note_cart("clear", None);
    ctx.note(|log| log.session_cleared("logout"));
    println!("Logged out");
    Ok(())
}

fn cmd_whoami(ctx: &Context) {
    let snapshot = ctx.snapshot();
    match &snapshot.user {
        Some(user) if snapshot.is_authenticated() => {
            println!("{}", render::user_line(user));
            if let Some(exp) = ctx
                .session
                .token()
                .and_then(|t| crate::session::decode_claims(&t))
                .and_then(|c| c.exp)
                .and_then(|exp| chrono::DateTime::from_timestamp(exp, 0))
            {
                println!("Session valid until {}", exp.format("%Y-%m-%d %H:%M UTC"));
            }
        }
        _ => println!("Not logged in"),
    }
    println!("Session id: {}", ctx.session_id);
}

fn cmd_profile(ctx: &Context, args: &Words) -> Result<()> {
    match args.get(0) {
        None => {
            let user = ctx
                .api
                .users()
                .refresh()
                .or_notify("Could not load profile")?
                .ok_or_else(|| anyhow!("Could not load profile"))?;
            println!("{}", render::user_line(&user));
            println!("  Phone:   {}", user.phone);
            println!("  Since:   {}", user.created_at);
        }
        Some("update") => {
            let update = ProfileUpdate {
                full_name: args.flag("name").map(str::to_string),
                email: args.flag("email").map(str::to_string),
                phone: args.flag("phone").map(str::to_string),
            };
            if update.is_empty() {
                bail!("Nothing to update: pass --name, --email or --phone");
            }
            let user = ctx
                .api
                .users()
                .update_profile(&update)
                .and_then(|r| r.into_data())
                .or_notify("Could not update profile")?;
            println!("Profile updated: {}", render::user_line(&user));
        }
        Some("password") => {
            let request = ChangePasswordRequest {
                old_password: args.req(1, "current password")?.to_string(),
                new_password: args.req(2, "new password")?.to_string(),
            };
            let message = ctx
                .api
                .users()
                .change_password(&request)
                .and_then(|r| r.into_ack())
                .or_notify("Could not change password")?;
            println!("{}", success_message(message, "Password changed"));
        }
        Some(other) => bail!("Unknown profile action '{}'", other),
    }
    Ok(())
}

fn cmd_courts(ctx: &Context, args: &Words) -> Result<()> {
    let paging = paged(CourtService::default_paging(), args.opt_number(0, "page")?);
    let page = ctx
        .api
        .courts()
        .list(&paging)
        .and_then(|r| r.into_data())
        .or_notify("Could not load courts")?;
    print!("{}", render::court_page(&page));
    Ok(())
}

fn cmd_search_courts(ctx: &Context, args: &Words) -> Result<()> {
    let search = CourtSearch {
        name: args.flag("name").map(str::to_string),
        address: args.flag("address").map(str::to_string),
        min_price: args.flag_number("min")?,
        max_price: args.flag_number("max")?,
        page: args
            .flag_number::<u32>("page")?
            .map(|p| p.saturating_sub(1)),
        size: None,
    };
    let page = ctx
        .api
        .courts()
        .search(&search)
        .and_then(|r| r.into_data())
        .or_notify("Could not search courts")?;
    print!("{}", render::court_page(&page));
    Ok(())
}

fn cmd_court(ctx: &Context, args: &Words) -> Result<()> {
    let court = ctx
        .api
        .courts()
        .get(args.id(0, "court id")?)
        .and_then(|r| r.into_data())
        .or_notify("Could not load court")?;
    print!("{}", render::court_detail(&court));
    Ok(())
}

fn cmd_book(ctx: &Context, args: &Words) -> Result<()> {
    let court_number = Words::number(args.req(1, "court number")?, "court number")?;
    let request = BookingRequest::parse(
        args.id(0, "court id")?,
        court_number,
        args.req(2, "date")?,
        args.req(3, "start time")?,
        args.req(4, "end time")?,
        args.rest(5),
    )?;
    let booking = ctx
        .api
        .bookings()
        .create(&request)
        .and_then(|r| r.into_data())
        .or_notify("Could not create booking")?;
    println!(
        "Booking #{} created ({}), total {}",
        booking.id,
        booking.status,
        render::money(booking.total_price)
    );
    Ok(())
}

fn cmd_bookings(ctx: &Context, args: &Words) -> Result<()> {
    let paging = paged(BookingService::default_paging(), args.opt_number(0, "page")?);
    let page = ctx
        .api
        .bookings()
        .mine(&paging)
        .and_then(|r| r.into_data())
        .or_notify("Could not load bookings")?;
    print!("{}", render::booking_page(&page));
    Ok(())
}

fn cmd_booking(ctx: &Context, args: &Words) -> Result<()> {
    let booking = ctx
        .api
        .bookings()
        .get(args.id(0, "booking id")?)
        .and_then(|r| r.into_data())
        .or_notify("Could not load booking")?;
    print!("{}", render::booking_detail(&booking));
    Ok(())
}

fn cmd_cancel_booking(ctx: &Context, args: &Words) -> Result<()> {
    let message = ctx
        .api
        .bookings()
        .cancel(args.id(0, "booking id")?)
        .and_then(|r| r.into_ack())
        .or_notify("Could not cancel booking")?;
    println!("{}", success_message(message, "Booking cancelled"));
    Ok(())
}

fn cmd_pay(ctx: &Context, args: &Words) -> Result<()> {
    let payment_type = match args.get(1) {
        Some(raw) => parse_enum(raw, PaymentType::parse, PaymentType::choices())?,
        None => PaymentType::Full,
    };
    let request = PaymentRequest {
        booking_id: args.id(0, "booking id")?,
        payment_type,
        return_url: None,
    };
    let momo = ctx
        .api
        .payments()
        .create_momo(&request)
        .or_notify("Could not start payment")?;
    println!("Open this link to pay: {}", momo.pay_url);
    println!("Payment order: {}", momo.order_id);
    Ok(())
}

fn cmd_payment(ctx: &Context, args: &Words) -> Result<()> {
    let payment = ctx
        .api
        .payments()
        .for_booking(args.id(0, "booking id")?)
        .or_notify("Could not load payment")?;
    println!(
        "Payment #{} for booking #{}: {} {} via {}",
        payment.id, payment.booking_id, payment.payment_type, payment.status, payment.payment_method
    );
    println!(
        "  Amount {}  Deposit {}  Remaining {}",
        render::money(payment.amount),
        render::money(payment.deposit_amount),
        render::money(payment.remaining_amount)
    );
    if let Some(paid_at) = &payment.paid_at {
        println!("  Paid at {}", paid_at);
    }
    Ok(())
}

fn cmd_confirm_payment(ctx: &Context, args: &Words) -> Result<()> {
    let result_code = args.opt_number(1, "result code")?.unwrap_or(0);
    let payment = ctx
        .api
        .payments()
        .confirm_mock(args.req(0, "order id")?, result_code)
        .or_notify("Could not confirm payment")?;
    println!(
        "Payment #{} is now {}",
        payment.id, payment.status
    );
    Ok(())
}

fn cmd_products(ctx: &Context, args: &Words) -> Result<()> {
    let paging = paged(ProductService::default_paging(), args.opt_number(0, "page")?);
    let page = ctx
        .api
        .products()
        .list(&paging)
        .and_then(|r| r.into_data())
        .or_notify("Could not load products")?;
    print!("{}", render::product_page(&page));
    Ok(())
}

fn cmd_search_products(ctx: &Context, args: &Words) -> Result<()> {
    let search = ProductSearch {
        keyword: args.rest(0),
        category_id: args.flag_number("category")?,
        min_price: args.flag_number("min")?,
        max_price: args.flag_number("max")?,
        page: args
            .flag_number::<u32>("page")?
            .map(|p| p.saturating_sub(1))
            .unwrap_or(0),
        ..Default::default()
    };
    let page = ctx
        .api
        .products()
        .search(&search)
        .and_then(|r| r.into_data())
        .or_notify("Could not search products")?;
    print!("{}", render::product_page(&page));
    Ok(())
}

fn cmd_product(ctx: &Context, args: &Words) -> Result<()> {
    let detail = ctx
        .api
        .products()
        .get(args.id(0, "product id")?)
        .and_then(|r| r.into_data())
        .or_notify("Could not load product")?;
    print!("{}", render::product_detail(&detail));
    Ok(())
}

fn cmd_category(ctx: &Context, args: &Words) -> Result<()> {
    let page_no: Option<u32> = args.opt_number(1, "page")?;
    let page = ctx
        .api
        .products()
        .by_category(
            args.id(0, "category id")?,
            page_no.map(|p| p.saturating_sub(1)).unwrap_or(0),
            20,
        )
        .and_then(|r| r.into_data())
        .or_notify("Could not load products")?;
    print!("{}", render::product_page(&page));
    Ok(())
}

fn cmd_reviews(ctx: &Context, args: &Words) -> Result<()> {
    let product_id = args.id(0, "product id")?;
    let paging = ReviewService::default_paging();
    let rating: Option<u8> = args.opt_number(1, "rating")?;
    let resp = match rating {
        Some(r) if (1..=5).contains(&r) => ctx.api.reviews().by_rating(product_id, r, &paging),
        Some(r) => bail!("Rating must be 1-5, got {}", r),
        None => ctx.api.reviews().for_product(product_id, &paging),
    };
    let page = resp
        .and_then(|r| r.into_data())
        .or_notify("Could not load reviews")?;
    print!("{}", render::review_page(&page));
    Ok(())
}

fn cmd_cart(ctx: &Context, args: &Words) -> Result<()> {
    match args.get(0) {
        None | Some("show") => {}
        Some("add") => {
            let product_id = args.id(1, "product id")?;
            let quantity: u32 = args.opt_number(2, "quantity")?.unwrap_or(1);
            let detail = ctx
                .api
                .products()
                .get(product_id)
                .and_then(|r| r.into_data())
                .or_notify("Could not load product")?;
            if detail.product.stock <= 0 {
                eprintln!("Warning: {} looks out of stock", detail.product.name);
            }
            let item = CartItem::from_product(&detail.product);
            ctx.cart.borrow_mut().add_item(item, quantity)?;
            ctx.note_cart("add", Some(product_id));
            println!("Added {} to cart", detail.product.name);
        }
        Some("set") => {
            let product_id = args.id(1, "product id")?;
            let quantity: i64 = Words::number(args.req(2, "quantity")?, "quantity")?;
            ctx.cart.borrow_mut().set_quantity(product_id, quantity)?;
            ctx.note_cart("set_quantity", Some(product_id));
        }
        Some("rm") | Some("remove") => {
            let product_id = args.id(1, "product id")?;
            ctx.cart.borrow_mut().remove_item(product_id)?;
            ctx.note_cart("remove", Some(product_id));
        }
        Some("clear") => {
            ctx.cart.borrow_mut().clear()?;
            ctx.note_cart("clear", None);
        }
        Some(other) => bail!("Unknown cart action '{}'", other),
    }
    print!("{}", render::cart(ctx.cart.borrow().cart()));
    Ok(())
}

fn cmd_checkout(ctx: &Context, args: &Words) -> Result<()> {
    let cart = ctx.cart.borrow().cart().clone();
    if cart.is_empty() {
        bail!("Your cart is empty");
    }
    for w in cart.stock_warnings() {
        eprintln!(
            "Warning: {} x{} but only {} were in stock when added",
            w.product_name, w.quantity, w.stock
        );
    }

    let payment_method = match args.flag("payment") {
        Some(raw) => parse_enum(raw, OrderPaymentMethod::parse, OrderPaymentMethod::choices())?,
        None => OrderPaymentMethod::Cod,
    };
    let request = CreateOrderRequest {
        shipping: ShippingDetails {
            recipient_name: args.req(0, "recipient name")?.to_string(),
            recipient_phone: args.req(1, "recipient phone")?.to_string(),
            shipping_address: args.req(2, "address")?.to_string(),
            shipping_province: args.req(3, "province")?.to_string(),
            shipping_district: args.req(4, "district")?.to_string(),
            shipping_ward: args.req(5, "ward")?.to_string(),
            note: args.flag("note").map(str::to_string),
        },
        payment_method,
        items: cart.order_lines(),
    };

    let order = ctx
        .api
        .orders()
        .create(&request)
        .and_then(|r| r.into_data())
        .or_notify("Could not place order")?;

    ctx.cart.borrow_mut().clear()?;
    ctx.note_cart("clear", None);
    println!(
        "Order {} placed, total {} ({})",
        order.order_code,
        render::money(order.final_amount),
        order.payment_method
    );
    Ok(())
}

fn cmd_orders(ctx: &Context, args: &Words) -> Result<()> {
    let (status, page_at) = match args.get(0).and_then(OrderStatus::parse) {
        Some(status) => (Some(status), 1),
        None => (None, 0),
    };
    let paging = paged(OrderService::default_paging(), args.opt_number(page_at, "page")?);
    let page = ctx
        .api
        .orders()
        .mine(&paging, status)
        .and_then(|r| r.into_data())
        .or_notify("Could not load orders")?;
    print!("{}", render::order_page(&page));
    Ok(())
}

fn cmd_order(ctx: &Context, args: &Words) -> Result<()> {
    let order = ctx
        .api
        .orders()
        .get(args.id(0, "order id")?)
        .and_then(|r| r.into_data())
        .or_notify("Could not load order")?;
    print!("{}", render::order_detail(&order));
    Ok(())
}

fn cmd_cancel_order(ctx: &Context, args: &Words) -> Result<()> {
    let id = args.id(0, "order id")?;
    let reason = args
        .rest(1)
        .ok_or_else(|| anyhow!("Missing cancellation reason"))?;
    let order = ctx
        .api
        .orders()
        .cancel(id, &reason)
        .and_then(|r| r.into_data())
        .or_notify("Could not cancel order")?;
    println!("Order {} is now {}", order.order_code, order.order_status);
    Ok(())
}

fn cmd_admin_bookings(ctx: &Context, args: &Words) -> Result<()> {
    match args.get(0) {
        None | Some("list") => {
            let paging = paged(BookingService::default_paging(), args.opt_number(1, "page")?);
            let bookings = ctx.api.bookings();
            let resp = if ctx.snapshot().is_admin() {
                bookings.all(&paging)
            } else {
                bookings.for_owner(&paging)
            };
            let page = resp
                .and_then(|r| r.into_data())
                .or_notify("Could not load bookings")?;
            print!("{}", render::booking_page(&page));
        }
        Some("court") => {
            let list = ctx
                .api
                .bookings()
                .for_court(args.id(1, "court id")?)
                .and_then(|r| r.into_data())
                .or_notify("Could not load bookings")?;
            print!("{}", render::bookings(&list));
        }
        Some("status") => {
            let id = args.id(1, "booking id")?;
            let status = parse_enum(
                args.req(2, "status")?,
                BookingStatus::parse,
                BookingStatus::choices(),
            )?;
            let booking = ctx
                .api
                .bookings()
                .set_status(id, status)
                .and_then(|r| r.into_data())
                .or_notify("Could not update booking")?;
            println!("Booking #{} is now {}", booking.id, booking.status);
        }
        Some(other) => bail!("Unknown action '{}'", other),
    }
    Ok(())
}

fn cmd_admin_courts(ctx: &Context, args: &Words) -> Result<()> {
    let courts = ctx.api.courts();
    match args.get(0) {
        None | Some("list") => {
            let paging = paged(CourtService::default_paging(), args.opt_number(1, "page")?);
            let page = courts
                .list(&paging)
                .and_then(|r| r.into_data())
                .or_notify("Could not load courts")?;
            print!("{}", render::court_page(&page));
        }
        Some("mine") => {
            let list = courts
                .mine()
                .and_then(|r| r.into_data())
                .or_notify("Could not load courts")?;
            print!("{}", render::courts(&list));
        }
        Some("create") => {
            let request: CourtRequest = read_toml(args.req(1, "court file")?)?;
            let court = courts
                .create(&request)
                .and_then(|r| r.into_data())
                .or_notify("Could not create court")?;
            println!("Court #{} created", court.id);
        }
        Some("update") => {
            let id = args.id(1, "court id")?;
            let request: CourtRequest = read_toml(args.req(2, "court file")?)?;
            courts
                .update(id, &request)
                .and_then(|r| r.into_data())
                .or_notify("Could not update court")?;
            println!("Court #{} updated", id);
        }
        Some("delete") => {
            let message = courts
                .delete(args.id(1, "court id")?)
                .and_then(|r| r.into_ack())
                .or_notify("Could not delete court")?;
            println!("{}", success_message(message, "Court deleted"));
        }
        Some("status") => {
            let id = args.id(1, "court id")?;
            let status = parse_enum(
                args.req(2, "status")?,
                CourtStatus::parse,
                CourtStatus::choices(),
            )?;
            courts
                .set_status(id, status)
                .and_then(|r| r.into_ack())
                .or_notify("Could not update court status")?;
            println!("Court #{} is now {}", id, status);
        }
        Some(other) => bail!("Unknown action '{}'", other),
    }
    Ok(())
}

fn cmd_upload(ctx: &Context, args: &Words) -> Result<()> {
    let path = Path::new(args.req(0, "image path")?);
    let folder = args.get(1).unwrap_or(DEFAULT_FOLDER);
    let url = ctx
        .api
        .uploads()
        .image(path, folder)
        .or_notify("Failed to upload image")?;
    println!("{}", url);
    Ok(())
}

fn cmd_admin_products(ctx: &Context, args: &Words) -> Result<()> {
    let products = ctx.api.products();
    match args.get(0) {
        None | Some("list") => {
            let paging = paged(ProductService::default_paging(), args.opt_number(1, "page")?);
            let page = products
                .list(&paging)
                .and_then(|r| r.into_data())
                .or_notify("Could not load products")?;
            print!("{}", render::product_page(&page));
        }
        Some("create") => {
            let request: ProductRequest = read_toml(args.req(1, "product file")?)?;
            let product = products
                .create(&request)
                .and_then(|r| r.into_data())
                .or_notify("Could not create product")?;
            println!("Product #{} created", product.id);
        }
        Some("update") => {
            let id = args.id(1, "product id")?;
            let request: ProductRequest = read_toml(args.req(2, "product file")?)?;
            products
                .update(id, &request)
                .and_then(|r| r.into_data())
                .or_notify("Could not update product")?;
            println!("Product #{} updated", id);
        }
        Some("delete") => {
            let message = products
                .delete(args.id(1, "product id")?)
                .and_then(|r| r.into_ack())
                .or_notify("Could not delete product")?;
            println!("{}", success_message(message, "Product deleted"));
        }
        Some("status") => {
            let id = args.id(1, "product id")?;
            let status = parse_enum(
                args.req(2, "status")?,
                ProductStatus::parse,
                ProductStatus::choices(),
            )?;
            products
                .set_status(id, status)
                .and_then(|r| r.into_ack())
                .or_notify("Could not update product status")?;
            println!("Product #{} is now {}", id, status);
        }
        Some(other) => bail!("Unknown action '{}'", other),
    }
    Ok(())
}

fn cmd_admin_orders(ctx: &Context, args: &Words) -> Result<()> {
    let orders = ctx.api.orders();
    match args.get(0) {
        None | Some("list") => {
            let (status, page_at) = match args.get(1).and_then(OrderStatus::parse) {
                Some(status) => (Some(status), 2),
                None => (None, 1),
            };
            let paging = paged(OrderService::default_paging(), args.opt_number(page_at, "page")?);
            let resp = match status {
                Some(status) => orders.by_status(status, &paging),
                None => orders.all(&paging),
            };
            let page = resp
                .and_then(|r| r.into_data())
                .or_notify("Could not load orders")?;
            print!("{}", render::order_page(&page));
        }
        Some("set") => {
            let id = args.id(1, "order id")?;
            let request = UpdateOrderStatusRequest {
                status: parse_enum(
                    args.req(2, "status")?,
                    OrderStatus::parse,
                    OrderStatus::choices(),
                )?,
                note: args.rest(3).unwrap_or_default(),
            };
            let order = orders
                .update_status(id, &request)
                .and_then(|r| r.into_data())
                .or_notify("Could not update order")?;
            println!("Order {} is now {}", order.order_code, order.order_status);
        }
        Some("stats") => {
            let stats = orders
                .statistics()
                .and_then(|r| r.into_data())
                .or_notify("Could not load statistics")?;
            println!(
                "Orders: {} total, {} pending, {} completed\nRevenue: {}",
                stats.total_orders,
                stats.pending_orders,
                stats.completed_orders,
                render::money(stats.total_revenue)
            );
        }
        Some(other) => bail!("Unknown action '{}'", other),
    }
    Ok(())
}

fn cmd_admin_categories(ctx: &Context, args: &Words) -> Result<()> {
    let categories = ctx.api.categories();
    match args.get(0) {
        None | Some("list") => {
            let list = categories
                .all()
                .and_then(|r| r.into_data())
                .or_notify("Could not load categories")?;
            print!("{}", render::categories(&list));
        }
        Some("show") => {
            let category = categories
                .get(args.id(1, "category id")?)
                .and_then(|r| r.into_data())
                .or_notify("Could not load category")?;
            print!("{}", render::categories(std::slice::from_ref(&category)));
        }
        Some("create") => {
            let request = CategoryRequest {
                name: args.req(1, "name")?.to_string(),
                description: args.rest(2),
            };
            let category = categories
                .create(&request)
                .and_then(|r| r.into_data())
                .or_notify("Could not create category")?;
            println!("Category #{} created", category.id);
        }
        Some("update") => {
            let id = args.id(1, "category id")?;
            let request = CategoryRequest {
                name: args.req(2, "name")?.to_string(),
                description: args.rest(3),
            };
            categories
                .update(id, &request)
                .and_then(|r| r.into_data())
                .or_notify("Could not update category")?;
            println!("Category #{} updated", id);
        }
        Some("delete") => {
            let message = categories
                .delete(args.id(1, "category id")?)
                .and_then(|r| r.into_ack())
                .or_notify("Could not delete category")?;
            println!("{}", success_message(message, "Category deleted"));
        }
        Some(action @ ("enable" | "disable")) => {
            let id = args.id(1, "category id")?;
            let message = categories
                .set_active(id, action == "enable")
                .and_then(|r| r.into_ack())
                .or_notify("Could not update category")?;
            println!("{}", success_message(message, "Category updated"));
        }
        Some(other) => bail!("Unknown action '{}'", other),
    }
    Ok(())
}

fn cmd_admin_reviews(ctx: &Context, args: &Words) -> Result<()> {
    match args.get(0) {
        None | Some("latest") => {
            let limit = args.opt_number(1, "limit")?.unwrap_or(10);
            let list = ctx
                .api
                .reviews()
                .latest_verified(limit)
                .and_then(|r| r.into_data())
                .or_notify("Could not load reviews")?;
            print!("{}", render::reviews(&list));
        }
        Some("delete") => {
            let message = ctx
                .api
                .reviews()
                .delete(args.id(1, "review id")?)
                .and_then(|r| r.into_ack())
                .or_notify("Could not delete review")?;
            println!("{}", success_message(message, "Review deleted"));
        }
        Some(other) => bail!("Unknown action '{}'", other),
    }
    Ok(())
}

fn cmd_admin_users(ctx: &Context, args: &Words) -> Result<()> {
    let users = ctx.api.admin_users();
    match args.get(0) {
        None | Some("list") => {
            let mut search = UserSearch {
                keyword: args.flag("keyword").map(str::to_string),
                role: args
                    .flag("role")
                    .map(|raw| parse_enum(raw, Role::parse, Role::choices()))
                    .transpose()?,
                active: args.flag_number("active")?,
                ..Default::default()
            };
            if let Some(page) = args.flag_number::<u32>("page")? {
                search.paging.page = page.saturating_sub(1);
            }
            let page = users
                .list(&search)
                .and_then(|r| r.into_data())
                .or_notify("Could not load users")?;
            print!("{}", render::user_page(&page));
        }
        Some("show") => {
            let detail = users
                .get(args.id(1, "user id")?)
                .and_then(|r| r.into_data())
                .or_notify("Could not load user")?;
            print!("{}", render::user_detail(&detail));
        }
        Some("create") => {
            let request: UserCreateRequest = read_toml(args.req(1, "user file")?)?;
            let detail = users
                .create(&request)
                .and_then(|r| r.into_data())
                .or_notify("Could not create user")?;
            println!("User #{} created", detail.user.id);
        }
        Some("update") => {
            let id = args.id(1, "user id")?;
            let request: UserUpdateRequest = read_toml(args.req(2, "user file")?)?;
            users
                .update(id, &request)
                .and_then(|r| r.into_data())
                .or_notify("Could not update user")?;
            println!("User #{} updated", id);
        }
        Some("delete") => {
            let message = users
                .delete(args.id(1, "user id")?)
                .and_then(|r| r.into_ack())
                .or_notify("Could not delete user")?;
            println!("{}", success_message(message, "User deleted"));
        }
        Some(action @ ("enable" | "disable")) => {
            let id = args.id(1, "user id")?;
            users
                .set_active(id, action == "enable")
                .and_then(|r| r.into_ack())
                .or_notify("Could not update user")?;
            println!("User #{} {}d", id, action);
        }
        Some("stats") => {
            let stats = users
                .statistics()
                .and_then(|r| r.into_data())
                .or_notify("Could not load statistics")?;
            print!("{}", render::user_statistics(&stats));
        }
        Some(other) => bail!("Unknown action '{}'", other),
    }
    Ok(())
}
