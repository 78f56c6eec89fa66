//! Plain-text views of fetched records.

use crate::api::Page;
use crate::cart::Cart;
use crate::models::booking::Booking;
use crate::models::court::Court;
use crate::models::shop::{Order, Product, ProductCategory, ProductDetail, ProductReview};
use crate::models::user::{UserDetail, UserStatistics};
use crate::models::User;
use crate::services::bookings::Dashboard;

/// Amount in đồng, grouped the Vietnamese way: `300.000đ`
pub fn money(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("-{}đ", grouped)
    } else {
        format!("{}đ", grouped)
    }
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Left-aligned columns sized to their widest cell
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, w)| {
                let pad = w.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(headers.to_vec());
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(|s| s.as_str()).collect()));
        out.push('\n');
    }
    out
}

fn with_page<T>(body: String, page: &Page<T>) -> String {
    if page.content.is_empty() {
        return "Nothing found.\n".to_string();
    }
    format!("{}{}\n", body, page.summary())
}

pub fn user_line(user: &User) -> String {
    format!(
        "{} <{}> #{} ({})",
        user.full_name, user.email, user.id, user.role
    )
}

pub fn courts(courts: &[Court]) -> String {
    let rows: Vec<Vec<String>> = courts
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                clip(&c.name, 28),
                clip(&c.address, 36),
                format!("{}/h", money(c.price_per_hour)),
                c.number_of_courts.to_string(),
                format!("{}-{}", c.open_time, c.close_time),
                c.status.to_string(),
            ]
        })
        .collect();
    table(
        &["ID", "NAME", "ADDRESS", "PRICE", "COURTS", "HOURS", "STATUS"],
        &rows,
    )
}

pub fn court_page(page: &Page<Court>) -> String {
    with_page(courts(&page.content), page)
}

pub fn court_detail(court: &Court) -> String {
    let mut out = format!("{} (#{})\n", court.name, court.id);
    out.push_str(&format!("  Address:  {}\n", court.address));
    out.push_str(&format!("  Price:    {}/h\n", money(court.price_per_hour)));
    out.push_str(&format!("  Courts:   {}\n", court.number_of_courts));
    out.push_str(&format!("  Hours:    {} - {}\n", court.open_time, court.close_time));
    out.push_str(&format!("  Status:   {}\n", court.status));
    if !court.facilities.is_empty() {
        out.push_str(&format!("  Facilities: {}\n", court.facilities.join(", ")));
    }
    if let Some(owner) = &court.owner {
        out.push_str(&format!("  Owner:    {} <{}>\n", owner.full_name, owner.email));
    }
    if !court.description.is_empty() {
        out.push_str(&format!("\n{}\n", court.description));
    }
    out
}

pub fn bookings(bookings: &[Booking]) -> String {
    let rows: Vec<Vec<String>> = bookings
        .iter()
        .map(|b| {
            vec![
                b.id.to_string(),
                clip(&b.court_name, 24),
                b.court_number.to_string(),
                b.booking_date.clone(),
                format!("{}-{}", b.start_time, b.end_time),
                money(b.total_price),
                b.status.to_string(),
                b.user
                    .as_ref()
                    .map(|u| clip(&u.full_name, 20))
                    .unwrap_or_default(),
            ]
        })
        .collect();
    table(
        &["ID", "COURT", "NO", "DATE", "TIME", "TOTAL", "STATUS", "CUSTOMER"],
        &rows,
    )
}

pub fn booking_page(page: &Page<Booking>) -> String {
    with_page(bookings(&page.content), page)
}

pub fn booking_detail(booking: &Booking) -> String {
    let mut out = format!("Booking #{} - {}\n", booking.id, booking.status);
    out.push_str(&format!(
        "  Court:   {} #{} ({})\n",
        booking.court_name, booking.court_number, booking.court_address
    ));
    out.push_str(&format!(
        "  When:    {} {}-{}\n",
        booking.booking_date, booking.start_time, booking.end_time
    ));
    out.push_str(&format!("  Total:   {}\n", money(booking.total_price)));
    if let Some(notes) = &booking.notes {
        out.push_str(&format!("  Notes:   {}\n", notes));
    }
    if let Some(payment) = &booking.payment {
        out.push_str(&format!(
            "  Payment: {} {} (paid {}, remaining {})\n",
            payment.payment_type,
            payment.status,
            money(payment.amount - payment.remaining_amount),
            money(payment.remaining_amount)
        ));
    }
    out
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let t = &dashboard.tally;
    let mut out = format!(
        "Bookings: {} total, {} pending, {} confirmed, {} completed\n\nRecent:\n",
        t.total, t.pending, t.confirmed, t.completed
    );
    if dashboard.recent.is_empty() {
        out.push_str("Nothing found.\n");
    } else {
        out.push_str(&bookings(&dashboard.recent));
    }
    out
}

fn price_cell(price: f64, discount: Option<f64>) -> String {
    match discount {
        Some(d) if d > 0.0 => format!("{} (was {})", money(d), money(price)),
        _ => money(price),
    }
}

pub fn products(products: &[Product]) -> String {
    let rows: Vec<Vec<String>> = products
        .iter()
        .map(|p| {
            let mut tags = Vec::new();
            if p.featured {
                tags.push("featured");
            }
            if p.bestseller {
                tags.push("bestseller");
            }
            vec![
                p.id.to_string(),
                clip(&p.name, 32),
                price_cell(p.price, p.discount_price),
                p.stock.to_string(),
                clip(&p.category_name, 16),
                p.status.to_string(),
                tags.join(","),
            ]
        })
        .collect();
    table(
        &["ID", "NAME", "PRICE", "STOCK", "CATEGORY", "STATUS", ""],
        &rows,
    )
}

pub fn product_page(page: &Page<Product>) -> String {
    with_page(products(&page.content), page)
}

pub fn product_detail(detail: &ProductDetail) -> String {
    let p = &detail.product;
    let mut out = format!("{} (#{})\n", p.name, p.id);
    out.push_str(&format!("  Price:    {}\n", price_cell(p.price, p.discount_price)));
    out.push_str(&format!("  Stock:    {}\n", p.stock));
    out.push_str(&format!("  Category: {}\n", p.category_name));
    out.push_str(&format!("  Status:   {}\n", p.status));
    if let Some(warranty) = &detail.warranty {
        out.push_str(&format!("  Warranty: {}\n", warranty));
    }
    if !p.description.is_empty() {
        out.push_str(&format!("\n{}\n", p.description));
    }
    if let Some(specs) = &detail.specifications {
        out.push_str(&format!("\nSpecifications:\n{}\n", specs));
    }
    out
}

pub fn categories(categories: &[ProductCategory]) -> String {
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                c.name.clone(),
                c.status.to_string(),
                clip(c.description.as_deref().unwrap_or(""), 48),
            ]
        })
        .collect();
    table(&["ID", "NAME", "STATUS", "DESCRIPTION"], &rows)
}

fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "*".repeat(filled), ".".repeat(5 - filled))
}

pub fn reviews(reviews: &[ProductReview]) -> String {
    let rows: Vec<Vec<String>> = reviews
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                stars(r.rating),
                clip(&r.user_name, 18),
                if r.verified { "yes" } else { "" }.to_string(),
                clip(&r.comment, 50),
            ]
        })
        .collect();
    table(&["ID", "RATING", "BY", "VERIFIED", "COMMENT"], &rows)
}

pub fn review_page(page: &Page<ProductReview>) -> String {
    with_page(reviews(&page.content), page)
}

pub fn cart(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Your cart is empty.\n".to_string();
    }
    let rows: Vec<Vec<String>> = cart
        .items()
        .iter()
        .map(|i| {
            vec![
                i.product_id.to_string(),
                clip(&i.product_name, 32),
                money(i.unit_price()),
                i.quantity.to_string(),
                money(i.line_total()),
            ]
        })
        .collect();
    let mut out = table(&["ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"], &rows);
    out.push_str(&format!(
        "{} item(s), total {}\n",
        cart.item_count(),
        money(cart.total_amount())
    ));
    out
}

pub fn orders(orders: &[Order]) -> String {
    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|o| {
            vec![
                o.id.to_string(),
                o.order_code.clone(),
                money(o.final_amount),
                o.payment_method.to_string(),
                o.payment_status.to_string(),
                o.order_status.to_string(),
                o.created_at.clone(),
            ]
        })
        .collect();
    table(
        &["ID", "CODE", "AMOUNT", "PAYMENT", "PAID", "STATUS", "CREATED"],
        &rows,
    )
}

pub fn order_page(page: &Page<Order>) -> String {
    with_page(orders(&page.content), page)
}

pub fn order_detail(order: &Order) -> String {
    let mut out = format!(
        "Order {} (#{}) - {}\n",
        order.order_code, order.id, order.order_status
    );
    out.push_str(&format!(
        "  Ship to: {}, {}\n  Address: {}, {}, {}, {}\n",
        order.recipient_name,
        order.recipient_phone,
        order.shipping_address,
        order.shipping_ward,
        order.shipping_district,
        order.shipping_province
    ));
    out.push_str(&format!(
        "  Payment: {} ({})\n",
        order.payment_method, order.payment_status
    ));
    if let Some(note) = &order.note {
        out.push_str(&format!("  Note:    {}\n", note));
    }
    out.push('\n');
    for item in &order.items {
        out.push_str(&format!(
            "  {} x {} @ {} = {}\n",
            item.quantity,
            item.product_name,
            money(item.price),
            money(item.total_price)
        ));
    }
    out.push_str(&format!(
        "\n  Subtotal {}  Shipping {}  Total {}\n",
        money(order.total_amount),
        money(order.shipping_fee),
        money(order.final_amount)
    ));
    out
}

pub fn users(users: &[UserDetail]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.user.id.to_string(),
                clip(&u.user.full_name, 24),
                clip(&u.user.email, 28),
                u.user.phone.clone(),
                u.user.role.to_string(),
                if u.active { "active" } else { "inactive" }.to_string(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "EMAIL", "PHONE", "ROLE", "STATE"], &rows)
}

pub fn user_page(page: &Page<UserDetail>) -> String {
    with_page(users(&page.content), page)
}

pub fn user_detail(detail: &UserDetail) -> String {
    let mut out = format!("{}\n", user_line(&detail.user));
    out.push_str(&format!("  Phone:    {}\n", detail.user.phone));
    if let Some(address) = &detail.address {
        out.push_str(&format!("  Address:  {}\n", address));
    }
    out.push_str(&format!(
        "  State:    {}\n",
        if detail.active { "active" } else { "inactive" }
    ));
    if let Some(last) = &detail.last_login {
        out.push_str(&format!("  Last login: {}\n", last));
    }
    out.push_str(&format!(
        "  Bookings: {}  Orders: {}  Spent: {}\n",
        detail.total_bookings,
        detail.total_orders,
        money(detail.total_spent)
    ));
    out
}

pub fn user_statistics(stats: &UserStatistics) -> String {
    format!(
        "Users: {} total, {} active, {} inactive, {} new this month\nBy role: USER {}, OWNER {}, ADMIN {}\n",
        stats.total_users,
        stats.active_users,
        stats.inactive_users,
        stats.new_users_this_month,
        stats.users_by_role.user,
        stats.users_by_role.owner,
        stats.users_by_role.admin
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;

    #[test]
    fn test_money() {
        assert_eq!(money(0.0), "0đ");
        assert_eq!(money(999.0), "999đ");
        assert_eq!(money(40000.0), "40.000đ");
        assert_eq!(money(3200000.0), "3.200.000đ");
        assert_eq!(money(-1500.4), "-1.500đ");
    }

    #[test]
    fn test_table_alignment() {
        let out = table(
            &["ID", "NAME"],
            &[
                vec!["1".to_string(), "Sân A".to_string()],
                vec!["12".to_string(), "B".to_string()],
            ],
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID  NAME");
        assert_eq!(lines[1], "--  -----");
        assert_eq!(lines[2], "1   Sân A");
        assert_eq!(lines[3], "12  B");
    }

    #[test]
    fn test_clip() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add_item(
            CartItem {
                product_id: 1,
                product_name: "Grip".to_string(),
                product_image: String::new(),
                price: 20000.0,
                discount_price: None,
                quantity: 1,
                stock: 50,
            },
            3,
        );
        let out = super::cart(&cart);
        assert!(out.contains("60.000đ"));
        assert!(out.ends_with("3 item(s), total 60.000đ\n"));

        assert_eq!(super::cart(&Cart::new()), "Your cart is empty.\n");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(4), "****.");
        assert_eq!(stars(9), "*****");
    }
}
