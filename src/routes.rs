//! Command table. Every command is a route with an access guard; the
//! session gate decides per invocation whether it runs.

use crate::models::Role;
use crate::session::Guard;

const STAFF: &[Role] = &[Role::Admin, Role::Owner];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    General,
    Account,
    Courts,
    Shop,
    Admin,
}

impl Section {
    pub const ALL: &'static [Section] = &[
        Section::General,
        Section::Account,
        Section::Courts,
        Section::Shop,
        Section::Admin,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Account => "Account",
            Self::Courts => "Courts & bookings",
            Self::Shop => "Shop",
            Self::Admin => "Back office",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub guard: Guard,
    pub section: Section,
}

const fn route(
    name: &'static str,
    usage: &'static str,
    help: &'static str,
    guard: Guard,
    section: Section,
) -> Route {
    Route {
        name,
        usage,
        help,
        guard,
        section,
    }
}

pub const ROUTES: &[Route] = &[
    route(
        "help",
        "help",
        "show commands",
        Guard::Public,
        Section::General,
    ),
    route(
        "exit",
        "exit",
        "quit",
        Guard::Public,
        Section::General,
    ),
    route(
        "theme",
        "theme [light|dark|toggle]",
        "show or change the theme",
        Guard::Public,
        Section::General,
    ),
    route(
        "menu",
        "menu",
        "back-office sections you can open",
        Guard::Protected,
        Section::General,
    ),
    route(
        "login",
        "login <email-or-phone> <password>",
        "sign in",
        Guard::Public,
        Section::Account,
    ),
    route(
        "register",
        "register <full-name> <email> <phone> <password>",
        "create an account and sign in",
        Guard::Public,
        Section::Account,
    ),
    route(
        "forgot-password",
        "forgot-password <email>",
        "request a password reset email",
        Guard::Public,
        Section::Account,
    ),
    route(
        "logout",
        "logout",
        "sign out and empty the cart",
        Guard::Public,
        Section::Account,
    ),
    route(
        "whoami",
        "whoami",
        "show the current session",
        Guard::Public,
        Section::Account,
    ),
    route(
        "profile",
        "profile [update --name N --email E --phone P | password <old> <new>]",
        "show or edit your profile",
        Guard::Protected,
        Section::Account,
    ),
    route(
        "courts",
        "courts [page]",
        "list courts",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "search-courts",
        "search-courts [--name N] [--address A] [--min P] [--max P] [--page N]",
        "search courts",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "court",
        "court <id>",
        "court details",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "book",
        "book <court-id> <court-number> <YYYY-MM-DD> <HH:MM> <HH:MM> [notes...]",
        "book a court",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "bookings",
        "bookings [page]",
        "your bookings",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "booking",
        "booking <id>",
        "booking details",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "cancel-booking",
        "cancel-booking <id>",
        "cancel a booking",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "pay",
        "pay <booking-id> [full|deposit]",
        "start a MoMo payment for a booking",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "payment",
        "payment <booking-id>",
        "payment status of a booking",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "confirm-payment",
        "confirm-payment <order-id> [result-code]",
        "settle a sandbox payment",
        Guard::Protected,
        Section::Courts,
    ),
    route(
        "products",
        "products [page]",
        "browse the catalog",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "search-products",
        "search-products [keyword] [--category ID] [--min P] [--max P] [--page N]",
        "search the catalog",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "product",
        "product <id>",
        "product details",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "featured",
        "featured",
        "featured products",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "bestsellers",
        "bestsellers",
        "best-selling products",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "new-arrivals",
        "new-arrivals",
        "newest products",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "categories",
        "categories",
        "active categories",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "category",
        "category <id> [page]",
        "products in a category",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "reviews",
        "reviews <product-id> [rating]",
        "reviews of a product",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "cart",
        "cart [add <product-id> [qty] | set <product-id> <qty> | rm <product-id> | clear]",
        "show or change the cart",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "checkout",
        "checkout <name> <phone> <address> <province> <district> <ward> [--payment M] [--note T]",
        "place an order for the cart",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "orders",
        "orders [status] [page]",
        "your orders",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "order",
        "order <id>",
        "order details",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "cancel-order",
        "cancel-order <id> <reason...>",
        "cancel an order",
        Guard::Protected,
        Section::Shop,
    ),
    route(
        "dashboard",
        "dashboard",
        "booking overview",
        Guard::Roles(STAFF),
        Section::Admin,
    ),
    route(
        "admin-bookings",
        "admin-bookings [list [page] | court <court-id> | status <id> <status>]",
        "manage bookings",
        Guard::Roles(STAFF),
        Section::Admin,
    ),
    route(
        "admin-courts",
        "admin-courts [list [page] | mine | create <file.toml> | update <id> <file.toml> | delete <id> | status <id> <status>]",
        "manage courts",
        Guard::Roles(STAFF),
        Section::Admin,
    ),
    route(
        "upload",
        "upload <image-path> [folder]",
        "upload an image and print its URL",
        Guard::Roles(STAFF),
        Section::Admin,
    ),
    route(
        "admin-products",
        "admin-products [list [page] | create <file.toml> | update <id> <file.toml> | delete <id> | status <id> <status>]",
        "manage products",
        Guard::Roles(ADMIN_ONLY),
        Section::Admin,
    ),
    route(
        "admin-orders",
        "admin-orders [list [status] [page] | set <id> <status> [note...] | stats]",
        "manage orders",
        Guard::Roles(ADMIN_ONLY),
        Section::Admin,
    ),
    route(
        "admin-categories",
        "admin-categories [list | show <id> | create <name> [description...] | update <id> <name> [description...] | delete <id> | enable <id> | disable <id>]",
        "manage categories",
        Guard::Roles(ADMIN_ONLY),
        Section::Admin,
    ),
    route(
        "admin-reviews",
        "admin-reviews [latest [limit] | delete <id>]",
        "moderate reviews",
        Guard::Roles(ADMIN_ONLY),
        Section::Admin,
    ),
    route(
        "admin-users",
        "admin-users [list [--keyword K] [--role R] [--active B] [--page N] | show <id> | create <file.toml> | update <id> <file.toml> | delete <id> | enable <id> | disable <id> | stats]",
        "manage users",
        Guard::Roles(ADMIN_ONLY),
        Section::Admin,
    ),
];

/// Look up a command, accepting `quit` for `exit`
pub fn find(name: &str) -> Option<&'static Route> {
    let name = match name {
        "quit" => "exit",
        other => other,
    };
    ROUTES.iter().find(|r| r.name == name)
}

/// One back-office section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub command: &'static str,
    pub roles: &'static [Role],
}

pub const MENU: &[MenuEntry] = &[
    MenuEntry {
        label: "Dashboard",
        command: "dashboard",
        roles: STAFF,
    },
    MenuEntry {
        label: "Bookings",
        command: "admin-bookings",
        roles: STAFF,
    },
    MenuEntry {
        label: "Courts",
        command: "admin-courts",
        roles: STAFF,
    },
    MenuEntry {
        label: "Products",
        command: "admin-products",
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        label: "Orders",
        command: "admin-orders",
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        label: "Categories",
        command: "admin-categories",
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        label: "Reviews",
        command: "admin-reviews",
        roles: ADMIN_ONLY,
    },
    MenuEntry {
        label: "Users",
        command: "admin-users",
        roles: ADMIN_ONLY,
    },
];

/// Back-office sections visible to a role
pub fn menu_for(role: Option<Role>) -> Vec<&'static MenuEntry> {
    match role {
        Some(role) => MENU.iter().filter(|m| m.roles.contains(&role)).collect(),
        None => Vec::new(),
    }
}

/// Help text grouped by section
pub fn help_text() -> String {
    let width = ROUTES.iter().map(|r| r.usage.len()).max().unwrap_or(0).min(48);
    let mut out = String::new();
    for section in Section::ALL {
        out.push_str(section.title());
        out.push_str(":\n");
        for r in ROUTES.iter().filter(|r| r.section == *section) {
            if r.usage.len() > width {
                out.push_str(&format!("  {}\n  {:width$}  - {}\n", r.usage, "", r.help));
            } else {
                out.push_str(&format!("  {:width$}  - {}\n", r.usage, r.help));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{evaluate, testing::user, GateOutcome, SessionSnapshot};
    use std::collections::HashSet;

    #[test]
    fn test_names_unique() {
        let names: HashSet<&str> = ROUTES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), ROUTES.len());
    }

    #[test]
    fn test_find() {
        assert_eq!(find("quit").unwrap().name, "exit");
        assert_eq!(find("cart").unwrap().guard, Guard::Protected);
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_menu_for_roles() {
        let labels = |role| {
            menu_for(Some(role))
                .iter()
                .map(|m| m.label)
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(Role::Owner), vec!["Dashboard", "Bookings", "Courts"]);
        assert_eq!(labels(Role::Admin).len(), MENU.len());
        assert!(labels(Role::User).is_empty());
        assert!(menu_for(None).is_empty());
    }

    #[test]
    fn test_menu_matches_route_guards() {
        for entry in MENU {
            let route = find(entry.command).unwrap();
            assert_eq!(route.guard, Guard::Roles(entry.roles), "{}", entry.command);
        }
    }

    #[test]
    fn test_gate_on_routes() {
        let anonymous = SessionSnapshot::anonymous();
        let owner = SessionSnapshot::signed_in(user(Role::Owner));

        let login = find("login").unwrap();
        let cart = find("cart").unwrap();
        let users = find("admin-users").unwrap();
        let dashboard = find("dashboard").unwrap();

        assert_eq!(evaluate(login.guard, &anonymous), GateOutcome::Render);
        assert_eq!(evaluate(cart.guard, &anonymous), GateOutcome::RedirectLogin);
        assert_eq!(evaluate(cart.guard, &owner), GateOutcome::Render);
        assert_eq!(evaluate(users.guard, &owner), GateOutcome::RedirectHome);
        assert_eq!(evaluate(dashboard.guard, &owner), GateOutcome::Render);
    }

    #[test]
    fn test_help_lists_every_route() {
        let help = help_text();
        for r in ROUTES {
            assert!(help.contains(r.usage), "{}", r.name);
        }
    }
}
