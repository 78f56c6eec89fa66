//! Shopping cart: a deduplicated, quantity-accumulated list of products.
//!
//! `Cart` is the in-memory collection with its merge rules and derived
//! totals. `CartStore` wraps it with persistence: every mutation rewrites
//! the whole collection to local storage, and startup rehydrates it.
//! Stock is only a cached snapshot and is never enforced here; the backend
//! decides at checkout.

use crate::models::shop::{OrderLineRequest, Product};
use crate::storage::{keys, Storage};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// One cart line, keyed by product id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub product_image: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<f64>,
    pub quantity: u32,
    /// Stock level when the product was added
    #[serde(default)]
    pub stock: i64,
}

impl CartItem {
    /// Snapshot a product as a cart line
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            product_image: product.images.first().cloned().unwrap_or_default(),
            price: product.price,
            discount_price: product.discount_price,
            quantity: 1,
            stock: product.stock,
        }
    }

    /// Discounted price when present, list price otherwise
    pub fn unit_price(&self) -> f64 {
        match self.discount_price {
            Some(d) if d > 0.0 => d,
            _ => self.price,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price() * self.quantity as f64
    }
}

/// A line whose quantity exceeds the cached stock snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct StockWarning {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: u32,
    pub stock: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, product_id: i64) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Add `quantity` of a product (0 counts as 1). An existing line for the
    /// same product is incremented; otherwise a new line is appended.
    pub fn add_item(&mut self, item: CartItem, quantity: u32) {
        let quantity = quantity.max(1);
        match self
            .items
            .iter_mut()
            .find(|i| i.product_id == item.product_id)
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { quantity, ..item }),
        }
    }

    /// Remove a product's line; absent products are ignored
    pub fn remove_item(&mut self, product_id: i64) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Overwrite a line's quantity; zero or negative removes the line
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(product_id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of quantities across lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| i.quantity as u64).sum()
    }

    /// Sum of effective unit price times quantity across lines
    pub fn total_amount(&self) -> f64 {
        self.items.iter().map(|i| i.line_total()).sum()
    }

    pub fn stock_warnings(&self) -> Vec<StockWarning> {
        self.items
            .iter()
            .filter(|i| i.quantity as i64 > i.stock)
            .map(|i| StockWarning {
                product_id: i.product_id,
                product_name: i.product_name.clone(),
                quantity: i.quantity,
                stock: i.stock,
            })
            .collect()
    }

    pub fn order_lines(&self) -> Vec<OrderLineRequest> {
        self.items
            .iter()
            .map(|i| OrderLineRequest {
                product_id: i.product_id,
                quantity: i.quantity,
            })
            .collect()
    }
}

/// A cart bound to local storage
pub struct CartStore {
    storage: Storage,
    cart: Cart,
}

impl CartStore {
    /// Rehydrate from storage. Missing data is an empty cart, and so is
    /// corrupt data: the cart fails open.
    pub fn load(storage: Storage) -> Self {
        let cart = match storage.get_json::<Vec<CartItem>>(keys::CART) {
            Ok(Some(items)) => Cart::from_items(items),
            Ok(None) => Cart::new(),
            Err(e) => {
                eprintln!("Warning: discarding unreadable cart: {:#}", e);
                Cart::new()
            }
        };
        Self { storage, cart }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn add_item(&mut self, item: CartItem, quantity: u32) -> Result<()> {
        self.mutate(|cart| cart.add_item(item, quantity))
    }

    pub fn remove_item(&mut self, product_id: i64) -> Result<()> {
        self.mutate(|cart| cart.remove_item(product_id))
    }

    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) -> Result<()> {
        self.mutate(|cart| cart.set_quantity(product_id, quantity))
    }

    pub fn clear(&mut self) -> Result<()> {
        self.mutate(Cart::clear)
    }

    /// Apply a mutation in memory, then persist the whole collection. The
    /// in-memory cart keeps the change even if the write fails.
    fn mutate(&mut self, f: impl FnOnce(&mut Cart)) -> Result<()> {
        f(&mut self.cart);
        self.storage.set_json(keys::CART, self.cart.items())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, price: f64, discount: Option<f64>) -> CartItem {
        CartItem {
            product_id: id,
            product_name: format!("Product {}", id),
            product_image: String::new(),
            price,
            discount_price: discount,
            quantity: 1,
            stock: 10,
        }
    }

    #[test]
    fn test_add_merges_same_product() {
        let mut cart = Cart::new();
        for qty in [1, 2, 5] {
            cart.add_item(item(1, 100_000.0, None), qty);
        }
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(1).unwrap().quantity, 8);
    }

    #[test]
    fn test_add_zero_counts_as_one() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 10.0, None), 0);
        assert_eq!(cart.get(1).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_preserves_order() {
        let mut cart = Cart::new();
        cart.add_item(item(3, 1.0, None), 1);
        cart.add_item(item(1, 1.0, None), 1);
        cart.add_item(item(3, 1.0, None), 1);
        let ids: Vec<i64> = cart.items().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_add_does_not_cap_at_stock() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 10.0, None), 50);
        assert_eq!(cart.get(1).unwrap().quantity, 50);
        assert_eq!(cart.stock_warnings().len(), 1);
        assert_eq!(cart.stock_warnings()[0].stock, 10);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 10.0, None), 2);
        let before = cart.clone();
        cart.remove_item(99);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_non_positive_removes() {
        for qty in [0, -1, -100] {
            let mut cart = Cart::new();
            cart.add_item(item(1, 10.0, None), 2);
            cart.add_item(item(2, 10.0, None), 1);

            let mut expected = cart.clone();
            expected.remove_item(1);

            cart.set_quantity(1, qty);
            assert_eq!(cart, expected);
        }
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 10.0, None), 2);
        cart.set_quantity(1, 7);
        assert_eq!(cart.get(1).unwrap().quantity, 7);

        // Unknown product: nothing to overwrite, nothing added
        cart.set_quantity(42, 3);
        assert!(cart.get(42).is_none());
    }

    #[test]
    fn test_totals_worked_example() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 100_000.0, None), 1);
        cart.add_item(item(1, 100_000.0, None), 2);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(1).unwrap().quantity, 3);
        assert_eq!(cart.total_amount(), 300_000.0);

        cart.add_item(item(2, 50_000.0, Some(40_000.0)), 1);
        assert_eq!(cart.total_amount(), 340_000.0);
        assert_eq!(cart.item_count(), 4);

        cart.remove_item(1);
        assert_eq!(cart.total_amount(), 40_000.0);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_totals_match_lines() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 12_500.0, None), 3);
        cart.add_item(item(2, 80_000.0, Some(0.0)), 2);
        cart.add_item(item(3, 30_000.0, Some(25_000.0)), 4);
        cart.set_quantity(1, 1);

        let count: u64 = cart.items().iter().map(|i| i.quantity as u64).sum();
        let amount: f64 = cart
            .items()
            .iter()
            .map(|i| i.unit_price() * i.quantity as f64)
            .sum();
        assert_eq!(cart.item_count(), count);
        assert_eq!(cart.total_amount(), amount);
        assert_eq!(cart.total_amount(), 12_500.0 + 160_000.0 + 100_000.0);
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 10.0, None), 2);
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total_amount(), 0.0);
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();

        let mut store = CartStore::load(storage.clone());
        store.add_item(item(5, 10.0, None), 2).unwrap();
        store.add_item(item(2, 20.0, Some(15.0)), 1).unwrap();
        store.add_item(item(5, 10.0, None), 1).unwrap();

        let reloaded = CartStore::load(storage);
        assert_eq!(reloaded.cart(), store.cart());
        let ids: Vec<i64> = reloaded
            .cart()
            .items()
            .iter()
            .map(|i| i.product_id)
            .collect();
        assert_eq!(ids, vec![5, 2]);
        assert_eq!(reloaded.cart().get(5).unwrap().quantity, 3);
    }

    #[test]
    fn test_store_corrupt_data_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        storage.set(keys::CART, "[{\"productId\": ").unwrap();

        let store = CartStore::load(storage.clone());
        assert!(store.cart().is_empty());

        storage.set(keys::CART, "{\"not\": \"a list\"}").unwrap();
        assert!(CartStore::load(storage).cart().is_empty());
    }

    #[test]
    fn test_store_persists_every_mutation() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let mut store = CartStore::load(storage.clone());

        store.add_item(item(1, 10.0, None), 1).unwrap();
        store.set_quantity(1, 4).unwrap();
        assert_eq!(CartStore::load(storage.clone()).cart().item_count(), 4);

        store.remove_item(1).unwrap();
        assert!(CartStore::load(storage.clone()).cart().is_empty());

        store.add_item(item(2, 10.0, None), 1).unwrap();
        store.clear().unwrap();
        assert_eq!(storage.get(keys::CART).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_wire_format() {
        let mut cart = Cart::new();
        cart.add_item(item(1, 10.0, None), 2);
        let json = serde_json::to_value(cart.items()).unwrap();
        assert_eq!(json[0]["productId"], 1);
        assert_eq!(json[0]["quantity"], 2);
        assert!(json[0].get("discountPrice").is_none());
    }
}
