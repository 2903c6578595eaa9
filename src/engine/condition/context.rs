// ==========================================
// Facts a condition can look at
// ==========================================

use crate::domain::{Address, User};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartItem {
    pub product_id: i64,
    pub category_id: i64,
    pub brand_category_id: i64,
    pub quantity: i64,
    /// Unit price in minor units
    pub price: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    pub currency: String,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new(currency: &str) -> Self {
        Self {
            currency: currency.to_uppercase(),
            items: Vec::new(),
        }
    }

    pub fn add(mut self, item: CartItem) -> Self {
        self.items.push(item);
        self
    }

    /// Sum of price * quantity in minor units, saturating at the i64 bounds
    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |sum, i| sum.saturating_add(i.price.saturating_mul(i.quantity)))
    }
}

#[derive(Debug, Clone)]
pub struct ConditionContext {
    pub now: DateTime<Utc>,
    pub store_id: i64,
    /// None for anonymous visitors
    pub user: Option<User>,
    pub cart: Option<Cart>,
    pub shipping: Option<Address>,
    /// Times the price rule under evaluation has been used
    pub price_rule_used: Option<i64>,
}

impl ConditionContext {
    pub fn new(store_id: i64) -> Self {
        Self {
            now: Utc::now(),
            store_id,
            user: None,
            cart: None,
            shipping: None,
            price_rule_used: None,
        }
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_cart(mut self, cart: Cart) -> Self {
        self.cart = Some(cart);
        self
    }

    pub fn with_shipping(mut self, address: Address) -> Self {
        self.shipping = Some(address);
        self
    }

    pub fn with_price_rule_used(mut self, used: i64) -> Self {
        self.price_rule_used = Some(used);
        self
    }
}
