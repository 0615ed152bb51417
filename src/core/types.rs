use serde::{Deserialize, Serialize};

/// A product the machine can vend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Keypad symbol that selects this product
    pub key: char,
    /// Display name
    pub name: String,
    /// Unit price in dollars
    pub unit_price: f64,
}

/// A selectable quantity of product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portion {
    /// Keypad symbol that selects this portion
    pub key: char,
    /// Human description, e.g. "1 1/2 cup"
    pub description: String,
    /// Multiplier applied to the product's unit price
    pub multiplier: f64,
}

/// Computes the price of a selection in integer cents.
///
/// The result is rounded up, so a fractional cent always charges the
/// next whole cent.
pub fn price_cents(unit_price: f64, multiplier: f64) -> u32 {
    (100.0 * unit_price * multiplier).ceil() as u32
}

/// Terminal outcome of a purchase attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleResult {
    /// Product dispensed and the sale reported to the terminal
    Completed,
    /// Payment authorized but the dispense failed; terminal was reset
    DispenseFailed,
}

/// One purchase attempt.
///
/// Created when a customer starts a selection, mutated by each step of the
/// vend cycle, and discarded at the end of the attempt. Nothing is persisted
/// across restarts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Selected product
    pub product: Product,
    /// Selected portion
    pub portion: Portion,
    /// Computed price in cents
    pub price: u32,
    /// Whether the terminal approved the authorization
    pub authorized: bool,
    /// Outcome of the dispense step, if reached
    pub result: Option<SaleResult>,
    /// Terminal-assigned transaction id, if the sale was reported
    pub transaction_id: Option<String>,
}

impl Transaction {
    /// Starts a transaction for a confirmed selection
    pub fn new(product: Product, portion: Portion) -> Self {
        let price = price_cents(product.unit_price, portion.multiplier);
        Transaction {
            product,
            portion,
            price,
            authorized: false,
            result: None,
            transaction_id: None,
        }
    }

    /// The price formatted for the terminal: cents as decimal text
    pub fn price_field(&self) -> String {
        self.price.to_string()
    }

    /// The price formatted for the customer display, e.g. "$2.63"
    pub fn price_display(&self) -> String {
        format!("${:.2}", self.price as f64 / 100.0)
    }
}
