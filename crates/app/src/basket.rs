//! The running list of priced purchases and its total.

use engine::Money;
use rust_decimal::Decimal;

/// One priced line of the basket.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineItem {
    pub name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub cost: Money,
}

#[derive(Debug, Default)]
pub struct Basket {
    items: Vec<LineItem>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: LineItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.items.iter().map(|item| item.cost).sum()
    }

    /// Text for the total line, e.g. `Итого: 12 руб. 50 коп.`.
    pub fn summary(&self) -> String {
        format!("Итого: {}", self.total().to_rubles_string())
    }
}
