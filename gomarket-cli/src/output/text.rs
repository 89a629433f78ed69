//! Text output formatting with colors.

use gomarket_core::{Cart, CartItem};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";

/// Width of the title column.
const TITLE_WIDTH: usize = 28;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the whole cart as a table with a totals line.
    pub fn format_cart(&self, cart: &Cart) -> String {
        if cart.is_empty() {
            return self.paint(DIM, "Cart is empty");
        }

        let mut lines = Vec::with_capacity(cart.len() + 3);
        lines.push(self.paint(
            BOLD,
            &format!(
                "{:>4}  {:<width$} {:>10} {:>10}",
                "Qty",
                "Product",
                "Price",
                "Total",
                width = TITLE_WIDTH
            ),
        ));
        lines.push("─".repeat(TITLE_WIDTH + 28));

        for item in cart.items() {
            lines.push(self.format_line(item));
        }

        lines.push("─".repeat(TITLE_WIDTH + 28));
        let units = cart.item_count();
        let summary = format!(
            "{} {} · {}",
            units,
            if units == 1 { "unit" } else { "units" },
            format_money(cart.total_price())
        );
        lines.push(self.paint(GREEN, &summary));

        lines.join("\n")
    }

    /// Formats one cart line.
    pub fn format_line(&self, item: &CartItem) -> String {
        format!(
            "{:>4}  {:<width$} {:>10} {:>10}  {}",
            item.quantity,
            truncate(&item.title, TITLE_WIDTH),
            format_money(item.price),
            format_money(item.line_total()),
            self.paint(DIM, &format!("[{}]", item.id)),
            width = TITLE_WIDTH
        )
    }

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

/// Formats an amount with two decimals.
pub fn format_money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Shortens text to `max` characters, marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
