//! Order summary

use std::{fmt::Write, io};

use slotmap::SlotMap;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    pricing::Quote,
    products::{Product, ProductKey},
};

/// Errors that can occur when rendering an order summary.
#[derive(Debug, Error)]
pub enum SummaryError {
    /// Error finding a product in the product catalog.
    #[error("Missing product")]
    MissingProduct(ProductKey),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Terminal-renderable summary of a quoted cart.
#[derive(Debug, Clone, Copy)]
pub struct OrderSummary<'a> {
    quote: Quote<'a>,
}

impl<'a> OrderSummary<'a> {
    /// Create a summary for the given quote.
    #[must_use]
    pub const fn new(quote: Quote<'a>) -> Self {
        Self { quote }
    }

    /// The quote this summary renders.
    #[must_use]
    pub const fn quote(&self) -> &Quote<'a> {
        &self.quote
    }

    /// Write the summary as a table of cart lines followed by the subtotal,
    /// discount, and total.
    ///
    /// # Errors
    ///
    /// Returns a [`SummaryError`] if a cart line's product is missing from
    /// the catalog, or the output cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        cart: &Cart<'_>,
        products: &SlotMap<ProductKey, Product<'_>>,
    ) -> Result<(), SummaryError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Plan", "Price"]);

        for (line_idx, line) in cart.iter().enumerate() {
            let product = products
                .get(line.product())
                .ok_or(SummaryError::MissingProduct(line.product()))?;

            builder.push_record([
                format!("#{:<3}", line_idx + 1),
                product.title.clone(),
                line.plan_kind().to_string(),
                format!("{}", line.unit_price()),
            ]);
        }

        write_summary_table(&mut out, builder)?;

        write_totals(&mut out, &self.quote)?;

        Ok(())
    }
}

fn write_summary_table(out: &mut impl io::Write, builder: Builder) -> Result<(), SummaryError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..4), Alignment::right());

    let table_str = colorize_borders(&table.to_string());

    writeln!(out, "\n{table_str}").map_err(|_err| SummaryError::IO)
}

fn write_totals(out: &mut impl io::Write, quote: &Quote<'_>) -> Result<(), SummaryError> {
    let subtotal_label = " Subtotal:";
    let discount_label = " Discount:";
    let total_label = " \x1b[1mTotal:\x1b[0m";

    let subtotal_val = format!("{}  ", quote.subtotal());
    let discount_val = format!("-{}  ", quote.discount());
    let total_val = format!("{}  ", quote.total());

    let label_width = visible_width(subtotal_label)
        .max(visible_width(discount_label))
        .max(visible_width(total_label));

    let value_width = subtotal_val
        .len()
        .max(discount_val.len())
        .max(total_val.len());

    write_summary_line(out, subtotal_label, &subtotal_val, label_width, value_width)?;
    write_summary_line(out, discount_label, &discount_val, label_width, value_width)?;

    write_summary_line(
        out,
        total_label,
        &format!("\x1b[1m{total_val}\x1b[0m"),
        label_width,
        value_width,
    )?;

    writeln!(out).map_err(|_err| SummaryError::IO)
}

/// Wraps runs of UTF-8 box-drawing characters in ANSI dark-grey escape codes.
///
/// Box-drawing characters occupy the Unicode range U+2500..U+257F. Runs of
/// consecutive border characters get a single grey escape sequence around
/// them, leaving cell content untouched.
fn colorize_borders(table: &str) -> String {
    let mut out = String::with_capacity(table.len() + 256);
    let mut in_run = false;

    for ch in table.chars() {
        let box_char = ('\u{2500}'..='\u{257F}').contains(&ch);

        if box_char && !in_run {
            _ = out.write_str("\x1b[90m");
            in_run = true;
        } else if !box_char && in_run {
            _ = out.write_str("\x1b[0m");
            in_run = false;
        }

        out.push(ch);
    }

    if in_run {
        _ = out.write_str("\x1b[0m");
    }

    out
}

/// Returns the visible (non-ANSI) width of a string.
fn visible_width(s: &str) -> usize {
    let mut width = 0usize;
    let mut in_escape = false;

    for ch in s.chars() {
        if in_escape {
            if ch.is_ascii_alphabetic() {
                in_escape = false;
            }
        } else if ch == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }

    width
}

/// Writes a summary line with a right-aligned label and a fixed-width value column.
fn write_summary_line(
    out: &mut impl io::Write,
    label: &str,
    value: &str,
    label_col_width: usize,
    value_col_width: usize,
) -> Result<(), SummaryError> {
    let label_vis = visible_width(label);
    let value_vis = visible_width(value);

    // 2 chars of spacing between label and value column.
    let label_pad = label_col_width.saturating_sub(label_vis);
    let value_pad = value_col_width.saturating_sub(value_vis);

    writeln!(
        out,
        "{:>label_pad$}{label}  {value_pad}{value}",
        "",
        value_pad = " ".repeat(value_pad)
    )
    .map_err(|_err| SummaryError::IO)
}
