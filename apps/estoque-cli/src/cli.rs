//! # Command Line
//!
//! Argument definitions for the `estoque` binary.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  estoque [--config FILE] [--data-dir DIR] [--json] <COMMAND>            │
//! │                                                                         │
//! │  intake       record a stock entry (next LOT n for the product)         │
//! │  stock        reconciled balance per product / lot / sector             │
//! │  entries      stock intake registry, as recorded                        │
//! │  sales        sales history, as recorded                                │
//! │  candidates   lots offered for sale                                     │
//! │  sell         build a checkout; --confirm records it                    │
//! │  report       revenue, cost, profit, valuation, best seller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use estoque_core::candidates::parse_label;
use estoque_core::{LotKey, Money, PaymentMethod, ValidationError};

#[derive(Debug, Parser)]
#[command(name = "estoque", version, about = "Stock and sales ledger for a small shop")]
pub struct Cli {
    /// Config file (default: platform config dir / estoque.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the table files; overrides config and environment
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a stock intake
    Intake(IntakeArgs),

    /// Show reconciled stock
    Stock(StockArgs),

    /// Show every recorded stock entry
    Entries,

    /// Show the sales history
    Sales,

    /// List lots available for sale
    Candidates,

    /// Build a checkout and, with --confirm, record it
    Sell(SellArgs),

    /// Show the business report
    Report,
}

#[derive(Debug, Args)]
pub struct IntakeArgs {
    #[arg(long)]
    pub product: String,

    #[arg(long)]
    pub sector: String,

    #[arg(long)]
    pub quantity: i64,

    /// Expiry date, YYYY-MM-DD
    #[arg(long, value_name = "DATE")]
    pub expiry: NaiveDate,

    /// Unit cost, e.g. 2.50 or 2,50
    #[arg(long, value_name = "AMOUNT")]
    pub cost: Money,

    /// Unit sale price; also the minimum accepted at checkout
    #[arg(long, value_name = "AMOUNT")]
    pub price: Money,
}

#[derive(Debug, Args)]
pub struct StockArgs {
    /// Only rows for this product
    #[arg(long)]
    pub product: Option<String>,
}

#[derive(Debug, Args)]
pub struct SellArgs {
    /// One sale line; repeat for several lots
    #[arg(long = "line", required = true, value_name = "PRODUCT - LOT:QTY[:PRICE[:METHOD]]")]
    pub lines: Vec<SaleLineArg>,

    /// Payment method for lines that do not name one
    #[arg(long, default_value = "dinheiro")]
    pub payment: PaymentMethod,

    /// Record the sale; without it the batch is only shown
    #[arg(long)]
    pub confirm: bool,
}

// =============================================================================
// Sale Line Argument
// =============================================================================

/// One `--line` value.
///
/// ```text
/// "CAFE - LOT 1:3"                 3 units at the registered sale price
/// "CAFE - LOT 1:3:6,50"            3 units at 6.50
/// "CAFE - LOT 1:3::pix"            registered price, paid with Pix
/// "CAFE - LOT 1:3:6.50:credito"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleLineArg {
    pub lot: LotKey,
    pub quantity: i64,
    pub unit_price: Option<Money>,
    pub payment_method: Option<PaymentMethod>,
}

impl FromStr for SaleLineArg {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_error = || {
            ValidationError::invalid_format(
                "line",
                format!("expected 'PRODUCT - LOT:QTY[:PRICE[:METHOD]]', got '{}'", s),
            )
        };

        // the lot label ends at the first ':' after the last " - "
        let dash = s.rfind(" - ").ok_or_else(format_error)?;
        let colon = s[dash..].find(':').map(|i| dash + i).ok_or_else(format_error)?;
        let lot = parse_label(&s[..colon])?;

        let fields: Vec<&str> = s[colon + 1..].split(':').map(str::trim).collect();
        if fields.len() > 3 {
            return Err(format_error());
        }

        let quantity = fields[0].parse::<i64>().map_err(|_| {
            ValidationError::invalid_format("quantity", format!("'{}' is not a whole number", fields[0]))
        })?;

        let unit_price = match fields.get(1) {
            Some(price) if !price.is_empty() => Some(price.parse::<Money>()?),
            _ => None,
        };

        let payment_method = match fields.get(2) {
            Some(method) if !method.is_empty() => Some(method.parse::<PaymentMethod>()?),
            _ => None,
        };

        Ok(SaleLineArg {
            lot,
            quantity,
            unit_price,
            payment_method,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_line_with_quantity_only() {
        let line: SaleLineArg = "CAFE - LOT 1:3".parse().unwrap();
        assert_eq!(line.lot, LotKey::new("CAFE", "LOT 1"));
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price, None);
        assert_eq!(line.payment_method, None);
    }

    #[test]
    fn test_line_with_price_and_method() {
        let line: SaleLineArg = "PÃO DE QUEIJO - LOT 12:2:6,50:credito".parse().unwrap();
        assert_eq!(line.lot, LotKey::new("PÃO DE QUEIJO", "LOT 12"));
        assert_eq!(line.unit_price, Some(Money::from_cents(650)));
        assert_eq!(line.payment_method, Some(PaymentMethod::CreditCard));
    }

    #[test]
    fn test_line_with_method_but_default_price() {
        let line: SaleLineArg = "A - LOT 1:1::pix".parse().unwrap();
        assert_eq!(line.unit_price, None);
        assert_eq!(line.payment_method, Some(PaymentMethod::Pix));
    }

    #[test]
    fn test_product_name_with_dash_keeps_last_separator() {
        let line: SaleLineArg = "COCA - COLA - LOT 2:1".parse().unwrap();
        assert_eq!(line.lot, LotKey::new("COCA - COLA", "LOT 2"));
    }

    #[test]
    fn test_malformed_lines_are_rejected() {
        for bad in ["CAFE LOT 1:3", "CAFE - LOT 1", "CAFE - LOT 1:three", "A - LOT 1:1:5:pix:extra", "A - LOT 1:1:5:cheque"] {
            assert!(bad.parse::<SaleLineArg>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_history_commands_parse() {
        assert!(matches!(Cli::parse_from(["estoque", "entries"]).command, Command::Entries));
        assert!(matches!(Cli::parse_from(["estoque", "sales", "--json"]).command, Command::Sales));
    }

    #[test]
    fn test_sell_args_parse() {
        let cli = Cli::parse_from([
            "estoque",
            "--json",
            "sell",
            "--line",
            "A - LOT 1:2",
            "--line",
            "B - LOT 3:1:4.00",
            "--payment",
            "pix",
            "--confirm",
        ]);
        assert!(cli.json);
        match cli.command {
            Command::Sell(args) => {
                assert_eq!(args.lines.len(), 2);
                assert_eq!(args.payment, PaymentMethod::Pix);
                assert!(args.confirm);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
