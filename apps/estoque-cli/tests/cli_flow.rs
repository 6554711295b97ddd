//! Whole invocations through `run`, against a temporary data directory.

use std::fs;
use std::path::Path;

use clap::Parser;
use estoque_cli::cli::Cli;
use estoque_cli::error::ErrorCode;
use tempfile::TempDir;

fn invoke(data_dir: &Path, args: &[&str]) -> Result<String, estoque_cli::error::CliError> {
    let config = data_dir.join("estoque.toml");
    if !config.exists() {
        fs::write(&config, "[store]\ncache_ttl_secs = 0\n\n[display]\ncurrency_symbol = \"R$\"\n").unwrap();
    }

    let mut argv = vec![
        "estoque".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--data-dir".to_string(),
        data_dir.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));

    let cli = Cli::parse_from(argv);
    let mut out = Vec::new();
    estoque_cli::run(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

fn intake(dir: &Path, product: &str, quantity: &str) {
    invoke(
        dir,
        &[
            "intake", "--product", product, "--sector", "mercearia", "--quantity", quantity,
            "--expiry", "2030-01-01", "--cost", "2,00", "--price", "5.00",
        ],
    )
    .unwrap();
}

#[test]
fn intake_sell_report_cycle() {
    let dir = TempDir::new().unwrap();
    intake(dir.path(), "cafe", "10");

    let candidates = invoke(dir.path(), &["candidates"]).unwrap();
    assert!(candidates.starts_with("CAFE - LOT 1"));

    let pending = invoke(dir.path(), &["sell", "--line", "CAFE - LOT 1:4"]).unwrap();
    assert!(pending.contains("(pending)"));
    assert!(!dir.path().join("sales.csv").exists());

    let recorded = invoke(dir.path(), &["sell", "--line", "CAFE - LOT 1:4", "--payment", "pix", "--confirm"]).unwrap();
    assert!(recorded.contains("(recorded)"));
    assert!(recorded.contains("Pix"));

    let report = invoke(dir.path(), &["report"]).unwrap();
    assert!(report.contains("Revenue:             R$ 20.00"));
    assert!(report.contains("Cost of goods sold:  R$ 8.00"));
    assert!(report.contains("Profit:              R$ 12.00"));
    assert!(report.contains("Inventory valuation: R$ 12.00"));
    assert!(report.contains("Best seller:         CAFE (4 units)"));
}

#[test]
fn history_views_show_raw_records() {
    let dir = TempDir::new().unwrap();
    intake(dir.path(), "cafe", "5");
    intake(dir.path(), "cafe", "3");
    invoke(dir.path(), &["sell", "--line", "CAFE - LOT 2:1", "--confirm"]).unwrap();

    let entries = invoke(dir.path(), &["entries"]).unwrap();
    let lines: Vec<&str> = entries.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("LOT 1"));
    assert!(lines[2].contains("LOT 2"));

    let sales = invoke(dir.path(), &["--json", "sales"]).unwrap();
    let sales: serde_json::Value = serde_json::from_str(&sales).unwrap();
    assert_eq!(sales.as_array().unwrap().len(), 1);
    assert_eq!(sales[0]["lot"], "LOT 2");
    assert_eq!(sales[0]["payment_method"], "cash");
}

#[test]
fn json_stock_view() {
    let dir = TempDir::new().unwrap();
    intake(dir.path(), "leite", "3");
    intake(dir.path(), "leite", "2");

    let json = invoke(dir.path(), &["--json", "stock", "--product", "leite"]).unwrap();
    let rows: serde_json::Value = serde_json::from_str(&json).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["lot"], "LOT 1");
    assert_eq!(rows[1]["lot"], "LOT 2");
    assert_eq!(rows[1]["balance"], 2);
}

#[test]
fn errors_carry_exit_codes() {
    let dir = TempDir::new().unwrap();
    intake(dir.path(), "cafe", "2");

    let not_found = invoke(dir.path(), &["stock", "--product", "acucar"]).unwrap_err();
    assert_eq!(not_found.code, ErrorCode::NotFound);
    assert_eq!(not_found.exit_code(), 3);

    let oversold = invoke(dir.path(), &["sell", "--line", "CAFE - LOT 1:3", "--confirm"]).unwrap_err();
    assert_eq!(oversold.exit_code(), 2);

    let invalid = invoke(
        dir.path(),
        &[
            "intake", "--product", "  ", "--sector", "s", "--quantity", "1",
            "--expiry", "2030-01-01", "--cost", "1", "--price", "5",
        ],
    )
    .unwrap_err();
    assert_eq!(invalid.code, ErrorCode::ValidationError);
    assert_eq!(invalid.exit_code(), 2);
}

#[test]
fn broken_config_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("estoque.toml"), "[store\n").unwrap();

    let err = invoke(dir.path(), &["report"]).unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
    assert_eq!(err.exit_code(), 5);
}

#[test]
fn corrupted_table_is_a_storage_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("sales.csv"),
        "Código da Venda,Produto,Lote,Quantidade,Método de Pagamento,Data da Venda,Valor Unitário (R$),Valor Total (R$)\n\
         1,CAFE,LOT 1,1,Cheque,2024-06-01 10:00:00,5.00,5.00\n",
    )
    .unwrap();

    let err = invoke(dir.path(), &["report"]).unwrap_err();
    assert_eq!(err.code, ErrorCode::StorageError);
    assert!(err.message.contains("Método de Pagamento"));
}
