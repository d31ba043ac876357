use std::process::Command;

fn run(charges_fixture: &str) -> (String, String, bool) {
    let catalog = "tests/fixtures/catalog.json";
    let charges = format!("tests/fixtures/{charges_fixture}");
    let output = Command::new(env!("CARGO_BIN_EXE_fees-eng"))
        .arg(catalog)
        .arg(&charges)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run binary");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn valid_charges() {
    let (stdout, stderr, success) = run("valid.csv");

    assert!(success);
    assert!(stderr.is_empty());

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "type,amount,order,event,promo,currency");
    // vendor 9 pays the negotiated 10% rate
    assert_eq!(lines[1], "ORDER_FEE,10.00,501,,,USD");
    // promo discount lands as a second, non-netted entry
    assert_eq!(lines[2], "ORDER_FEE,10.00,502,,,USD");
    assert_eq!(lines[3], "PROMO_APPLIED,-2.00,502,,LAUNCH20,USD");
    // expired promo: full global 5% fee, no discount entry
    assert_eq!(lines[4], "EVENT_FEE,2.00,,,,USD");
    assert_eq!(lines.len(), 5);
}

#[test]
fn errors_warn_but_do_not_block() {
    let (stdout, stderr, success) = run("with_errors.csv");

    assert!(success);
    assert!(stderr.contains("unrecognized charge type"));
    assert!(stderr.contains("invalid timestamp"));
    assert!(stderr.contains("negative gross amount"));
    assert!(stderr.contains("unknown promo code"));

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "type,amount,order,event,promo,currency");
    assert_eq!(lines[1], "ORDER_FEE,5.00,501,,,USD");
    // unknown promo code still charges the full fee
    assert_eq!(lines[2], "ORDER_FEE,0.50,503,,,USD");
    assert_eq!(lines.len(), 3);
}
