//! Basic fee billing example

use bigdecimal::BigDecimal;
use invoicing_core::utils::MemoryConfigStore;
use invoicing_core::{BillingEngine, FeeRecord, FeeType, RuleSetConfig, YouthConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏃 Invoicing Core - Basic Billing Example\n");

    // Create an engine backed by an in-memory rule configuration
    let store = MemoryConfigStore::new();
    let engine = BillingEngine::new(store.clone());

    // 1. A typical batch of fee records from one accounting period
    println!("📋 Billing a batch of fee records...\n");
    let records = vec![
        FeeRecord::new(
            "Elsa Berg",
            "Vårserien deltävling 2",
            "2024-05-12",
            "D16",
            FeeType::Standard,
            BigDecimal::from(80),
        )
        .with_birth_year(2009),
        FeeRecord::new(
            "Johan Ek",
            "Vårserien deltävling 2",
            "2024-05-12",
            "H21",
            FeeType::Standard,
            BigDecimal::from(140),
        )
        .with_birth_year(1985),
        FeeRecord::new(
            "Johan Ek",
            "SM Medel",
            "2024-09-14",
            "H21",
            FeeType::Standard,
            BigDecimal::from(250),
        )
        .with_birth_year(1985),
        FeeRecord::new(
            "Moa Lind",
            "O-Ringen etapp 3",
            "2024-07-22 - 2024-07-27",
            "D18",
            FeeType::Standard,
            BigDecimal::from(195),
        )
        .with_birth_year(2007),
        FeeRecord::new(
            "Johan Ek",
            "Nattcupen final",
            "2024-11-02",
            "H21",
            FeeType::Late,
            BigDecimal::from(60),
        )
        .with_birth_year(1985),
    ];

    let billed = engine.bill(records).await?;
    for item in &billed {
        println!(
            "  {} @ {} ({}): runner {} / club {}  [{}]",
            item.record.member_name,
            item.record.competition_name,
            item.record.fee_type,
            item.runner_pays,
            item.club_pays,
            item.applied_rule,
        );
    }
    println!();

    // 2. Adjust the rule configuration and bill again
    println!("⚙️  Raising the youth cutoff to 18 and re-billing...\n");
    store.replace(RuleSetConfig {
        youth_full_coverage: YouthConfig { max_age: 18 },
        ..Default::default()
    });

    let record = FeeRecord::new(
        "Moa Lind",
        "Höstlunken",
        "2024-10-06",
        "D18",
        FeeType::Standard,
        BigDecimal::from(120),
    )
    .with_birth_year(2007);

    let billed = engine.bill(vec![record]).await?;
    println!(
        "  Moa Lind @ Höstlunken: runner {} / club {}  [{}]",
        billed[0].runner_pays, billed[0].club_pays, billed[0].applied_rule,
    );

    println!("\n✅ Done");
    Ok(())
}
