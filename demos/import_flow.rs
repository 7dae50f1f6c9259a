//! Basic import reconciliation example

use reconcile_core::utils::MemoryStore;
use reconcile_core::{ImportSettings, Importer, RecordStore};

fn to_rows(data: &[&[&str]]) -> Vec<Vec<String>> {
    data.iter()
        .map(|cells| cells.iter().map(|c| c.to_string()).collect())
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🏦 Reconcile Core - Import Flow Example\n");

    // 1. Configure column mapping and number patterns once per settings
    println!("⚙️  Building import settings...");
    let settings = ImportSettings::new(
        [
            ("date", "Buchungstag|Datum|Date"),
            ("amount", "Betrag*|Amount*"),
            ("subject", "Verwendungszweck|Subject|Description"),
            ("iban", "IBAN*"),
            ("currency", "Währung|Currency"),
        ],
        ["###.##0,0#", "###,##0.0#"],
    )?;
    println!("  ✓ {} mapping rules compiled\n", settings.rules.len());

    let account = "DE02 1203 0000 0000 2020 51";
    let header: Vec<String> = ["Buchungstag", "Betrag (EUR)", "Verwendungszweck", "IBAN"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut importer = Importer::new(MemoryStore::new());

    // 2. First import: everything is new
    println!("📥 Importing the first statement export...");
    let report = importer
        .import(
            account,
            &settings,
            &header,
            &to_rows(&[
                &["02.01.2024", "-12,99", "Streaming subscription", "DE11 1111"],
                &["03.01.2024", "1.250,00", "Salary January", "DE22 2222"],
                &["03.01.2024", "-44,80", "Electricity", "DE33 3333"],
            ]),
        )
        .await?;
    println!(
        "  ✓ new: {}, modified: {}, unmodified: {}, deleted: {}\n",
        report.new, report.modified, report.unmodified, report.deleted
    );

    // 3. Second import: one row reworded, one row gone, one row added
    println!("📥 Importing the re-issued statement export...");
    let report = importer
        .import(
            account,
            &settings,
            &header,
            &to_rows(&[
                &["02.01.2024", "-12,99", "Streaming subscription", "DE11 1111"],
                &["03.01.2024", "1.250,00", "Salary 01/2024", "DE22 2222"],
                &["04.01.2024", "-9,99", "Book order", "DE44 4444"],
            ]),
        )
        .await?;
    println!(
        "  ✓ new: {}, modified: {}, unmodified: {}, deleted: {}\n",
        report.new, report.modified, report.unmodified, report.deleted
    );

    // 4. Inspect the resulting baseline
    println!("🗄  Stored baseline after both imports:");
    for stored in importer.store().load_records(account, None, None).await? {
        println!(
            "  {} | {:>10} | {}",
            stored
                .record
                .date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "          ".to_string()),
            stored
                .record
                .amount
                .map(|a| a.to_string())
                .unwrap_or_default(),
            stored.record.subject.unwrap_or_default()
        );
    }

    Ok(())
}
