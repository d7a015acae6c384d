//! Table output for list commands.

use chrono::Utc;
use tabled::{Table, Tabled};

use cloudprint_entity::license::License;

#[derive(Tabled)]
struct LicenseRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Expires")]
    expires: String,
    #[tabled(rename = "Servers")]
    server_limit: i32,
    #[tabled(rename = "Jobs")]
    print_count: i64,
}

/// Print licenses as a table, with state derived for today.
pub fn print_licenses(licenses: &[License]) {
    let today = Utc::now().date_naive();
    let rows: Vec<LicenseRow> = licenses
        .iter()
        .map(|l| LicenseRow {
            key: l.key.clone(),
            customer: l.customer.clone(),
            state: l.state(today).to_string(),
            expires: l
                .expiration_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "never".to_string()),
            server_limit: l.server_limit,
            print_count: l.print_count,
        })
        .collect();

    println!("{}", Table::new(rows));
}
