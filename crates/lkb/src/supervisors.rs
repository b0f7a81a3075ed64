//! 🎬 *[camera pans across a dimly lit bucket]*
//! 🎬 *[dramatic orchestral music swells]*
//! 🎬 "In a world where CSVs sit in buckets, unqueried..."
//! 🎬 "One supervisor dared to GROUP BY them all."
//! 🎬 *[record scratch]* 🦆
//!
//! 📦 The Supervisor: part middle manager, part tour guide. It owns the config, builds one
//! store client and one engine session, and walks them through the fixed demo script:
//!
//! 1. 🪣 connect and make sure the bucket exists
//! 2. 📤 generate sales, products and employees, upload them as CSV objects
//! 3. 📜 list the CSV objects
//! 4. 💾 sales: object to temp file to table, three queries
//! 5. 🧠 employees: object to bytes to table, three fancier queries
//! 6. 📊 export a city salary summary and upload it under `analytics/`
//! 7. ✍️ hand out a presigned GET URL for that summary
//! 8. 🔒 close the session
//!
//! Any failure aborts the run with an `anyhow` context chain. Temp files and the session
//! are released by scope on the way out, whichever way out that is.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use crate::app_config::AppConfig;
use crate::backends::{DuckDbSession, S3ObjectStore};
use crate::common::{PresignMethod, QueryResult};
use crate::generators::SampleDataGenerator;

const SALES_KEY: &str = "sales/sales_data.csv";
const PRODUCTS_KEY: &str = "products/products_data.csv";
const EMPLOYEES_KEY: &str = "employees/employees_data.csv";
const SUMMARY_KEY: &str = "analytics/city_salary_summary.csv";

const SALES_QUERIES: [(&str, &str); 3] = [
    ("Query 1: first sales records", "SELECT * FROM sales ORDER BY order_id LIMIT 5"),
    (
        "Query 2: total sales by customer",
        "SELECT customer_name, COUNT(*) AS total_orders, SUM(quantity * price) AS total_amount \
         FROM sales GROUP BY customer_name ORDER BY total_amount DESC",
    ),
    (
        "Query 3: sales by product",
        "SELECT product, SUM(quantity) AS total_quantity, SUM(quantity * price) AS total_revenue \
         FROM sales GROUP BY product ORDER BY total_revenue DESC",
    ),
];

const EMPLOYEE_QUERIES: [(&str, &str); 3] = [
    (
        "Advanced Query 1: salary by city",
        "SELECT city, COUNT(*) AS employee_count, AVG(salary) AS avg_salary, \
         MIN(salary) AS min_salary, MAX(salary) AS max_salary \
         FROM employees GROUP BY city ORDER BY avg_salary DESC",
    ),
    (
        "Advanced Query 2: age distribution",
        "SELECT CASE WHEN age < 25 THEN '20-24' WHEN age < 30 THEN '25-29' \
         WHEN age < 35 THEN '30-34' ELSE '35+' END AS age_group, \
         COUNT(*) AS count, AVG(salary) AS avg_salary \
         FROM employees GROUP BY age_group ORDER BY age_group",
    ),
    (
        "Advanced Query 3: top 10 highest paid",
        "SELECT name, city, age, salary FROM employees ORDER BY salary DESC, id LIMIT 10",
    ),
];

const SUMMARY_QUERY: &str =
    "SELECT city, AVG(salary) AS avg_salary FROM employees GROUP BY city ORDER BY city";

fn banner(out: &mut impl Write, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "--- {title} ---")?;
    Ok(())
}

fn print_result(out: &mut impl Write, title: &str, result: &QueryResult) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", result.render_table())?;
    writeln!(out, "({} rows)", result.row_count())?;
    Ok(())
}

/// 📦 The Supervisor: one config in, one demo run out.
pub struct Supervisor {
    /// 🔧 The sacred scrolls of configuration, passed down from main()
    app_config: AppConfig,
}

impl Supervisor {
    pub fn new(app_config: AppConfig) -> Self {
        Self { app_config }
    }

    /// 🚀 Run the whole script, printing human output to `out`.
    pub async fn run(&self, out: &mut impl Write) -> Result<()> {
        let store_config = &self.app_config.store;
        let demo = &self.app_config.demo;

        writeln!(out, "=================================================")?;
        writeln!(out, "   lakebridge: object store + DuckDB")?;
        writeln!(out, "=================================================")?;

        // -- 1️⃣ the bucket
        let store = S3ObjectStore::connect(store_config).await.with_context(|| {
            format!(
                "💀 Couldn't get bucket '{}' ready at {}",
                store_config.bucket_name, store_config.endpoint
            )
        })?;
        writeln!(out, "✓ Bucket ready: {}", store.bucket())?;

        // -- 2️⃣ sample data up
        banner(out, "DEMO 1: upload CSV data")?;
        let today = Local::now().date_naive();
        let mut generator = match demo.seed {
            Some(seed) => SampleDataGenerator::seeded(seed, today),
            None => SampleDataGenerator::from_entropy(today),
        };
        let uploads = [
            (SALES_KEY, generator.sales(demo.sales_rows)),
            (PRODUCTS_KEY, generator.products()),
            (EMPLOYEES_KEY, generator.employees(demo.employee_rows)),
        ]
        .into_iter()
        .map(|(key, text)| {
            text.map(|text| (key, text))
                .with_context(|| format!("💀 Failed to generate {key}"))
        })
        .collect::<Result<Vec<_>>>()?;
        for (key, text) in &uploads {
            store
                .upload_csv(key, text)
                .await
                .with_context(|| format!("💀 Failed to upload {key}"))?;
            writeln!(out, "✓ Uploaded {key} ({} bytes)", text.len())?;
        }

        // -- 3️⃣ what's in the lake
        banner(out, "DEMO 2: list CSV objects")?;
        let keys = store.csv_keys().await;
        for key in &keys {
            writeln!(out, "  - {key}")?;
        }
        writeln!(out, "Total files: {}", keys.len())?;

        // -- 4️⃣ sales: bucket → temp file → table
        banner(out, "DEMO 3: query sales with DuckDB")?;
        let scratch = tempfile::Builder::new()
            .prefix("lkb_demo_")
            .tempdir()
            .context("💀 Failed to create a scratch directory")?;
        let sales_path = scratch.path().join("sales.csv");
        store
            .download_csv_file(SALES_KEY, &sales_path)
            .await
            .with_context(|| format!("💀 Failed to download {SALES_KEY}"))?;

        let mut session = DuckDbSession::open().context("💀 Failed to open a DuckDB session")?;
        let loaded = session
            .load_delimited_file("sales", &sales_path)
            .context("💀 Failed to load sales into DuckDB")?;
        writeln!(out, "✓ Loaded {loaded} rows into table sales")?;
        for (title, sql) in SALES_QUERIES {
            let result = session
                .execute_query(sql)
                .with_context(|| format!("💀 {title} failed"))?;
            print_result(out, title, &result)?;
        }

        // -- 5️⃣ employees: bucket → memory → table
        banner(out, "DEMO 4: advanced analytics")?;
        let employees = store
            .get_object_bytes(store.bucket(), EMPLOYEES_KEY)
            .await
            .with_context(|| format!("💀 Failed to fetch {EMPLOYEES_KEY}"))?;
        let loaded = session
            .load_delimited_bytes("employees", &employees)
            .context("💀 Failed to load employees into DuckDB")?;
        writeln!(out, "✓ Loaded {loaded} rows into table employees")?;
        for (title, sql) in EMPLOYEE_QUERIES {
            let result = session
                .execute_query(sql)
                .with_context(|| format!("💀 {title} failed"))?;
            print_result(out, title, &result)?;
        }

        // -- 6️⃣ results go back to the lake
        let summary_path = scratch.path().join("city_salary_summary.csv");
        let exported = session
            .export_query_to_delimited_file(SUMMARY_QUERY, &summary_path)
            .context("💀 Failed to export the city salary summary")?;
        store
            .upload_csv_file(SUMMARY_KEY, &summary_path)
            .await
            .with_context(|| format!("💀 Failed to upload {SUMMARY_KEY}"))?;
        writeln!(out)?;
        writeln!(out, "✓ Exported {exported} rows to {SUMMARY_KEY}")?;

        // -- 7️⃣ a link to share
        let url = store
            .presigned_url(
                store.bucket(),
                SUMMARY_KEY,
                demo.presign_ttl_seconds,
                PresignMethod::Get,
            )
            .await
            .context("💀 Failed to presign the summary URL")?;
        writeln!(
            out,
            "✓ Presigned GET URL (valid {}s): {url}",
            demo.presign_ttl_seconds
        )?;

        // -- 8️⃣ lights off
        session.close().context("💀 Failed to close the DuckDB session")?;
        writeln!(out)?;
        writeln!(out, "=================================================")?;
        writeln!(out, "   Data lake demo completed successfully!")?;
        writeln!(out, "=================================================")?;

        info!("✅ demo run complete");
        Ok(())
    }
}
