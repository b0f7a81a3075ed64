//! 🎲 Sample data generators: fake businesses, real commas.
//!
//! 🎬 *[a small electronics shop in Ha Noi. five customers. seven products. infinite orders,
//! as long as someone keeps rolling the dice.]*
//!
//! Every dataset is header + rows, serialized through one `csv::Writer` (see [`record_writer`]), so the column-count
//! invariant holds by construction and a product called `LG Monitor 27"` comes out quoted.
//! Hand the generator a seeded RNG and a fixed `today` and the output is byte-for-byte
//! reproducible. Hand it entropy and every run is a new fiscal year.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::delimited::{into_text, record_writer};
use crate::error::{LakeError, LakeResult};

const CUSTOMERS: [&str; 5] = [
    "Nguyen Van A",
    "Tran Thi B",
    "Le Van C",
    "Pham Thi D",
    "Hoang Van E",
];

/// 🏷️ (product, unit price). Sales rows pick a pair, so price always matches the product.
const CATALOG: [(&str, u64); 7] = [
    ("Laptop", 15_000_000),
    ("Mouse", 200_000),
    ("Keyboard", 500_000),
    ("Monitor", 3_000_000),
    ("USB Drive", 100_000),
    ("Headphone", 800_000),
    ("Webcam", 1_200_000),
];

const CITIES: [&str; 5] = ["Ha Noi", "Ho Chi Minh", "Da Nang", "Can Tho", "Hai Phong"];

const DEPARTMENTS: [&str; 5] = ["IT", "Sales", "Marketing", "HR", "Finance"];

/// 📦 The fixed product master: (id, name, category, stock, supplier, unit price).
const PRODUCTS: [(u32, &str, &str, u32, &str, u64); 7] = [
    (1, "Laptop Dell XPS", "Electronics", 50, "Tech Supplier A", 15_000_000),
    (2, "Logitech Mouse", "Accessories", 200, "Tech Supplier B", 200_000),
    (3, "Mechanical Keyboard", "Accessories", 150, "Tech Supplier B", 500_000),
    (4, "LG Monitor 27\"", "Electronics", 80, "Tech Supplier A", 3_000_000),
    (5, "SanDisk USB 64GB", "Accessories", 500, "Tech Supplier C", 100_000),
    (6, "Sony Headphone", "Accessories", 100, "Tech Supplier B", 800_000),
    (7, "Logitech Webcam", "Electronics", 75, "Tech Supplier A", 1_200_000),
];

/// 📈 (metric, base value). Each day's value is base + a roll in `0..base/2`.
const METRICS: [(&str, u64); 4] = [
    ("revenue", 10_000_000),
    ("users", 1_000),
    ("orders", 500),
    ("pageviews", 50_000),
];

/// 📚 Which dataset to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dataset {
    Sales,
    Employees,
    Products,
    TimeSeries,
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dataset::Sales => "sales",
            Dataset::Employees => "employees",
            Dataset::Products => "products",
            Dataset::TimeSeries => "time-series",
        };
        f.write_str(name)
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sales" => Ok(Dataset::Sales),
            "employees" => Ok(Dataset::Employees),
            "products" => Ok(Dataset::Products),
            "time-series" | "time_series" | "timeseries" => Ok(Dataset::TimeSeries),
            other => Err(format!(
                "unknown dataset '{other}' (expected sales, employees, products or time-series)"
            )),
        }
    }
}

/// 🎲 Synthetic delimited text, deterministic given the RNG and the anchor date.
#[derive(Debug)]
pub struct SampleDataGenerator<R: Rng> {
    rng: R,
    today: NaiveDate,
}

impl SampleDataGenerator<StdRng> {
    /// 🌱 Same seed, same `today`, same bytes. Every time.
    pub fn seeded(seed: u64, today: NaiveDate) -> Self {
        Self::new(StdRng::seed_from_u64(seed), today)
    }

    /// 🌪️ Fresh randomness from the OS.
    pub fn from_entropy(today: NaiveDate) -> Self {
        Self::new(StdRng::from_os_rng(), today)
    }
}

/// 🛒 One order. Field order is column order.
#[derive(Serialize)]
struct SaleRow<'a> {
    order_id: usize,
    customer_name: &'a str,
    product: &'a str,
    quantity: u32,
    price: u64,
    order_date: String,
}

#[derive(Serialize)]
struct EmployeeRow<'a> {
    id: usize,
    name: String,
    age: u32,
    city: &'a str,
    salary: u64,
    department: &'a str,
}

#[derive(Serialize)]
struct ProductRow<'a> {
    product_id: u32,
    product_name: &'a str,
    category: &'a str,
    stock: u32,
    supplier: &'a str,
    unit_price: u64,
}

#[derive(Serialize)]
struct MetricRow {
    date: String,
    metric: &'static str,
    value: u64,
}

/// 💀 An in-memory CSV buffer refused a write. The only "write error" a generator can have.
fn buffer_failed(err: impl Into<std::io::Error>) -> LakeError {
    LakeError::io_write("<generated text>", err.into())
}

/// ✍️ Header first, then every row through serde, then the text.
fn render<T: Serialize>(header: &[&str], rows: impl IntoIterator<Item = T>) -> LakeResult<String> {
    let mut writer = record_writer(Vec::new());
    writer.write_record(header).map_err(buffer_failed)?;
    for row in rows {
        writer.serialize(row).map_err(buffer_failed)?;
    }
    into_text(writer).map_err(buffer_failed)
}

impl<R: Rng> SampleDataGenerator<R> {
    pub fn new(rng: R, today: NaiveDate) -> Self {
        Self { rng, today }
    }

    fn days_ago(&self, days: u64) -> NaiveDate {
        self.today
            .checked_sub_days(Days::new(days))
            .unwrap_or(self.today)
    }

    /// 🛒 `n` orders from the last 30 days.
    pub fn sales(&mut self, n: usize) -> LakeResult<String> {
        let mut rows = Vec::with_capacity(n);
        for order_id in 1..=n {
            let (product, price) = CATALOG[self.rng.random_range(0..CATALOG.len())];
            let customer_name = CUSTOMERS[self.rng.random_range(0..CUSTOMERS.len())];
            let quantity: u32 = self.rng.random_range(1..=10);
            let back: u64 = self.rng.random_range(0..30);
            rows.push(SaleRow {
                order_id,
                customer_name,
                product,
                quantity,
                price,
                order_date: self.days_ago(back).to_string(),
            });
        }
        debug!("🎲 generated {} sales rows", n);
        render(
            &["order_id", "customer_name", "product", "quantity", "price", "order_date"],
            rows,
        )
    }

    /// 👷 `n` employees, ids 1..=n, named `Employee_<id>`.
    pub fn employees(&mut self, n: usize) -> LakeResult<String> {
        let mut rows = Vec::with_capacity(n);
        for id in 1..=n {
            let age: u32 = 20 + self.rng.random_range(0..40);
            let city = CITIES[self.rng.random_range(0..CITIES.len())];
            let salary: u64 = 5_000_000 + self.rng.random_range(0..15_000_000);
            let department = DEPARTMENTS[self.rng.random_range(0..DEPARTMENTS.len())];
            rows.push(EmployeeRow {
                id,
                name: format!("Employee_{id}"),
                age,
                city,
                salary,
                department,
            });
        }
        debug!("🎲 generated {} employee rows", n);
        render(&["id", "name", "age", "city", "salary", "department"], rows)
    }

    /// 📦 The seven-product catalog. No dice involved.
    pub fn products(&self) -> LakeResult<String> {
        render(
            &["product_id", "product_name", "category", "stock", "supplier", "unit_price"],
            PRODUCTS.iter().map(
                |&(product_id, product_name, category, stock, supplier, unit_price)| ProductRow {
                    product_id,
                    product_name,
                    category,
                    stock,
                    supplier,
                    unit_price,
                },
            ),
        )
    }

    /// 📈 Four metrics per day for `days` days, ending yesterday.
    pub fn time_series(&mut self, days: usize) -> LakeResult<String> {
        let start = self.days_ago(days as u64);
        let mut rows = Vec::with_capacity(days * METRICS.len());
        for offset in 0..days as u64 {
            let date = start
                .checked_add_days(Days::new(offset))
                .unwrap_or(self.today)
                .to_string();
            for (metric, base) in METRICS {
                rows.push(MetricRow {
                    date: date.clone(),
                    metric,
                    value: base + self.rng.random_range(0..base / 2),
                });
            }
        }
        debug!("🎲 generated {} days of time series", days);
        render(&["date", "metric", "value"], rows)
    }

    /// 🎯 Dispatch by dataset. `rows` is the day count for time series and ignored for products.
    pub fn generate(&mut self, dataset: Dataset, rows: usize) -> LakeResult<String> {
        match dataset {
            Dataset::Sales => self.sales(rows),
            Dataset::Employees => self.employees(rows),
            Dataset::Products => self.products(),
            Dataset::TimeSeries => self.time_series(rows),
        }
    }
}

/// 💾 Write generated text to `path`, replacing whatever was there.
pub fn save_to_file(text: &str, path: &Path) -> LakeResult<()> {
    std::fs::write(path, text).map_err(|err| LakeError::io_write(path, err))?;
    info!("💾 saved {} bytes to {}", text.len(), path.display());
    Ok(())
}
