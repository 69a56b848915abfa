use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// SplitMix64 stream; reproducible output for a fixed seed.
struct SampleRng(u64);

impl SampleRng {
    fn seeded(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * f64::EPSILON / 2.0
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// Normal sample via the Marsaglia polar method.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        loop {
            let u = 2.0 * self.unit() - 1.0;
            let v = 2.0 * self.unit() - 1.0;
            let s = u * u + v * v;
            if s > 0.0 && s < 1.0 {
                return mean + std_dev * u * (-2.0 * s.ln() / s).sqrt();
            }
        }
    }
}

const CATEGORIES: [&str; 12] = [
    "cama_mesa_banho",
    "beleza_saude",
    "esporte_lazer",
    "moveis_decoracao",
    "informatica_acessorios",
    "utilidades_domesticas",
    "relogios_presentes",
    "telefonia",
    "ferramentas_jardim",
    "automotivo",
    "brinquedos",
    "cool_stuff",
];

const CITIES: [&str; 8] = [
    "sao paulo",
    "rio de janeiro",
    "belo horizonte",
    "brasilia",
    "curitiba",
    "campinas",
    "porto alegre",
    "salvador",
];

/// Longer deliveries skew towards worse reviews.
fn score_for(duration: f64, rng: &mut SampleRng) -> i64 {
    let base = 5.2 - duration / 8.0 + rng.normal(0.0, 0.9);
    base.round().clamp(1.0, 5.0) as i64
}

fn main() -> Result<()> {
    let mut rng = SampleRng::seeded(42);
    let first_day = NaiveDate::from_ymd_opt(2017, 1, 1).context("invalid start date")?;
    let span_days = 600;

    let output_path = "sales_review_data.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record([
        "order_id",
        "customer_id",
        "customer_city",
        "product_category_name",
        "order_purchase_timestamp",
        "total_revenue",
        "delivery_duration",
        "review_score",
    ])?;

    let mut rows = 0usize;
    for order_no in 0..1500 {
        let order_id = format!("ord{order_no:06}");
        let customer_id = format!("cus{:05}", rng.below(1100));
        // A few rows carry nulls, as in the real export
        let city = if rng.unit() < 0.01 { "" } else { rng.pick(&CITIES) };

        let purchased = first_day.and_hms_opt(0, 0, 0).context("invalid time")?
            + Duration::days(rng.below(span_days) as i64)
            + Duration::seconds(rng.below(86_400) as i64);

        // Undelivered orders have neither a duration nor a review.
        let delivered = rng.unit() > 0.03;
        let duration = rng.normal(12.0, 8.0).abs().max(1.0).round();
        let score = score_for(duration, &mut rng);

        let timestamp = purchased.format("%Y-%m-%d %H:%M:%S").to_string();
        let (duration_cell, score_cell) = if delivered {
            (format!("{duration:.1}"), score.to_string())
        } else {
            (String::new(), String::new())
        };

        let items = 1 + rng.below(3);
        for _ in 0..items {
            let category = if rng.unit() < 0.015 { "" } else { rng.pick(&CATEGORIES) };
            let revenue = format!("{:.2}", rng.normal(120.0, 90.0).abs() + 5.0);
            writer.write_record([
                order_id.as_str(),
                customer_id.as_str(),
                city,
                category,
                timestamp.as_str(),
                revenue.as_str(),
                duration_cell.as_str(),
                score_cell.as_str(),
            ])?;
            rows += 1;
        }
    }
    writer.flush()?;

    println!("Wrote {rows} line items to {output_path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_repeats_the_stream() {
        let mut a = SampleRng::seeded(7);
        let mut b = SampleRng::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn draws_stay_in_range() {
        let mut rng = SampleRng::seeded(42);
        for _ in 0..1_000 {
            let u = rng.unit();
            assert!((0.0..1.0).contains(&u));
            assert!(rng.below(5) < 5);
        }
        let n = 5_000;
        let mean = (0..n).map(|_| rng.normal(10.0, 2.0)).sum::<f64>() / n as f64;
        assert!((mean - 10.0).abs() < 0.2, "mean {mean}");
    }
}
