use anyhow::{Context, Result};
use serde::Serialize;

/// One row of the generated CSV. `None` fields are written as empty cells.
#[derive(Serialize)]
struct SampleItem {
    company: &'static str,
    item: String,
    calories: Option<f64>,
    total_fat: f64,
    sodium: f64,
    carbs: f64,
    fiber: f64,
    sugar: f64,
    protein: Option<f64>,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform value in `[lo, hi)`, kept to one decimal like the source data.
    fn between(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + (hi - lo) * self.next_f64()) * 10.0).round() / 10.0
    }
}

/// (dish, calories, fat, sodium, carbs, fiber, sugar, protein) as typical
/// values; each generated item jitters around one of these.
const DISHES: [(&str, f64, f64, f64, f64, f64, f64, f64); 8] = [
    ("Cheeseburger", 300.0, 13.0, 720.0, 33.0, 2.0, 7.0, 15.0),
    ("Grilled Chicken Sandwich", 380.0, 7.0, 820.0, 44.0, 3.0, 9.0, 37.0),
    ("Small Fries", 230.0, 11.0, 190.0, 29.0, 3.0, 0.2, 3.0),
    ("Side Salad", 15.0, 0.0, 10.0, 3.0, 1.0, 1.0, 1.0),
    ("Chicken Nuggets (4 pc)", 170.0, 10.0, 330.0, 10.0, 0.5, 0.0, 9.0),
    ("Grilled Chicken Bites", 35.0, 1.0, 120.0, 1.0, 0.0, 0.0, 12.0),
    ("Diet Soda", 0.0, 0.0, 35.0, 0.0, 0.0, 0.0, 0.0),
    ("Chocolate Shake", 530.0, 15.0, 260.0, 86.0, 1.0, 74.0, 12.0),
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let companies = ["Burger Barn", "Cluck Shack", "Taco Town", "Sub Stop"];

    let output_path = "sample_nutrition.csv";
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut count = 0usize;
    for company in companies {
        for (dish, cal, fat, sodium, carbs, fiber, sugar, protein) in DISHES {
            let jitter = |rng: &mut SimpleRng, v: f64| rng.between(v * 0.8, v * 1.2 + 0.1);
            let mut item = SampleItem {
                company,
                item: dish.to_string(),
                calories: Some(jitter(&mut rng, cal)),
                total_fat: jitter(&mut rng, fat),
                sodium: jitter(&mut rng, sodium),
                carbs: jitter(&mut rng, carbs),
                fiber: jitter(&mut rng, fiber),
                sugar: jitter(&mut rng, sugar),
                protein: Some(jitter(&mut rng, protein)),
            };
            // Leave a few gaps so the "missing values never match" path is visible.
            if rng.next_f64() < 0.05 {
                item.calories = None;
            }
            if rng.next_f64() < 0.05 {
                item.protein = None;
            }
            writer
                .serialize(&item)
                .with_context(|| format!("writing {company} / {dish}"))?;
            count += 1;
        }
    }
    writer.flush().context("flushing sample CSV")?;

    println!("Wrote {count} menu items from {} companies to {output_path}", companies.len());
    Ok(())
}
