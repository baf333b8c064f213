//! Availability filter over a large tank farm.
//!
//! Run with: `cargo bench -p brewops-brewing`

use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use brewops_brewing::{
    AvailabilityQuery, Batch, BatchStatus, FermentationStep, Recipe, available_tanks,
    occupancy_board,
};
use brewops_core::date::add_days;
use brewops_core::{BatchId, Location, LocationId, RecipeId};

fn fixture(tanks: usize, batches_per_tank: usize) -> (Vec<Location>, Vec<Batch>, Vec<Recipe>) {
    let recipe = Recipe {
        id: RecipeId::new(),
        name: "Bench Lager".to_string(),
        target_volume_l: Decimal::from(1000),
        fermentation_steps: vec![
            FermentationStep { name: "primary".to_string(), days: 10 },
            FermentationStep { name: "lager".to_string(), days: 11 },
        ],
    };
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let locations: Vec<Location> = (0..tanks)
        .map(|i| Location::tank(LocationId::new(), format!("FV-{i}"), Decimal::from(500 + (i % 4) * 500)))
        .collect();

    let mut batches = Vec::with_capacity(tanks * batches_per_tank);
    for (i, tank) in locations.iter().enumerate() {
        for n in 0..batches_per_tank {
            batches.push(Batch {
                id: BatchId::new(),
                batch_number: None,
                recipe_id: recipe.id,
                fermenter_id: Some(tank.id),
                cook_date: add_days(start, (n * 30 + i % 7) as u32),
                packaging_date: None,
                status: if n == 0 { BatchStatus::Completed } else { BatchStatus::Active },
            });
        }
    }

    (locations, batches, vec![recipe])
}

fn bench_available_tanks(c: &mut Criterion) {
    let mut group = c.benchmark_group("available_tanks");

    for tanks in [10usize, 100, 1_000] {
        let (locations, batches, recipes) = fixture(tanks, 12);
        let query = AvailabilityQuery {
            date: NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            required_volume_l: Decimal::from(1000),
            batch_id: None,
            current_fermenter_id: None,
        };

        group.bench_with_input(BenchmarkId::from_parameter(tanks), &tanks, |b, _| {
            b.iter(|| available_tanks(black_box(&query), &locations, &batches, &recipes))
        });
    }

    group.finish();
}

fn bench_occupancy_board(c: &mut Criterion) {
    let (locations, batches, recipes) = fixture(500, 12);
    let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("occupancy_board/500", |b| {
        b.iter(|| occupancy_board(black_box(date), &locations, &batches, &recipes))
    });
}

criterion_group!(benches, bench_available_tanks, bench_occupancy_board);
criterion_main!(benches);
