//! Performance benchmarks for rating calculations

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use volley_rating::rating::Glicko2RatingCalculator;
use volley_rating::types::PlayerRating;
use volley_rating::RatingCalculator;

fn bench_single_opponent_update(c: &mut Criterion) {
    let calculator = Glicko2RatingCalculator::default();
    let player = PlayerRating::new(1500.0, 200.0, 0.06);
    let opponent = PlayerRating::new(1550.0, 180.0, 0.06);

    c.bench_function("rating_update_single_opponent", |b| {
        b.iter(|| {
            black_box(calculator.calculate_new_rating(
                black_box(&player),
                &[opponent],
                &[1.0],
                &[11.0],
            ))
        })
    });
}

fn bench_two_opponent_update(c: &mut Criterion) {
    let calculator = Glicko2RatingCalculator::default();
    let player = PlayerRating::new(1500.0, 200.0, 0.06);
    let opponents = [
        PlayerRating::new(1450.0, 180.0, 0.06),
        PlayerRating::new(1550.0, 220.0, 0.06),
    ];

    c.bench_function("rating_update_two_opponents", |b| {
        b.iter(|| {
            black_box(calculator.calculate_new_rating(
                black_box(&player),
                &opponents,
                &[1.0, 1.0],
                &[7.0, 7.0],
            ))
        })
    });
}

fn bench_surprising_result(c: &mut Criterion) {
    // A big upset makes the volatility solve work hardest
    let calculator = Glicko2RatingCalculator::default();
    let underdog = PlayerRating::new(1100.0, 350.0, 0.06);
    let favorite = PlayerRating::new(1900.0, 60.0, 0.06);

    c.bench_function("rating_update_upset", |b| {
        b.iter(|| {
            black_box(calculator.calculate_new_rating(
                black_box(&underdog),
                &[favorite],
                &[1.0],
                &[21.0],
            ))
        })
    });
}

criterion_group!(
    benches,
    bench_single_opponent_update,
    bench_two_opponent_update,
    bench_surprising_result
);
criterion_main!(benches);
