use std::collections::HashSet;

use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use hanquiz::engine::{StudyFilter, UserProgress, filter_vocabulary};
use hanquiz::generator::{QuizType, generate_quiz};
use hanquiz::vocabulary::Vocabulary;
use hanquiz::vocabulary::synth::generate_words;

fn synthetic_vocabulary(count: usize) -> Vocabulary {
    let mut rng = SmallRng::seed_from_u64(7);
    Vocabulary::new(generate_words(count, &mut rng))
}

fn bench_filter(c: &mut Criterion) {
    let vocabulary = synthetic_vocabulary(5000);
    let mut filter = StudyFilter::default();
    for category in vocabulary.categories().iter().take(5) {
        filter.toggle_category(category);
    }
    filter.toggle_level("初級");
    let mistaken = HashSet::new();

    c.bench_function("filter_vocabulary (5000 words)", |b| {
        b.iter(|| filter_vocabulary(black_box(vocabulary.words()), &filter, &mistaken))
    });
}

fn bench_generate(c: &mut Criterion) {
    let vocabulary = synthetic_vocabulary(5000);
    let pool: Vec<_> = vocabulary.words().iter().collect();
    let mut progress = UserProgress::from_vocabulary(vocabulary.words(), Utc::now());
    // Some categories learned and some mistakes, so prioritisation has work to do.
    for word in vocabulary.words().iter().step_by(3) {
        progress.mark_learned(word, Utc::now());
    }
    for word in vocabulary.words().iter().step_by(11) {
        progress.record_mistake(word, Utc::now());
    }

    let mut rng = SmallRng::seed_from_u64(42);
    for quiz_type in [QuizType::Meaning, QuizType::Reading, QuizType::Pronunciation] {
        c.bench_function(
            &format!("generate_quiz {} (20 of 5000)", quiz_type.as_str()),
            |b| {
                b.iter(|| {
                    generate_quiz(
                        black_box(&pool),
                        quiz_type,
                        20,
                        Some(&progress),
                        &mut rng,
                    )
                })
            },
        );
    }
}

criterion_group!(benches, bench_filter, bench_generate);
criterion_main!(benches);
