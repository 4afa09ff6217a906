use components::{RatingSimilarity, SimilarityKind};
use conf::{keys, Configuration};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use data_model::{Rating, RatingIndex};

fn synthetic_ratings(users: usize, items: usize) -> RatingIndex {
    let mut ratings = Vec::new();
    for u in 0..users {
        for i in (u % 7..items).step_by(7) {
            ratings.push(Rating::new(
                format!("u{}", u),
                format!("i{}", i),
                1.0 + ((u * 31 + i) % 5) as f64,
            ));
        }
    }
    RatingIndex::from_ratings(ratings)
}

fn bench_similarity_build(c: &mut Criterion) {
    let train = synthetic_ratings(500, 300);
    let mut conf = Configuration::with_defaults();
    conf.set(keys::NEIGHBORS_KNN, 20);
    let cosine = RatingSimilarity::cosine(&conf).expect("valid config");
    let jaccard = RatingSimilarity::jaccard(&conf).expect("valid config");

    c.bench_function("cosine_user_500x300", |b| {
        b.iter(|| cosine.compute(black_box(SimilarityKind::User), black_box(&train)))
    });
    c.bench_function("jaccard_item_500x300", |b| {
        b.iter(|| jaccard.compute(black_box(SimilarityKind::Item), black_box(&train)))
    });
}

criterion_group!(benches, bench_similarity_build);
criterion_main!(benches);
