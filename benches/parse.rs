use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use episode_rename::episode::{DEFAULT_NOISE_TOKENS, EpisodeRecord, PatternMatcher, RenameConfig, TokenCleaner};

const FILE_NAMES: [&str; 8] = [
    "the.show.S02E05.HDTV.x264-GROUP.mkv",
    "Show.Name.1x3.Some.Title.avi",
    "Show Name - Season 2 Episode 11 - Title.mp4",
    "show_name_312_title.mkv",
    "The.Long.Show.Name.S10E22.The.Finale.1080p.WEB-DL.mkv",
    "[Group] Show Name - 04x12 [720p].mkv",
    "Some.Movie.2010.BluRay.mkv",
    "no episode info here.mpg",
];

fn bench_pattern_matcher(c: &mut Criterion) {
    let matcher = PatternMatcher::default();
    c.bench_function("pattern_matcher_find", |b| {
        b.iter(|| {
            for name in FILE_NAMES {
                black_box(matcher.find(black_box(name)));
            }
        });
    });
}

fn bench_token_cleaner(c: &mut Criterion) {
    let cleaner = TokenCleaner::new(DEFAULT_NOISE_TOKENS).expect("Failed to create cleaner");
    c.bench_function("token_cleaner_clean", |b| {
        b.iter(|| {
            for name in FILE_NAMES {
                black_box(cleaner.clean(black_box(name)));
            }
        });
    });
}

fn bench_episode_record(c: &mut Criterion) {
    let config = RenameConfig::builder()
        .camel_case(true)
        .build()
        .expect("Failed to build config");
    c.bench_function("episode_record_from_path", |b| {
        b.iter(|| {
            for name in FILE_NAMES {
                black_box(EpisodeRecord::from_path(black_box(name), &config));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_pattern_matcher,
    bench_token_cleaner,
    bench_episode_record
);
criterion_main!(benches);
