//! Benchmark utilities and helpers.

use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use url::Url;

use trs_core::{ChangeKind, HistoryData, Timestamp};

/// TRS URI used by every benchmark.
pub const TRS_URI: &str = "http://localhost:8080/trs/";

/// Returns the benchmark TRS URI.
pub fn trs_uri() -> Url {
    Url::parse(TRS_URI).expect("benchmark TRS URI is valid")
}

/// Generates random path segments for benchmarks.
pub fn random_string(rng: &mut StdRng, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates sequential resource URIs.
pub fn generate_resources(count: usize) -> Vec<Url> {
    (0..count)
        .map(|i| {
            Url::parse(&format!("http://localhost:8080/resources/{i:08}"))
                .expect("generated resource URI is valid")
        })
        .collect()
}

/// Generates random history records over a pool of `pool` resources.
pub fn generate_history(count: usize, pool: usize) -> Vec<HistoryData> {
    let mut rng = StdRng::seed_from_u64(42);
    let kinds = [
        ChangeKind::Creation,
        ChangeKind::Modification,
        ChangeKind::Deletion,
    ];
    let names: Vec<String> = (0..pool.max(1))
        .map(|_| random_string(&mut rng, 12))
        .collect();

    (0..count)
        .map(|i| {
            let name = &names[rng.gen_range(0..names.len())];
            let kind = kinds[rng.gen_range(0..kinds.len())];
            let resource = Url::parse(&format!("http://localhost:8080/resources/{name}"))
                .expect("generated resource URI is valid");
            HistoryData::new(resource, kind, Timestamp::from_micros(i as u64))
        })
        .collect()
}
