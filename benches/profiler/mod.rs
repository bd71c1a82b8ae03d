// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Shared criterion config. Flamegraphs are written when `ROUTEDESK_BENCH_PROFILE=1`.

use std::time::Duration;

use criterion::Criterion;
use pprof::criterion::{Output, PProfProfiler};

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<T>().ok())
}

pub fn criterion() -> Criterion {
    let sample_size = env_parse::<usize>("ROUTEDESK_BENCH_SAMPLES").unwrap_or(50).clamp(10, 200);
    let warmup = env_parse::<u64>("ROUTEDESK_BENCH_WARMUP_SECS").unwrap_or(2).clamp(1, 60);
    let measurement = env_parse::<u64>("ROUTEDESK_BENCH_SECS").unwrap_or(4).clamp(1, 120);

    let config = Criterion::default()
        .sample_size(sample_size)
        .warm_up_time(Duration::from_secs(warmup))
        .measurement_time(Duration::from_secs(measurement));

    if env_parse::<u8>("ROUTEDESK_BENCH_PROFILE") == Some(1) {
        let frequency = env_parse::<i32>("ROUTEDESK_PROFILE_FREQ").unwrap_or(100).clamp(1, 1000);
        config.with_profiler(PProfProfiler::new(frequency, Output::Flamegraph(None)))
    } else {
        config
    }
}
