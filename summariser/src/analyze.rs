use gateway_bench_summary_model::{CpuStats, FdStats, MemoryStats, ResourceSample, ResourceStats};

/// Round to two decimal places, ties to even
#[inline]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Aggregate resource samples.
///
/// Returns [None] when there are no samples. Samples are expected in chronological order, memory
/// growth is the difference between the last and the first sample.
pub(crate) fn resource_stats(samples: &[ResourceSample]) -> Option<ResourceStats> {
    let first = samples.first()?;
    let last = samples.last()?;

    let cpu = real_stats(samples.iter().map(|s| s.cpu_percent));
    let rss = real_stats(samples.iter().map(|s| s.rss_mb));

    let fd_total = samples.iter().map(|s| s.fd_count).sum::<u64>();
    let fd_max = samples.iter().map(|s| s.fd_count).max().unwrap_or_default();

    Some(ResourceStats {
        cpu: CpuStats {
            avg: round2(cpu.mean),
            max: round2(cpu.max),
            min: round2(cpu.min),
        },
        memory_mb: MemoryStats {
            avg: round2(rss.mean),
            max: round2(rss.max),
            min: round2(rss.min),
            growth: round2(last.rss_mb - first.rss_mb),
        },
        fd_count: FdStats {
            avg: (fd_total as f64 / samples.len() as f64).round_ties_even() as u64,
            max: fd_max,
        },
        samples: samples.len(),
    })
}

struct RealStats {
    mean: f64,
    min: f64,
    max: f64,
}

fn real_stats(values: impl Iterator<Item = f64>) -> RealStats {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in values {
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
    }

    RealStats {
        mean: sum / count as f64,
        min,
        max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp: i64, cpu_percent: f64, rss_mb: f64, fd_count: u64) -> ResourceSample {
        ResourceSample {
            timestamp,
            cpu_percent,
            rss_mb,
            fd_count,
            threads: 8,
        }
    }

    #[test]
    fn round2_rounds_to_two_places() {
        assert_eq!(123.46, round2(123.456));
        assert_eq!(0.5, round2(0.499999));
        assert_eq!(-1.23, round2(-1.234));
        assert_eq!(7.0, round2(7.0));
    }

    #[test]
    fn round2_rounds_exact_ties_to_even() {
        assert_eq!(12.12, round2(12.125));
        assert_eq!(0.38, round2(0.375));
        assert_eq!(2.67, round2(2.675));
    }

    #[test]
    fn fd_average_rounds_ties_to_even() {
        let samples = [sample(1, 12.25, 64.0, 2), sample(2, 12.0, 64.0, 3)];
        let stats = resource_stats(&samples).unwrap();

        assert_eq!(2, stats.fd_count.avg);
        assert_eq!(12.12, stats.cpu.avg);

        let stats = resource_stats(&[sample(1, 1.0, 64.0, 3), sample(2, 1.0, 64.0, 4)]).unwrap();
        assert_eq!(4, stats.fd_count.avg);
    }

    #[test]
    fn no_samples_no_stats() {
        assert_eq!(None, resource_stats(&[]));
    }

    #[test]
    fn aggregates_resource_samples() {
        let samples = [
            sample(1, 10.0, 100.0, 10),
            sample(2, 30.5, 120.456, 13),
            sample(3, 20.0, 110.0, 12),
        ];

        let stats = resource_stats(&samples).unwrap();

        assert_eq!(3, stats.samples);
        assert_eq!(20.17, stats.cpu.avg);
        assert_eq!(30.5, stats.cpu.max);
        assert_eq!(10.0, stats.cpu.min);
        assert_eq!(110.15, stats.memory_mb.avg);
        assert_eq!(120.46, stats.memory_mb.max);
        assert_eq!(100.0, stats.memory_mb.min);
        assert_eq!(10.0, stats.memory_mb.growth);
        assert_eq!(12, stats.fd_count.avg);
        assert_eq!(13, stats.fd_count.max);
    }

    #[test]
    fn memory_growth_uses_row_order() {
        let samples = [sample(5, 1.0, 250.0, 4), sample(1, 1.0, 200.25, 4)];

        let stats = resource_stats(&samples).unwrap();

        assert_eq!(-49.75, stats.memory_mb.growth);
        assert_eq!(250.0, stats.memory_mb.max);
    }

    #[test]
    fn single_sample_has_no_growth() {
        let stats = resource_stats(&[sample(1, 3.333, 64.0, 7)]).unwrap();

        assert_eq!(1, stats.samples);
        assert_eq!(3.33, stats.cpu.avg);
        assert_eq!(0.0, stats.memory_mb.growth);
        assert_eq!(7, stats.fd_count.avg);
    }
}
