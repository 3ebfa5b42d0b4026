//! Dominant color extraction.
//!
//! The image is resized to a fixed sampling grid and its samples are grouped
//! with k-means in normalized sRGB space. Several seeded runs are made and the
//! lowest-scoring one is kept, so identical input always yields identical
//! output.

use std::collections::HashSet;

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use kmeans_colors::{Kmeans, get_kmeans};
use palette::Srgb;
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::error::{Result, ThemeError};

/// Cluster assignments are stored as `u8`, which bounds k.
pub const MAX_CLUSTERS: usize = u8::MAX as usize;

/// A representative color together with the number of samples it absorbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DominantColor {
    pub color: Srgb<u8>,
    pub count: usize,
}

/// Extract up to `config.n_colors` dominant colors from an image, most
/// frequent first.
pub fn extract_dominant_colors(
    img: &DynamicImage,
    config: &ExtractionConfig,
) -> Result<Vec<DominantColor>> {
    let samples = sample_grid(img, config)?;
    cluster_samples(&samples, config)
}

/// Resize to the sampling grid and collect its pixels in row-major order.
fn sample_grid(img: &DynamicImage, config: &ExtractionConfig) -> Result<Vec<Srgb<u8>>> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ThemeError::invalid_input("image has no pixels"));
    }
    if config.sample_size == 0 {
        return Err(ThemeError::invalid_input("sample grid size must be positive"));
    }

    let size = config.sample_size;
    let grid = image::imageops::resize(&img.to_rgba8(), size, size, FilterType::Nearest);

    let samples: Vec<Srgb<u8>> = grid
        .pixels()
        .filter(|px| !(config.ignore_transparent && px[3] == 0))
        .map(|px| Srgb::new(px[0], px[1], px[2]))
        .collect();

    debug!(
        width,
        height,
        grid = size,
        samples = samples.len(),
        "sampled image"
    );
    Ok(samples)
}

/// Cluster raw samples into at most `config.n_colors` dominant colors.
///
/// k is clamped to the number of distinct samples. Each entry's count is the
/// number of samples assigned to its centroid; entries are sorted by
/// descending count with ties left in centroid order.
pub fn cluster_samples(
    samples: &[Srgb<u8>],
    config: &ExtractionConfig,
) -> Result<Vec<DominantColor>> {
    let k = config.n_colors;
    if k == 0 || k > MAX_CLUSTERS {
        return Err(ThemeError::InvalidClusterCount {
            k,
            max: MAX_CLUSTERS,
        });
    }
    if samples.is_empty() {
        return Err(ThemeError::invalid_input("no pixel samples to cluster"));
    }

    let distinct = samples
        .iter()
        .map(|c| (c.red, c.green, c.blue))
        .collect::<HashSet<_>>()
        .len();
    let k = k.min(distinct);

    let buf: Vec<Srgb> = samples.iter().map(|c| c.into_format::<f32>()).collect();
    let best = best_of_runs(k, &buf, config);

    let mut counts = vec![0usize; best.centroids.len()];
    for &idx in &best.indices {
        counts[idx as usize] += 1;
    }

    let mut dominant: Vec<DominantColor> = best
        .centroids
        .iter()
        .zip(counts)
        .map(|(centroid, count)| DominantColor {
            color: truncate(centroid),
            count,
        })
        .collect();
    // stable: equal counts keep centroid order
    dominant.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(k, distinct, score = best.score, "clustered samples");
    Ok(dominant)
}

/// Run k-means `config.runs` times with consecutive seeds and keep the
/// lowest-scoring result; the earliest run wins a tie.
fn best_of_runs(k: usize, buf: &[Srgb], config: &ExtractionConfig) -> Kmeans<Srgb> {
    let run = |i: u64| {
        get_kmeans(
            k,
            config.max_iterations,
            config.converge,
            false,
            buf,
            config.seed.wrapping_add(i),
        )
    };

    (1..config.runs.max(1) as u64)
        .map(run)
        .fold(run(0), |best, next| if next.score < best.score { next } else { best })
}

/// Scale a normalized centroid to 8-bit by truncation.
fn truncate(c: &Srgb) -> Srgb<u8> {
    let channel = |v: f32| (v * 255.0).clamp(0.0, 255.0) as u8;
    Srgb::new(channel(c.red), channel(c.green), channel(c.blue))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use proptest::prelude::*;

    fn solid(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    fn config(n_colors: usize) -> ExtractionConfig {
        ExtractionConfig {
            n_colors,
            ..ExtractionConfig::default()
        }
    }

    #[test]
    fn test_pure_red_single_cluster() {
        let img = solid(40, 30, [255, 0, 0]);
        let dominant = extract_dominant_colors(&img, &config(1)).unwrap();

        assert_eq!(dominant.len(), 1);
        assert_eq!(dominant[0].color, Srgb::new(255, 0, 0));
        assert_eq!(dominant[0].count, 100 * 100);
    }

    #[test]
    fn test_k_clamped_to_distinct_colors() {
        let img = solid(10, 10, [12, 34, 56]);
        let dominant = extract_dominant_colors(&img, &config(5)).unwrap();

        assert_eq!(dominant.len(), 1);
        assert_eq!(dominant[0].color, Srgb::new(12, 34, 56));
    }

    #[test]
    fn test_two_colors_ordered_by_frequency() {
        // three quarters blue, one quarter white
        let mut samples = vec![Srgb::new(0u8, 0, 255); 300];
        samples.extend(vec![Srgb::new(255u8, 255, 255); 100]);

        let dominant = cluster_samples(&samples, &config(2)).unwrap();

        assert_eq!(dominant.len(), 2);
        assert_eq!(dominant[0].color, Srgb::new(0, 0, 255));
        assert_eq!(dominant[0].count, 300);
        assert_eq!(dominant[1].color, Srgb::new(255, 255, 255));
        assert_eq!(dominant[1].count, 100);
    }

    #[test]
    fn test_transparent_samples_skipped() {
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 0]));
        for x in 0..50 {
            for y in 0..100 {
                img.put_pixel(x, y, Rgba([0, 128, 0, 255]));
            }
        }
        let img = DynamicImage::ImageRgba8(img);

        let dominant = extract_dominant_colors(&img, &config(3)).unwrap();
        assert_eq!(dominant.len(), 1);
        assert_eq!(dominant[0].color, Srgb::new(0, 128, 0));
        assert_eq!(dominant[0].count, 50 * 100);

        let keep_all = ExtractionConfig {
            ignore_transparent: false,
            ..config(3)
        };
        let dominant = extract_dominant_colors(&img, &keep_all).unwrap();
        assert_eq!(dominant.len(), 2);
    }

    #[test]
    fn test_fully_transparent_image_is_invalid() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([9, 9, 9, 0])));
        let err = extract_dominant_colors(&img, &config(2)).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidInput { .. }));
    }

    #[test]
    fn test_empty_samples_rejected() {
        let err = cluster_samples(&[], &config(3)).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidInput { .. }));
    }

    #[test]
    fn test_empty_image_rejected() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let err = extract_dominant_colors(&img, &config(3)).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidInput { .. }));
    }

    #[test]
    fn test_zero_clusters_rejected() {
        let samples = [Srgb::new(1u8, 2, 3)];
        let err = cluster_samples(&samples, &config(0)).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidClusterCount { k: 0, .. }));
    }

    #[test]
    fn test_too_many_clusters_rejected() {
        let samples = [Srgb::new(1u8, 2, 3)];
        let err = cluster_samples(&samples, &config(MAX_CLUSTERS + 1)).unwrap_err();
        assert!(matches!(err, ThemeError::InvalidClusterCount { .. }));
    }

    #[test]
    fn test_truncation_not_rounding() {
        let c = truncate(&Srgb::new(0.999, 0.5, 0.0));
        assert_eq!(c, Srgb::new(254, 127, 0));
    }

    #[test]
    fn test_counts_cover_all_samples() {
        let samples: Vec<Srgb<u8>> = (0..200u32)
            .map(|i| Srgb::new((i % 7 * 36) as u8, (i % 5 * 50) as u8, (i % 3 * 120) as u8))
            .collect();
        let dominant = cluster_samples(&samples, &config(4)).unwrap();

        assert_eq!(dominant.len(), 4);
        assert_eq!(dominant.iter().map(|d| d.count).sum::<usize>(), samples.len());
        assert!(dominant.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_equal_counts_keep_centroid_order() {
        let red = Srgb::new(255u8, 0, 0);
        let blue = Srgb::new(0u8, 0, 255);
        let samples: Vec<Srgb<u8>> = (0..400)
            .map(|i| if i % 2 == 0 { red } else { blue })
            .collect();
        let cfg = config(2);

        let buf: Vec<Srgb> = samples.iter().map(|c| c.into_format::<f32>()).collect();
        let centroid_order: Vec<Srgb<u8>> =
            best_of_runs(2, &buf, &cfg).centroids.iter().map(truncate).collect();

        let first = cluster_samples(&samples, &cfg).unwrap();
        let colors: Vec<Srgb<u8>> = first.iter().map(|d| d.color).collect();
        assert_eq!(colors, centroid_order);
        assert!(first.iter().all(|d| d.count == 200));

        for _ in 0..5 {
            assert_eq!(cluster_samples(&samples, &cfg).unwrap(), first);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_counts_non_increasing(
            raw in prop::collection::vec(any::<(u8, u8, u8)>(), 1..60),
            k in 1usize..6,
        ) {
            let samples: Vec<Srgb<u8>> =
                raw.iter().map(|&(r, g, b)| Srgb::new(r, g, b)).collect();
            let distinct = raw.iter().collect::<HashSet<_>>().len();
            let cfg = ExtractionConfig {
                runs: 2,
                ..config(k)
            };

            let dominant = cluster_samples(&samples, &cfg).unwrap();
            prop_assert_eq!(dominant.len(), k.min(distinct));
            prop_assert_eq!(dominant.iter().map(|d| d.count).sum::<usize>(), samples.len());
            prop_assert!(dominant.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }
}
