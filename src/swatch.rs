//! Screenshot palette extraction.
//!
//! Pixels are sampled on a stride, clustered with k-means in Lab space, and
//! the cluster centroids are then assigned to named swatches by HSL
//! lightness/saturation targets (vibrant, light vibrant, dark vibrant and
//! the muted counterparts). A swatch with no qualifying cluster is `None`.

use std::path::Path;

use image::{DynamicImage, GenericImageView};
use palette::{convert::FromColorUnclamped, Lab, Srgb};
use serde::Serialize;
use tracing::debug;

use crate::color::Rgb;
use crate::config::SynthesisConfig;
use crate::{DtxError, Result};

/// One representative color and the share of sampled pixels behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Swatch {
    pub rgb: Rgb,
    pub population: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub vibrant: Option<Swatch>,
    pub light_vibrant: Option<Swatch>,
    pub dark_vibrant: Option<Swatch>,
    pub muted: Option<Swatch>,
    pub light_muted: Option<Swatch>,
    pub dark_muted: Option<Swatch>,
}

#[derive(Debug, Clone, Copy)]
pub struct QuantizeOptions {
    pub clusters: usize,
    pub sample_stride: u32,
    pub iterations: usize,
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self::from(&SynthesisConfig::default())
    }
}

impl From<&SynthesisConfig> for QuantizeOptions {
    fn from(cfg: &SynthesisConfig) -> Self {
        Self {
            clusters: cfg.clusters,
            sample_stride: cfg.sample_stride,
            iterations: cfg.iterations,
        }
    }
}

const TARGET_DARK_LUMA: f32 = 0.26;
const MAX_DARK_LUMA: f32 = 0.45;
const MIN_LIGHT_LUMA: f32 = 0.55;
const TARGET_LIGHT_LUMA: f32 = 0.74;
const MIN_NORMAL_LUMA: f32 = 0.3;
const TARGET_NORMAL_LUMA: f32 = 0.5;
const MAX_NORMAL_LUMA: f32 = 0.7;
const TARGET_MUTED_SATURATION: f32 = 0.3;
const MAX_MUTED_SATURATION: f32 = 0.4;
const TARGET_VIBRANT_SATURATION: f32 = 1.0;
const MIN_VIBRANT_SATURATION: f32 = 0.35;

const WEIGHT_SATURATION: f32 = 3.0;
const WEIGHT_LUMA: f32 = 6.5;
const WEIGHT_POPULATION: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
struct SwatchTarget {
    min_luma: f32,
    target_luma: f32,
    max_luma: f32,
    min_saturation: f32,
    target_saturation: f32,
    max_saturation: f32,
}

impl SwatchTarget {
    const fn vibrant(min_luma: f32, target_luma: f32, max_luma: f32) -> Self {
        Self {
            min_luma,
            target_luma,
            max_luma,
            min_saturation: MIN_VIBRANT_SATURATION,
            target_saturation: TARGET_VIBRANT_SATURATION,
            max_saturation: 1.0,
        }
    }

    const fn muted(min_luma: f32, target_luma: f32, max_luma: f32) -> Self {
        Self {
            min_luma,
            target_luma,
            max_luma,
            min_saturation: 0.0,
            target_saturation: TARGET_MUTED_SATURATION,
            max_saturation: MAX_MUTED_SATURATION,
        }
    }
}

/// Reads a screenshot from disk and extracts its palette.
pub fn palette_from_path(path: &Path, options: QuantizeOptions) -> Result<Palette> {
    if !path.exists() {
        return Err(DtxError::missing_input("extract", path));
    }
    let img = image::open(path)?;
    Ok(extract_palette(&img, options))
}

pub fn extract_palette(img: &DynamicImage, options: QuantizeOptions) -> Palette {
    let samples = sample_pixels(img, options.sample_stride);
    if samples.is_empty() {
        debug!("no opaque, non-white pixels sampled; palette is empty");
        return Palette::default();
    }

    let k = options.clusters.max(1).min(samples.len());
    let clusters = kmeans(&samples, k, options.iterations.max(1));
    debug!(clusters = clusters.len(), samples = samples.len(), "quantized screenshot");
    generate_swatches(&clusters)
}

fn sample_pixels(img: &DynamicImage, stride: u32) -> Vec<Lab> {
    let (w, h) = img.dimensions();
    let step = stride.max(1) as usize;
    let mut samples = Vec::new();

    for y in (0..h).step_by(step) {
        for x in (0..w).step_by(step) {
            let [r, g, b, a] = img.get_pixel(x, y).0;
            if a < 125 || (r > 250 && g > 250 && b > 250) {
                continue;
            }
            let srgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
            samples.push(Lab::from_color_unclamped(srgb));
        }
    }

    samples
}

fn kmeans(samples: &[Lab], k: usize, iterations: usize) -> Vec<Swatch> {
    let step = (samples.len() / k).max(1);
    let mut centers: Vec<Lab> = (0..k).map(|i| samples[i * step % samples.len()]).collect();
    let mut counts = vec![0u32; k];

    for _ in 0..iterations {
        let mut accum = vec![(0.0f32, 0.0f32, 0.0f32); k];
        counts.iter_mut().for_each(|c| *c = 0);

        for lab in samples {
            let idx = nearest(&centers, *lab);
            accum[idx].0 += lab.l;
            accum[idx].1 += lab.a;
            accum[idx].2 += lab.b;
            counts[idx] += 1;
        }

        for (i, center) in centers.iter_mut().enumerate() {
            if counts[i] > 0 {
                let n = counts[i] as f32;
                *center = Lab::new(accum[i].0 / n, accum[i].1 / n, accum[i].2 / n);
            }
        }
    }

    centers
        .into_iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(lab, population)| Swatch {
            rgb: lab_to_rgb(lab),
            population,
        })
        .collect()
}

fn nearest(centers: &[Lab], lab: Lab) -> usize {
    centers
        .iter()
        .enumerate()
        .map(|(i, c)| (i, lab_distance2(lab, *c)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn lab_distance2(a: Lab, b: Lab) -> f32 {
    let dl = a.l - b.l;
    let da = a.a - b.a;
    let db = a.b - b.b;
    dl * dl + da * da + db * db
}

fn lab_to_rgb(lab: Lab) -> Rgb {
    let srgb: Srgb = Srgb::from_color_unclamped(lab);
    let clamp = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb::new(clamp(srgb.red), clamp(srgb.green), clamp(srgb.blue))
}

fn generate_swatches(clusters: &[Swatch]) -> Palette {
    let max_population = clusters.iter().map(|s| s.population).max().unwrap_or(0);
    let mut used: Vec<Rgb> = Vec::new();
    let mut pick = |target: SwatchTarget| {
        let found = find_best(clusters, &used, max_population, target);
        if let Some(s) = found {
            used.push(s.rgb);
        }
        found
    };

    Palette {
        vibrant: pick(SwatchTarget::vibrant(MIN_NORMAL_LUMA, TARGET_NORMAL_LUMA, MAX_NORMAL_LUMA)),
        light_vibrant: pick(SwatchTarget::vibrant(MIN_LIGHT_LUMA, TARGET_LIGHT_LUMA, 1.0)),
        dark_vibrant: pick(SwatchTarget::vibrant(0.0, TARGET_DARK_LUMA, MAX_DARK_LUMA)),
        muted: pick(SwatchTarget::muted(MIN_NORMAL_LUMA, TARGET_NORMAL_LUMA, MAX_NORMAL_LUMA)),
        light_muted: pick(SwatchTarget::muted(MIN_LIGHT_LUMA, TARGET_LIGHT_LUMA, 1.0)),
        dark_muted: pick(SwatchTarget::muted(0.0, TARGET_DARK_LUMA, MAX_DARK_LUMA)),
    }
}

fn find_best(
    clusters: &[Swatch],
    used: &[Rgb],
    max_population: u32,
    target: SwatchTarget,
) -> Option<Swatch> {
    clusters
        .iter()
        .filter(|s| !used.contains(&s.rgb))
        .filter_map(|s| {
            let sat = s.rgb.saturation();
            let luma = s.rgb.lightness();
            let qualifies = (target.min_saturation..=target.max_saturation).contains(&sat)
                && (target.min_luma..=target.max_luma).contains(&luma);
            qualifies.then(|| (*s, score(sat, luma, s.population, max_population, target)))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(s, _)| s)
}

fn score(sat: f32, luma: f32, population: u32, max_population: u32, target: SwatchTarget) -> f32 {
    let invert_diff = |value: f32, target: f32| 1.0 - (value - target).abs();
    let population_share = if max_population == 0 {
        0.0
    } else {
        population as f32 / max_population as f32
    };
    (invert_diff(sat, target.target_saturation) * WEIGHT_SATURATION
        + invert_diff(luma, target.target_luma) * WEIGHT_LUMA
        + population_share * WEIGHT_POPULATION)
        / (WEIGHT_SATURATION + WEIGHT_LUMA + WEIGHT_POPULATION)
}
