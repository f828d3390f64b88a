// Copyright 2026 the Sixfold Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use sixfold_encoding::FinalizeMode;

use super::{pack4x8unorm, unpack4x8unorm, CpuTarget};

fn channel(px: u32, i: usize) -> u32 {
    (px >> (i * 8)) & 0xff
}

/// Number of covered samples (0, 1 or 2) packed into one channel.
fn pair_count(value: u32) -> f32 {
    ((value & 1) + ((value >> 4) & 1)) as f32
}

/// Coverage of the five horizontally adjacent sample columns seen by a pixel:
/// the red, green and blue pairs of `primary`, then the green and blue pairs of `right`.
pub fn coverage_columns(primary: u32, right: u32) -> [f32; 5] {
    [
        pair_count(channel(primary, 0)) * 0.5,
        pair_count(channel(primary, 1)) * 0.5,
        pair_count(channel(primary, 2)) * 0.5,
        pair_count(channel(right, 1)) * 0.5,
        pair_count(channel(right, 2)) * 0.5,
    ]
}

/// Three tap window over the coverage columns, one window per output channel.
pub fn subpixel_rgb(c: [f32; 5]) -> [f32; 3] {
    [
        (c[0] + c[1] + c[2]) / 3.0,
        (c[1] + c[2] + c[3]) / 3.0,
        (c[2] + c[3] + c[4]) / 3.0,
    ]
}

/// Output colour of `fs_main` for a texel and its right neighbour.
pub fn decode_pixel(mode: FinalizeMode, primary: u32, right: u32) -> [f32; 4] {
    match mode {
        FinalizeMode::Raw => unpack4x8unorm(primary),
        FinalizeMode::NoAa => {
            let v = 1.0 - (channel(primary, 1) & 1) as f32;
            [v, v, v, 1.0]
        }
        FinalizeMode::Grayscale => {
            let c = coverage_columns(primary, right);
            let v = 1.0 - (c[0] + c[1] + c[2]) / 3.0;
            [v, v, v, 1.0]
        }
        FinalizeMode::Subpixel => {
            let rgb = subpixel_rgb(coverage_columns(primary, right));
            [1.0 - rgb[0], 1.0 - rgb[1], 1.0 - rgb[2], 1.0]
        }
    }
}

/// Software version of the finalize pass, multiplied onto `background`.
pub fn finalize(target: &CpuTarget, mode: FinalizeMode, background: [f32; 4]) -> Vec<u32> {
    let mut out = Vec::with_capacity(target.pixels.len());
    for y in 0..target.height {
        for x in 0..target.width {
            let right_x = (x + 1).min(target.width - 1);
            let color = decode_pixel(mode, target.get(x, y), target.get(right_x, y));
            let mut blended = [0.0; 4];
            for i in 0..4 {
                blended[i] = color[i] * background[i];
            }
            out.push(pack4x8unorm(blended));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Packs per-sample coverage of one texel as additive blending would.
    fn encode(samples: [bool; 6]) -> u32 {
        let mut px = 0xff00_0000;
        for (i, covered) in samples.into_iter().enumerate() {
            if covered {
                px += sixfold_encoding::ChannelSlot::for_sample(i).mask();
            }
        }
        px
    }

    #[test]
    fn full_and_empty_coverage() {
        let full = encode([true; 6]);
        let empty = encode([false; 6]);
        for mode in [
            FinalizeMode::NoAa,
            FinalizeMode::Grayscale,
            FinalizeMode::Subpixel,
        ] {
            let dark = decode_pixel(mode, full, full);
            let light = decode_pixel(mode, empty, empty);
            for i in 0..3 {
                assert!(dark[i].abs() < 1e-3, "{mode:?}: {dark:?}");
                assert!((light[i] - 1.0).abs() < 1e-3, "{mode:?}: {light:?}");
            }
        }
    }

    #[test]
    fn grayscale_counts_samples() {
        let px = encode([true, false, true, false, false, false]);
        let [v, ..] = decode_pixel(FinalizeMode::Grayscale, px, px);
        assert!((v - 4.0 / 6.0).abs() < 1e-6);
    }

    #[test]
    fn no_aa_reads_sample_two() {
        let only_two = encode([false, false, true, false, false, false]);
        assert_eq!(decode_pixel(FinalizeMode::NoAa, only_two, 0)[0], 0.0);
        let all_but_two = encode([true, true, false, true, true, true]);
        assert_eq!(decode_pixel(FinalizeMode::NoAa, all_but_two, 0)[0], 1.0);
    }

    #[test]
    fn even_overlap_cancels() {
        // A sample drawn twice reads as uncovered.
        let slot = sixfold_encoding::ChannelSlot::for_sample(3);
        let px = 0xff00_0000 + 2 * slot.mask();
        assert_eq!(decode_pixel(FinalizeMode::Grayscale, px, px)[0], 1.0);
    }

    /// Like `encode`, with sample `i` covered when bit `i` of `mask` is set.
    fn encode_mask(mask: u32) -> u32 {
        encode(std::array::from_fn(|i| mask & (1 << i) != 0))
    }

    fn assert_rgb(actual: [f32; 4], expected: [f32; 3]) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-6,
                "{actual:?} != {expected:?}"
            );
        }
        assert_eq!(actual[3], 1.0);
    }

    #[test]
    fn subpixel_reads_primary_channels() {
        let empty = encode_mask(0);
        let decode = |primary| decode_pixel(FinalizeMode::Subpixel, encode_mask(primary), empty);
        // Red pair only feeds the red window.
        assert_rgb(decode(0b00_00_11), [2. / 3., 1., 1.]);
        // Green pair feeds the red and green windows.
        assert_rgb(decode(0b00_11_00), [2. / 3., 2. / 3., 1.]);
        // Blue pair feeds all three windows.
        assert_rgb(decode(0b11_00_00), [2. / 3., 2. / 3., 2. / 3.]);
        // A single sample of the pair counts half.
        assert_rgb(decode(0b00_00_10), [5. / 6., 1., 1.]);
    }

    #[test]
    fn subpixel_reads_green_and_blue_of_right_neighbour() {
        let empty = encode_mask(0);
        let decode = |right| decode_pixel(FinalizeMode::Subpixel, empty, encode_mask(right));
        // The neighbour's red pair is never read.
        assert_rgb(decode(0b00_00_11), [1., 1., 1.]);
        assert_rgb(decode(0b00_11_00), [1., 2. / 3., 2. / 3.]);
        assert_rgb(decode(0b11_00_00), [1., 1., 2. / 3.]);
        assert_rgb(decode(0b00_01_00), [1., 5. / 6., 5. / 6.]);
        assert_rgb(decode(0b10_00_00), [1., 1., 5. / 6.]);
    }

    #[test]
    fn subpixel_darkness_adds_over_disjoint_samples() {
        // Bits 0..6 cover samples of the primary texel, bits 6..12 those of the right one.
        let texels = |mask: u32| (encode_mask(mask & 0x3f), encode_mask(mask >> 6));
        let darkness = |mask: u32| {
            let (primary, right) = texels(mask);
            let [r, g, b, _] = decode_pixel(FinalizeMode::Subpixel, primary, right);
            [1.0 - r, 1.0 - g, 1.0 - b]
        };
        for a in 0..1_u32 << 12 {
            let rest = !a & 0xfff;
            // Every submask of the samples not in `a`.
            let mut b = rest;
            loop {
                let (da, db, dab) = (darkness(a), darkness(b), darkness(a | b));
                for i in 0..3 {
                    assert!(
                        (dab[i] - da[i] - db[i]).abs() < 1e-5,
                        "{a:#x} + {b:#x}: {dab:?} != {da:?} + {db:?}"
                    );
                }
                if b == 0 {
                    break;
                }
                b = (b - 1) & rest;
            }
        }
    }

    #[test]
    fn raw_passes_texel_through() {
        let px = 0xff11_0110;
        assert_eq!(decode_pixel(FinalizeMode::Raw, px, 0), unpack4x8unorm(px));
    }
}
