//! Run extraction over synthesized (or near-clean) waveforms
//!
//! Two extractors feed the decoders:
//! - [`extract_tone_runs`] estimates a frequency for every period between
//!   upward zero crossings (BFSK and image decoders)
//! - [`extract_on_off_blocks`] measures contiguous tone and silence stretches,
//!   merging single-sample blips into their neighbours (Morse decoder)

/// One zero-crossing period: estimated frequency and its length in samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRun {
    pub frequency: u32,
    pub samples: usize,
}

/// Split `samples` into periods delimited by upward zero crossings
/// (previous sample < 0, current sample >= 0).
///
/// The trailing partial period is discarded. Exact-zero stretches never
/// trigger a crossing, so silence is folded into the surrounding period.
pub fn extract_tone_runs(samples: &[f32], sample_rate: u32) -> Vec<ToneRun> {
    let mut runs = Vec::new();
    let mut previous = 0.0f32;
    let mut period = 0usize;

    for &sample in samples {
        if previous < 0.0 && sample >= 0.0 {
            runs.push(ToneRun {
                frequency: (sample_rate as f64 / period as f64).round() as u32,
                samples: period,
            });
            period = 0;
        }
        period += 1;
        previous = sample;
    }

    runs
}

/// Signed tone/silence block lengths: positive for contiguous non-zero
/// samples, negative for contiguous exact-zero samples.
///
/// A trailing one-sample block is dropped unless it is the only block left,
/// so re-extracting the expanded output always gives the same list.
pub fn extract_on_off_blocks(samples: &[f32]) -> Vec<i64> {
    let mut blocks = Vec::new();
    if samples.is_empty() {
        return blocks;
    }

    let mut current: i64 = 0;
    for &sample in samples {
        if sample == 0.0 {
            if current > 0 {
                push_block(&mut blocks, current);
                current = 0;
            }
            current -= 1;
        } else {
            if current < 0 {
                push_block(&mut blocks, current);
                current = 0;
            }
            current += 1;
        }
    }
    push_block(&mut blocks, current);

    if blocks.len() > 1 && blocks.last().is_some_and(|last| last.abs() == 1) {
        blocks.pop();
    }
    blocks
}

/// Close a block. A one-sample block that is now second-to-last was noise:
/// it and the block after it fold into the block before it.
fn push_block(blocks: &mut Vec<i64>, block: i64) {
    blocks.push(block);
    let len = blocks.len();
    if len >= 3 && blocks[len - 2].abs() == 1 {
        let closed = blocks.pop().unwrap_or_default();
        blocks.pop();
        if let Some(last) = blocks.last_mut() {
            let grown = last.abs() + closed.abs() + 1;
            *last = grown * last.signum();
        }
    }
}

/// Expand signed block lengths back into a waveform (tone = 1.0, silence = 0.0)
pub fn expand_blocks(blocks: &[i64]) -> Vec<f32> {
    blocks
        .iter()
        .flat_map(|&block| {
            let value = if block > 0 { 1.0f32 } else { 0.0 };
            std::iter::repeat(value).take(block.unsigned_abs() as usize)
        })
        .collect()
}

/// Merge consecutive runs of the same class into maximal groups, then drop
/// groups no longer than `max_noise_len` samples.
///
/// Dropped groups do not cause their neighbours to merge.
pub fn group_runs<T: Copy + PartialEq>(
    runs: impl IntoIterator<Item = (T, usize)>,
    max_noise_len: usize,
) -> Vec<(T, usize)> {
    let mut groups: Vec<(T, usize)> = Vec::new();
    let mut current: Option<(T, usize)> = None;

    for (class, len) in runs {
        if len == 0 {
            continue;
        }
        current = match current {
            Some((open, open_len)) if open == class => Some((open, open_len + len)),
            Some(closed) => {
                if closed.1 > max_noise_len {
                    groups.push(closed);
                }
                Some((class, len))
            }
            None => Some((class, len)),
        };
    }
    if let Some(closed) = current {
        if closed.1 > max_noise_len {
            groups.push(closed);
        }
    }

    groups
}
