use super::error::EngineError;

/// One contiguous sub-range of trajectory frames assigned to a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// First frame index of the block (inclusive).
    pub start: usize,
    /// One past the last frame index of the block. For the final block of an
    /// uneven partition this may exceed the true frame count; the worker
    /// clamps its own iteration to available frames.
    pub stop: usize,
    /// Sampling stride, constant across blocks; a frame is evaluated iff its
    /// absolute index is divisible by the stride.
    pub stride: usize,
    /// Dense block identifier in `0..block_count`.
    pub block_id: usize,
}

/// Divides `[0, total_frames)` into `block_count` contiguous sub-ranges of
/// equal (ceiling-rounded) size.
///
/// A `block_count` of 1 yields a single descriptor covering the whole range,
/// which the dispatcher executes inline without pool overhead. A
/// `block_count` or `stride` of 0 is a fatal configuration error.
pub fn partition(
    total_frames: usize,
    block_count: usize,
    stride: usize,
) -> Result<Vec<BlockDescriptor>, EngineError> {
    if block_count < 1 {
        return Err(EngineError::InvalidBlockCount(block_count));
    }
    if stride < 1 {
        return Err(EngineError::InvalidStride(stride));
    }

    if block_count == 1 {
        return Ok(vec![BlockDescriptor {
            start: 0,
            stop: total_frames,
            stride,
            block_id: 0,
        }]);
    }

    let block_size = total_frames.div_ceil(block_count);
    Ok((0..block_count)
        .map(|block_id| BlockDescriptor {
            start: block_id * block_size,
            stop: (block_id + 1) * block_size,
            stride,
            block_id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clamped_coverage(descriptors: &[BlockDescriptor], total: usize) -> Vec<usize> {
        let mut covered = vec![0usize; total];
        for d in descriptors {
            for frame in d.start..d.stop.min(total) {
                covered[frame] += 1;
            }
        }
        covered
    }

    #[test]
    fn partition_covers_every_frame_exactly_once() {
        for total in [1, 7, 99, 100, 101, 1000] {
            for block_count in [1, 2, 3, 8, 17] {
                let descriptors = partition(total, block_count, 1).unwrap();
                assert_eq!(descriptors.len(), block_count);
                assert!(
                    clamped_coverage(&descriptors, total).iter().all(|&c| c == 1),
                    "gap or overlap for total={} blocks={}",
                    total,
                    block_count
                );
            }
        }
    }

    #[test]
    fn block_ids_are_dense_and_ordered() {
        let descriptors = partition(100, 8, 1).unwrap();
        for (i, d) in descriptors.iter().enumerate() {
            assert_eq!(d.block_id, i);
        }
    }

    #[test]
    fn single_block_covers_whole_range() {
        let descriptors = partition(250, 1, 5).unwrap();
        assert_eq!(
            descriptors,
            vec![BlockDescriptor {
                start: 0,
                stop: 250,
                stride: 5,
                block_id: 0
            }]
        );
    }

    #[test]
    fn last_block_may_overshoot_but_never_undershoot() {
        let descriptors = partition(10, 3, 1).unwrap();
        // ceil(10 / 3) = 4, so blocks are [0,4) [4,8) [8,12).
        assert_eq!(descriptors[2].stop, 12);
        assert!(descriptors[2].stop >= 10);
    }

    #[test]
    fn zero_block_count_is_a_fatal_configuration_error() {
        assert!(matches!(
            partition(100, 0, 1),
            Err(EngineError::InvalidBlockCount(0))
        ));
    }

    #[test]
    fn zero_stride_is_a_fatal_configuration_error() {
        assert!(matches!(
            partition(100, 4, 0),
            Err(EngineError::InvalidStride(0))
        ));
    }
}
