/*
 * Copyright (c) 2024.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! The sprite container model
//!
//! A container owns an ordered list of frames plus group ranges that
//! partition the frame list; a group is one animation or directional
//! variant run. Splitting a file into per-frame byte ranges is plain
//! offset-table arithmetic done by the caller, the container here only
//! models the result.

use alloc::vec::Vec;

use crate::errors::GroupError;
use crate::frame::Frame;

/// An ordered list of frames plus the `(first, last)` frame index
/// ranges grouping them
///
/// Group ranges are inclusive, contiguous, non-overlapping and
/// together cover the whole frame list. Every frame is owned by
/// exactly one container.
#[derive(Debug)]
pub struct Gfx {
    frames: Vec<Frame>,
    groups: Vec<(usize, usize)>
}

impl Gfx {
    /// Create a container holding `frames` as a single group
    pub fn new(frames: Vec<Frame>) -> Gfx {
        let groups = if frames.is_empty() {
            Vec::new()
        } else {
            alloc::vec![(0, frames.len() - 1)]
        };
        Gfx { frames, groups }
    }

    /// Create a container with explicit group ranges
    ///
    /// # Returns
    /// - `Ok(Gfx)`: The ranges partition `0..frames.len()`
    /// - `Err(GroupError)`: Which invariant the ranges violate
    pub fn with_groups(
        frames: Vec<Frame>, groups: Vec<(usize, usize)>
    ) -> Result<Gfx, GroupError> {
        let mut expected = 0;

        for &(first, last) in &groups {
            if first != expected {
                return Err(GroupError::NotContiguous(expected, first));
            }
            if last < first {
                return Err(GroupError::InvertedRange(first, last));
            }
            if last >= frames.len() {
                return Err(GroupError::OutOfBounds(last, frames.len()));
            }
            expected = last + 1;
        }
        if expected != frames.len() {
            return Err(GroupError::UncoveredFrames(expected, frames.len()));
        }

        Ok(Gfx { frames, groups })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The inclusive `(first, last)` frame index ranges
    pub fn groups(&self) -> &[(usize, usize)] {
        &self.groups
    }

    /// The frames of group `index`
    pub fn group_frames(&self, index: usize) -> Option<&[Frame]> {
        self.groups
            .get(index)
            .map(|&(first, last)| &self.frames[first..=last])
    }
}
