//! Output buffer shared with the pulse generator
//!
//! The control task is the only writer and publishes at most once per
//! cycle. The pulse generator runs in interrupt context, reads whenever it
//! starts a new pulse train, and must never wait.
//!
//! # Gate
//!
//! The writer raises `updating` before the first channel store and clears it
//! after the generation counter moves. A reader that sees `updating`, or that
//! sees the generation change while it was copying, drops its copy and keeps
//! emitting the previous pulse train. Every channel is its own `AtomicU16`,
//! so no single value can tear; the gate keeps channels from two different
//! cycles from being mixed. The writer's window is one store per channel.

use core::sync::atomic::{fence, AtomicBool, AtomicU16, AtomicU32, Ordering};

use super::channel::MAX_OUTPUTS;
use super::scaler::OutputFrame;

/// A complete frame copied out of the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSnapshot {
    pub frame: OutputFrame,
    /// Publish count when the frame was written
    pub generation: u32,
}

/// Single-writer / single-reader output buffer
pub struct OutputBuffer {
    pulses: [AtomicU16; MAX_OUTPUTS],
    updating: AtomicBool,
    generation: AtomicU32,
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputBuffer {
    /// Empty buffer; reads return `None` until the first publish
    pub const fn new() -> Self {
        Self {
            pulses: [const { AtomicU16::new(0) }; MAX_OUTPUTS],
            updating: AtomicBool::new(false),
            generation: AtomicU32::new(0),
        }
    }

    /// Replace the buffer contents with `frame`
    ///
    /// Writer side only. Never blocks.
    pub fn publish(&self, frame: &OutputFrame) {
        let mut update = self.begin_update();
        for (channel, &pulse) in frame.pulses.iter().enumerate() {
            update.write(channel, pulse);
        }
    }

    /// Copy the latest complete frame
    ///
    /// Reader side. Returns `None` if nothing was published yet or an update
    /// is in flight; the caller should retry on its next occurrence.
    pub fn try_read(&self) -> Option<OutputSnapshot> {
        if self.updating.load(Ordering::Acquire) {
            return None;
        }
        let generation = self.generation.load(Ordering::Acquire);
        if generation == 0 {
            return None;
        }

        let mut frame = OutputFrame::default();
        for (pulse, slot) in frame.pulses.iter_mut().zip(self.pulses.iter()) {
            *pulse = slot.load(Ordering::Relaxed);
        }

        fence(Ordering::Acquire);
        if self.updating.load(Ordering::Relaxed)
            || self.generation.load(Ordering::Relaxed) != generation
        {
            return None;
        }

        Some(OutputSnapshot { frame, generation })
    }

    /// Number of completed publishes
    pub fn generation(&self) -> u32 {
        self.generation.load(Ordering::Acquire)
    }

    /// Writer is between `begin_update` and commit
    pub fn is_updating(&self) -> bool {
        self.updating.load(Ordering::Acquire)
    }

    fn begin_update(&self) -> BufferUpdate<'_> {
        self.updating.store(true, Ordering::Relaxed);
        fence(Ordering::Release);
        BufferUpdate { buffer: self }
    }
}

/// Open update window; commits on drop
struct BufferUpdate<'a> {
    buffer: &'a OutputBuffer,
}

impl BufferUpdate<'_> {
    fn write(&mut self, channel: usize, pulse: u16) {
        self.buffer.pulses[channel].store(pulse, Ordering::Relaxed);
    }
}

impl Drop for BufferUpdate<'_> {
    fn drop(&mut self) {
        let next = self
            .buffer
            .generation
            .load(Ordering::Relaxed)
            .wrapping_add(1)
            .max(1);
        self.buffer.generation.store(next, Ordering::Release);
        self.buffer.updating.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(base: u16) -> OutputFrame {
        let mut frame = OutputFrame::default();
        for (index, pulse) in frame.pulses.iter_mut().enumerate() {
            *pulse = base + index as u16;
        }
        frame
    }

    #[test]
    fn test_empty_buffer_reads_none() {
        let buffer = OutputBuffer::new();
        assert_eq!(buffer.try_read(), None);
        assert_eq!(buffer.generation(), 0);
    }

    #[test]
    fn test_publish_then_read() {
        let buffer = OutputBuffer::new();
        buffer.publish(&frame(1000));

        let snapshot = buffer.try_read().unwrap();
        assert_eq!(snapshot.frame, frame(1000));
        assert_eq!(snapshot.generation, 1);
        assert!(!buffer.is_updating());
    }

    #[test]
    fn test_reader_skips_while_update_in_flight() {
        let buffer = OutputBuffer::new();
        buffer.publish(&frame(1000));

        {
            let mut update = buffer.begin_update();
            update.write(0, 1500);
            update.write(1, 1501);
            // Reader preempting the writer mid-update defers
            assert!(buffer.is_updating());
            assert_eq!(buffer.try_read(), None);
        }

        let snapshot = buffer.try_read().unwrap();
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.frame.pulses[0], 1500);
        assert_eq!(snapshot.frame.pulses[1], 1501);
    }

    #[test]
    fn test_reads_are_whole_frames() {
        let buffer = OutputBuffer::new();
        for cycle in 0..50u16 {
            buffer.publish(&frame(1000 + cycle * 10));
            let snapshot = buffer.try_read().unwrap();
            let base = snapshot.frame.pulses[0];
            assert!(snapshot
                .frame
                .pulses
                .iter()
                .enumerate()
                .all(|(index, &pulse)| pulse == base + index as u16));
        }
        assert_eq!(buffer.generation(), 50);
    }

    #[test]
    fn test_concurrent_reader_never_sees_mixed_frames() {
        extern crate std;
        use std::sync::Arc;
        use std::thread;

        let buffer = Arc::new(OutputBuffer::new());
        let writer = {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for cycle in 0..2000u16 {
                    buffer.publish(&frame(1000 + (cycle % 100) * 8));
                }
            })
        };

        for _ in 0..20_000 {
            if let Some(snapshot) = buffer.try_read() {
                let base = snapshot.frame.pulses[0];
                for (index, &pulse) in snapshot.frame.pulses.iter().enumerate() {
                    assert_eq!(pulse, base + index as u16);
                }
            }
        }
        writer.join().unwrap();
    }
}
