use std::fmt::Write;

use landscape_gpu::{BindingSlot, Command, RecordedFrame};

/// Human-readable digest of a recorded frame, for CLI output and logs.
pub fn summarize_frame(frame: &RecordedFrame) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "=== Frame {} ({} commands, {} draws) ===",
        frame.index,
        frame.commands.len(),
        frame.draw_count()
    );
    for slot in BindingSlot::ALL {
        let (count, bytes) = frame
            .uploads(slot)
            .fold((0usize, 0usize), |(n, b), payload| (n + 1, b + payload.len()));
        let _ = writeln!(
            out,
            "  slot {:>2} {:<15} uploads={count} bytes={bytes}",
            slot.index(),
            format!("{slot:?}")
        );
    }
    for command in frame.commands.iter().filter(|c| c.is_draw()) {
        if let Command::DrawIndexed {
            index_count,
            index_format,
            index_buffer,
            index_offset,
        } = command
        {
            let _ = writeln!(
                out,
                "  draw {index_count} indices ({index_format:?}) from buffer {} at +{index_offset}",
                index_buffer.0
            );
        }
    }
    out
}
