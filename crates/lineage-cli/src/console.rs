use std::fmt::Write;

use lineage_sorter::GraphSink;

/// Sink that renders every primitive as one text line.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    out: String,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

impl GraphSink for ConsoleSink {
    #[allow(clippy::too_many_arguments)]
    fn add_node_sized(
        &mut self,
        id: &str,
        label: &str,
        color_rgb: u32,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) {
        let _ = writeln!(
            self.out,
            "node {id} \"{label}\" #{color_rgb:06X} at ({x}, {y}) size {width}x{height}"
        );
    }

    fn add_straight_line(&mut self, from_id: &str, to_id: &str) {
        let _ = writeln!(self.out, "line {from_id} -> {to_id}");
    }

    fn add_bended_line_with_offset(
        &mut self,
        from_id: &str,
        to_id: &str,
        to_x: i32,
        to_y: i32,
        bend_offset_y: i32,
    ) {
        let _ = writeln!(
            self.out,
            "bend {from_id} -> {to_id} via ({to_x}, {})",
            to_y.saturating_add(bend_offset_y)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_primitives() {
        let mut sink = ConsoleSink::new();
        sink.add_node("1", "P0", 0x00_99_CC, 25, 0);
        sink.add_straight_line("1", "2");
        sink.add_bended_line("1", "3", 50, 20);
        assert_eq!(
            sink.into_string(),
            "node 1 \"P0\" #0099CC at (25, 0) size 10x10\n\
             line 1 -> 2\n\
             bend 1 -> 3 via (50, 0)\n"
        );
    }
}
