pub static TRACE_SHADER: &str = include_str!("trace.wgsl");
pub static DISPLAY_SHADER: &str = include_str!("display.wgsl");

pub const VERTEX_ENTRY_POINT: &str = "vs_main";
pub const FRAGMENT_ENTRY_POINT: &str = "fs_main";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::UNIFORM_NAMES;

    #[test]
    fn trace_program_declares_uniforms_in_block_order() {
        let block_start = TRACE_SHADER.find("struct TraceUniforms").unwrap();
        let block = &TRACE_SHADER[block_start..];
        let block = &block[..block.find('}').unwrap()];
        let mut last = 0;
        for name in UNIFORM_NAMES {
            let position = block
                .find(&format!("{name}:"))
                .unwrap_or_else(|| panic!("{name} missing from the uniform block"));
            assert!(position > last, "{name} is out of order");
            last = position;
        }
    }

    #[test]
    fn both_programs_have_entry_points() {
        for source in [TRACE_SHADER, DISPLAY_SHADER] {
            assert!(source.contains(&format!("fn {VERTEX_ENTRY_POINT}(")));
            assert!(source.contains(&format!("fn {FRAGMENT_ENTRY_POINT}(")));
        }
    }
}
