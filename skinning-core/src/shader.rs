//! WGSL generation and validation
//!
//! The skinning vertex stage is expanded from a template so that the joint
//! count, the vertex inputs and the per-influence terms all come from the
//! same constants and [`VERTEX_ATTRIBUTES`] table the host path uses.
//!
//! Placeholders:
//! - `{{JOINT_COUNT}}`: uniform array length
//! - `//VIN_JOINTS`: one `@location(n)` member per vertex attribute
//! - `//SKIN_TERMS`: one position + color accumulation per influence slot

use std::fmt::Write as _;

use crate::error::ShaderError;
use crate::mesh::VERTEX_ATTRIBUTES;
use crate::{INFLUENCES_PER_VERTEX, JOINT_COUNT};

const SKINNING_TEMPLATE: &str = include_str!("shaders/skinning_template.wgsl");

/// Debug line shader (position + color, shares the view matrix).
pub const DEBUG_LINE_SHADER: &str = include_str!("shaders/debug_lines.wgsl");

/// Vertex input struct members generated from [`VERTEX_ATTRIBUTES`].
fn vertex_inputs() -> String {
    let mut out = String::new();
    for attribute in &VERTEX_ATTRIBUTES {
        let _ = writeln!(
            out,
            "    @location({}) {}: {},",
            attribute.location,
            attribute.name,
            attribute.kind.wgsl_type()
        );
    }
    out
}

/// Accumulation statements, one pair per influence slot.
fn skin_terms() -> String {
    let mut out = String::new();
    for k in 0..INFLUENCES_PER_VERTEX {
        let index = VERTEX_ATTRIBUTES[1 + k].name;
        let weight = VERTEX_ATTRIBUTES[1 + INFLUENCES_PER_VERTEX + k].name;
        let _ = writeln!(
            out,
            "    position += skin_term(input.{index}, input.{weight}, bind_position);"
        );
        let _ = writeln!(
            out,
            "    color += input.{weight} * skinning.current_pose_colors[input.{index}];"
        );
    }
    out
}

/// Expanded skinning shader source.
pub fn skinning_shader() -> String {
    SKINNING_TEMPLATE
        .replace("{{JOINT_COUNT}}", &JOINT_COUNT.to_string())
        .replace("//VIN_JOINTS\n", &vertex_inputs())
        .replace("//SKIN_TERMS\n", &skin_terms())
}

/// Debug line shader source; it has no placeholders.
pub fn debug_line_shader() -> &'static str {
    DEBUG_LINE_SHADER
}

/// Parse and validate WGSL with naga.
///
/// # Errors
///
/// Returns a [`ShaderError`] whose text is the compiler diagnostic, so it can
/// be shown before the program exits.
pub fn validate_wgsl(label: &str, source: &str) -> Result<(), ShaderError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| ShaderError::Parse {
        label: label.to_string(),
        log: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| ShaderError::Validation {
            label: label.to_string(),
            log: format!("{:?}", e),
        })?;

    tracing::debug!("Validated shader '{}'", label);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_replaced() {
        let shader = skinning_shader();
        assert!(!shader.contains("{{JOINT_COUNT}}"));
        assert!(!shader.contains("//VIN_JOINTS"));
        assert!(!shader.contains("//SKIN_TERMS"));
        assert!(shader.contains("array<mat4x4<f32>, 7>"));
        assert!(shader.contains("@location(0) position: vec2<f32>"));
        assert!(shader.contains("@location(3) joint_index_2: u32"));
        assert!(shader.contains("@location(6) joint_weight_2: f32"));
    }

    #[test]
    fn test_one_term_per_influence() {
        let shader = skinning_shader();
        assert_eq!(
            shader.matches("position += skin_term(").count(),
            INFLUENCES_PER_VERTEX
        );
        assert!(shader.contains(
            "position += skin_term(input.joint_index_1, input.joint_weight_1, bind_position);"
        ));
    }

    #[test]
    fn test_skinning_shader_validates() {
        validate_wgsl("skinning", &skinning_shader()).unwrap();
    }

    #[test]
    fn test_debug_line_shader_validates() {
        validate_wgsl("debug lines", debug_line_shader()).unwrap();
    }

    #[test]
    fn test_parse_error_carries_diagnostic() {
        let err = validate_wgsl("broken", "fn vs( -> {").unwrap_err();
        match err {
            ShaderError::Parse { label, log } => {
                assert_eq!(label, "broken");
                assert!(!log.is_empty());
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_error_reported() {
        // Well-formed syntax, but returns the wrong type
        let err = validate_wgsl("typed", "fn f() -> f32 { return 1u; }").unwrap_err();
        assert!(matches!(err, ShaderError::Validation { .. } | ShaderError::Parse { .. }));
    }
}
