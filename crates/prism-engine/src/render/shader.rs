//! Shader compilation and linking.
//!
//! WGSL sources are parsed and validated with naga before any wgpu module is
//! created, so a broken shader surfaces as a [`ShaderError`] carrying the
//! compiler log instead of a device-level panic. Linking checks the
//! interface between the two stages and the vertex buffer layout.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use naga::valid::{Capabilities, ValidationFlags, Validator};

/// Programmable pipeline stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        }
    }
}

/// Shader compile or link failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    /// Parsing or validation failed; `log` is the compiler diagnostic.
    Compile { label: String, log: String },
    /// The stages do not fit together or do not match the vertex layout.
    Link { log: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Compile { label, log } => write!(f, "{label} compilation failed - {log}"),
            ShaderError::Link { log } => write!(f, "shader program link failed - {log}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// A validated single-stage WGSL shader.
#[derive(Debug, Clone)]
pub struct CompiledShader {
    label: String,
    stage: ShaderStage,
    source: Cow<'static, str>,
    entry_point: String,
    /// `@location`s read by the entry point.
    inputs: BTreeSet<u32>,
    /// `@location`s written by the entry point.
    outputs: BTreeSet<u32>,
}

impl CompiledShader {
    /// Parses and validates `source`, which must contain exactly one entry
    /// point for `stage`.
    pub fn compile(
        stage: ShaderStage,
        label: &str,
        source: impl Into<Cow<'static, str>>,
    ) -> Result<Self, ShaderError> {
        let source = source.into();
        let fail = |log: String| ShaderError::Compile {
            label: label.to_string(),
            log,
        };

        let module = naga::front::wgsl::parse_str(&source).map_err(|e| fail(e.emit_to_string(&source)))?;

        Validator::new(ValidationFlags::all(), Capabilities::empty())
            .validate(&module)
            .map_err(|e| fail(e.emit_to_string(&source)))?;

        let mut entry_points = module
            .entry_points
            .iter()
            .filter(|ep| ep.stage == stage.to_naga());

        let ep = match (entry_points.next(), entry_points.next()) {
            (Some(ep), None) => ep,
            (None, _) => return Err(fail(format!("no {} entry point", stage.as_str()))),
            (Some(_), Some(_)) => {
                return Err(fail(format!("more than one {} entry point", stage.as_str())));
            }
        };

        let mut inputs = BTreeSet::new();
        for arg in &ep.function.arguments {
            collect_locations(&module, arg.binding.as_ref(), arg.ty, &mut inputs);
        }

        let mut outputs = BTreeSet::new();
        if let Some(result) = &ep.function.result {
            collect_locations(&module, result.binding.as_ref(), result.ty, &mut outputs);
        }

        log::info!("{label} compiled successfully");

        Ok(Self {
            label: label.to_string(),
            stage,
            entry_point: ep.name.clone(),
            source,
            inputs,
            outputs,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn inputs(&self) -> &BTreeSet<u32> {
        &self.inputs
    }

    pub fn outputs(&self) -> &BTreeSet<u32> {
        &self.outputs
    }

    /// Creates the wgpu shader module. The source is already validated.
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&self.label),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(&self.source)),
        })
    }
}

/// Walks an entry-point argument or result, flattening struct members.
fn collect_locations(
    module: &naga::Module,
    binding: Option<&naga::Binding>,
    ty: naga::Handle<naga::Type>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(_) => {} // builtin
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.binding.as_ref(), member.ty, out);
                }
            }
        }
    }
}

/// A vertex + fragment pair whose interfaces have been checked.
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    vertex: CompiledShader,
    fragment: CompiledShader,
}

impl ShaderProgram {
    /// Links two stages.
    ///
    /// `vertex_locations` are the attribute locations supplied by the vertex
    /// buffer layout; every vertex input must be among them, and every
    /// fragment input must be written by the vertex stage.
    pub fn link(
        vertex: CompiledShader,
        fragment: CompiledShader,
        vertex_locations: &[u32],
    ) -> Result<Self, ShaderError> {
        let fail = |log: String| ShaderError::Link { log };

        if vertex.stage != ShaderStage::Vertex {
            return Err(fail(format!("`{}` is not a vertex shader", vertex.label)));
        }
        if fragment.stage != ShaderStage::Fragment {
            return Err(fail(format!("`{}` is not a fragment shader", fragment.label)));
        }

        let provided: BTreeSet<u32> = vertex_locations.iter().copied().collect();
        let missing_attrs: Vec<u32> = vertex.inputs.difference(&provided).copied().collect();
        if !missing_attrs.is_empty() {
            return Err(fail(format!(
                "vertex attributes at locations {missing_attrs:?} are not provided by the vertex layout"
            )));
        }

        let missing_varyings: Vec<u32> = fragment.inputs.difference(&vertex.outputs).copied().collect();
        if !missing_varyings.is_empty() {
            return Err(fail(format!(
                "fragment inputs at locations {missing_varyings:?} are not written by `{}`",
                vertex.label
            )));
        }

        log::debug!("linked `{}` + `{}`", vertex.label, fragment.label);

        Ok(Self { vertex, fragment })
    }

    pub fn vertex(&self) -> &CompiledShader {
        &self.vertex
    }

    pub fn fragment(&self) -> &CompiledShader {
        &self.fragment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VS: &str = include_str!("shaders/triangle_vs.wgsl");
    const FS: &str = include_str!("shaders/triangle_fs.wgsl");

    fn vs() -> CompiledShader {
        CompiledShader::compile(ShaderStage::Vertex, "vertex_shader", VS).unwrap()
    }

    fn fs() -> CompiledShader {
        CompiledShader::compile(ShaderStage::Fragment, "fragment_shader", FS).unwrap()
    }

    #[test]
    fn bundled_vertex_shader_reflects_interface() {
        let v = vs();
        assert_eq!(v.entry_point(), "vs_main");
        assert_eq!(v.inputs().iter().copied().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(v.outputs().iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn bundled_fragment_shader_reflects_interface() {
        let f = fs();
        assert_eq!(f.entry_point(), "fs_main");
        assert_eq!(f.inputs().iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn syntax_error_reports_label_and_log() {
        let err = CompiledShader::compile(ShaderStage::Vertex, "broken", "fn vs_main( {").unwrap_err();
        match &err {
            ShaderError::Compile { label, log } => {
                assert_eq!(label, "broken");
                assert!(!log.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("broken compilation failed - "));
    }

    #[test]
    fn type_error_fails_validation() {
        let src = "@fragment fn fs_main() -> @location(0) vec4<f32> { return vec3<f32>(1.0); }";
        let err = CompiledShader::compile(ShaderStage::Fragment, "bad_types", src).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
    }

    #[test]
    fn missing_stage_entry_point_is_compile_error() {
        let err = CompiledShader::compile(ShaderStage::Vertex, "frag_as_vert", FS).unwrap_err();
        match err {
            ShaderError::Compile { log, .. } => assert_eq!(log, "no vertex entry point"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bundled_pair_links() {
        let program = ShaderProgram::link(vs(), fs(), &[0, 1]).unwrap();
        assert_eq!(program.vertex().stage(), ShaderStage::Vertex);
        assert_eq!(program.fragment().stage(), ShaderStage::Fragment);
    }

    #[test]
    fn link_rejects_unwritten_fragment_input() {
        let src = "@fragment fn fs_main(@location(3) c: vec3<f32>) -> @location(0) vec4<f32> { return vec4<f32>(c, 1.0); }";
        let f = CompiledShader::compile(ShaderStage::Fragment, "reads_3", src).unwrap();
        let err = ShaderProgram::link(vs(), f, &[0, 1]).unwrap_err();
        match err {
            ShaderError::Link { log } => assert!(log.contains("[3]")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn link_rejects_missing_vertex_attribute() {
        let err = ShaderProgram::link(vs(), fs(), &[0]).unwrap_err();
        match err {
            ShaderError::Link { log } => assert!(log.contains("[1]")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn link_rejects_swapped_stages() {
        let err = ShaderProgram::link(fs(), vs(), &[0, 1]).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }
}
