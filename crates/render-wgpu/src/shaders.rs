/// WGSL shader for the instanced lattice boxes: one directional light, an
/// ambient term and linear distance fog toward the clear color.
pub const LATTICE_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    eye: vec4<f32>,
    // x = fog near, y = fog far
    fog: vec4<f32>,
    background: vec4<f32>,
    // xyz = direction toward the light, w = intensity
    light: vec4<f32>,
    ambient: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) offset: vec3<f32>,
    @location(3) size: vec3<f32>,
    @location(4) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let world_pos = vertex.position * instance.size + instance.offset;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(world_pos, 1.0);
    out.world_position = world_pos;
    // Axis-aligned scaling keeps face normals unchanged.
    out.world_normal = vertex.normal;
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let light_dir = normalize(uniforms.light.xyz);
    let diffuse = max(dot(normalize(in.world_normal), light_dir), 0.0) * uniforms.light.w;
    let lit = min(in.color.rgb * (uniforms.ambient.rgb + vec3<f32>(diffuse)), vec3<f32>(1.0));

    let dist = distance(in.world_position, uniforms.eye.xyz);
    let span = max(uniforms.fog.y - uniforms.fog.x, 0.0001);
    let fog = clamp((dist - uniforms.fog.x) / span, 0.0, 1.0);
    return vec4<f32>(mix(lit, uniforms.background.rgb, fog), in.color.a);
}
"#;
