/// Maximum directional lights uploaded per frame.
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

/// WGSL shader for the room: instanced boxes and planes, ambient plus
/// Lambert directional lighting.
pub const ROOM_SHADER: &str = r#"
struct Uniforms {
    view_proj: mat4x4<f32>,
    // rgb = summed ambient radiance, w = number of directional lights
    ambient: vec4<f32>,
    // xyz = direction the light travels
    light_dirs: array<vec4<f32>, 4>,
    light_colors: array<vec4<f32>, 4>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_normal: vec3<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front: bool) -> @location(0) vec4<f32> {
    // Planes are drawn double-sided; flip the normal on their back face.
    var normal = in.world_normal;
    if (!front) {
        normal = -normal;
    }
    var lighting = uniforms.ambient.rgb;
    let count = u32(uniforms.ambient.w);
    for (var i = 0u; i < count; i = i + 1u) {
        let to_light = -normalize(uniforms.light_dirs[i].xyz);
        let diffuse = max(dot(normal, to_light), 0.0);
        lighting = lighting + uniforms.light_colors[i].rgb * diffuse;
    }
    return vec4<f32>(in.color.rgb * lighting, in.color.a);
}
"#;
